use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DrawError;

/// Straight (non-premultiplied) RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// 0 is fully transparent, 255 fully opaque.
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Builds a color from optional channels. Missing color channels are 0 and a missing alpha
    /// is 255; an explicit `Some(0)` is kept as 0.
    pub fn from_channels(r: Option<u8>, g: Option<u8>, b: Option<u8>, a: Option<u8>) -> Self {
        Self::rgba(r.unwrap_or(0), g.unwrap_or(0), b.unwrap_or(0), a.unwrap_or(255))
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn black(alpha: Option<u8>) -> Self {
        Self::BLACK.with_alpha(alpha.unwrap_or(255))
    }

    pub fn white(alpha: Option<u8>) -> Self {
        Self::WHITE.with_alpha(alpha.unwrap_or(255))
    }

    pub fn red(alpha: Option<u8>) -> Self {
        Self::RED.with_alpha(alpha.unwrap_or(255))
    }

    pub fn green(alpha: Option<u8>) -> Self {
        Self::GREEN.with_alpha(alpha.unwrap_or(255))
    }

    pub fn blue(alpha: Option<u8>) -> Self {
        Self::BLUE.with_alpha(alpha.unwrap_or(255))
    }

    /// Composites `foreground` over this color, which is treated as opaque. The result keeps this
    /// color's alpha.
    pub fn blend(self, foreground: Color) -> Color {
        let src_alpha = f32::from(foreground.a) / 255.0;
        let mix = |fg: u8, bg: u8| -> u8 {
            let value = f32::from(fg) * src_alpha + f32::from(bg) * (1.0 - src_alpha);
            value.round().clamp(0.0, 255.0) as u8
        };

        Color {
            r: mix(foreground.r, self.r),
            g: mix(foreground.g, self.g),
            b: mix(foreground.b, self.b),
            a: self.a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::rgba(r, g, b, a)
    }
}

impl From<Color> for [u8; 4] {
    fn from(color: Color) -> Self {
        color.to_array()
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(pixel: image::Rgba<u8>) -> Self {
        Self::from(pixel.0)
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(color: Color) -> Self {
        image::Rgba(color.to_array())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Accepts `#rrggbb`, `#rrggbbaa`, `r,g,b` and `r,g,b,a`.
impl FromStr for Color {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DrawError::InvalidColor(s.to_string());
        let trimmed = s.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |index: usize| {
                u8::from_str_radix(&hex[index * 2..index * 2 + 2], 16).map_err(|_| invalid())
            };
            let alpha = if hex.len() == 8 { channel(3)? } else { 255 };
            return Ok(Self::rgba(channel(0)?, channel(1)?, channel(2)?, alpha));
        }

        let channels = trimmed
            .split(',')
            .map(|part| part.trim().parse::<u8>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        match channels[..] {
            [r, g, b] => Ok(Self::rgb(r, g, b)),
            [r, g, b, a] => Ok(Self::rgba(r, g, b, a)),
            _ => Err(invalid()),
        }
    }
}
