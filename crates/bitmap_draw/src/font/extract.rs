use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{Font, Glyph};
use crate::{Color, DrawError, PixelSurface};

/// Characters laid out in a reference image when no other order is given.
pub const DEFAULT_CHARS: &str = " 0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ.!?_-";

/// How to read a font reference image.
///
/// The bottom row of the image carries the delimiters: a leading run of `delimiters[0]` whose
/// length is the spacing between characters, then one run per character alternating through the
/// delimiter list starting at `delimiters[1]`. Every pixel above a run that matches `font_color`
/// becomes part of that character's glyph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractOptions {
    pub font_color: Color,
    pub to_upper: bool,
    /// Characters in the order they appear in the image.
    pub chars: String,
    pub delimiters: Vec<Color>,
    /// Reject cells whose delimiter run is empty instead of storing an empty glyph.
    pub strict: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            font_color: Color::BLACK,
            to_upper: true,
            chars: DEFAULT_CHARS.to_string(),
            delimiters: vec![Color::RED, Color::GREEN],
            strict: false,
        }
    }
}

/// Builds a [`Font`] from a delimiter-marked reference image.
pub fn extract_font<S: PixelSurface + ?Sized>(
    surface: &S,
    options: &ExtractOptions,
) -> Result<Font, DrawError> {
    if surface.height() == 0 {
        return Err(DrawError::FontExtraction("reference image has no rows".into()));
    }
    if options.delimiters.is_empty() {
        return Err(DrawError::FontExtraction("at least one delimiter color is required".into()));
    }

    let spacing = delimiter_run(surface, 0, options.delimiters[0]);
    let mut chars = BTreeMap::new();
    let mut x = spacing;

    for (index, ch) in options.chars.chars().enumerate() {
        let delimiter = options.delimiters[(index + 1) % options.delimiters.len()];
        let glyph = extract_glyph(surface, x, options.font_color, delimiter);

        if glyph.width == 0 {
            if options.strict {
                return Err(DrawError::FontExtraction(format!(
                    "no {delimiter} delimiter under {ch:?} at x={x}"
                )));
            }
            warn!("Character {ch:?} at x={x} has no {delimiter} delimiter run, glyph is empty");
        }

        debug!(
            "Loaded {ch:?} from x={x} with delimiter {delimiter}: width {}, {} pixels",
            glyph.width,
            glyph.pixels.len()
        );

        x += glyph.width;
        chars.insert(ch, glyph);
    }

    info!("Loaded {} glyphs, spacing {spacing}", chars.len());

    Ok(Font::new(surface.height() - 1, spacing, options.to_upper, chars))
}

/// Opens an image file and extracts a font from it.
pub fn extract_font_path<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<Font, DrawError> {
    let image = image::open(path)?.into_rgba8();
    extract_font(&image, options)
}

/// Number of consecutive `delimiter` pixels on the bottom row starting at `x`.
fn delimiter_run<S: PixelSurface + ?Sized>(surface: &S, x: u32, delimiter: Color) -> u32 {
    let bottom = surface.height() - 1;
    (x..surface.width())
        .take_while(|&px| read(surface, px, bottom) == Some(delimiter))
        .count() as u32
}

fn extract_glyph<S: PixelSurface + ?Sized>(
    surface: &S,
    x: u32,
    font_color: Color,
    delimiter: Color,
) -> Glyph {
    let width = delimiter_run(surface, x, delimiter);
    let mut pixels = Vec::new();

    for y in 0..surface.height() - 1 {
        for px in x..x + width {
            if read(surface, px, y) == Some(font_color) {
                pixels.push((px - x, y));
            }
        }
    }

    Glyph::new(width, pixels)
}

fn read<S: PixelSurface + ?Sized>(surface: &S, x: u32, y: u32) -> Option<Color> {
    surface.read_pixel(i32::try_from(x).ok()?, i32::try_from(y).ok()?)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::Canvas;

    /// Paints a reference strip: bottom row runs of the given colors and widths, `#` cells above.
    fn strip(rows: &[&str], runs: &[(Color, u32)]) -> Canvas {
        let width = runs.iter().map(|(_, w)| w).sum::<u32>();
        let height = rows.len() as u32 + 1;
        let mut canvas = Canvas::new(width, height, Color::WHITE);

        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    canvas.draw_pixel(x as i32, y as i32, Color::BLACK);
                }
            }
        }

        let mut x = 0;
        for &(color, run) in runs {
            for _ in 0..run {
                canvas.draw_pixel(x, height as i32 - 1, color);
                x += 1;
            }
        }
        canvas
    }

    #[test]
    fn reads_spacing_widths_and_pixels() {
        let canvas = strip(
            &["..#..##", "..#.#.#"],
            &[(Color::RED, 2), (Color::GREEN, 1), (Color::RED, 2), (Color::GREEN, 2)],
        );
        let options = ExtractOptions { chars: "ABC".into(), ..Default::default() };

        let font = extract_font(&canvas, &options).unwrap();
        assert_eq!(font.spacing(), 2);
        assert_eq!(font.height(), 2);
        assert!(font.to_upper());
        assert_eq!(font.get('A'), Some(&Glyph::new(1, vec![(0, 0), (0, 1)])));
        assert_eq!(font.get('B'), Some(&Glyph::new(2, vec![(1, 1)])));
        assert_eq!(font.get('C'), Some(&Glyph::new(2, vec![(0, 0), (1, 0), (1, 1)])));
    }

    #[test]
    fn only_exact_font_color_counts() {
        let mut canvas = strip(&["##"], &[(Color::RED, 0), (Color::GREEN, 2)]);
        canvas.draw_pixel(1, 0, Color::rgba(255, 255, 255, 128));
        let options = ExtractOptions { chars: "X".into(), ..Default::default() };

        let font = extract_font(&canvas, &options).unwrap();
        assert_eq!(font.spacing(), 0);
        assert_eq!(font.get('X'), Some(&Glyph::new(2, vec![(0, 0)])));
    }

    #[test]
    fn missing_run_gives_empty_glyph() {
        let canvas = strip(&["#."], &[(Color::RED, 1), (Color::GREEN, 1)]);
        let options = ExtractOptions { chars: "AB".into(), ..Default::default() };

        let font = extract_font(&canvas, &options).unwrap();
        assert_eq!(font.get('B'), Some(&Glyph::new(0, vec![])));
        assert!(font.get('?').is_none());
    }

    #[test]
    fn strict_mode_rejects_empty_cells() {
        let canvas = strip(&["#."], &[(Color::RED, 1), (Color::GREEN, 1)]);
        let options = ExtractOptions { chars: "AB".into(), strict: true, ..Default::default() };

        let err = extract_font(&canvas, &options).unwrap_err();
        assert!(matches!(err, DrawError::FontExtraction(_)));
    }

    #[test]
    fn custom_delimiters_cycle() {
        let blue = Color::BLUE;
        let canvas = strip(
            &["#.##"],
            &[(Color::RED, 0), (Color::GREEN, 1), (blue, 1), (Color::RED, 2)],
        );
        let options = ExtractOptions {
            chars: "abc".into(),
            to_upper: false,
            delimiters: vec![Color::RED, Color::GREEN, blue],
            ..Default::default()
        };

        let font = extract_font(&canvas, &options).unwrap();
        assert_eq!(font.get('a').unwrap().width, 1);
        assert_eq!(font.get('b').unwrap().width, 1);
        assert_eq!(font.get('c'), Some(&Glyph::new(2, vec![(0, 0), (1, 0)])));
    }

    #[test]
    fn rejects_degenerate_input() {
        let canvas = Canvas::new(3, 0, Color::WHITE);
        assert!(extract_font(&canvas, &ExtractOptions::default()).is_err());

        let canvas = Canvas::new(3, 2, Color::WHITE);
        let options = ExtractOptions { delimiters: Vec::new(), ..Default::default() };
        assert!(extract_font(&canvas, &options).is_err());
    }

    #[test]
    fn options_from_partial_json() {
        let options: ExtractOptions =
            serde_json::from_str(r#"{"chars":" ABj","toUpper":false}"#).unwrap();
        assert_eq!(options.chars, " ABj");
        assert!(!options.to_upper);
        assert_eq!(options.font_color, Color::BLACK);
        assert_eq!(options.delimiters, vec![Color::RED, Color::GREEN]);
    }
}
