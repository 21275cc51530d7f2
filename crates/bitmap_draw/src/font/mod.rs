pub(crate) mod builtin;
pub(crate) mod extract;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::DrawError;

pub const DEFAULT_FALLBACK: char = '?';

/// Shape of a single character.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyph {
    /// Horizontal advance in pixels, including any blank columns on the right.
    pub width: u32,
    /// Foreground pixels as `(dx, dy)` offsets from the glyph's top-left corner.
    pub pixels: Vec<(u32, u32)>,
}

impl Glyph {
    pub fn new(width: u32, pixels: Vec<(u32, u32)>) -> Self {
        Self { width, pixels }
    }

    /// Builds a glyph from text rows where `#` marks a foreground pixel. The width is the length
    /// of the longest row.
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut width = 0;
        let mut pixels = Vec::new();
        for (dy, row) in rows.iter().enumerate() {
            width = width.max(row.chars().count() as u32);
            for (dx, ch) in row.chars().enumerate() {
                if ch == '#' {
                    pixels.push((dx as u32, dy as u32));
                }
            }
        }
        Self { width, pixels }
    }
}

/// A bitmap font: one [`Glyph`] per character plus the metrics shared by all of them.
///
/// Serialized as `{ "toUpper", "height", "spaceBetweenChars", "fallback", "chars" }`, where
/// `chars` maps single-character keys to `{ "width", "pixels": [[dx, dy], ...] }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Font {
    to_upper: bool,
    height: u32,
    space_between_chars: u32,
    #[serde(default = "default_fallback")]
    fallback: char,
    chars: BTreeMap<char, Glyph>,
}

fn default_fallback() -> char {
    DEFAULT_FALLBACK
}

impl Font {
    pub fn new(
        height: u32,
        space_between_chars: u32,
        to_upper: bool,
        chars: BTreeMap<char, Glyph>,
    ) -> Self {
        Self { to_upper, height, space_between_chars, fallback: DEFAULT_FALLBACK, chars }
    }

    /// The 3x5 font bundled with the crate. Same as `Font::default()`.
    pub fn builtin() -> Self {
        builtin::font()
    }

    pub fn with_fallback(mut self, fallback: char) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn to_upper(&self) -> bool {
        self.to_upper
    }

    /// Glyph height, i.e. the reference image height without its delimiter row.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn spacing(&self) -> u32 {
        self.space_between_chars
    }

    pub fn fallback(&self) -> char {
        self.fallback
    }

    pub fn chars(&self) -> &BTreeMap<char, Glyph> {
        &self.chars
    }

    /// Glyph stored under exactly `ch`, without folding or fallback.
    pub fn get(&self, ch: char) -> Option<&Glyph> {
        self.chars.get(&ch)
    }

    /// Resolves the glyph used to draw `ch`.
    ///
    /// The character is upper-cased first when the font asks for it; characters without an entry
    /// use the fallback glyph. Fails only if the fallback glyph itself is missing.
    pub fn glyph(&self, ch: char) -> Result<&Glyph, DrawError> {
        if let Some(glyph) = self.fold(ch).and_then(|key| self.chars.get(&key)) {
            return Ok(glyph);
        }

        debug!("No glyph for {ch:?}, using fallback {:?}", self.fallback);
        self.chars
            .get(&self.fallback)
            .ok_or(DrawError::FontConfiguration { fallback: self.fallback })
    }

    /// Checks that the fallback glyph exists, so that no lookup can fail.
    pub fn validate(&self) -> Result<(), DrawError> {
        if self.chars.contains_key(&self.fallback) {
            Ok(())
        } else {
            Err(DrawError::FontConfiguration { fallback: self.fallback })
        }
    }

    fn fold(&self, ch: char) -> Option<char> {
        if !self.to_upper {
            return Some(ch);
        }

        // Characters that upper-case to several characters have no single key.
        let mut upper = ch.to_uppercase();
        match (upper.next(), upper.next()) {
            (Some(folded), None) => Some(folded),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<String, DrawError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DrawError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), DrawError> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: R) -> Result<Self, DrawError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DrawError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DrawError> {
        Self::read_from(BufReader::new(File::open(path)?))
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::builtin()
    }
}
