use std::collections::BTreeMap;

use super::{Font, Glyph};

const HEIGHT: u32 = 5;
const SPACING: u32 = 1;

#[rustfmt::skip]
const GLYPHS: &[(char, [&str; 5])] = &[
    (' ', ["...", "...", "...", "...", "..."]),
    ('0', ["###", "#.#", "#.#", "#.#", "###"]),
    ('1', [".#.", "##.", ".#.", ".#.", "###"]),
    ('2', ["###", "..#", "###", "#..", "###"]),
    ('3', ["###", "..#", ".##", "..#", "###"]),
    ('4', ["#.#", "#.#", "###", "..#", "..#"]),
    ('5', ["###", "#..", "###", "..#", "###"]),
    ('6', ["###", "#..", "###", "#.#", "###"]),
    ('7', ["###", "..#", ".#.", ".#.", ".#."]),
    ('8', ["###", "#.#", "###", "#.#", "###"]),
    ('9', ["###", "#.#", "###", "..#", "###"]),
    ('A', [".#.", "#.#", "###", "#.#", "#.#"]),
    ('B', ["##.", "#.#", "##.", "#.#", "##."]),
    ('C', [".##", "#..", "#..", "#..", ".##"]),
    ('D', ["##.", "#.#", "#.#", "#.#", "##."]),
    ('E', ["###", "#..", "##.", "#..", "###"]),
    ('F', ["###", "#..", "##.", "#..", "#.."]),
    ('G', [".##", "#..", "#.#", "#.#", ".##"]),
    ('H', ["#.#", "#.#", "###", "#.#", "#.#"]),
    ('I', ["###", ".#.", ".#.", ".#.", "###"]),
    ('J', ["..#", "..#", "..#", "#.#", ".#."]),
    ('K', ["#.#", "#.#", "##.", "#.#", "#.#"]),
    ('L', ["#..", "#..", "#..", "#..", "###"]),
    ('M', ["#.#", "###", "###", "#.#", "#.#"]),
    ('N', ["##.", "#.#", "#.#", "#.#", "#.#"]),
    ('O', [".#.", "#.#", "#.#", "#.#", ".#."]),
    ('P', ["##.", "#.#", "##.", "#..", "#.."]),
    ('Q', [".#.", "#.#", "#.#", "##.", ".##"]),
    ('R', ["##.", "#.#", "##.", "#.#", "#.#"]),
    ('S', [".##", "#..", ".#.", "..#", "##."]),
    ('T', ["###", ".#.", ".#.", ".#.", ".#."]),
    ('U', ["#.#", "#.#", "#.#", "#.#", "###"]),
    ('V', ["#.#", "#.#", "#.#", "#.#", ".#."]),
    ('W', ["#.#", "#.#", "###", "###", "#.#"]),
    ('X', ["#.#", "#.#", ".#.", "#.#", "#.#"]),
    ('Y', ["#.#", "#.#", ".#.", ".#.", ".#."]),
    ('Z', ["###", "..#", ".#.", "#..", "###"]),
    ('.', [".", ".", ".", ".", "#"]),
    ('!', ["#", "#", "#", ".", "#"]),
    ('?', ["###", "..#", ".#.", "...", ".#."]),
    ('_', ["...", "...", "...", "...", "###"]),
    ('-', ["...", "...", "###", "...", "..."]),
];

pub(crate) fn font() -> Font {
    let chars: BTreeMap<char, Glyph> =
        GLYPHS.iter().map(|(ch, rows)| (*ch, Glyph::from_rows(rows))).collect();
    Font::new(HEIGHT, SPACING, true, chars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_CHARS;

    #[test]
    fn covers_default_character_set() {
        let font = font();
        for ch in DEFAULT_CHARS.chars() {
            assert!(font.get(ch).is_some(), "missing {ch:?}");
        }
        assert!(font.validate().is_ok());
    }

    #[test]
    fn glyphs_fit_the_font_height() {
        let font = font();
        for (ch, glyph) in font.chars() {
            assert!(glyph.pixels.iter().all(|&(dx, dy)| dx < glyph.width && dy < HEIGHT), "{ch:?}");
        }
    }

    #[test]
    fn narrow_punctuation() {
        let font = font();
        assert_eq!(font.get('.').unwrap().width, 1);
        assert_eq!(font.get(' ').unwrap().width, 3);
        assert!(font.get(' ').unwrap().pixels.is_empty());
    }
}
