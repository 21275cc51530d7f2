use crate::raster::plot;
use crate::{Color, DrawError, Font, Glyph, PixelSurface};

/// Width in pixels of `text` rendered with `font`, spacing included between characters only.
pub fn measure_text(text: &str, font: &Font) -> Result<u64, DrawError> {
    let glyphs = resolve(text, font)?;
    let gaps = glyphs.len().saturating_sub(1) as u64;
    let widths: u64 = glyphs.iter().map(|glyph| u64::from(glyph.width)).sum();
    Ok(widths + gaps * u64::from(font.spacing()))
}

/// Draws `text` with its top-left corner at `(x, y)` and returns the x coordinate just past the
/// last character.
///
/// Glyphs are resolved before anything is drawn, so a font without its fallback glyph leaves the
/// surface untouched. Pixels that land outside the `i32` coordinate range are skipped.
pub fn draw_text<S: PixelSurface + ?Sized>(
    surface: &mut S,
    x: i32,
    y: i32,
    text: &str,
    color: Color,
    font: &Font,
) -> Result<i64, DrawError> {
    let glyphs = resolve(text, font)?;
    let spacing = i64::from(font.spacing());
    let y = i64::from(y);
    let mut cursor = i64::from(x);

    for (index, glyph) in glyphs.into_iter().enumerate() {
        if index > 0 {
            cursor += spacing;
        }
        for &(dx, dy) in &glyph.pixels {
            plot(surface, cursor + i64::from(dx), y + i64::from(dy), color);
        }
        cursor += i64::from(glyph.width);
    }

    Ok(cursor)
}

fn resolve<'f>(text: &str, font: &'f Font) -> Result<Vec<&'f Glyph>, DrawError> {
    text.chars().map(|ch| font.glyph(ch)).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use test_log::test;

    use super::*;
    use crate::Canvas;

    fn font() -> Font {
        let chars = BTreeMap::from([
            ('A', Glyph::from_rows(&["##", "#."])),
            ('B', Glyph::from_rows(&["#..", "..#"])),
            ('?', Glyph::from_rows(&[".#", "#."])),
        ]);
        Font::new(2, 2, true, chars)
    }

    fn render(text: &str, font: &Font) -> Canvas {
        let mut canvas = Canvas::new(24, 4, Color::WHITE);
        draw_text(&mut canvas, 1, 1, text, Color::BLACK, font).unwrap();
        canvas
    }

    #[test]
    fn measure_adds_spacing_between_characters() {
        let font = font();
        assert_eq!(measure_text("", &font).unwrap(), 0);
        assert_eq!(measure_text("A", &font).unwrap(), 2);
        assert_eq!(measure_text("AB", &font).unwrap(), 2 + 2 + 3);
        assert_eq!(measure_text("ab?", &font).unwrap(), 2 + 2 + 3 + 2 + 2);
    }

    #[test]
    fn draw_returns_cursor_past_text() {
        let font = font();
        let mut canvas = Canvas::new(24, 4, Color::WHITE);
        let end = draw_text(&mut canvas, 3, 0, "AB", Color::BLACK, &font).unwrap();
        assert_eq!(end, 3 + measure_text("AB", &font).unwrap() as i64);

        let end = draw_text(&mut canvas, 3, 0, "", Color::BLACK, &font).unwrap();
        assert_eq!(end, 3);
    }

    #[test]
    fn draws_glyph_pixels_at_cursor() {
        let canvas = render("AB", &font());
        let black: Vec<_> = (0..4)
            .flat_map(|y| (0..24).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.read_pixel(x, y) == Some(Color::BLACK))
            .collect();
        // A at x=1, B at x=1+2+2=5.
        assert_eq!(black, vec![(1, 1), (2, 1), (5, 1), (1, 2), (7, 2)]);
    }

    #[test]
    fn case_folding_renders_identically() {
        let font = font();
        assert_eq!(render("a", &font), render("A", &font));
        assert_eq!(render("aB", &font), render("Ab", &font));
    }

    #[test]
    fn unknown_characters_use_fallback() {
        let font = font();
        assert_eq!(render("Z", &font), render("?", &font));
        assert_eq!(render("A~B", &font), render("A?B", &font));
    }

    #[test]
    fn missing_fallback_fails_without_drawing() {
        let font = font().with_fallback('#');
        let mut canvas = Canvas::new(24, 4, Color::WHITE);
        let before = canvas.clone();

        let err = draw_text(&mut canvas, 0, 0, "AZ", Color::BLACK, &font).unwrap_err();
        assert!(matches!(err, DrawError::FontConfiguration { fallback: '#' }));
        assert_eq!(canvas, before);
        assert!(measure_text("AZ", &font).is_err());
        assert_eq!(measure_text("AB", &font).unwrap(), 7);
    }

    #[test]
    fn text_near_coordinate_limit_is_clipped() {
        let font = Font::default();
        let mut canvas = Canvas::new(8, 8, Color::WHITE);

        let end = draw_text(&mut canvas, i32::MAX - 2, 0, "AB", Color::BLACK, &font).unwrap();
        assert_eq!(end, i64::from(i32::MAX) - 2 + 3 + 1 + 3);
        assert_eq!(canvas, Canvas::new(8, 8, Color::WHITE));
    }

    #[test]
    fn wide_glyphs_from_json_do_not_wrap() {
        let json = r#"{"toUpper":false,"height":1,"spaceBetweenChars":4294967295,
            "chars":{"?":{"width":4294967295,"pixels":[[0,0],[4294967294,0]]}}}"#;
        let font = Font::from_json(json).unwrap();
        let mut canvas = Canvas::new(4, 1, Color::WHITE);

        let end = draw_text(&mut canvas, 0, 0, "??", Color::BLACK, &font).unwrap();
        assert_eq!(end, 3 * i64::from(u32::MAX));
        assert_eq!(measure_text("??", &font).unwrap(), 3 * u64::from(u32::MAX));
        assert_eq!(canvas.read_pixel(0, 0), Some(Color::BLACK));
        assert_eq!(canvas.read_pixel(1, 0), Some(Color::WHITE));
        assert_eq!(canvas.read_pixel(3, 0), Some(Color::WHITE));
    }

    #[test]
    fn translucent_text_blends() {
        let mut canvas = Canvas::new(8, 2, Color::WHITE);
        draw_text(&mut canvas, 0, 0, "A", Color::black(Some(0)), &font()).unwrap();
        assert_eq!(canvas, Canvas::new(8, 2, Color::WHITE));
    }

    #[test]
    fn builtin_font_renders_default_text() {
        let font = Font::default();
        let mut canvas = Canvas::new(64, 8, Color::WHITE);
        let end = draw_text(&mut canvas, 0, 0, "Hello world !", Color::BLACK, &font).unwrap();
        assert_eq!(end as u64, measure_text("Hello world !", &font).unwrap());
        assert_eq!(canvas.read_pixel(0, 0), Some(Color::BLACK));
    }
}
