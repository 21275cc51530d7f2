mod color;
mod font;
mod raster;
mod surface;
mod text;

pub use color::Color;
pub use font::{
    extract::{extract_font, extract_font_path, ExtractOptions, DEFAULT_CHARS},
    Font, Glyph, DEFAULT_FALLBACK,
};
pub use raster::{draw_line, draw_pixel, draw_rect, fill_rect};
pub use surface::{Canvas, PixelSurface};
pub use text::{draw_text, measure_text};

#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    #[error("buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("invalid color {0:?}")]
    InvalidColor(String),
    #[error("font has no glyph for fallback character {fallback:?}")]
    FontConfiguration { fallback: char },
    #[error("failed to extract font: {0}")]
    FontExtraction(String),
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
    #[error("font I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid font data: {0}")]
    Persist(#[from] serde_json::Error),
}
