use std::ops::DerefMut;

use image::RgbaImage;

use crate::{Color, DrawError};

const BYTES_PER_PIXEL: usize = 4;

/// Row-major RGBA8 buffer that drawing operations read and blend into.
///
/// Implementors must keep `data().len() == width * height * 4`.
pub trait PixelSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn data(&self) -> &[u8];
    fn data_mut(&mut self) -> &mut [u8];

    /// Byte offset of `(x, y)`, or `None` when the point lies outside the surface.
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (u32::try_from(x).ok()?, u32::try_from(y).ok()?);
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some((y as usize * self.width() as usize + x as usize) * BYTES_PER_PIXEL)
    }

    fn read_pixel(&self, x: i32, y: i32) -> Option<Color> {
        let idx = self.offset(x, y)?;
        let px = &self.data()[idx..idx + BYTES_PER_PIXEL];
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Blends `color` over the pixel at `(x, y)`. Points outside the surface are ignored.
    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        let Some(idx) = self.offset(x, y) else {
            return;
        };
        let data = self.data_mut();
        let background = Color::rgba(data[idx], data[idx + 1], data[idx + 2], data[idx + 3]);
        data[idx..idx + BYTES_PER_PIXEL].copy_from_slice(&background.blend(color).to_array());
    }
}

impl PixelSurface for RgbaImage {
    fn width(&self) -> u32 {
        RgbaImage::width(self)
    }

    fn height(&self) -> u32 {
        RgbaImage::height(self)
    }

    fn data(&self) -> &[u8] {
        self.as_raw()
    }

    fn data_mut(&mut self) -> &mut [u8] {
        self.deref_mut()
    }
}

/// Owned RGBA buffer, useful when no image decoder is involved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let pixels = width as usize * height as usize;
        let data = fill.to_array().repeat(pixels);
        Self { width, height, data }
    }

    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, DrawError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(DrawError::BufferSize { expected, actual: data.len() });
        }
        Ok(Self { width, height, data })
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn into_image(self) -> RgbaImage {
        // Length is checked on construction, so the conversion cannot fail.
        match RgbaImage::from_raw(self.width, self.height, self.data) {
            Some(image) => image,
            None => unreachable!("canvas buffer length matches its dimensions"),
        }
    }
}

impl From<RgbaImage> for Canvas {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let mut data = image.into_raw();
        // Image buffers may carry trailing bytes past the last pixel.
        data.truncate(width as usize * height as usize * BYTES_PER_PIXEL);
        Self { width, height, data }
    }
}

impl PixelSurface for Canvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
