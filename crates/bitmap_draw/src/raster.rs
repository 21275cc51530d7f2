//! Shape primitives. Every pixel goes through [`PixelSurface::draw_pixel`], so all of them
//! alpha-composite the same way.

use crate::{Color, PixelSurface};

pub fn draw_pixel<S: PixelSurface + ?Sized>(surface: &mut S, x: i32, y: i32, color: Color) {
    surface.draw_pixel(x, y, color);
}

/// Bresenham line from `(x0, y0)` to `(x1, y1)`, both endpoints included.
pub fn draw_line<S: PixelSurface + ?Sized>(
    surface: &mut S,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: Color,
) {
    line(surface, (x0.into(), y0.into()), (x1.into(), y1.into()), color);
}

/// Outline of the `width` x `height` rectangle whose top-left corner is `(x, y)`.
///
/// Non-positive sizes are not special-cased and produce whatever the four edges produce.
pub fn draw_rect<S: PixelSurface + ?Sized>(
    surface: &mut S,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    color: Color,
) {
    let (x, y) = (i64::from(x), i64::from(y));
    let right = x + i64::from(width) - 1;
    let bottom = y + i64::from(height) - 1;

    line(surface, (x, y), (right, y), color);
    line(surface, (right, y), (right, bottom), color);
    line(surface, (right, bottom), (x, bottom), color);
    line(surface, (x, bottom), (x, y), color);
}

pub fn fill_rect<S: PixelSurface + ?Sized>(
    surface: &mut S,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    color: Color,
) {
    let surface_width = i64::from(surface.width());
    let surface_height = i64::from(surface.height());
    let (x, y) = (i64::from(x), i64::from(y));

    let start_x = x.clamp(0, surface_width);
    let start_y = y.clamp(0, surface_height);
    let end_x = surface_width.min(x + i64::from(width));
    let end_y = surface_height.min(y + i64::from(height));

    for py in start_y..end_y {
        for px in start_x..end_x {
            plot(surface, px, py, color);
        }
    }
}

/// Blends one pixel given in widened coordinates. Points outside the `i32` range are off every
/// surface and are skipped.
pub(crate) fn plot<S: PixelSurface + ?Sized>(surface: &mut S, x: i64, y: i64, color: Color) {
    if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
        surface.draw_pixel(x, y, color);
    }
}

fn line<S: PixelSurface + ?Sized>(
    surface: &mut S,
    (mut x0, mut y0): (i64, i64),
    (x1, y1): (i64, i64),
    color: Color,
) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        plot(surface, x0, y0, color);

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}
