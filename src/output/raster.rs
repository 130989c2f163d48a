//! Raster drawing primitives over an RGB image buffer.
//!
//! Just enough to draw maps and line charts: filled rectangles, Bresenham
//! lines, discs, and bitmap-font text.

use image::{Rgb, RgbImage};

use super::font;

/// Drawing surface wrapping an [`RgbImage`].
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Create a canvas filled with a background color.
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
        }
    }

    /// Consume the canvas, returning the image.
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Set one pixel, ignoring out-of-bounds coordinates.
    pub fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.image.width() && (y as u32) < self.image.height() {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Fill an axis-aligned rectangle (clipped to the canvas).
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
        for y in y0.min(y1)..=y0.max(y1) {
            for x in x0.min(x1)..=x0.max(x1) {
                self.put(x, y, color);
            }
        }
    }

    /// Draw a line with Bresenham's algorithm.
    pub fn draw_line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.put(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw a filled disc.
    pub fn draw_disc(&mut self, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
        for y in -radius..=radius {
            for x in -radius..=radius {
                if x * x + y * y <= radius * radius {
                    self.put(cx + x, cy + y, color);
                }
            }
        }
    }

    /// Draw text with the built-in 5x7 font; (x, y) is the top-left corner.
    pub fn draw_text(&mut self, x: i64, y: i64, text: &str, color: Rgb<u8>) {
        let mut cursor = x;
        for c in text.chars() {
            let rows = font::glyph(c);
            for (dy, row) in rows.iter().enumerate() {
                for dx in 0..font::GLYPH_WIDTH {
                    if row & (0x10 >> dx) != 0 {
                        self.put(cursor + dx as i64, y + dy as i64, color);
                    }
                }
            }
            cursor += font::GLYPH_ADVANCE as i64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    #[test]
    fn test_put_clips_out_of_bounds() {
        let mut canvas = Canvas::new(10, 10, WHITE);
        canvas.put(-1, 5, BLACK);
        canvas.put(5, 100, BLACK);
        canvas.put(5, 5, BLACK);
        let image = canvas.into_image();
        assert_eq!(image.get_pixel(5, 5), &BLACK);
        assert_eq!(image.get_pixel(0, 5), &WHITE);
    }

    #[test]
    fn test_line_endpoints_drawn() {
        let mut canvas = Canvas::new(20, 20, WHITE);
        canvas.draw_line(2, 3, 15, 11, BLACK);
        let image = canvas.into_image();
        assert_eq!(image.get_pixel(2, 3), &BLACK);
        assert_eq!(image.get_pixel(15, 11), &BLACK);
    }

    #[test]
    fn test_text_marks_pixels() {
        let mut canvas = Canvas::new(60, 12, WHITE);
        canvas.draw_text(1, 1, "OIL", BLACK);
        let image = canvas.into_image();
        let dark = image.pixels().filter(|p| **p == BLACK).count();
        assert!(dark > 10);
    }
}
