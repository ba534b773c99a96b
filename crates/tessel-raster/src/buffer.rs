//! Row-major RGBA8 pixel storage.

use tessel_space::Color;

use crate::canvas::CanvasSize;

/// Bytes per pixel in a [`PixelBuffer`] (R, G, B, A).
pub const BYTES_PER_PIXEL: usize = 4;

/// A freshly allocated frame of `width * height` RGBA8 pixels.
///
/// Row `y` occupies bytes `[y * row_stride(), (y + 1) * row_stride())`.
/// Alpha is always 255.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a buffer with every pixel set to `color`.
    pub fn filled(size: CanvasSize, color: Color) -> Self {
        let px = color.to_rgba();
        let mut data = Vec::with_capacity(size.pixel_count() * BYTES_PER_PIXEL);
        for _ in 0..size.pixel_count() {
            data.extend_from_slice(&px);
        }
        Self {
            width: size.width(),
            height: size.height(),
            data,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row.
    pub fn row_stride(&self) -> usize {
        self.width * BYTES_PER_PIXEL
    }

    /// `true` if the buffer holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The colour at `(x, y)`, or `None` if out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * BYTES_PER_PIXEL;
        let px = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];
        Some(Color::from_rgba(px))
    }

    /// Set `(x, y)` to `color`. Coordinates outside the buffer are clipped;
    /// returns whether a pixel was written.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Color) -> bool {
        if x < 0 || y < 0 || x as u64 >= self.width as u64 || y as u64 >= self.height as u64 {
            return false;
        }
        let i = (y as usize * self.width + x as usize) * BYTES_PER_PIXEL;
        self.data[i..i + BYTES_PER_PIXEL].copy_from_slice(&color.to_rgba());
        true
    }

    /// Fill every pixel with `dx² + dy² <= radius²` around `(cx, cy)`,
    /// clipped to the buffer.
    pub fn fill_disk(&mut self, cx: i64, cy: i64, radius: u32, color: Color) {
        let r = i64::from(radius);
        let r2 = r * r;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r2 {
                    self.set_pixel(cx.saturating_add(dx), cy.saturating_add(dy), color);
                }
            }
        }
    }

    /// Number of pixels exactly equal to `color`.
    pub fn count_color(&self, color: Color) -> usize {
        let px = color.to_rgba();
        self.data
            .chunks_exact(BYTES_PER_PIXEL)
            .filter(|c| *c == px)
            .count()
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, yielding its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(w: usize, h: usize) -> CanvasSize {
        CanvasSize::from_unsigned(w, h).unwrap()
    }

    #[test]
    fn filled_buffer_is_uniform() {
        let buf = PixelBuffer::filled(size(3, 2), Color::WHITE);
        assert_eq!(buf.as_bytes().len(), 24);
        assert_eq!(buf.count_color(Color::WHITE), 6);
        assert_eq!(buf.pixel(2, 1), Some(Color::WHITE));
        assert_eq!(buf.pixel(3, 0), None);
    }

    #[test]
    fn set_pixel_clips() {
        let mut buf = PixelBuffer::filled(size(2, 2), Color::WHITE);
        assert!(!buf.set_pixel(-1, 0, Color::BLACK));
        assert!(!buf.set_pixel(0, 2, Color::BLACK));
        assert!(buf.set_pixel(1, 1, Color::BLACK));
        assert_eq!(buf.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(buf.count_color(Color::BLACK), 1);
    }

    #[test]
    fn disk_of_radius_three_has_29_pixels() {
        let mut buf = PixelBuffer::filled(size(20, 20), Color::WHITE);
        buf.fill_disk(10, 10, 3, Color::BLACK);
        assert_eq!(buf.count_color(Color::BLACK), 29);
    }

    #[test]
    fn disk_at_corner_is_clipped() {
        let mut buf = PixelBuffer::filled(size(20, 20), Color::WHITE);
        buf.fill_disk(0, 0, 3, Color::BLACK);
        // Quarter disk: rows dy=0..=3 hold 4, 3, 3, 1 pixels.
        assert_eq!(buf.count_color(Color::BLACK), 11);
    }

    #[test]
    fn zero_radius_is_single_pixel() {
        let mut buf = PixelBuffer::filled(size(5, 5), Color::WHITE);
        buf.fill_disk(2, 2, 0, Color::BLACK);
        assert_eq!(buf.count_color(Color::BLACK), 1);
    }

    #[test]
    fn empty_buffer() {
        let buf = PixelBuffer::filled(size(0, 7), Color::WHITE);
        assert!(buf.is_empty());
        assert_eq!(buf.into_bytes(), Vec::<u8>::new());
    }
}
