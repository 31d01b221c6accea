//! Raster Buffer
//!
//! Row-major byte storage underneath a pixel format. The buffer knows
//! its dimensions and bytes per pixel but nothing about color math;
//! interpretation of the bytes belongs to [`Surface`](crate::pixfmt::Surface).

use std::ops::{Index, IndexMut};

/// Owned block of pixel bytes, addressed as `(x, y)` pixel pairs.
#[derive(Debug, Default)]
pub struct RasterBuffer {
    /// Pixel data, `width * height * bpp` bytes, row major.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Bytes per pixel.
    pub bpp: usize,
}

impl RasterBuffer {
    /// Create a new buffer of `width` by `height` pixels with `bpp`
    /// bytes per pixel, filled with 255 (opaque white for the packed
    /// RGB formats).
    pub fn new(width: usize, height: usize, bpp: usize) -> Self {
        RasterBuffer {
            width,
            height,
            bpp,
            data: vec![255u8; width * height * bpp],
        }
    }

    /// Fill the whole buffer with a single byte value.
    pub fn fill(&mut self, value: u8) {
        for b in self.data.iter_mut() {
            *b = value;
        }
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width, "x out of range {} >= {}", x, self.width);
        debug_assert!(y < self.height, "y out of range {} >= {}", y, self.height);
        (y * self.width + x) * self.bpp
    }

    /// Bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let p = self.offset(x, y);
        &self.data[p..p + self.bpp]
    }
}

impl Index<(usize, usize)> for RasterBuffer {
    type Output = [u8];
    fn index(&self, (x, y): (usize, usize)) -> &[u8] {
        let p = self.offset(x, y);
        &self.data[p..p + self.bpp]
    }
}

impl IndexMut<(usize, usize)> for RasterBuffer {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut [u8] {
        let p = self.offset(x, y);
        &mut self.data[p..p + self.bpp]
    }
}
