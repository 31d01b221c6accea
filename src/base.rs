//! Canvas, a clipped blending layer over a pixel format
//!
//! Scanline renderers hand spans to the canvas in raster coordinates.
//! The canvas trims them to the frame and forwards the remainder to
//! the pixel format, so everything below this layer can assume in
//! range coordinates.

use std::cmp::{max, min};
use std::path::Path;

use crate::color::Color;
use crate::pixfmt::{Pixel, PixelData};

/// Rendering target backed by a pixel format.
#[derive(Debug)]
pub struct Canvas<T: Pixel> {
    pub surf: T,
}

impl<T: Pixel> Canvas<T> {
    /// Wrap a pixel format.
    pub fn new(surf: T) -> Self {
        Canvas { surf }
    }
    /// Overwrite every pixel with `color`.
    pub fn clear<C: Color>(&mut self, color: C) {
        let (w, h) = (self.surf.width(), self.surf.height());
        for y in 0..h {
            for x in 0..w {
                self.surf.set((x, y), color);
            }
        }
    }
    /// Frame limits as `(xmin, xmax, ymin, ymax)`, inclusive.
    pub fn limits(&self) -> (i64, i64, i64, i64) {
        let w = self.surf.width() as i64;
        let h = self.surf.height() as i64;
        (0, w - 1, 0, h - 1)
    }
    /// Blend a single cover run from `x1` to `x2` inclusive on row `y`,
    /// clipped to the frame.
    pub fn blend_hline<C: Color>(&mut self, x1: i64, y: i64, x2: i64, c: C, cover: u64) {
        let (xmin, xmax, ymin, ymax) = self.limits();
        let (x1, x2) = if x2 > x1 { (x1, x2) } else { (x2, x1) };
        if y > ymax || y < ymin || x1 > xmax || x2 < xmin {
            return;
        }
        let x1 = max(x1, xmin);
        let x2 = min(x2, xmax);
        self.surf.blend_hline(x1, y, x2 - x1 + 1, c, cover);
    }
    /// Blend `len` pixels starting at `(x, y)` with per pixel covers,
    /// clipped to the frame. The covers slice is offset along with `x`.
    pub fn blend_solid_hspan<C: Color>(&mut self, x: i64, y: i64, len: i64, c: C, covers: &[u64]) {
        debug_assert_eq!(len as usize, covers.len());
        let (xmin, xmax, ymin, ymax) = self.limits();
        if y > ymax || y < ymin {
            return;
        }
        let (mut x, mut len, mut off) = (x, len, 0);
        if x < xmin {
            len -= xmin - x;
            if len <= 0 {
                return;
            }
            off += xmin - x;
            x = xmin;
        }
        if x + len > xmax + 1 {
            len = xmax - x + 1;
            if len <= 0 {
                return;
            }
        }
        let covers = &covers[off as usize..(off + len) as usize];
        self.surf.blend_solid_hspan(x, y, len, c, covers);
    }
    /// Write the image to `filename`, with the format chosen from the
    /// file extension.
    pub fn to_file<P: AsRef<Path>>(&self, filename: P) -> image::ImageResult<()>
    where
        T: PixelData,
    {
        crate::imgio::write_file(
            self.surf.pixeldata(),
            self.surf.width(),
            self.surf.height(),
            filename,
            T::bpp(),
        )
    }
}

impl<T: Pixel + PixelData> PixelData for Canvas<T> {
    fn pixeldata(&self) -> &[u8] {
        self.surf.pixeldata()
    }
}
