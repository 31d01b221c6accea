//! Pixel Formats
//!
//! A [`Surface`] wraps a [`RasterBuffer`] and interprets its bytes as
//! a concrete pixel layout. The layout is chosen by the type
//! parameter, `Surface<Rgb8>` or `Surface<Rgba8>`, and the per format
//! operations come in through the [`Pixel`] trait.

use std::marker::PhantomData;

use crate::buffer::RasterBuffer;
use crate::color::{lerp_u8, multiply_u8, prelerp_u8};
use crate::color::{Color, Rgb8, Rgba8};

/// Pixel format wrapper around raw pixel component data.
pub struct Surface<T> {
    rbuf: RasterBuffer,
    phantom: PhantomData<T>,
}

/// Read access to a pixel, widened to [`Rgba8`].
pub trait Source {
    fn get(&self, id: (usize, usize)) -> Rgba8;
}

/// Access to the raw bytes behind a pixel format.
pub trait PixelData {
    fn pixeldata(&self) -> &[u8];
}

/// Per format pixel operations.
///
/// `set` and `blend_pix` are the primitives. The hline and hspan
/// methods are what the scanline renderers call and are provided in
/// terms of them. Coordinates are unchecked here; callers clip first.
pub trait Pixel {
    /// Bytes per pixel.
    fn bpp() -> usize;
    /// Cover value that means full coverage.
    fn cover_mask() -> u64;
    /// Width of the underlying buffer in pixels.
    fn width(&self) -> usize;
    /// Height of the underlying buffer in pixels.
    fn height(&self) -> usize;
    /// Overwrite the pixel at `id` with `c`.
    fn set<C: Color>(&mut self, id: (usize, usize), c: C);
    /// Blend `c` onto the pixel at `id`, scaling its alpha by `cover`.
    fn blend_pix<C: Color>(&mut self, id: (usize, usize), c: C, cover: u64);

    /// Blend a run of `len` pixels starting at `(x, y)` with a single
    /// cover value. Full cover with an opaque color degenerates to a
    /// copy.
    fn blend_hline<C: Color>(&mut self, x: i64, y: i64, len: i64, c: C, cover: u64) {
        if c.is_transparent() {
            return;
        }
        let (x, y, len) = (x as usize, y as usize, len as usize);
        if c.is_opaque() && cover == Self::cover_mask() {
            for i in 0..len {
                self.set((x + i, y), c);
            }
        } else {
            for i in 0..len {
                self.blend_pix((x + i, y), c, cover);
            }
        }
    }
    /// Blend a run of `len` pixels with one cover value per pixel.
    fn blend_solid_hspan<C: Color>(&mut self, x: i64, y: i64, len: i64, c: C, covers: &[u64]) {
        debug_assert_eq!(len as usize, covers.len());
        for (i, &cover) in covers.iter().enumerate() {
            self.blend_hline(x + i as i64, y, 1, c, cover);
        }
    }
}

impl<T> Surface<T>
where
    Surface<T>: Pixel,
{
    /// Create a new pixel format of `width` x `height`.
    ///
    /// Allocates `width * height * bpp` bytes, initially opaque white.
    pub fn new(width: usize, height: usize) -> Self {
        if width == 0 || height == 0 {
            panic!("cannot create a surface with zero width or height");
        }
        Self {
            rbuf: RasterBuffer::new(width, height, Self::bpp()),
            phantom: PhantomData,
        }
    }
    /// Size of the underlying buffer in bytes.
    pub fn size(&self) -> usize {
        self.rbuf.data.len()
    }
    /// Reset every component to 255, opaque white for the RGB formats.
    pub fn clear(&mut self) {
        self.rbuf.fill(255);
    }
    /// Overwrite every pixel with `c`.
    pub fn fill<C: Color>(&mut self, c: C) {
        let (w, h) = (self.width(), self.height());
        for y in 0..h {
            for x in 0..w {
                self.set((x, y), c);
            }
        }
    }
}

impl<T> PixelData for Surface<T> {
    fn pixeldata(&self) -> &[u8] {
        &self.rbuf.data
    }
}

impl Source for Surface<Rgb8> {
    fn get(&self, id: (usize, usize)) -> Rgba8 {
        let p = &self.rbuf[id];
        Rgba8::new(p[0], p[1], p[2], 255)
    }
}
impl Source for Surface<Rgba8> {
    fn get(&self, id: (usize, usize)) -> Rgba8 {
        let p = &self.rbuf[id];
        Rgba8::new(p[0], p[1], p[2], p[3])
    }
}

impl Surface<Rgb8> {
    fn mix_pix(&self, p: Rgb8, c: Rgb8, alpha: u8) -> Rgb8 {
        Rgb8::new(
            lerp_u8(p.r, c.r, alpha),
            lerp_u8(p.g, c.g, alpha),
            lerp_u8(p.b, c.b, alpha),
        )
    }
    fn raw(&self, id: (usize, usize)) -> Rgb8 {
        let p = &self.rbuf[id];
        Rgb8::new(p[0], p[1], p[2])
    }
}

impl Pixel for Surface<Rgb8> {
    fn bpp() -> usize {
        3
    }
    fn cover_mask() -> u64 {
        255
    }
    fn width(&self) -> usize {
        self.rbuf.width
    }
    fn height(&self) -> usize {
        self.rbuf.height
    }
    fn set<C: Color>(&mut self, id: (usize, usize), c: C) {
        self.rbuf[id][0] = c.red8();
        self.rbuf[id][1] = c.green8();
        self.rbuf[id][2] = c.blue8();
    }
    fn blend_pix<C: Color>(&mut self, id: (usize, usize), c: C, cover: u64) {
        let alpha = multiply_u8(c.alpha8(), cover as u8);
        let p0 = self.raw(id);
        let p = self.mix_pix(p0, Rgb8::new(c.red8(), c.green8(), c.blue8()), alpha);
        self.set(id, p);
    }
}

impl Surface<Rgba8> {
    fn mix_pix(&self, p: Rgba8, c: Rgba8, alpha: u8) -> Rgba8 {
        Rgba8::new(
            lerp_u8(p.r, c.r, alpha),
            lerp_u8(p.g, c.g, alpha),
            lerp_u8(p.b, c.b, alpha),
            prelerp_u8(p.a, alpha, alpha),
        )
    }
}

impl Pixel for Surface<Rgba8> {
    fn bpp() -> usize {
        4
    }
    fn cover_mask() -> u64 {
        255
    }
    fn width(&self) -> usize {
        self.rbuf.width
    }
    fn height(&self) -> usize {
        self.rbuf.height
    }
    fn set<C: Color>(&mut self, id: (usize, usize), c: C) {
        self.rbuf[id][0] = c.red8();
        self.rbuf[id][1] = c.green8();
        self.rbuf[id][2] = c.blue8();
        self.rbuf[id][3] = c.alpha8();
    }
    fn blend_pix<C: Color>(&mut self, id: (usize, usize), c: C, cover: u64) {
        let alpha = multiply_u8(c.alpha8(), cover as u8);
        let p0 = self.get(id);
        let p = self.mix_pix(p0, Rgba8::from_color(c), alpha);
        self.set(id, p);
    }
}
