//! Colors
//!
//! Component values live in two parallel spaces. The `u8` space is
//! what gets stored in pixel buffers and mixed with fixed point math;
//! the `f64` space, normalized to [0, 1], is what user facing code
//! tends to pass around. The [`Color`] trait exposes both.

/// Common color access used by the pixel formats.
pub trait Color: std::fmt::Debug + Copy {
    /// Red component, normalized to [0, 1].
    fn red(&self) -> f64;
    /// Green component, normalized to [0, 1].
    fn green(&self) -> f64;
    /// Blue component, normalized to [0, 1].
    fn blue(&self) -> f64;
    /// Alpha component, normalized to [0, 1].
    fn alpha(&self) -> f64;
    /// Red component as an 8 bit value.
    fn red8(&self) -> u8;
    /// Green component as an 8 bit value.
    fn green8(&self) -> u8;
    /// Blue component as an 8 bit value.
    fn blue8(&self) -> u8;
    /// Alpha component as an 8 bit value.
    fn alpha8(&self) -> u8;
    /// True if the color blends to nothing.
    fn is_transparent(&self) -> bool {
        self.alpha8() == 0
    }
    /// True if the color fully replaces what is underneath.
    fn is_opaque(&self) -> bool {
        self.alpha8() == 255
    }
}

fn color_u8_to_f64(x: u8) -> f64 {
    f64::from(x) / 255.0
}

/// Convert an f64 [0,1] component to a u8 [0,255] component.
pub fn cu8(v: f64) -> u8 {
    (v * 255.0).round() as u8
}

/// Color as Red, Green, Blue, and Alpha, 8 bits each.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rgba8 {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba8 {
    /// Create a new color.
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba8 { r, g, b, a }
    }
    /// White color (255,255,255,255).
    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
    /// Black color (0,0,0,255).
    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
    /// Build from any color, reading the 8 bit components.
    pub fn from_color<C: Color>(c: C) -> Self {
        Self::new(c.red8(), c.green8(), c.blue8(), c.alpha8())
    }
}

impl Color for Rgba8 {
    fn red(&self) -> f64 {
        color_u8_to_f64(self.r)
    }
    fn green(&self) -> f64 {
        color_u8_to_f64(self.g)
    }
    fn blue(&self) -> f64 {
        color_u8_to_f64(self.b)
    }
    fn alpha(&self) -> f64 {
        color_u8_to_f64(self.a)
    }
    fn red8(&self) -> u8 {
        self.r
    }
    fn green8(&self) -> u8 {
        self.g
    }
    fn blue8(&self) -> u8 {
        self.b
    }
    fn alpha8(&self) -> u8 {
        self.a
    }
}

/// Color as Red, Green, Blue, 8 bits each, implicitly opaque.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb8 { r, g, b }
    }
    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }
    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }
    /// Gray value with all three components equal.
    pub fn gray(g: u8) -> Self {
        Self::new(g, g, g)
    }
}

impl Color for Rgb8 {
    fn red(&self) -> f64 {
        color_u8_to_f64(self.r)
    }
    fn green(&self) -> f64 {
        color_u8_to_f64(self.g)
    }
    fn blue(&self) -> f64 {
        color_u8_to_f64(self.b)
    }
    fn alpha(&self) -> f64 {
        1.0
    }
    fn red8(&self) -> u8 {
        self.r
    }
    fn green8(&self) -> u8 {
        self.g
    }
    fn blue8(&self) -> u8 {
        self.b
    }
    fn alpha8(&self) -> u8 {
        255
    }
}

impl From<Rgba8> for Rgb8 {
    fn from(c: Rgba8) -> Rgb8 {
        Rgb8::new(c.r, c.g, c.b)
    }
}
impl From<Rgb8> for Rgba8 {
    fn from(c: Rgb8) -> Rgba8 {
        Rgba8::new(c.r, c.g, c.b, 255)
    }
}

/// Multiply two u8 values using fixed point math.
///
/// The base shift of 8 with the carry folded back in gives the exact
/// rounding of `(a * b) / 255`.
///
/// See agg_color_rgba.h:395 of agg version 2.4
pub fn multiply_u8(a: u8, b: u8) -> u8 {
    let base_shift = 8;
    let base_msb = 1 << (base_shift - 1);
    let (a, b) = (u32::from(a), u32::from(b));
    let t: u32 = a * b + base_msb;
    let tt: u32 = ((t >> base_shift) + t) >> base_shift;
    tt as u8
}

/// Interpolate between two u8 end points using fixed point math.
///
/// See agg_color_rgba.h:454 of agg version 2.4
pub fn lerp_u8(p: u8, q: u8, a: u8) -> u8 {
    let base_shift = 8;
    let base_msb = 1 << (base_shift - 1);
    let v = if p > q { 1 } else { 0 };
    let (q, p, a) = (i32::from(q), i32::from(p), i32::from(a));
    let t0: i32 = (q - p) * a + base_msb - v; // signed multiplication
    let t1: i32 = ((t0 >> base_shift) + t0) >> base_shift;
    (p + t1) as u8
}

/// Premultiplied interpolation: `p + q - p * a`.
pub fn prelerp_u8(p: u8, q: u8, a: u8) -> u8 {
    p.wrapping_add(q).wrapping_sub(multiply_u8(p, a))
}
