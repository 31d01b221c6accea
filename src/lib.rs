//! Anti-aliased scanline rasterization
//!
//! Polygons are decomposed into per pixel coverage cells on a 24.8
//! sub-pixel grid, sorted into rows, and swept into scanlines of
//! 8 bit alpha that a renderer blends onto a [`Canvas`].
//!
//! ```
//! use etch::{Canvas, Path, Rasterize, Render, Rgb8, Rgba8, Scanline,
//!            ScanlineRasterizer, SolidRenderer, Surface};
//! use etch::render_scanlines;
//!
//! let mut path = Path::new();
//! path.move_to(1.0, 1.0);
//! path.line_to(19.0, 3.0);
//! path.line_to(10.0, 17.0);
//! path.close_polygon();
//!
//! let mut canvas = Canvas::new(Surface::<Rgb8>::new(20, 20));
//! let mut ras = ScanlineRasterizer::new();
//! ras.add_path(&path);
//!
//! let mut ren = SolidRenderer::with_base(&mut canvas);
//! ren.color(Rgba8::new(180, 30, 30, 255));
//!
//! let mut sl = Scanline::new();
//! render_scanlines(&mut ras, &mut sl, &mut ren);
//! ```

pub mod base;
pub mod buffer;
pub mod cell;
pub mod clip;
pub mod color;
pub mod compound;
pub mod imgio;
pub mod path;
pub mod pixfmt;
pub mod raster;
pub mod render;
pub mod scan;

pub use crate::base::*;
pub use crate::buffer::*;
pub use crate::cell::*;
pub use crate::clip::*;
pub use crate::color::*;
pub use crate::compound::*;
pub use crate::imgio::*;
pub use crate::path::*;
pub use crate::pixfmt::*;
pub use crate::raster::*;
pub use crate::render::*;
pub use crate::scan::*;

/// Fractional bits of the sub-pixel grid.
pub const POLY_SUBPIXEL_SHIFT: i64 = 8;
/// Sub-pixel units per pixel.
pub const POLY_SUBPIXEL_SCALE: i64 = 1 << POLY_SUBPIXEL_SHIFT;
/// Mask of the fractional part of a sub-pixel coordinate.
pub const POLY_SUBPIXEL_MASK: i64 = POLY_SUBPIXEL_SCALE - 1;
