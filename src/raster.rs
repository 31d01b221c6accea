//! Scanline rasterizer
//!
//! Converts filled polygons into coverage scanlines. Vertices come in
//! as f64 pixel coordinates, are snapped to 1/256 sub-pixel units and
//! clipped, and land in a [`CellRaster`] as coverage cells. After all
//! paths are in, [`rewind_scanlines`](Rasterize::rewind_scanlines)
//! sorts the cells once and [`sweep_scanline`](Rasterize::sweep_scanline)
//! walks the rows in ascending y order, turning running cover and per
//! cell area into 0..=255 alpha values.

use std::cmp::{max, min};

use log::trace;

use crate::cell::CellRaster;
use crate::clip::Clipper;
use crate::path::{PathCommand, VertexSource};
use crate::scan::Scanline;
use crate::{POLY_SUBPIXEL_SCALE, POLY_SUBPIXEL_SHIFT};

/// Snap a pixel coordinate to sub-pixel units.
pub(crate) fn upscale(v: f64) -> i64 {
    (v * POLY_SUBPIXEL_SCALE as f64).round() as i64
}

/// Winding rule used when coverage is folded into alpha.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum FillingRule {
    NonZero,
    EvenOdd,
}
impl Default for FillingRule {
    fn default() -> FillingRule {
        FillingRule::NonZero
    }
}

/// Where the rasterizer is within the current polygon.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum PathStatus {
    Initial,
    Closed,
    MoveTo,
    LineTo,
}
impl Default for PathStatus {
    fn default() -> PathStatus {
        PathStatus::Initial
    }
}

/// Common face of the scanline producers, what the render loops need.
pub trait Rasterize {
    /// Drop all geometry and start over.
    fn reset(&mut self);
    /// Feed every vertex of `path` into the rasterizer.
    fn add_path<VS: VertexSource>(&mut self, path: &VS);
    /// Close and sort; true when there is anything to sweep.
    fn rewind_scanlines(&mut self) -> bool;
    /// Produce the next non-empty scanline into `sl`.
    fn sweep_scanline(&mut self, sl: &mut Scanline) -> bool;
    fn min_x(&self) -> i64;
    fn max_x(&self) -> i64;
}

/// Polygon rasterizer with anti-aliasing.
#[derive(Debug)]
pub struct ScanlineRasterizer {
    clipper: Clipper,
    cells: CellRaster,
    status: PathStatus,
    /// Start of the current polygon, for closing.
    x0: i64,
    y0: i64,
    scan_y: i64,
    filling_rule: FillingRule,
    gamma: Vec<u64>,
}

impl Default for ScanlineRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterize for ScanlineRasterizer {
    fn reset(&mut self) {
        self.cells.reset();
        self.status = PathStatus::Initial;
    }

    fn add_path<VS: VertexSource>(&mut self, path: &VS) {
        // adding into an already swept rasterizer starts a new scene
        if self.cells.sorted() {
            self.reset();
        }
        for seg in path.vertices() {
            match seg.cmd {
                PathCommand::MoveTo => self.move_to(seg.x, seg.y),
                PathCommand::LineTo => self.line_to(seg.x, seg.y),
                PathCommand::Close => self.close_polygon(),
                PathCommand::Stop => {}
            }
        }
    }

    fn rewind_scanlines(&mut self) -> bool {
        self.close_polygon();
        self.cells.sort_cells();
        if self.cells.total_cells() == 0 {
            false
        } else {
            trace!(
                "sweeping rows {}..={}",
                self.cells.min_y(),
                self.cells.max_y()
            );
            self.scan_y = self.cells.min_y();
            true
        }
    }

    fn sweep_scanline(&mut self, sl: &mut Scanline) -> bool {
        loop {
            if self.scan_y > self.cells.max_y() {
                return false;
            }
            sl.reset_spans();
            let mut cover = 0;
            let row = self.cells.scanline_cells(self.scan_y);
            let mut iter = row.iter().peekable();
            while let Some(cell) = iter.next() {
                let mut x = cell.x;
                cover += cell.cover;
                if cell.area != 0 {
                    let alpha =
                        self.calculate_alpha((cover << (POLY_SUBPIXEL_SHIFT + 1)) - cell.area);
                    if alpha > 0 {
                        sl.add_cell(x, alpha);
                    }
                    x += 1;
                }
                // between this cell and the next the cover is constant
                if let Some(next) = iter.peek() {
                    if next.x > x {
                        let alpha = self.calculate_alpha(cover << (POLY_SUBPIXEL_SHIFT + 1));
                        if alpha > 0 {
                            sl.add_span(x, next.x - x, alpha);
                        }
                    }
                }
            }
            if sl.num_spans() != 0 {
                break;
            }
            self.scan_y += 1;
        }
        sl.finalize(self.scan_y);
        self.scan_y += 1;
        true
    }

    fn min_x(&self) -> i64 {
        self.cells.min_x()
    }
    fn max_x(&self) -> i64 {
        self.cells.max_x()
    }
}

impl ScanlineRasterizer {
    pub fn new() -> Self {
        Self {
            clipper: Clipper::new(),
            cells: CellRaster::new(),
            status: PathStatus::Initial,
            x0: 0,
            y0: 0,
            scan_y: 0,
            filling_rule: FillingRule::NonZero,
            gamma: (0..256).collect(),
        }
    }
    /// Like [`new`](ScanlineRasterizer::new) with a cap on cell
    /// storage, in blocks of [`CELL_BLOCK_SIZE`](crate::cell::CELL_BLOCK_SIZE)
    /// cells.
    pub fn with_block_limit(limit: usize) -> Self {
        let mut new = Self::new();
        new.cells = CellRaster::with_block_limit(limit);
        new
    }
    /// Replace the coverage to alpha translation table with
    /// `gfunc(v)`, sampled over v in [0, 1].
    pub fn gamma<F>(&mut self, gfunc: F)
    where
        F: Fn(f64) -> f64,
    {
        let aa_shift = 8;
        let aa_scale = 1 << aa_shift;
        let aa_mask = f64::from(aa_scale - 1);

        self.gamma = (0..256)
            .map(|i| gfunc(f64::from(i) / aa_mask))
            .map(|v| (v * aa_mask).round() as u64)
            .collect();
    }
    pub fn new_with_gamma<F>(gfunc: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        let mut new = Self::new();
        new.gamma(gfunc);
        new
    }
    /// Select the winding rule. Takes effect at the next sweep.
    pub fn filling_rule(&mut self, rule: FillingRule) {
        self.filling_rule = rule;
    }
    /// Clip all subsequent geometry to the pixel rectangle
    /// `(x1, y1)` to `(x2, y2)`.
    pub fn clip_box(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.clipper
            .clip_box(upscale(x1), upscale(y1), upscale(x2), upscale(y2));
    }
    /// Begin a polygon at `(x, y)` in pixel coordinates.
    pub fn move_to(&mut self, x: f64, y: f64) {
        if self.cells.sorted() {
            self.reset();
        }
        self.x0 = upscale(x);
        self.y0 = upscale(y);
        self.clipper.move_to(self.x0, self.y0);
        self.status = PathStatus::MoveTo;
    }
    /// Extend the current polygon to `(x, y)` in pixel coordinates.
    pub fn line_to(&mut self, x: f64, y: f64) {
        let x = upscale(x);
        let y = upscale(y);
        self.clipper.line_to(&mut self.cells, x, y);
        self.status = PathStatus::LineTo;
    }
    /// Close the current polygon back to its first point. A polygon
    /// is also closed implicitly when a sweep begins.
    pub fn close_polygon(&mut self) {
        if self.status == PathStatus::LineTo {
            self.clipper.line_to(&mut self.cells, self.x0, self.y0);
            self.status = PathStatus::Closed;
        }
    }
    pub fn min_y(&self) -> i64 {
        self.cells.min_y()
    }
    pub fn max_y(&self) -> i64 {
        self.cells.max_y()
    }
    /// Translate an accumulated area term into an alpha value,
    /// applying the winding rule and the gamma table.
    ///
    /// The shift folds the doubled sub-pixel area (9 fractional bits)
    /// down to the 8 bit alpha range.
    pub fn calculate_alpha(&self, area: i64) -> u64 {
        let aa_shift: i64 = 8;
        let aa_scale = 1 << aa_shift;
        let aa_scale2 = aa_scale * 2;
        let aa_mask = aa_scale - 1;
        let aa_mask2 = aa_scale2 - 1;

        let mut cover = area >> (POLY_SUBPIXEL_SHIFT * 2 + 1 - aa_shift);
        cover = cover.abs();
        if self.filling_rule == FillingRule::EvenOdd {
            cover &= aa_mask2;
            if cover > aa_scale {
                cover = aa_scale2 - cover;
            }
        }
        cover = max(0, min(cover, aa_mask));
        self.gamma[cover as usize]
    }
}
