//! Multi-style rasterization
//!
//! A [`CompoundRasterizer`] accumulates every input polygon into one
//! shared cell grid, tagging each edge with the style it bounds on
//! either side. A single sweep then hands back the coverage of every
//! style that touches the row, so adjacent regions meet without seams
//! where two passes of a plain rasterizer would double-blend the
//! shared edge.
//!
//! ```
//! use etch::{CompoundRasterizer, Scanline};
//!
//! let mut ras = CompoundRasterizer::new();
//! ras.styles(0, -1);
//! ras.move_to(0.0, 0.0);
//! ras.line_to(10.0, 0.0);
//! ras.line_to(10.0, 10.0);
//! ras.line_to(0.0, 10.0);
//! ras.close_polygon();
//!
//! let mut sl = Scanline::new();
//! ras.rewind_scanlines();
//! while let Some(n) = ras.sweep_styles() {
//!     for i in 0..n {
//!         if ras.sweep_scanline_of(i, &mut sl) {
//!             // render sl with the color of ras.style_id(i)
//!         }
//!     }
//! }
//! ```

use log::trace;

use crate::cell::CellRaster;
use crate::clip::Clipper;
use crate::path::{PathCommand, VertexSource};
use crate::raster::{upscale, PathStatus};
use crate::scan::Scanline;
use crate::POLY_SUBPIXEL_SHIFT;

/// Coverage of one style within one pixel of the active row.
#[derive(Debug, Copy, Clone)]
struct StyleCell {
    x: i64,
    cover: i64,
    area: i64,
}

/// Anti-aliased rasterizer for multi-style geometry.
///
/// Feed it paths between calls to [`styles`](CompoundRasterizer::styles),
/// then drive it with [`sweep_styles`](CompoundRasterizer::sweep_styles)
/// and [`sweep_scanline_of`](CompoundRasterizer::sweep_scanline_of).
/// Unlike [`ScanlineRasterizer`](crate::ScanlineRasterizer) it applies
/// no gamma and knows only non-zero winding.
#[derive(Debug)]
pub struct CompoundRasterizer {
    clipper: Clipper,
    cells: CellRaster,
    status: PathStatus,
    x0: i64,
    y0: i64,
    scan_y: i64,
    /// Style ids present on the row last built, ascending.
    styles: Vec<i16>,
    /// Cell runs matching `styles` entry for entry.
    style_cells: Vec<Vec<StyleCell>>,
}

impl Default for CompoundRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CompoundRasterizer {
    pub fn new() -> Self {
        Self {
            clipper: Clipper::new(),
            cells: CellRaster::new(),
            status: PathStatus::Initial,
            x0: 0,
            y0: 0,
            scan_y: 0,
            styles: vec![],
            style_cells: vec![],
        }
    }

    /// Discard all geometry and styles, keeping allocations.
    pub fn reset(&mut self) {
        self.cells.reset();
        self.status = PathStatus::Initial;
        self.styles.clear();
    }

    /// Style tags for the geometry that follows. Walking each edge in
    /// the direction it is drawn, with the y axis pointing up, `left`
    /// is the fill on its left and `right` the fill on its right.
    /// Pass -1 for unfilled.
    pub fn styles(&mut self, left: i16, right: i16) {
        self.cells.set_style(left, right);
    }

    /// Restrict rasterization to a pixel-space box.
    pub fn clip_box(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.clipper
            .clip_box(upscale(x1), upscale(y1), upscale(x2), upscale(y2));
    }

    pub fn add_path<VS: VertexSource>(&mut self, path: &VS) {
        path.rewind();
        if self.cells.sorted() {
            self.reset();
        }
        for seg in path.vertices() {
            match seg.cmd {
                PathCommand::LineTo => self.line_to(seg.x, seg.y),
                PathCommand::MoveTo => self.move_to(seg.x, seg.y),
                PathCommand::Close => self.close_polygon(),
                PathCommand::Stop => break,
            }
        }
    }

    /// Start a new edge chain. Chains are not closed implicitly:
    /// per-edge styling needs open runs, so only
    /// [`close_polygon`](CompoundRasterizer::close_polygon) or a
    /// `Close` vertex adds the return edge.
    pub fn move_to(&mut self, x: f64, y: f64) {
        if self.cells.sorted() {
            self.reset();
        }
        let x = upscale(x);
        let y = upscale(y);
        self.clipper.move_to(x, y);
        self.x0 = x;
        self.y0 = y;
        self.status = PathStatus::MoveTo;
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        let x = upscale(x);
        let y = upscale(y);
        self.clipper.line_to(&mut self.cells, x, y);
        self.status = PathStatus::LineTo;
    }

    /// Close the current polygon with an edge back to its start.
    pub fn close_polygon(&mut self) {
        if self.status == PathStatus::LineTo {
            self.clipper.line_to(&mut self.cells, self.x0, self.y0);
            self.status = PathStatus::Closed;
        }
    }

    /// Finish and sort the geometry. Returns true if anything is there
    /// to sweep.
    pub fn rewind_scanlines(&mut self) -> bool {
        self.close_polygon();
        self.cells.sort_cells();
        if self.cells.total_cells() == 0 {
            return false;
        }
        trace!(
            "sweeping styled rows {}..={}",
            self.cells.min_y(),
            self.cells.max_y()
        );
        self.scan_y = self.cells.min_y();
        true
    }

    /// Advance to the next row touched by at least one style and build
    /// the per style coverage runs. Returns how many distinct styles
    /// the row holds.
    pub fn sweep_styles(&mut self) -> Option<usize> {
        loop {
            if self.scan_y > self.cells.max_y() {
                return None;
            }
            let row = self.cells.scanline_cells(self.scan_y);

            self.styles.clear();
            for cell in row {
                if cell.left >= 0 {
                    self.styles.push(cell.left);
                }
                if cell.right >= 0 {
                    self.styles.push(cell.right);
                }
            }
            self.styles.sort_unstable();
            self.styles.dedup();
            if self.styles.is_empty() {
                self.scan_y += 1;
                continue;
            }

            for run in &mut self.style_cells {
                run.clear();
            }
            if self.style_cells.len() < self.styles.len() {
                self.style_cells.resize_with(self.styles.len(), Vec::new);
            }
            // Cells arrive in ascending x, so a matching x is always
            // at the tail of its style's run.
            for cell in row {
                if cell.left >= 0 {
                    if let Ok(i) = self.styles.binary_search(&cell.left) {
                        push_style_cell(&mut self.style_cells[i], cell.x, cell.cover, cell.area);
                    }
                }
                if cell.right >= 0 {
                    if let Ok(i) = self.styles.binary_search(&cell.right) {
                        push_style_cell(&mut self.style_cells[i], cell.x, -cell.cover, -cell.area);
                    }
                }
            }

            self.scan_y += 1;
            return Some(self.styles.len());
        }
    }

    /// Style id behind an index handed out by the last
    /// [`sweep_styles`](CompoundRasterizer::sweep_styles).
    pub fn style_id(&self, style_index: usize) -> i16 {
        self.styles[style_index]
    }

    /// Emit the scanline of one style of the row built by the last
    /// [`sweep_styles`](CompoundRasterizer::sweep_styles). Returns
    /// false when the style covers nothing on this row.
    pub fn sweep_scanline_of(&mut self, style_index: usize, sl: &mut Scanline) -> bool {
        if style_index >= self.styles.len() {
            return false;
        }
        sl.reset_spans();

        let mut cover = 0;
        let mut iter = self.style_cells[style_index].iter().peekable();
        while let Some(cell) = iter.next() {
            let mut x = cell.x;
            cover += cell.cover;
            if cell.area != 0 {
                let alpha = calculate_alpha((cover << (POLY_SUBPIXEL_SHIFT + 1)) - cell.area);
                if alpha > 0 {
                    sl.add_cell(x, alpha);
                }
                x += 1;
            }
            if let Some(next) = iter.peek() {
                if next.x > x {
                    let alpha = calculate_alpha(cover << (POLY_SUBPIXEL_SHIFT + 1));
                    if alpha > 0 {
                        sl.add_span(x, next.x - x, alpha);
                    }
                }
            }
        }

        if sl.num_spans() == 0 {
            return false;
        }
        sl.finalize(self.scan_y - 1);
        true
    }

    pub fn min_x(&self) -> i64 {
        self.cells.min_x()
    }
    pub fn max_x(&self) -> i64 {
        self.cells.max_x()
    }
    pub fn min_y(&self) -> i64 {
        self.cells.min_y()
    }
    pub fn max_y(&self) -> i64 {
        self.cells.max_y()
    }
}

fn push_style_cell(run: &mut Vec<StyleCell>, x: i64, cover: i64, area: i64) {
    if let Some(last) = run.last_mut() {
        if last.x == x {
            last.cover += cover;
            last.area += area;
            return;
        }
    }
    run.push(StyleCell { x, cover, area });
}

/// Coverage to alpha without gamma: clamped non-zero winding only.
fn calculate_alpha(area: i64) -> u64 {
    let aa_shift = 8;
    let aa_mask = (1 << aa_shift) - 1;
    let cover = (area >> (POLY_SUBPIXEL_SHIFT * 2 + 1 - aa_shift)).abs();
    std::cmp::min(cover, aa_mask) as u64
}
