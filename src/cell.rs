//! Cell accumulation
//!
//! Edges are decomposed into per pixel [`Cell`]s. Each cell records
//! the signed height of the edge fragments crossing its pixel
//! (`cover`, in sub-pixel units) and twice the signed area they cut
//! off inside the pixel (`area`). Both quantities are additive, so
//! any number of edges can be accumulated in any order and the sweep
//! stage later reads exact coverage out of the sums.
//!
//! Cells are held in a [`CellPool`], a block arena that never moves
//! cells while geometry is being added. [`CellRaster::sort_cells`]
//! then buckets them by row, orders each row by column and merges
//! duplicates, leaving one compact slice per scanline.

use std::cmp::{max, min};

use log::{debug, warn};

use crate::{POLY_SUBPIXEL_MASK, POLY_SUBPIXEL_SCALE, POLY_SUBPIXEL_SHIFT};

/// Log2 of the number of cells per storage block.
pub const CELL_BLOCK_SHIFT: usize = 12;
/// Cells per storage block.
pub const CELL_BLOCK_SIZE: usize = 1 << CELL_BLOCK_SHIFT;
/// Default cap on the number of blocks one raster may fill.
pub const CELL_BLOCK_LIMIT: usize = 1024;

/// Coverage cell for one pixel.
///
/// `left` and `right` tag the styles on either side of the generating
/// edge; -1 means untagged. The plain scanline rasterizer leaves both
/// at -1.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cell {
    pub x: i64,
    pub y: i64,
    pub cover: i64,
    pub area: i64,
    pub left: i16,
    pub right: i16,
}

impl Cell {
    fn new() -> Self {
        Cell {
            x: std::i64::MAX,
            y: std::i64::MAX,
            cover: 0,
            area: 0,
            left: -1,
            right: -1,
        }
    }
    fn is_empty(&self) -> bool {
        self.cover == 0 && self.area == 0
    }
    fn matches(&self, x: i64, y: i64, style: &Cell) -> bool {
        self.x == x && self.y == y && self.left == style.left && self.right == style.right
    }
}

/// Block arena for generated cells.
///
/// Cells are appended into fixed size blocks, so growth never moves
/// existing cells and clearing keeps the blocks for reuse. Once
/// `limit` blocks are full the pool refuses further cells.
#[derive(Debug)]
pub struct CellPool {
    blocks: Vec<Vec<Cell>>,
    limit: usize,
    len: usize,
}

impl CellPool {
    fn with_block_limit(limit: usize) -> Self {
        Self {
            blocks: vec![],
            limit,
            len: 0,
        }
    }
    fn len(&self) -> usize {
        self.len
    }
    /// Drop all cells, keeping the allocated blocks.
    fn clear(&mut self) {
        for b in &mut self.blocks {
            b.clear();
        }
        self.len = 0;
    }
    /// Append a cell. Returns false once the block limit is reached.
    fn push(&mut self, cell: Cell) -> bool {
        let block = self.len >> CELL_BLOCK_SHIFT;
        if block >= self.blocks.len() {
            if self.blocks.len() >= self.limit {
                return false;
            }
            self.blocks.push(Vec::with_capacity(CELL_BLOCK_SIZE));
        }
        self.blocks[block].push(cell);
        self.len += 1;
        true
    }
    fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.blocks.iter().flat_map(|b| b.iter())
    }
}

/// Cells of one row inside [`CellRaster::sorted_cells`].
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RowRange {
    pub start: usize,
    pub count: usize,
}

/// Edge rasterizer producing coverage cells.
///
/// Feed it edges in sub-pixel coordinates with [`line`](CellRaster::line),
/// then call [`sort_cells`](CellRaster::sort_cells) once and read rows
/// back with [`scanline_cells`](CellRaster::scanline_cells).
#[derive(Debug)]
pub struct CellRaster {
    pool: CellPool,
    /// Cell being accumulated at the current pixel.
    curr: Cell,
    /// Template holding the style tags stamped onto new cells.
    style: Cell,
    /// Consolidated cells, grouped by row after sorting.
    sorted_cells: Vec<Cell>,
    rows: Vec<RowRange>,
    sorted: bool,
    capped: bool,
    min_x: i64,
    min_y: i64,
    max_x: i64,
    max_y: i64,
}

impl Default for CellRaster {
    fn default() -> Self {
        Self::new()
    }
}

impl CellRaster {
    pub fn new() -> Self {
        Self::with_block_limit(CELL_BLOCK_LIMIT)
    }
    /// Like [`new`](CellRaster::new) with an explicit storage cap of
    /// `limit` blocks of [`CELL_BLOCK_SIZE`] cells. Geometry past the
    /// cap is silently dropped.
    pub fn with_block_limit(limit: usize) -> Self {
        CellRaster {
            pool: CellPool::with_block_limit(limit),
            curr: Cell::new(),
            style: Cell::new(),
            sorted_cells: vec![],
            rows: vec![],
            sorted: false,
            capped: false,
            min_x: std::i64::MAX,
            min_y: std::i64::MAX,
            max_x: std::i64::MIN,
            max_y: std::i64::MIN,
        }
    }

    /// Drop all accumulated cells and start over. Storage blocks are
    /// kept for reuse.
    pub fn reset(&mut self) {
        self.pool.clear();
        self.sorted_cells.clear();
        self.rows.clear();
        self.curr = Cell::new();
        self.style = Cell::new();
        self.sorted = false;
        self.capped = false;
        self.min_x = std::i64::MAX;
        self.min_y = std::i64::MAX;
        self.max_x = std::i64::MIN;
        self.max_y = std::i64::MIN;
    }

    /// Set the style tags stamped onto cells generated from here on.
    /// A change takes effect at the next cell boundary.
    pub fn set_style(&mut self, left: i16, right: i16) {
        self.style.left = left;
        self.style.right = right;
    }

    /// Number of cells generated so far, before consolidation.
    pub fn total_cells(&self) -> usize {
        self.pool.len()
    }

    /// True between a [`sort_cells`](CellRaster::sort_cells) and the
    /// next geometry or reset.
    pub fn sorted(&self) -> bool {
        self.sorted
    }

    pub fn min_x(&self) -> i64 {
        self.min_x
    }
    pub fn max_x(&self) -> i64 {
        self.max_x
    }
    pub fn min_y(&self) -> i64 {
        self.min_y
    }
    pub fn max_y(&self) -> i64 {
        self.max_y
    }

    /// Consolidated cells of row `y`, ordered by ascending column.
    /// Empty for rows outside the accumulated range and before
    /// [`sort_cells`](CellRaster::sort_cells) has run.
    pub fn scanline_cells(&self, y: i64) -> &[Cell] {
        match self.row_range(y) {
            Some(r) => &self.sorted_cells[r.start..r.start + r.count],
            None => &[],
        }
    }

    /// Number of consolidated cells on row `y`.
    pub fn scanline_num_cells(&self, y: i64) -> usize {
        self.row_range(y).map(|r| r.count).unwrap_or(0)
    }

    fn row_range(&self, y: i64) -> Option<RowRange> {
        if !self.sorted || y < self.min_y || y > self.max_y {
            return None;
        }
        let i = (y - self.min_y) as usize;
        if i < self.rows.len() {
            Some(self.rows[i])
        } else {
            None
        }
    }

    fn flush_curr(&mut self) {
        if !self.curr.is_empty() && !self.pool.push(self.curr) && !self.capped {
            self.capped = true;
            warn!(
                "cell pool limit of {} blocks reached, dropping further cells",
                self.pool.limit
            );
        }
    }

    /// Make `(x, y)` the current cell, flushing the previous one when
    /// the position or the style tags changed.
    fn set_curr_cell(&mut self, x: i64, y: i64) {
        if !self.curr.matches(x, y, &self.style) {
            self.flush_curr();
            self.curr = Cell {
                x,
                y,
                cover: 0,
                area: 0,
                left: self.style.left,
                right: self.style.right,
            };
        }
    }

    /// Accumulate one row's worth of an edge. `fy1` and `fy2` are
    /// sub-pixel y positions within row `ey`; `x1` and `x2` are full
    /// sub-pixel x positions.
    fn horiz_span(&mut self, ey: i64, x1: i64, fy1: i64, x2: i64, fy2: i64) {
        let mut ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let fx1 = x1 & POLY_SUBPIXEL_MASK;
        let fx2 = x2 & POLY_SUBPIXEL_MASK;

        // nothing accumulates when the sub-span has no height
        if fy1 == fy2 {
            self.set_curr_cell(ex2, ey);
            return;
        }
        // the whole sub-span sits in one column: one trapezoid
        if ex1 == ex2 {
            let delta = fy2 - fy1;
            self.curr.cover += delta;
            self.curr.area += (fx1 + fx2) * delta;
            return;
        }
        // the sub-span crosses columns; walk them splitting the height
        // with the same remainder carry the row walk uses
        let mut p = (POLY_SUBPIXEL_SCALE - fx1) * (fy2 - fy1);
        let mut first = POLY_SUBPIXEL_SCALE;
        let mut incr = 1;
        let mut dx = x2 - x1;
        if dx < 0 {
            p = fx1 * (fy2 - fy1);
            first = 0;
            incr = -1;
            dx = -dx;
        }
        let mut delta = p / dx;
        let mut xmod = p % dx;
        if xmod < 0 {
            delta -= 1;
            xmod += dx;
        }
        self.curr.cover += delta;
        self.curr.area += (fx1 + first) * delta;

        ex1 += incr;
        self.set_curr_cell(ex1, ey);
        let mut fy1 = fy1 + delta;

        if ex1 != ex2 {
            let p = POLY_SUBPIXEL_SCALE * (fy2 - fy1 + delta);
            let mut lift = p / dx;
            let mut rem = p % dx;
            if rem < 0 {
                lift -= 1;
                rem += dx;
            }
            xmod -= dx;
            while ex1 != ex2 {
                delta = lift;
                xmod += rem;
                if xmod >= 0 {
                    xmod -= dx;
                    delta += 1;
                }
                self.curr.cover += delta;
                self.curr.area += POLY_SUBPIXEL_SCALE * delta;
                fy1 += delta;
                ex1 += incr;
                self.set_curr_cell(ex1, ey);
            }
        }
        let delta = fy2 - fy1;
        self.curr.cover += delta;
        self.curr.area += (fx2 + POLY_SUBPIXEL_SCALE - first) * delta;
    }

    /// Accumulate the edge from `(x1, y1)` to `(x2, y2)`, all in
    /// sub-pixel coordinates.
    pub fn line(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) {
        let dx_limit = 16384 << POLY_SUBPIXEL_SHIFT;
        let dx = x2 - x1;
        // split very long edges in half to keep the products below
        // within range
        if dx >= dx_limit || dx <= -dx_limit {
            let cx = (x1 + x2) >> 1;
            let cy = (y1 + y2) >> 1;
            self.line(x1, y1, cx, cy);
            self.line(cx, cy, x2, y2);
            return;
        }
        self.sorted = false;

        let mut dy = y2 - y1;
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let ey1 = y1 >> POLY_SUBPIXEL_SHIFT;
        let ey2 = y2 >> POLY_SUBPIXEL_SHIFT;
        let fy1 = y1 & POLY_SUBPIXEL_MASK;
        let fy2 = y2 & POLY_SUBPIXEL_MASK;

        self.min_x = min(ex2, min(ex1, self.min_x));
        self.min_y = min(ey2, min(ey1, self.min_y));
        self.max_x = max(ex2, max(ex1, self.max_x));
        self.max_y = max(ey2, max(ey1, self.max_y));

        self.set_curr_cell(ex1, ey1);

        // the whole edge lies within one row
        if ey1 == ey2 {
            self.horiz_span(ey1, x1, fy1, x2, fy2);
            return;
        }

        let mut incr = 1;
        // strictly vertical edge: every row gets the same area term
        if dx == 0 {
            let ex = x1 >> POLY_SUBPIXEL_SHIFT;
            let two_fx = (x1 - (ex << POLY_SUBPIXEL_SHIFT)) << 1;
            let mut first = POLY_SUBPIXEL_SCALE;
            if dy < 0 {
                first = 0;
                incr = -1;
            }
            let delta = first - fy1;
            self.curr.cover += delta;
            self.curr.area += two_fx * delta;

            let mut ey1 = ey1 + incr;
            self.set_curr_cell(ex, ey1);
            let delta = first + first - POLY_SUBPIXEL_SCALE;
            let area = two_fx * delta;
            while ey1 != ey2 {
                self.curr.cover = delta;
                self.curr.area = area;
                ey1 += incr;
                self.set_curr_cell(ex, ey1);
            }
            let delta = fy2 - POLY_SUBPIXEL_SCALE + first;
            self.curr.cover += delta;
            self.curr.area += two_fx * delta;
            return;
        }

        // several rows: split the edge at row borders, carrying the
        // division remainder so the x positions stay exact
        let mut p = (POLY_SUBPIXEL_SCALE - fy1) * dx;
        let mut first = POLY_SUBPIXEL_SCALE;
        if dy < 0 {
            p = fy1 * dx;
            first = 0;
            incr = -1;
            dy = -dy;
        }
        let mut delta = p / dy;
        let mut xmod = p % dy;
        if xmod < 0 {
            delta -= 1;
            xmod += dy;
        }
        let mut x_from = x1 + delta;
        self.horiz_span(ey1, x1, fy1, x_from, first);

        let mut ey1 = ey1 + incr;
        self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);

        if ey1 != ey2 {
            let p = POLY_SUBPIXEL_SCALE * dx;
            let mut lift = p / dy;
            let mut rem = p % dy;
            if rem < 0 {
                lift -= 1;
                rem += dy;
            }
            xmod -= dy;
            while ey1 != ey2 {
                delta = lift;
                xmod += rem;
                if xmod >= 0 {
                    xmod -= dy;
                    delta += 1;
                }
                let x_to = x_from + delta;
                self.horiz_span(ey1, x_from, POLY_SUBPIXEL_SCALE - first, x_to, first);
                x_from = x_to;
                ey1 += incr;
                self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);
            }
        }
        self.horiz_span(ey1, x_from, POLY_SUBPIXEL_SCALE - first, x2, fy2);
    }

    /// Bucket all cells by row, order each row by column and merge
    /// cells that landed on the same column with the same style tags.
    /// Idempotent until the next [`line`](CellRaster::line) or
    /// [`reset`](CellRaster::reset).
    pub fn sort_cells(&mut self) {
        if self.sorted {
            return;
        }
        self.flush_curr();
        self.curr = Cell::new();
        self.sorted = true;
        self.sorted_cells.clear();
        self.rows.clear();
        if self.pool.len() == 0 {
            return;
        }

        // counting sort by row
        let height = (self.max_y - self.min_y + 1) as usize;
        let mut counts = vec![0usize; height];
        for c in self.pool.iter() {
            counts[(c.y - self.min_y) as usize] += 1;
        }
        let mut starts = Vec::with_capacity(height);
        let mut acc = 0;
        for &n in &counts {
            starts.push(acc);
            acc += n;
        }
        let mut scratch = vec![Cell::new(); self.pool.len()];
        let mut cursor = starts.clone();
        for c in self.pool.iter() {
            let row = (c.y - self.min_y) as usize;
            scratch[cursor[row]] = *c;
            cursor[row] += 1;
        }

        // order rows by column, keeping equal style tags adjacent so
        // the merge below sees them as one group
        for row in 0..height {
            let (lo, hi) = (starts[row], starts[row] + counts[row]);
            scratch[lo..hi].sort_unstable_by_key(|c| (c.x, c.left, c.right));

            let begin = self.sorted_cells.len();
            for c in &scratch[lo..hi] {
                let n = self.sorted_cells.len();
                if n > begin {
                    let last = &mut self.sorted_cells[n - 1];
                    if last.x == c.x && last.left == c.left && last.right == c.right {
                        last.cover += c.cover;
                        last.area += c.area;
                        continue;
                    }
                }
                self.sorted_cells.push(*c);
            }
            self.rows.push(RowRange {
                start: begin,
                count: self.sorted_cells.len() - begin,
            });
        }
        debug!(
            "sorted {} cells into {} rows, {} after consolidation",
            self.pool.len(),
            height,
            self.sorted_cells.len()
        );
    }
}
