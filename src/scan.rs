//! Scanlines
//!
//! A [`Scanline`] collects the output of one sweep row as a set of
//! horizontal spans. Two span shapes exist and are distinguished by
//! the sign of `len`:
//!
//!   - `len > 0`: `len` pixels with one cover value per pixel in
//!     `covers`
//!   - `len < 0`: a run of `-len` pixels sharing the single cover
//!     value `covers[0]`
//!
//! Adjacent cells and runs merge as they are added, so a long flat
//! interior becomes one span instead of hundreds.

/// Horizontal run of pixels within one scanline.
#[derive(Debug, Default, PartialEq)]
pub struct Span {
    /// Leftmost pixel column.
    pub x: i64,
    /// Pixel count; negative for a constant cover run.
    pub len: i64,
    /// Cover values, one per pixel, or a single shared value.
    pub covers: Vec<u64>,
}

/// Sentinel well away from any valid column, so the first add never
/// looks adjacent to a previous span.
const LAST_X: i64 = 0x7FFF_FFF0;

/// One row of rasterizer output.
#[derive(Debug)]
pub struct Scanline {
    last_x: i64,
    /// Row the spans belong to, set by [`finalize`](Scanline::finalize).
    pub y: i64,
    pub spans: Vec<Span>,
}

impl Default for Scanline {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanline {
    pub fn new() -> Self {
        Scanline {
            last_x: LAST_X,
            y: 0,
            spans: vec![],
        }
    }
    /// Forget all spans and start a fresh row.
    pub fn reset_spans(&mut self) {
        self.last_x = LAST_X;
        self.spans.clear();
    }
    /// Prepare for a new sweep. Same as [`reset_spans`](Scanline::reset_spans);
    /// the spans keep their allocations across rows.
    pub fn reset(&mut self) {
        self.reset_spans();
    }
    /// Mark the scanline complete for row `y`.
    pub fn finalize(&mut self, y: i64) {
        self.y = y;
    }
    /// Add a single pixel. Extends the previous span when the pixel is
    /// adjacent and that span carries per pixel covers.
    pub fn add_cell(&mut self, x: i64, cover: u64) {
        if x == self.last_x + 1 {
            if let Some(span) = self.spans.last_mut() {
                if span.len > 0 {
                    span.len += 1;
                    span.covers.push(cover);
                    self.last_x = x;
                    return;
                }
            }
        }
        self.spans.push(Span {
            x,
            len: 1,
            covers: vec![cover],
        });
        self.last_x = x;
    }
    /// Add a run of `len` pixels sharing one cover value. Extends the
    /// previous span when adjacent, a constant run, and of equal cover.
    pub fn add_span(&mut self, x: i64, len: i64, cover: u64) {
        debug_assert!(len > 0);
        if x == self.last_x + 1 {
            if let Some(span) = self.spans.last_mut() {
                if span.len < 0 && span.covers[0] == cover {
                    span.len -= len;
                    self.last_x = x + len - 1;
                    return;
                }
            }
        }
        self.spans.push(Span {
            x,
            len: -len,
            covers: vec![cover],
        });
        self.last_x = x + len - 1;
    }
    pub fn num_spans(&self) -> usize {
        self.spans.len()
    }
}
