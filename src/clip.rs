//! Clipping
//!
//! Edges are clipped in sub-pixel coordinates before they reach the
//! cell accumulator. Segments are split at the clip box borders; the
//! parts beyond the left and right borders are slid onto the border
//! verticals so interior coverage stays correct, and the parts beyond
//! the top and bottom are dropped.

use crate::cell::CellRaster;

/// Axis aligned rectangle with `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rectangle<T: PartialOrd + Copy> {
    /// Minimum x value
    pub x1: T,
    /// Minimum y value
    pub y1: T,
    /// Maximum x value
    pub x2: T,
    /// Maximum y value
    pub y2: T,
}

impl<T> Rectangle<T>
where
    T: PartialOrd + Copy,
{
    /// Create a new rectangle. Coordinate pairs are sorted before
    /// storing.
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        let (x1, x2) = if x1 > x2 { (x2, x1) } else { (x1, x2) };
        let (y1, y2) = if y1 > y2 { (y2, y1) } else { (y1, y2) };
        Self { x1, y1, x2, y2 }
    }
    /// Position of a point relative to the rectangle, as a bit set of
    /// [`LEFT`], [`RIGHT`], [`BOTTOM`] and [`TOP`], or [`INSIDE`].
    pub fn clip_flags(&self, x: T, y: T) -> u8 {
        clip_flags(&x, &y, &self.x1, &self.y1, &self.x2, &self.y2)
    }
    /// Grow the rectangle to include the point `(x, y)`.
    pub fn expand(&mut self, x: T, y: T) {
        if x < self.x1 {
            self.x1 = x;
        }
        if x > self.x2 {
            self.x2 = x;
        }
        if y < self.y1 {
            self.y1 = y;
        }
        if y > self.y2 {
            self.y2 = y;
        }
    }
    /// Grow the rectangle to include another rectangle.
    pub fn expand_rect(&mut self, r: &Rectangle<T>) {
        self.expand(r.x1, r.y1);
        self.expand(r.x2, r.y2);
    }
}

/// Point is inside the region.
pub const INSIDE: u8 = 0b0000;
/// Point is left of the region, `x < x1`.
pub const LEFT: u8 = 0b0001;
/// Point is right of the region, `x > x2`.
pub const RIGHT: u8 = 0b0010;
/// Point is below the region, `y < y1`.
pub const BOTTOM: u8 = 0b0100;
/// Point is above the region, `y > y2`.
pub const TOP: u8 = 0b1000;

/// Cohen-Sutherland style region code of a point against a rectangle
/// given as its four borders.
fn clip_flags<T: PartialOrd>(x: &T, y: &T, x1: &T, y1: &T, x2: &T, y2: &T) -> u8 {
    let mut code = INSIDE;
    if x < x1 {
        code |= LEFT;
    }
    if x > x2 {
        code |= RIGHT;
    }
    if y < y1 {
        code |= BOTTOM;
    }
    if y > y2 {
        code |= TOP;
    }
    code
}

/// `a * b / c` with rounding.
fn mul_div(a: i64, b: i64, c: i64) -> i64 {
    let (a, b, c) = (a as f64, b as f64, c as f64);
    (a * b / c).round() as i64
}

/// Edge clipper in front of a [`CellRaster`].
///
/// Tracks the current point and its region code so each `line_to`
/// costs one flag computation when no clip box is set or the segment
/// is fully inside.
#[derive(Debug, Default)]
pub struct Clipper {
    /// Current x position
    x1: i64,
    /// Current y position
    y1: i64,
    /// Clipping region, in sub-pixel coordinates
    clip_box: Option<Rectangle<i64>>,
    /// Region code of the current position
    f1: u8,
}

impl Clipper {
    pub fn new() -> Self {
        Self {
            x1: 0,
            y1: 0,
            clip_box: None,
            f1: INSIDE,
        }
    }

    /// Emit the y-clipped portion of a segment whose x clipping is
    /// already resolved.
    fn line_clip_y(&self, ras: &mut CellRaster, x1: i64, y1: i64, x2: i64, y2: i64, f1: u8, f2: u8) {
        let b = match self.clip_box {
            None => return,
            Some(ref b) => b,
        };
        let f1 = f1 & (TOP | BOTTOM);
        let f2 = f2 & (TOP | BOTTOM);
        if f1 == INSIDE && f2 == INSIDE {
            // fully visible in y
            ras.line(x1, y1, x2, y2);
        } else {
            if f1 == f2 {
                // fully above or below the box
                return;
            }
            let (mut tx1, mut ty1, mut tx2, mut ty2) = (x1, y1, x2, y2);
            if f1 == BOTTOM {
                tx1 = x1 + mul_div(b.y1 - y1, x2 - x1, y2 - y1);
                ty1 = b.y1;
            }
            if f1 == TOP {
                tx1 = x1 + mul_div(b.y2 - y1, x2 - x1, y2 - y1);
                ty1 = b.y2;
            }
            if f2 == BOTTOM {
                tx2 = x1 + mul_div(b.y1 - y1, x2 - x1, y2 - y1);
                ty2 = b.y1;
            }
            if f2 == TOP {
                tx2 = x1 + mul_div(b.y2 - y1, x2 - x1, y2 - y1);
                ty2 = b.y2;
            }
            ras.line(tx1, ty1, tx2, ty2);
        }
    }

    /// Feed the edge from the current position to `(x2, y2)` into
    /// `ras`, clipped. `(x2, y2)` becomes the current position.
    pub fn line_to(&mut self, ras: &mut CellRaster, x2: i64, y2: i64) {
        if let Some(ref b) = self.clip_box {
            let f2 = b.clip_flags(x2, y2);
            let fy1 = (TOP | BOTTOM) & self.f1;
            let fy2 = (TOP | BOTTOM) & f2;
            if fy1 != INSIDE && fy1 == fy2 {
                // both endpoints above or both below, nothing visible
                self.x1 = x2;
                self.y1 = y2;
                self.f1 = f2;
                return;
            }
            let (x1, y1, f1) = (self.x1, self.y1, self.f1);
            match (f1 & (LEFT | RIGHT), f2 & (LEFT | RIGHT)) {
                (INSIDE, INSIDE) => self.line_clip_y(ras, x1, y1, x2, y2, f1, f2),
                (INSIDE, RIGHT) => {
                    let y3 = y1 + mul_div(b.x2 - x1, y2 - y1, x2 - x1);
                    let f3 = b.clip_flags(b.x2, y3);
                    self.line_clip_y(ras, x1, y1, b.x2, y3, f1, f3);
                    self.line_clip_y(ras, b.x2, y3, b.x2, y2, f3, f2);
                }
                (RIGHT, INSIDE) => {
                    let y3 = y1 + mul_div(b.x2 - x1, y2 - y1, x2 - x1);
                    let f3 = b.clip_flags(b.x2, y3);
                    self.line_clip_y(ras, b.x2, y1, b.x2, y3, f1, f3);
                    self.line_clip_y(ras, b.x2, y3, x2, y2, f3, f2);
                }
                (INSIDE, LEFT) => {
                    let y3 = y1 + mul_div(b.x1 - x1, y2 - y1, x2 - x1);
                    let f3 = b.clip_flags(b.x1, y3);
                    self.line_clip_y(ras, x1, y1, b.x1, y3, f1, f3);
                    self.line_clip_y(ras, b.x1, y3, b.x1, y2, f3, f2);
                }
                (RIGHT, LEFT) => {
                    let y3 = y1 + mul_div(b.x2 - x1, y2 - y1, x2 - x1);
                    let y4 = y1 + mul_div(b.x1 - x1, y2 - y1, x2 - x1);
                    let f3 = b.clip_flags(b.x2, y3);
                    let f4 = b.clip_flags(b.x1, y4);
                    self.line_clip_y(ras, b.x2, y1, b.x2, y3, f1, f3);
                    self.line_clip_y(ras, b.x2, y3, b.x1, y4, f3, f4);
                    self.line_clip_y(ras, b.x1, y4, b.x1, y2, f4, f2);
                }
                (LEFT, INSIDE) => {
                    let y3 = y1 + mul_div(b.x1 - x1, y2 - y1, x2 - x1);
                    let f3 = b.clip_flags(b.x1, y3);
                    self.line_clip_y(ras, b.x1, y1, b.x1, y3, f1, f3);
                    self.line_clip_y(ras, b.x1, y3, x2, y2, f3, f2);
                }
                (LEFT, RIGHT) => {
                    let y3 = y1 + mul_div(b.x1 - x1, y2 - y1, x2 - x1);
                    let y4 = y1 + mul_div(b.x2 - x1, y2 - y1, x2 - x1);
                    let f3 = b.clip_flags(b.x1, y3);
                    let f4 = b.clip_flags(b.x2, y4);
                    self.line_clip_y(ras, b.x1, y1, b.x1, y3, f1, f3);
                    self.line_clip_y(ras, b.x1, y3, b.x2, y4, f3, f4);
                    self.line_clip_y(ras, b.x2, y4, b.x2, y2, f4, f2);
                }
                (LEFT, LEFT) => self.line_clip_y(ras, b.x1, y1, b.x1, y2, f1, f2),
                (RIGHT, RIGHT) => self.line_clip_y(ras, b.x2, y1, b.x2, y2, f1, f2),
                (_, _) => unreachable!("bad region codes {:?} {:?}", f1, f2),
            }
            self.f1 = f2;
        } else {
            ras.line(self.x1, self.y1, x2, y2);
        }
        self.x1 = x2;
        self.y1 = y2;
    }

    /// Move the current position to `(x2, y2)` without emitting.
    pub fn move_to(&mut self, x2: i64, y2: i64) {
        self.x1 = x2;
        self.y1 = y2;
        if let Some(ref b) = self.clip_box {
            self.f1 = b.clip_flags(x2, y2);
        }
    }

    /// Set the clipping region.
    pub fn clip_box(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) {
        self.clip_box = Some(Rectangle::new(x1, y1, x2, y2));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_normalizes_both_axes() {
        let r = Rectangle::new(5, 8, 1, 2);
        assert_eq!(r, Rectangle { x1: 1, y1: 2, x2: 5, y2: 8 });
    }

    #[test]
    fn flag_table() {
        let r = Rectangle::new(0, 0, 10, 10);
        assert_eq!(r.clip_flags(5, 5), INSIDE);
        assert_eq!(r.clip_flags(-1, 5), LEFT);
        assert_eq!(r.clip_flags(11, 5), RIGHT);
        assert_eq!(r.clip_flags(5, -1), BOTTOM);
        assert_eq!(r.clip_flags(5, 11), TOP);
        assert_eq!(r.clip_flags(-1, -1), LEFT | BOTTOM);
        assert_eq!(r.clip_flags(11, 11), RIGHT | TOP);
        // borders count as inside
        assert_eq!(r.clip_flags(0, 10), INSIDE);
    }

    #[test]
    fn expand_grows_to_cover() {
        let mut r = Rectangle::new(0, 0, 1, 1);
        r.expand(-3, 5);
        assert_eq!((r.x1, r.y1, r.x2, r.y2), (-3, 0, 1, 5));
        r.expand_rect(&Rectangle::new(0, -2, 9, 0));
        assert_eq!((r.x1, r.y1, r.x2, r.y2), (-3, -2, 9, 5));
    }
}
