//! Paths
//!
//! A path is a flat list of vertices tagged with commands. Anything
//! that can produce such a list implements [`VertexSource`] and can be
//! fed to the rasterizer.

use crate::clip::Rectangle;

/// Source of a vertex stream.
pub trait VertexSource {
    /// Rewind any internal iteration state. The default is a no-op for
    /// sources that build their vertex list up front.
    fn rewind(&self) {}
    /// The vertex stream in drawing order.
    fn vertices(&self) -> Vec<Vertex<f64>>;
}

/// Per vertex drawing command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PathCommand {
    Stop,
    MoveTo,
    LineTo,
    /// Close the current polygon back to its first vertex.
    Close,
}

/// Vertex with a command tag.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex<T> {
    pub x: T,
    pub y: T,
    pub cmd: PathCommand,
}

impl<T> Vertex<T> {
    pub fn new(x: T, y: T, cmd: PathCommand) -> Self {
        Self { x, y, cmd }
    }
    pub fn move_to(x: T, y: T) -> Self {
        Self::new(x, y, PathCommand::MoveTo)
    }
    pub fn line_to(x: T, y: T) -> Self {
        Self::new(x, y, PathCommand::LineTo)
    }
    pub fn close_polygon(x: T, y: T) -> Self {
        Self::new(x, y, PathCommand::Close)
    }
}

/// Winding direction of a closed polygon.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PathOrientation {
    Clockwise,
    CounterClockwise,
}

/// Growable vertex list, the usual way to describe geometry by hand.
#[derive(Debug, Default)]
pub struct Path {
    pub vertices: Vec<Vertex<f64>>,
}

impl VertexSource for Path {
    fn vertices(&self) -> Vec<Vertex<f64>> {
        self.vertices.clone()
    }
}

impl Path {
    pub fn new() -> Self {
        Self { vertices: vec![] }
    }
    /// Clear all vertices.
    pub fn remove_all(&mut self) {
        self.vertices.clear();
    }
    /// Begin a new polygon at `(x, y)`.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.vertices.push(Vertex::move_to(x, y));
    }
    /// Extend the current polygon to `(x, y)`.
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.vertices.push(Vertex::line_to(x, y));
    }
    /// Close the current polygon. Ignored unless the last command was
    /// a `LineTo`.
    pub fn close_polygon(&mut self) {
        if self.vertices.is_empty() {
            return;
        }
        let last = self.vertices[self.vertices.len() - 1];
        if last.cmd == PathCommand::LineTo {
            self.vertices.push(Vertex::close_polygon(last.x, last.y));
        }
    }
    /// Force every closed polygon in the path to wind in direction
    /// `dir`, reversing those that do not.
    pub fn arrange_orientations(&mut self, dir: PathOrientation) {
        for (s, e) in polygon_ranges(&self.vertices) {
            if perceive_polygon_orientation(&self.vertices[s..=e]) != dir {
                invert_polygon(&mut self.vertices[s..=e]);
            }
        }
    }
}

/// Index ranges `(first, last)` of the polygons in a vertex list. A
/// polygon starts at a `MoveTo` and needs at least one more vertex to
/// count.
fn polygon_ranges(vertices: &[Vertex<f64>]) -> Vec<(usize, usize)> {
    let mut ranges = vec![];
    let mut start = None;
    for (i, v) in vertices.iter().enumerate() {
        if v.cmd == PathCommand::MoveTo {
            if let Some(s) = start {
                if i > s + 1 {
                    ranges.push((s, i - 1));
                }
            }
            start = Some(i);
        }
    }
    if let Some(s) = start {
        let last = vertices.len() - 1;
        if last > s {
            ranges.push((s, last));
        }
    }
    ranges
}

/// Reverse a polygon in place, keeping the command layout intact.
pub fn invert_polygon(v: &mut [Vertex<f64>]) {
    let n = v.len();
    v.reverse();
    let tmp = v[0].cmd;
    v[0].cmd = v[n - 1].cmd;
    v[n - 1].cmd = tmp;
}

/// Winding of a polygon by the sign of its shoelace area. `Close`
/// vertices stand in for the first point.
pub fn perceive_polygon_orientation(vertices: &[Vertex<f64>]) -> PathOrientation {
    let n = vertices.len();
    let p0 = vertices[0];
    let mut area = 0.0;
    for (i, p1) in vertices.iter().enumerate() {
        let p2 = vertices[(i + 1) % n];
        let (x1, y1) = if p1.cmd == PathCommand::Close {
            (p0.x, p0.y)
        } else {
            (p1.x, p1.y)
        };
        let (x2, y2) = if p2.cmd == PathCommand::Close {
            (p0.x, p0.y)
        } else {
            (p2.x, p2.y)
        };
        area += x1 * y2 - y1 * x2;
    }
    if area < 0.0 {
        PathOrientation::Clockwise
    } else {
        PathOrientation::CounterClockwise
    }
}

/// Axis aligned bounds of a vertex source, or `None` when it has no
/// vertices.
pub fn bounding_rect<VS: VertexSource>(path: &VS) -> Option<Rectangle<f64>> {
    let pts = path.vertices();
    if pts.is_empty() {
        None
    } else {
        let mut r = Rectangle::new(pts[0].x, pts[0].y, pts[0].x, pts[0].y);
        for p in &pts {
            r.expand(p.x, p.y);
        }
        Some(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(path: &mut Path, x: f64, y: f64, side: f64) {
        path.move_to(x, y);
        path.line_to(x + side, y);
        path.line_to(x + side, y + side);
        path.line_to(x, y + side);
        path.close_polygon();
    }

    #[test]
    fn close_appends_only_after_line_to() {
        let mut p = Path::new();
        p.close_polygon();
        assert!(p.vertices.is_empty());
        p.move_to(0.0, 0.0);
        p.close_polygon();
        assert_eq!(p.vertices.len(), 1);
        p.line_to(1.0, 0.0);
        p.close_polygon();
        assert_eq!(p.vertices.last().map(|v| v.cmd), Some(PathCommand::Close));
    }

    #[test]
    fn orientation_by_shoelace() {
        let mut p = Path::new();
        square(&mut p, 0.0, 0.0, 1.0);
        // positive shoelace area classifies as counter clockwise
        assert_eq!(
            perceive_polygon_orientation(&p.vertices),
            PathOrientation::CounterClockwise
        );
        invert_polygon(&mut p.vertices);
        assert_eq!(
            perceive_polygon_orientation(&p.vertices),
            PathOrientation::Clockwise
        );
    }

    #[test]
    fn arrange_makes_windings_uniform() {
        let mut p = Path::new();
        square(&mut p, 0.0, 0.0, 4.0);
        square(&mut p, 1.0, 1.0, 1.0);
        invert_polygon(&mut p.vertices[5..]);
        p.arrange_orientations(PathOrientation::Clockwise);
        for (s, e) in polygon_ranges(&p.vertices) {
            assert_eq!(
                perceive_polygon_orientation(&p.vertices[s..=e]),
                PathOrientation::Clockwise
            );
        }
    }

    #[test]
    fn ranges_skip_degenerate_polygons() {
        let mut p = Path::new();
        p.move_to(0.0, 0.0); // lone move_to, no polygon
        p.move_to(1.0, 1.0);
        p.line_to(2.0, 1.0);
        p.line_to(2.0, 2.0);
        assert_eq!(polygon_ranges(&p.vertices), vec![(1, 3)]);
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let mut p = Path::new();
        square(&mut p, -2.0, 3.0, 5.0);
        let r = bounding_rect(&p).unwrap();
        assert_eq!((r.x1, r.y1, r.x2, r.y2), (-2.0, 3.0, 3.0, 8.0));
        assert!(bounding_rect(&Path::new()).is_none());
    }
}
