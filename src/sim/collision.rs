//! Collision detection for the trader
//!
//! Deliberately simple tests: news pickup is an axis-aligned proximity box,
//! and terrain contact is a segment crossing one of the trader's four box
//! edges. No swept or continuous collision.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }
}

/// Axis-aligned box (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box of side `size` centered on `center`
    pub fn from_center(center: Vec2, size: f32) -> Self {
        let half = Vec2::splat(size / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// The four box edges: top, bottom, left, right
    pub fn edges(&self) -> [Segment; 4] {
        let top_left = self.min;
        let top_right = Vec2::new(self.max.x, self.min.y);
        let bottom_left = Vec2::new(self.min.x, self.max.y);
        let bottom_right = self.max;
        [
            Segment::new(top_left, top_right),
            Segment::new(bottom_left, bottom_right),
            Segment::new(top_left, bottom_left),
            Segment::new(top_right, bottom_right),
        ]
    }

    /// Whether a segment's bounding box can touch this box at all
    fn overlaps_bounds_of(&self, seg: &Segment) -> bool {
        let lo = seg.a.min(seg.b);
        let hi = seg.a.max(seg.b);
        lo.x <= self.max.x && hi.x >= self.min.x && lo.y <= self.max.y && hi.y >= self.min.y
    }
}

/// Parametric segment/segment intersection
///
/// Solves `p.a + t (p.b - p.a) = q.a + u (q.b - q.a)`. Parallel segments
/// (zero determinant, including identical ones) never intersect, and both
/// `t` and `u` must lie strictly inside (0, 1), so touching endpoints miss.
pub fn segments_intersect(p: &Segment, q: &Segment) -> bool {
    let r = p.b - p.a;
    let s = q.b - q.a;
    let denom = r.perp_dot(s);
    if denom == 0.0 {
        return false;
    }

    let qp = q.a - p.a;
    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;

    t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0
}

/// Whether a segment crosses any edge of the box
///
/// A segment lying entirely inside the box crosses no edge and is not a hit.
pub fn segment_intersects_box(seg: &Segment, bbox: &Aabb) -> bool {
    if !bbox.overlaps_bounds_of(seg) {
        return false;
    }
    bbox.edges()
        .iter()
        .any(|edge| segments_intersect(seg, edge))
}

/// News pickup test: both axis distances under `reach`
#[inline]
pub fn within_proximity(a: Vec2, b: Vec2, reach: f32) -> bool {
    let d = (a - b).abs();
    d.x < reach && d.y < reach
}

/// Index of the first segment of a polyline that crosses the box
pub fn first_polyline_hit(points: &[Vec2], bbox: &Aabb) -> Option<usize> {
    points
        .windows(2)
        .position(|w| segment_intersects_box(&Segment::new(w[0], w[1]), bbox))
}
