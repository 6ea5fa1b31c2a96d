//! Planar Point Geometry
//!
//! Distance, vertex angle and line heading over image-space points.
//! Image space has y growing downward, so headings follow screen
//! orientation: a positive heading points below the x-axis.

use serde::{Deserialize, Serialize};

/// Point in image-pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate Euclidean distance to another point
    pub fn distance_to(&self, other: &Point2) -> f64 {
        distance(*self, *other)
    }

    /// True when both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point2, b: Point2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx.hypot(dy)
}

/// Angle in degrees at `vertex` between the rays towards `p` and `r`.
///
/// Returns `None` when either ray has zero length (coincident points);
/// the angle is undefined there, which is not treated as an error.
pub fn angle_at(vertex: Point2, p: Point2, r: Point2) -> Option<f64> {
    let v1 = (p.x - vertex.x, p.y - vertex.y);
    let v2 = (r.x - vertex.x, r.y - vertex.y);

    let n1 = v1.0.hypot(v1.1);
    let n2 = v2.0.hypot(v2.1);
    if n1 == 0.0 || n2 == 0.0 {
        return None;
    }

    // Rounding can push the cosine just past ±1
    let cos = ((v1.0 * v2.0 + v1.1 * v2.1) / (n1 * n2)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Signed heading in degrees of the line from `a` to `b`, in (-180, 180].
///
/// Returns 0 when the points coincide.
pub fn line_heading(a: Point2, b: Point2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    dy.atan2(dx).to_degrees()
}
