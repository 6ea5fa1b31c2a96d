//! Geometry primitives
//!
//! Pure, allocation-free vector math used by every measurement:
//! - Euclidean distance
//! - Angle at a vertex (undefined for zero-length rays)
//! - Signed line heading

pub mod point;

pub use point::{angle_at, distance, line_heading, Point2};
