//! Mathematical structs and functions.

use cgmath::{MetricSpace, Point2, Vector2};

/// A 2D point
pub type Point2d = Point2<f64>;

/// A 2D vector
pub type Vector2d = Vector2<f64>;

/// The Euclidean distance between two points.
#[inline(always)]
pub fn distance(a: Point2d, b: Point2d) -> f64 {
    a.distance(b)
}
