// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar predicates shared by the sweep, containment and clearance code.
//!
//! All predicates are pure. Orientation and angle tests go through a
//! [`Tolerance`] so that nearly collinear triples classify the same way on
//! every call.

use std::f64::consts::PI;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::point::{Edge, Point};

/// Default number of decimal places kept from a cross product before its sign is taken.
pub const DEFAULT_COLLINEAR_DECIMALS: u32 = 10;

/// Default number of decimal places kept from a cosine before `acos`.
pub const DEFAULT_ANGLE_DECIMALS: u32 = 5;

/// Rounding applied to orientation and angle tests.
///
/// Coordinates in degrees need a finer tolerance than projected metres, so
/// this travels with the obstacle set rather than being a global constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Cross products are truncated to this many decimal places.
    pub collinear_decimals: u32,
    /// Cosines are rounded to this many decimal places.
    pub angle_decimals: u32,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            collinear_decimals: DEFAULT_COLLINEAR_DECIMALS,
            angle_decimals: DEFAULT_ANGLE_DECIMALS,
        }
    }
}

impl Tolerance {
    pub fn new(collinear_decimals: u32, angle_decimals: u32) -> Self {
        Self {
            collinear_decimals,
            angle_decimals,
        }
    }

    #[inline]
    fn collinear_scale(&self) -> f64 {
        10f64.powi(self.collinear_decimals as i32)
    }

    #[inline]
    fn angle_scale(&self) -> f64 {
        10f64.powi(self.angle_decimals as i32)
    }
}

/// Turn direction of the triple `a -> b -> c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

/// Classifies the turn `a -> b -> c` by the sign of `(b - a) x (c - a)`.
///
/// The cross product is truncated to `tol.collinear_decimals` decimal places
/// before the sign test.
pub fn orientation(a: Point, b: Point, c: Point, tol: Tolerance) -> Orientation {
    let ab = b.coords() - a.coords();
    let ac = c.coords() - a.coords();
    let area = (ab.perp(&ac) * tol.collinear_scale()).trunc();
    if area > 0.0 {
        Orientation::CounterClockwise
    } else if area < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Returns true if `q` lies inside the bounding box of segment `p`-`r`.
///
/// Only meaningful when the three points are already known to be collinear.
pub fn on_segment(p: Point, q: Point, r: Point) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Inclusive segment test: true if `p1`-`q1` and `p2`-`q2` share any point,
/// touching endpoints included.
pub fn segments_cross(p1: Point, q1: Point, p2: Point, q2: Point, tol: Tolerance) -> bool {
    let o1 = orientation(p1, q1, p2, tol);
    let o2 = orientation(p1, q1, q2, tol);
    let o3 = orientation(p2, q2, p1, tol);
    let o4 = orientation(p2, q2, q1, tol);

    if o1 != o2 && o3 != o4 {
        return true;
    }
    // Collinear cases: an endpoint of one segment lies on the other
    (o1 == Orientation::Collinear && on_segment(p1, p2, q1))
        || (o2 == Orientation::Collinear && on_segment(p1, q2, q1))
        || (o3 == Orientation::Collinear && on_segment(p2, p1, q2))
        || (o4 == Orientation::Collinear && on_segment(p2, q1, q2))
}

/// Returns true if segment `p1`-`q1` crosses `edge`.
///
/// A query segment that shares an endpoint with `edge` is never a crossing.
pub fn segments_intersect(p1: Point, q1: Point, edge: &Edge, tol: Tolerance) -> bool {
    if edge.contains(p1) || edge.contains(q1) {
        return false;
    }
    segments_cross(p1, q1, edge.p1, edge.p2, tol)
}

/// Angle of `point` seen from `center`, in `[0, 2π)`.
///
/// 0 points along +x and the angle grows toward +y.
pub fn angle_from(center: Point, point: Point) -> f64 {
    let mut angle = (point.y - center.y).atan2(point.x - center.x);
    if angle < 0.0 {
        angle += 2.0 * PI;
    }
    // A tiny negative angle can round up to exactly 2π
    if angle >= 2.0 * PI {
        0.0
    } else {
        angle
    }
}

/// Interior angle at `b` of the triangle `a, b, c`, by the law of cosines.
///
/// The cosine is rounded to `tol.angle_decimals` places and clamped to
/// `[-1, 1]` before `acos`. A degenerate triangle (zero-length side at `b`)
/// yields 0.
pub fn angle_between(a: Point, b: Point, c: Point, tol: Tolerance) -> f64 {
    let bc = euclidean_distance(b, c);
    let ac = euclidean_distance(a, c);
    let ab = euclidean_distance(a, b);
    if bc == 0.0 || ab == 0.0 {
        return 0.0;
    }
    let cos = (bc * bc + ab * ab - ac * ac) / (2.0 * bc * ab);
    let scale = tol.angle_scale();
    let rounded = (cos * scale).round() / scale;
    rounded.clamp(-1.0, 1.0).acos()
}

#[inline]
pub fn euclidean_distance(p1: Point, p2: Point) -> f64 {
    (p2.coords() - p1.coords()).norm()
}

/// Unit vector pointing from `from` to `to`, or `None` if the points coincide.
pub fn unit_vector(from: Point, to: Point) -> Option<Vector2<f64>> {
    let v = to.coords() - from.coords();
    let len = v.norm();
    if len == 0.0 {
        None
    } else {
        Some(v / len)
    }
}

/// Point where the line `p1`-`p2` meets the line through `edge`.
///
/// If `p1` or `p2` is an endpoint of `edge` that endpoint is returned as is.
/// Parallel lines yield `None`.
pub fn intersection_point(p1: Point, p2: Point, edge: &Edge) -> Option<Point> {
    if edge.contains(p1) {
        return Some(p1);
    }
    if edge.contains(p2) {
        return Some(p2);
    }

    let d1 = p2.coords() - p1.coords();
    let d2 = edge.p2.coords() - edge.p1.coords();
    let denom = d1.perp(&d2);
    if denom == 0.0 {
        return None;
    }
    let t = (edge.p1.coords() - p1.coords()).perp(&d2) / denom;
    Some(Point::from_coords(p1.coords() + d1 * t))
}

/// Distance from `p1` to where the line `p1`-`p2` meets `edge`.
///
/// Used as a sort key only. Parallel lines give 0.
pub fn distance_to_intersection(p1: Point, p2: Point, edge: &Edge) -> f64 {
    intersection_point(p1, p2, edge)
        .map(|ip| euclidean_distance(p1, ip))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_orientation() {
        let tol = Tolerance::default();
        assert_eq!(
            orientation(p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), tol),
            Orientation::CounterClockwise
        );
        assert_eq!(
            orientation(p(0.0, 0.0), p(1.0, 0.0), p(1.0, -1.0), tol),
            Orientation::Clockwise
        );
        assert_eq!(
            orientation(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0), tol),
            Orientation::Collinear
        );
    }

    #[test]
    fn test_orientation_absorbs_noise() {
        let tol = Tolerance::default();
        // Cross product of about 1e-12 is below ten decimal places
        assert_eq!(
            orientation(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 1e-12), tol),
            Orientation::Collinear
        );
        let coarse = Tolerance::new(3, 5);
        assert_eq!(
            orientation(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 1e-4), coarse),
            Orientation::Collinear
        );
        assert_eq!(
            orientation(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 1e-2), coarse),
            Orientation::CounterClockwise
        );
    }

    #[test]
    fn test_angle_from() {
        let center = p(1.0, 1.0);
        assert_eq!(angle_from(center, p(3.0, 1.0)), 0.0);
        assert_relative_eq!(angle_from(center, p(1.0, 0.0)), PI * 3.0 / 2.0, epsilon = 1e-12);
        assert_relative_eq!(angle_from(center, p(0.0, 2.0)).to_degrees(), 135.0, epsilon = 1e-9);
        assert_relative_eq!(angle_from(center, p(2.0, 2.0)).to_degrees(), 45.0, epsilon = 1e-9);
        assert_relative_eq!(angle_from(center, p(2.0, 0.0)).to_degrees(), 315.0, epsilon = 1e-9);
        assert_relative_eq!(angle_from(center, p(0.0, 0.0)).to_degrees(), 225.0, epsilon = 1e-9);
    }

    #[test]
    fn test_angle_from_stays_below_full_turn() {
        let a = angle_from(p(0.0, 0.0), p(1.0, -1e-300));
        assert!((0.0..2.0 * PI).contains(&a));
    }

    #[test]
    fn test_angle_between() {
        let tol = Tolerance::default();
        let right = angle_between(p(1.0, 0.0), p(0.0, 0.0), p(0.0, 1.0), tol);
        assert_relative_eq!(right, PI / 2.0, epsilon = 1e-9);
        let straight = angle_between(p(-1.0, 0.0), p(0.0, 0.0), p(1.0, 0.0), tol);
        assert_relative_eq!(straight, PI, epsilon = 1e-9);
        // Rounding keeps acos in domain for collinear triples
        let flat = angle_between(p(0.0, 0.0), p(0.1, 0.1), p(0.3, 0.3), tol);
        assert_relative_eq!(flat, PI, epsilon = 1e-9);
        assert_eq!(angle_between(p(0.0, 0.0), p(0.0, 0.0), p(1.0, 0.0), tol), 0.0);
    }

    #[test]
    fn test_segments_intersect() {
        let tol = Tolerance::default();
        let edge = Edge::new(p(3.0, 5.0), p(5.0, 3.0));
        assert!(segments_intersect(p(4.0, 2.0), p(4.0, 5.0), &edge, tol));
        assert!(segments_intersect(p(4.0, 2.0), p(5.0, 4.0), &edge, tol));
        assert!(segments_intersect(p(3.0, 4.0), p(5.0, 4.0), &edge, tol));
        // Shares the edge endpoint (5, 3)
        assert!(!segments_intersect(p(4.0, 1.0), p(5.0, 3.0), &edge, tol));
        assert!(!segments_intersect(p(4.0, 1.0), p(6.0, 4.0), &edge, tol));
    }

    #[test]
    fn test_segments_cross_includes_touching() {
        let tol = Tolerance::default();
        assert!(segments_cross(p(4.0, 1.0), p(5.0, 3.0), p(3.0, 5.0), p(5.0, 3.0), tol));
        // T-junction: endpoint lying on the other segment
        assert!(segments_cross(p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), tol));
        // Collinear but disjoint
        assert!(!segments_cross(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0), tol));
    }

    #[test]
    fn test_distance_to_intersection() {
        let edge = Edge::new(p(3.0, 1.0), p(3.0, 5.0));
        let edge2 = Edge::new(p(2.0, 2.0), p(4.0, 4.0));
        let edge3 = Edge::new(p(1.0, 1.0), p(3.0, 5.0));
        assert_relative_eq!(
            distance_to_intersection(p(2.0, 2.0), p(4.0, 4.0), &edge),
            2f64.sqrt(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            distance_to_intersection(p(3.0, 1.0), p(3.0, 5.0), &edge2),
            2.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            distance_to_intersection(p(1.0, 2.0), p(3.0, 4.0), &edge3),
            2f64.sqrt(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            distance_to_intersection(p(2.0, 5.0), p(3.0, 4.0), &edge3),
            0.9428090415820635,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_intersection_point_shortcuts_and_parallel() {
        let edge = Edge::new(p(0.0, 0.0), p(1.0, 0.0));
        assert_eq!(intersection_point(p(1.0, 0.0), p(5.0, 5.0), &edge), Some(p(1.0, 0.0)));
        assert_eq!(intersection_point(p(0.0, 1.0), p(1.0, 1.0), &edge), None);
        assert_eq!(distance_to_intersection(p(0.0, 1.0), p(1.0, 1.0), &edge), 0.0);
    }

    #[test]
    fn test_unit_vector() {
        let v = unit_vector(p(1.0, 1.0), p(4.0, 5.0)).unwrap();
        assert_relative_eq!(v.x, 0.6);
        assert_relative_eq!(v.y, 0.8);
        assert!(unit_vector(p(1.0, 1.0), p(1.0, 1.0)).is_none());
    }
}
