// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point and edge value types.
//!
//! Points compare and hash by coordinate value only. The `polygon_id` tag is
//! carried along for containment tests but never participates in equality,
//! so a query point and an obstacle vertex at the same coordinates are the
//! same graph vertex.

use std::fmt;
use std::hash::{Hash, Hasher};

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// A point on the plane, optionally tagged with the obstacle polygon it belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    /// Id of the closed obstacle polygon this point is a vertex of, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon_id: Option<usize>,
}

impl Point {
    /// Creates an untagged point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            polygon_id: None,
        }
    }

    /// Creates a point tagged as a vertex of polygon `polygon_id`.
    pub const fn with_polygon(x: f64, y: f64, polygon_id: usize) -> Self {
        Self {
            x,
            y,
            polygon_id: Some(polygon_id),
        }
    }

    /// Returns the same coordinates without a polygon tag.
    pub const fn untagged(self) -> Self {
        Self::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Position vector from the origin.
    #[inline]
    pub fn coords(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    #[inline]
    pub fn from_coords(v: Vector2<f64>) -> Self {
        Self::new(v.x, v.y)
    }

    /// Bit pattern used for hashing and canonical edge ordering.
    ///
    /// `-0.0` is folded onto `0.0` so the key agrees with `==`.
    #[inline]
    pub(crate) fn key(&self) -> (u64, u64) {
        (fold_zero(self.x).to_bits(), fold_zero(self.y).to_bits())
    }
}

#[inline]
fn fold_zero(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

// Coordinates are validated finite at every public entry point, so `==` is
// reflexive for every point that reaches a graph.
impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

/// An unordered pair of points.
///
/// `Edge::new(a, b) == Edge::new(b, a)` and both hash identically.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Edge {
    pub p1: Point,
    pub p2: Point,
}

impl Edge {
    pub const fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    /// Returns true if `point` is one of the two endpoints.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.p1 == point || self.p2 == point
    }

    /// Returns the endpoint opposite to `point`.
    ///
    /// If `point` is not an endpoint, `p1` is returned.
    #[inline]
    pub fn adjacent(&self, point: Point) -> Point {
        if point == self.p1 {
            self.p2
        } else {
            self.p1
        }
    }

    /// Returns the endpoint the two edges have in common, if any.
    pub fn shared_point(&self, other: &Edge) -> Option<Point> {
        if other.contains(self.p1) {
            Some(self.p1)
        } else if other.contains(self.p2) {
            Some(self.p2)
        } else {
            None
        }
    }

    pub fn length(&self) -> f64 {
        (self.p2.coords() - self.p1.coords()).norm()
    }

    pub fn midpoint(&self) -> Point {
        Point::new((self.p1.x + self.p2.x) / 2.0, (self.p1.y + self.p2.y) / 2.0)
    }

    /// Endpoints in a canonical order, independent of construction order.
    fn ordered(&self) -> (Point, Point) {
        if self.p1.key() <= self.p2.key() {
            (self.p1, self.p2)
        } else {
            (self.p2, self.p1)
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        (self.p1 == other.p1 && self.p2 == other.p2) || (self.p1 == other.p2 && self.p2 == other.p1)
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (a, b) = self.ordered();
        a.hash(state);
        b.hash(state);
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.p1, self.p2)
    }
}
