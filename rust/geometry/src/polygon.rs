// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Obstacle ring normalization.

use crate::error::{Error, Result};
use crate::point::{Edge, Point};

/// Minimum vertex count for a ring to enclose an interior.
pub const MIN_OBSTACLE_VERTICES: usize = 3;

/// A validated, open vertex ring.
///
/// Rings of three or more vertices are obstacles with an interior. One and
/// two vertex inputs are kept as bare point sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Validates and normalizes a vertex list.
    ///
    /// A closing vertex equal to the first one is dropped. Empty input,
    /// non-finite coordinates and adjacent coincident vertices are rejected.
    pub fn new<I, P>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        let mut points: Vec<Point> = points.into_iter().map(|p| p.into().untagged()).collect();

        if points.is_empty() {
            return Err(Error::InvalidPolygon("polygon has no vertices".to_string()));
        }

        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            return Err(Error::InvalidPoint(format!(
                "non-finite coordinate {}",
                bad
            )));
        }

        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }

        for (i, pair) in points.windows(2).enumerate() {
            if pair[0] == pair[1] {
                return Err(Error::InvalidPolygon(format!(
                    "vertices {} and {} coincide at {}",
                    i,
                    i + 1,
                    pair[0]
                )));
            }
        }

        Ok(Self { points })
    }

    /// Vertices in ring order, without a closing duplicate.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when the ring has an interior and takes part in containment tests.
    pub fn is_obstacle(&self) -> bool {
        self.points.len() >= MIN_OBSTACLE_VERTICES
    }

    /// Boundary edges in ring order. See [`ring_edges`].
    pub fn edges(&self) -> Vec<Edge> {
        ring_edges(&self.points)
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

/// Boundary edges of an open ring, in ring order.
///
/// A closed ring yields one edge per vertex, a two point set yields its
/// single segment and a lone point yields nothing.
pub fn ring_edges(points: &[Point]) -> Vec<Edge> {
    match points.len() {
        0 | 1 => Vec::new(),
        2 => vec![Edge::new(points[0], points[1])],
        n => (0..n)
            .map(|i| Edge::new(points[i], points[(i + 1) % n]))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closing_point_dropped() {
        let poly = Polygon::new([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]).unwrap();
        assert_eq!(poly.len(), 3);
        assert!(poly.is_obstacle());
        assert_eq!(poly.edges().len(), 3);
    }

    #[test]
    fn test_point_sets() {
        let single = Polygon::new([(2.0, 4.0)]).unwrap();
        assert!(!single.is_obstacle());
        assert!(single.edges().is_empty());

        let segment = Polygon::new([(0.0, 0.0), (1.0, 1.0)]).unwrap();
        assert!(!segment.is_obstacle());
        assert_eq!(segment.edges().len(), 1);
    }

    #[test]
    fn test_rejects_malformed_input() {
        let empty: Vec<(f64, f64)> = Vec::new();
        assert!(matches!(Polygon::new(empty), Err(Error::InvalidPolygon(_))));
        assert!(matches!(
            Polygon::new([(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (0.0, 1.0)]),
            Err(Error::InvalidPolygon(_))
        ));
        assert!(matches!(
            Polygon::new([(0.0, f64::NAN), (1.0, 0.0), (0.0, 1.0)]),
            Err(Error::InvalidPoint(_))
        ));
    }

    #[test]
    fn test_polygon_tags_are_cleared() {
        let poly = Polygon::new([Point::with_polygon(0.0, 0.0, 4), Point::new(1.0, 0.0)]).unwrap();
        assert!(poly.points().iter().all(|p| p.polygon_id.is_none()));
    }
}
