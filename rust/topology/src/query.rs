// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Containment and clearance queries against the obstacle graph.
//!
//! These answer "which obstacle is this point inside?", "does this chord
//! cut through its own polygon?" and "where is the nearest point just
//! outside this polygon?".

use nalgebra::Vector2;
use visgraph_geometry::{
    closest_boundary_point, on_segment, orientation, point_in_polygon, unit_vector, Edge,
    Orientation, Point,
};

use crate::error::{Error, Result};
use crate::obstacles::ObstacleGraph;

/// Default distance a point is pushed past the boundary by [`ObstacleGraph::nudge_outside`].
pub const DEFAULT_CLEARANCE: f64 = 0.001;

/// Bisectors shorter than this are treated as degenerate (straight vertex).
const BISECTOR_EPSILON: f64 = 1e-12;

impl ObstacleGraph {
    /// Returns the id of the lowest-numbered polygon containing `point`.
    pub fn containing_polygon(&self, point: Point) -> Option<usize> {
        let tol = self.tolerance();
        (0..self.polygon_count()).find(|&id| {
            self.polygon_edges(id)
                .is_some_and(|ring| point_in_polygon(point, ring, tol))
        })
    }

    /// True if `point` lies strictly inside polygon `id`.
    pub fn polygon_contains(&self, id: usize, point: Point) -> bool {
        self.polygon_edges(id)
            .is_some_and(|ring| point_in_polygon(point, ring, self.tolerance()))
    }

    /// True if both endpoints are vertices of the same polygon and the
    /// chord's midpoint lies inside that polygon.
    ///
    /// The endpoints' polygon tags are used as given; pass the stored
    /// vertices from [`ObstacleGraph::canonical`].
    pub fn chord_crosses_own_polygon(&self, p1: Point, p2: Point) -> bool {
        match (p1.polygon_id, p2.polygon_id) {
            (Some(a), Some(b)) if a == b => {
                self.polygon_contains(a, Edge::new(p1, p2).midpoint())
            }
            _ => false,
        }
    }

    /// Returns an obstacle edge that `point` lies on strictly between its
    /// endpoints, if any.
    pub fn edge_through(&self, point: Point) -> Option<Edge> {
        let tol = self.tolerance();
        self.edges()
            .find(|e| {
                !e.contains(point)
                    && orientation(e.p1, e.p2, point, tol) == Orientation::Collinear
                    && on_segment(e.p1, point, e.p2)
            })
            .copied()
    }

    /// Moves `point`, assumed inside polygon `id`, to just outside it.
    ///
    /// The nearest boundary location is found by projecting onto every edge.
    /// If that location is a vertex, the point is placed `clearance` along
    /// the bisector of the vertex's two ring edges, on whichever side is
    /// outside the polygon. Otherwise it is placed `clearance` beyond the
    /// boundary along the direction from `point` to the boundary. A point
    /// already on the boundary, or a straight vertex, uses the edge normal.
    pub fn nudge_outside(&self, point: Point, id: usize, clearance: f64) -> Result<Point> {
        if !point.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "point {} has a non-finite coordinate",
                point
            )));
        }
        if !clearance.is_finite() || clearance <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "clearance must be positive and finite, got {}",
                clearance
            )));
        }
        let ring = self.polygon_edges(id).ok_or(Error::PolygonNotFound(id))?;
        let hit = closest_boundary_point(point, ring).ok_or(Error::PolygonNotFound(id))?;

        if let Some(vertex) = hit.vertex {
            let n = ring.len();
            let edge = ring[hit.edge_index];
            let (prev, next) = if vertex == edge.p1 {
                (ring[(hit.edge_index + n - 1) % n], edge)
            } else {
                (edge, ring[(hit.edge_index + 1) % n])
            };
            let bisector = match (unit_vector(vertex, prev.p1), unit_vector(vertex, next.p2)) {
                (Some(u1), Some(u2)) => Some(u1 + u2),
                _ => None,
            };
            if let Some(sum) = bisector.filter(|v| v.norm() > BISECTOR_EPSILON) {
                if let Some(out) = self.pick_outside(id, vertex, sum.normalize(), clearance) {
                    return Ok(out);
                }
            }
        } else if hit.distance > 0.0 {
            if let Some(dir) = unit_vector(point, hit.point) {
                return Ok(Point::from_coords(hit.point.coords() + dir * clearance));
            }
        }

        // On the boundary or at a straight vertex: step along the edge normal
        let edge = ring[hit.edge_index];
        let d = edge.p2.coords() - edge.p1.coords();
        let normal = Vector2::new(-d.y, d.x).normalize();
        Ok(self
            .pick_outside(id, hit.point, normal, clearance)
            .unwrap_or_else(|| Point::from_coords(hit.point.coords() + normal * clearance)))
    }

    /// Tries `base ± dir * clearance` and returns the first candidate outside polygon `id`.
    fn pick_outside(
        &self,
        id: usize,
        base: Point,
        dir: Vector2<f64>,
        clearance: f64,
    ) -> Option<Point> {
        [1.0, -1.0]
            .into_iter()
            .map(|sign| Point::from_coords(base.coords() + dir * (sign * clearance)))
            .find(|candidate| !self.polygon_contains(id, *candidate))
    }
}
