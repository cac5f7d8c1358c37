// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point-in-ring classification and boundary projection.
//!
//! Containment casts a horizontal ray toward +x. Vertices lying on the ray
//! are grouped into runs of consecutive ring vertices; a run counts as one
//! crossing when the ring leaves it on the opposite side of the ray from the
//! side it arrived on, and as none when it only grazes the ray.

use std::cmp::Ordering;

use crate::kernel::{on_segment, orientation, segments_cross, Orientation, Tolerance};
use crate::point::{Edge, Point};

/// Returns true if `p` lies strictly inside the ring described by `ring`.
///
/// `ring` must hold the polygon's boundary edges in ring order, each edge's
/// `p2` being the next edge's `p1`. Points on the boundary are not inside.
pub fn point_in_polygon(p: Point, ring: &[Edge], tol: Tolerance) -> bool {
    let n = ring.len();
    if n < 3 || on_boundary(p, ring, tol) {
        return false;
    }

    let max_x = ring
        .iter()
        .map(|e| e.p1.x.max(e.p2.x))
        .fold(f64::NEG_INFINITY, f64::max);
    if p.x > max_x {
        return false;
    }
    let far = Point::new(max_x.max(p.x) + 1.0, p.y);

    let on_ray = |v: Point| v.x > p.x && orientation(p, v, far, tol) == Orientation::Collinear;

    // Start on a vertex off the ray so every run is seen whole
    let Some(start) = ring.iter().position(|e| !on_ray(e.p1)) else {
        return false;
    };

    let mut crossings = 0usize;
    let mut run_side = Ordering::Equal;

    for k in 0..n {
        let edge = &ring[(start + k) % n];
        let (a, b) = (edge.p1, edge.p2);
        match (on_ray(a), on_ray(b)) {
            (false, false) => {
                let side_a = side_of(a, p);
                let side_b = side_of(b, p);
                if side_a == side_b && side_a != Ordering::Equal {
                    continue;
                }
                if segments_cross(p, far, a, b, tol) {
                    crossings += 1;
                }
            }
            (false, true) => run_side = side_of(a, p),
            (true, true) => {}
            (true, false) => {
                if side_of(b, p) != run_side {
                    crossings += 1;
                }
            }
        }
    }

    crossings % 2 == 1
}

fn on_boundary(p: Point, ring: &[Edge], tol: Tolerance) -> bool {
    ring.iter().any(|e| {
        orientation(e.p1, e.p2, p, tol) == Orientation::Collinear && on_segment(e.p1, p, e.p2)
    })
}

#[inline]
fn side_of(v: Point, p: Point) -> Ordering {
    v.y.partial_cmp(&p.y).unwrap_or(Ordering::Equal)
}

/// Nearest boundary location found by [`closest_boundary_point`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryPoint {
    /// The projected location on the boundary.
    pub point: Point,
    /// Index into the ring of the edge the projection landed on.
    pub edge_index: usize,
    /// Set when the projection was clamped onto one of the edge's endpoints.
    pub vertex: Option<Point>,
    pub distance: f64,
}

/// Projects `p` onto every edge of `ring`, clamping to the edge endpoints,
/// and returns the nearest result. Ties keep the earliest edge.
pub fn closest_boundary_point(p: Point, ring: &[Edge]) -> Option<BoundaryPoint> {
    let mut best: Option<BoundaryPoint> = None;

    for (i, e) in ring.iter().enumerate() {
        let d = e.p2.coords() - e.p1.coords();
        let denom = d.norm_squared();
        let u = if denom == 0.0 {
            0.0
        } else {
            (p.coords() - e.p1.coords()).dot(&d) / denom
        };

        let (point, vertex) = if u <= 0.0 {
            (e.p1, Some(e.p1))
        } else if u >= 1.0 {
            (e.p2, Some(e.p2))
        } else {
            (Point::from_coords(e.p1.coords() + d * u), None)
        };

        let distance = (point.coords() - p.coords()).norm();
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(BoundaryPoint {
                point,
                edge_index: i,
                vertex,
                distance,
            });
        }
    }

    best
}
