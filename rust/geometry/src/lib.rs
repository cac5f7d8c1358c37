// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # VisGraph Geometry
//!
//! Planar value types and predicates for visibility graph construction.
//!
//! Points and unordered edges compare by coordinate value. Orientation and
//! angle predicates are evaluated under a configurable [`Tolerance`] so that
//! near-collinear input classifies consistently, whatever the coordinate
//! scale of the obstacle data.

pub mod containment;
pub mod error;
pub mod kernel;
pub mod point;
pub mod polygon;

// Re-export nalgebra types for convenience
pub use nalgebra::Vector2;

pub use containment::{closest_boundary_point, point_in_polygon, BoundaryPoint};
pub use error::{Error, Result};
pub use kernel::{
    angle_between, angle_from, distance_to_intersection, euclidean_distance, intersection_point,
    on_segment, orientation, segments_cross, segments_intersect, unit_vector, Orientation,
    Tolerance,
};
pub use point::{Edge, Point};
pub use polygon::{ring_edges, Polygon};
