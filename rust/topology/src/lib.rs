// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Visgraph Topology
//!
//! Graph structures for obstacle-avoiding shortest paths on the plane.
//!
//! An [`ObstacleGraph`] holds the obstacle polygons, their vertices and
//! boundary edges, and answers containment and clearance queries. The
//! rotational sweep in [`visible_points`] finds every point visible from a
//! source, keeping the obstacle edges that cross the sweep ray in an
//! [`OpenEdges`] AVL tree. Visibility edges accumulate in a [`PlanarGraph`],
//! which also runs Dijkstra with an optional overlay of temporary edges.
//!
//! ```
//! use visgraph_geometry::{Point, Tolerance};
//! use visgraph_topology::{visible_points, ObstacleGraph, ScanMode};
//!
//! let obstacles = ObstacleGraph::from_polygons(
//!     vec![vec![(1.0, -1.0), (2.0, -1.0), (2.0, 1.0), (1.0, 1.0)]],
//!     Tolerance::default(),
//! )
//! .unwrap();
//! let seen = visible_points(Point::new(0.0, 0.0), &obstacles, &[], ScanMode::Full);
//! assert_eq!(seen.len(), 2);
//! ```

pub mod error;
pub mod graph;
pub mod obstacles;
pub mod open_edges;
pub mod query;
pub mod serialization;
pub mod visibility;

pub use error::{Error, Result};
pub use graph::PlanarGraph;
pub use obstacles::ObstacleGraph;
pub use open_edges::OpenEdges;
pub use query::DEFAULT_CLEARANCE;
pub use serialization::{from_json, to_json, GraphSnapshot, VertexSnapshot};
pub use visibility::{visible_points, ScanMode};
