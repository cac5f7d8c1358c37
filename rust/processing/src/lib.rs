// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Visgraph Processing
//!
//! Builds visibility graphs in parallel and answers shortest-path queries.
//!
//! ```
//! use visgraph_geometry::Point;
//! use visgraph_processing::{BuildConfig, VisGraph};
//!
//! let graph = VisGraph::build(
//!     vec![vec![(1.0, -1.0), (2.0, -1.0), (2.0, 1.0), (1.0, 1.0)]],
//!     &BuildConfig::default(),
//! )
//! .unwrap();
//! let path = graph
//!     .shortest_path(Point::new(0.0, 0.0), Point::new(3.0, 0.0))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(path.len(), 4);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod visgraph;

pub use builder::{build_visibility_graph, CancelToken};
pub use config::{BuildConfig, DEFAULT_BATCH_SIZE};
pub use error::{Error, Result};
pub use visgraph::VisGraph;
