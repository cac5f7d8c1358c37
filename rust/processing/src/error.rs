// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for building and querying visibility graphs.

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Topology(#[from] visgraph_topology::Error),

    #[error(transparent)]
    Geometry(#[from] visgraph_geometry::Error),

    /// A configuration value was out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The build was cancelled; no partial graph is returned.
    #[error("build cancelled")]
    Cancelled,

    /// A worker panicked; the build was abandoned.
    #[error("worker failed: {0}")]
    WorkerFailed(String),

    #[error("failed to create thread pool: {0}")]
    ThreadPool(String),
}
