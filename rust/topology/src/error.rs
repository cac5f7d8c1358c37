// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for obstacle and visibility graph operations.

/// Result type alias for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying graphs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input ring failed validation.
    #[error("invalid polygon at input index {index}: {source}")]
    InvalidPolygon {
        index: usize,
        #[source]
        source: visgraph_geometry::Error,
    },

    /// A point or value failed geometric validation.
    #[error(transparent)]
    Geometry(#[from] visgraph_geometry::Error),

    /// No obstacle polygon carries the given id.
    #[error("polygon not found: {0}")]
    PolygonNotFound(usize),

    /// An argument was out of range (non-finite point, non-positive clearance).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
