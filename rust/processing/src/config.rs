// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Build configuration, optionally loaded from environment variables.

use serde::{Deserialize, Serialize};
use visgraph_geometry::kernel::{DEFAULT_ANGLE_DECIMALS, DEFAULT_COLLINEAR_DECIMALS};
use visgraph_geometry::Tolerance;
use visgraph_topology::DEFAULT_CLEARANCE;

use crate::error::{Error, Result};

/// Default number of source points handed to a worker at a time.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Visibility graph build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Number of worker threads for the parallel build.
    pub workers: usize,
    /// Source points per batch.
    pub batch_size: usize,
    /// Rounding used by every geometric predicate.
    pub tolerance: Tolerance,
    /// Distance query points are pushed outside an obstacle by `closest_point`.
    pub clearance: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            batch_size: DEFAULT_BATCH_SIZE,
            tolerance: Tolerance::default(),
            clearance: DEFAULT_CLEARANCE,
        }
    }
}

impl BuildConfig {
    /// Single-worker configuration with default tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_clearance(mut self, clearance: f64) -> Self {
        self.clearance = clearance;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to their defaults; the worker
    /// count defaults to the number of CPUs.
    pub fn from_env() -> Self {
        Self {
            workers: std::env::var("VISGRAPH_WORKERS")
                .unwrap_or_else(|_| num_cpus::get().to_string())
                .parse()
                .unwrap_or_else(|_| num_cpus::get()),
            batch_size: std::env::var("VISGRAPH_BATCH_SIZE")
                .unwrap_or_else(|_| DEFAULT_BATCH_SIZE.to_string())
                .parse()
                .unwrap_or(DEFAULT_BATCH_SIZE),
            tolerance: Tolerance::new(
                std::env::var("VISGRAPH_COLLINEAR_DECIMALS")
                    .unwrap_or_else(|_| DEFAULT_COLLINEAR_DECIMALS.to_string())
                    .parse()
                    .unwrap_or(DEFAULT_COLLINEAR_DECIMALS),
                std::env::var("VISGRAPH_ANGLE_DECIMALS")
                    .unwrap_or_else(|_| DEFAULT_ANGLE_DECIMALS.to_string())
                    .parse()
                    .unwrap_or(DEFAULT_ANGLE_DECIMALS),
            ),
            clearance: std::env::var("VISGRAPH_CLEARANCE")
                .unwrap_or_else(|_| DEFAULT_CLEARANCE.to_string())
                .parse()
                .unwrap_or(DEFAULT_CLEARANCE),
        }
    }

    /// Checks that every value is in range.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidConfig("workers must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be at least 1".into()));
        }
        if !self.clearance.is_finite() || self.clearance <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "clearance must be positive and finite, got {}",
                self.clearance
            )));
        }
        // 10^decimals must stay finite for the rounding to mean anything
        if self.tolerance.collinear_decimals > 300 || self.tolerance.angle_decimals > 300 {
            return Err(Error::InvalidConfig(format!(
                "tolerance decimals out of range: {:?}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
