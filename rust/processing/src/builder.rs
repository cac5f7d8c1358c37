// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parallel visibility graph build.
//!
//! Obstacle vertices are split into batches and swept on a dedicated rayon
//! pool. Each batch collects its own edge list against the shared, read-only
//! obstacle graph; the lists are merged into one [`PlanarGraph`] only after
//! every batch has finished. A cancelled or failed build returns an error and
//! nothing else.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use visgraph_geometry::{Edge, Point};
use visgraph_topology::{visible_points, ObstacleGraph, PlanarGraph, ScanMode};

use crate::config::BuildConfig;
use crate::error::{Error, Result};

/// Shared flag for aborting a build from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Workers stop before their next source point.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Builds the visibility graph over every obstacle vertex.
///
/// Each vertex is swept once with [`ScanMode::Half`], so every visible pair
/// is found from exactly one side. The resulting edge set does not depend on
/// `workers` or `batch_size`.
pub fn build_visibility_graph(
    obstacles: &ObstacleGraph,
    config: &BuildConfig,
    cancel: &CancelToken,
) -> Result<PlanarGraph> {
    config.validate()?;
    let start = Instant::now();

    let points = obstacles.vertices();
    let batches: Vec<&[Point]> = points.chunks(config.batch_size).collect();

    tracing::info!(
        points = points.len(),
        batches = batches.len(),
        workers = config.workers,
        "Starting visibility graph build"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .map_err(|e| Error::ThreadPool(e.to_string()))?;

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pool.install(|| {
            batches
                .par_iter()
                .enumerate()
                .map(|(index, batch)| sweep_batch(index, batch, obstacles, cancel))
                .collect::<Result<Vec<Vec<Edge>>>>()
        })
    }));

    let batch_edges = match outcome {
        Ok(Ok(batch_edges)) => batch_edges,
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "Visibility graph build aborted");
            return Err(err);
        }
        Err(payload) => {
            let message = panic_message(payload);
            tracing::warn!(error = %message, "Visibility graph worker panicked");
            return Err(Error::WorkerFailed(message));
        }
    };

    // Merge after the join
    let mut visibility = PlanarGraph::new();
    for &point in points {
        visibility.add_point(point);
    }
    for edge in batch_edges.into_iter().flatten() {
        visibility.add_edge(edge);
    }

    tracing::info!(
        points = visibility.point_count(),
        edges = visibility.edge_count(),
        build_time_ms = start.elapsed().as_millis(),
        "Visibility graph build complete"
    );

    Ok(visibility)
}

fn sweep_batch(
    index: usize,
    batch: &[Point],
    obstacles: &ObstacleGraph,
    cancel: &CancelToken,
) -> Result<Vec<Edge>> {
    let mut edges = Vec::new();
    for &source in batch {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        edges.extend(
            visible_points(source, obstacles, &[], ScanMode::Half)
                .into_iter()
                .map(|p| Edge::new(source, p)),
        );
    }
    tracing::debug!(
        batch = index,
        points = batch.len(),
        edges = edges.len(),
        "Batch swept"
    );
    Ok(edges)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
