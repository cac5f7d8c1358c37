// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The obstacle graph and its visibility graph, kept together.

use rayon::prelude::*;
use visgraph_geometry::{Edge, Point};
use visgraph_topology::{visible_points, ObstacleGraph, PlanarGraph, ScanMode, DEFAULT_CLEARANCE};

use crate::builder::{build_visibility_graph, CancelToken};
use crate::config::BuildConfig;
use crate::error::Result;

/// An obstacle set together with its built visibility graph.
#[derive(Debug, Clone)]
pub struct VisGraph {
    obstacles: ObstacleGraph,
    visibility: PlanarGraph,
    clearance: f64,
}

impl VisGraph {
    /// Builds the obstacle graph from `polygons` and its full visibility graph.
    pub fn build<I, R, P>(polygons: I, config: &BuildConfig) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        Self::build_with_cancel(polygons, config, &CancelToken::new())
    }

    /// Like [`VisGraph::build`], abandoning the build once `cancel` is set.
    pub fn build_with_cancel<I, R, P>(
        polygons: I,
        config: &BuildConfig,
        cancel: &CancelToken,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        config.validate()?;
        let obstacles = ObstacleGraph::from_polygons(polygons, config.tolerance)?;
        let visibility = build_visibility_graph(&obstacles, config, cancel)?;
        Ok(Self {
            obstacles,
            visibility,
            clearance: config.clearance,
        })
    }

    /// Wraps graphs built elsewhere.
    pub fn from_parts(obstacles: ObstacleGraph, visibility: PlanarGraph) -> Self {
        Self {
            obstacles,
            visibility,
            clearance: DEFAULT_CLEARANCE,
        }
    }

    pub fn obstacles(&self) -> &ObstacleGraph {
        &self.obstacles
    }

    pub fn visibility(&self) -> &PlanarGraph {
        &self.visibility
    }

    pub fn into_parts(self) -> (ObstacleGraph, PlanarGraph) {
        (self.obstacles, self.visibility)
    }

    /// Clearance used by [`VisGraph::closest_point`].
    pub fn clearance(&self) -> f64 {
        self.clearance
    }

    pub fn set_clearance(&mut self, clearance: f64) {
        self.clearance = clearance;
    }

    // =========================================================================
    // Persistent update
    // =========================================================================

    /// Adds `points` and their visibility edges to the visibility graph.
    ///
    /// Each point is swept over the full circle. `origin` and `destination`,
    /// when given, are extra candidates so their visibility to the points is
    /// recorded as well. Returns the number of new edges.
    pub fn update(
        &mut self,
        points: &[Point],
        origin: Option<Point>,
        destination: Option<Point>,
    ) -> Result<usize> {
        for p in points.iter().chain(origin.iter()).chain(destination.iter()) {
            ensure_finite(*p)?;
        }

        let extra: Vec<Point> = origin.into_iter().chain(destination).collect();
        let obstacles = &self.obstacles;
        let found: Vec<(Point, Vec<Point>)> = points
            .par_iter()
            .map(|&p| {
                let source = obstacles.canonical(p).unwrap_or(p);
                (source, visible_points(source, obstacles, &extra, ScanMode::Full))
            })
            .collect();

        let mut added = 0;
        for (source, visible) in found {
            self.visibility.add_point(source);
            for v in visible {
                if self.visibility.add_edge(Edge::new(source, v)) {
                    added += 1;
                }
            }
        }

        tracing::debug!(points = points.len(), edges_added = added, "Visibility graph updated");
        Ok(added)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Shortest obstacle-avoiding path from `origin` to `destination`.
    ///
    /// Query points that are not yet in the visibility graph are attached
    /// through a temporary overlay; neither graph is modified. Returns
    /// `Ok(None)` when the destination cannot be reached.
    pub fn shortest_path(&self, origin: Point, destination: Point) -> Result<Option<Vec<Point>>> {
        ensure_finite(origin)?;
        ensure_finite(destination)?;
        let origin = self.obstacles.canonical(origin).unwrap_or(origin);
        let destination = self.obstacles.canonical(destination).unwrap_or(destination);

        let origin_known = self.visibility.contains_point(origin);
        let destination_known = self.visibility.contains_point(destination);

        let mut overlay = PlanarGraph::new();
        if !origin_known {
            self.attach(&mut overlay, origin, (!destination_known).then_some(destination));
        }
        if !destination_known {
            self.attach(&mut overlay, destination, (!origin_known).then_some(origin));
        }

        let path = self
            .visibility
            .shortest_path(Some(&overlay), origin, destination);

        tracing::debug!(
            overlay_edges = overlay.edge_count(),
            path_points = path.as_ref().map_or(0, Vec::len),
            "Shortest path query"
        );
        Ok(path)
    }

    fn attach(&self, overlay: &mut PlanarGraph, point: Point, companion: Option<Point>) {
        let extra: Vec<Point> = companion.into_iter().collect();
        overlay.add_point(point);
        for v in visible_points(point, &self.obstacles, &extra, ScanMode::Full) {
            overlay.add_edge(Edge::new(point, v));
        }
    }

    /// Id of the obstacle polygon containing `point`, if any.
    pub fn containing_polygon(&self, point: Point) -> Option<usize> {
        self.obstacles.containing_polygon(point)
    }

    /// Moves `point`, inside polygon `polygon_id`, to just outside it using
    /// the configured clearance.
    pub fn closest_point(&self, point: Point, polygon_id: usize) -> Result<Point> {
        self.closest_point_with_clearance(point, polygon_id, self.clearance)
    }

    pub fn closest_point_with_clearance(
        &self,
        point: Point,
        polygon_id: usize,
        clearance: f64,
    ) -> Result<Point> {
        Ok(self.obstacles.nudge_outside(point, polygon_id, clearance)?)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Serializes both graphs to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(visgraph_topology::to_json(&self.obstacles, &self.visibility)?)
    }

    /// Restores a bundle written by [`VisGraph::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        let (obstacles, visibility) = visgraph_topology::from_json(json)?;
        Ok(Self::from_parts(obstacles, visibility))
    }
}

fn ensure_finite(point: Point) -> Result<()> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(visgraph_geometry::Error::InvalidPoint(format!(
            "point {} has a non-finite coordinate",
            point
        ))
        .into())
    }
}
