// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON serialization for an obstacle graph and its visibility graph.
//!
//! The obstacle graph is stored as its normalized input rings and rebuilt on
//! load, which reproduces the same polygon id assignment. Visibility
//! vertices carry their polygon ids so that a snapshot paired with different
//! obstacles is rejected rather than silently re-tagged.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use visgraph_geometry::{Edge, Point, Tolerance};

use crate::error::{Error, Result};
use crate::graph::PlanarGraph;
use crate::obstacles::ObstacleGraph;

/// Serializable representation of an (obstacle graph, visibility graph) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub tolerance: Tolerance,
    /// Normalized obstacle rings in input order, point sets included.
    pub obstacles: Vec<Vec<[f64; 2]>>,
    pub vertices: Vec<VertexSnapshot>,
    /// Visibility edges as index pairs into `vertices`.
    pub edges: Vec<[usize; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexSnapshot {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon_id: Option<usize>,
}

impl GraphSnapshot {
    /// Captures both graphs.
    ///
    /// Vertices are listed obstacle vertices first, in input order, then any
    /// other visibility points ordered by coordinates; edges are sorted. Equal
    /// graphs therefore always produce identical snapshots.
    pub fn capture(obstacles: &ObstacleGraph, visibility: &PlanarGraph) -> Self {
        let obstacle_rings = obstacles
            .rings()
            .iter()
            .map(|ring| ring.points().iter().map(|p| [p.x, p.y]).collect())
            .collect();

        let mut points: Vec<Point> = obstacles
            .vertices()
            .iter()
            .filter(|p| visibility.contains_point(**p))
            .copied()
            .collect();
        let mut extra: Vec<Point> = visibility
            .points()
            .filter(|p| !obstacles.contains_vertex(*p))
            .collect();
        extra.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        points.extend(extra);

        let index: FxHashMap<Point, usize> =
            points.iter().enumerate().map(|(i, p)| (*p, i)).collect();

        let mut edges: Vec<[usize; 2]> = visibility
            .edges()
            .filter_map(|e| {
                let a = *index.get(&e.p1)?;
                let b = *index.get(&e.p2)?;
                Some([a.min(b), a.max(b)])
            })
            .collect();
        edges.sort_unstable();

        Self {
            tolerance: obstacles.tolerance(),
            obstacles: obstacle_rings,
            vertices: points
                .iter()
                .map(|p| VertexSnapshot {
                    x: p.x,
                    y: p.y,
                    polygon_id: p.polygon_id,
                })
                .collect(),
            edges,
        }
    }

    /// Rebuilds both graphs, validating vertex tags against the rebuilt obstacles.
    pub fn restore(&self) -> Result<(ObstacleGraph, PlanarGraph)> {
        let obstacles = ObstacleGraph::from_polygons(
            self.obstacles
                .iter()
                .map(|ring| ring.iter().map(|&c| Point::from(c))),
            self.tolerance,
        )?;

        let mut visibility = PlanarGraph::new();
        let mut points = Vec::with_capacity(self.vertices.len());
        for (i, v) in self.vertices.iter().enumerate() {
            let point = Point::new(v.x, v.y);
            if !point.is_finite() {
                return Err(Error::Serialization(format!(
                    "vertex {} has a non-finite coordinate",
                    i
                )));
            }
            let stored = obstacles.canonical(point).unwrap_or(point);
            if stored.polygon_id != v.polygon_id {
                return Err(Error::Serialization(format!(
                    "vertex {} at {} has polygon id {:?}, obstacles say {:?}",
                    i, point, v.polygon_id, stored.polygon_id
                )));
            }
            visibility.add_point(stored);
            points.push(stored);
        }

        for &[a, b] in &self.edges {
            let (Some(&p1), Some(&p2)) = (points.get(a), points.get(b)) else {
                return Err(Error::Serialization(format!(
                    "edge [{}, {}] references a missing vertex",
                    a, b
                )));
            };
            if a == b {
                return Err(Error::Serialization(format!("edge [{}, {}] is a loop", a, b)));
            }
            visibility.add_edge(Edge::new(p1, p2));
        }

        Ok((obstacles, visibility))
    }
}

/// Serializes both graphs to pretty-printed JSON.
pub fn to_json(obstacles: &ObstacleGraph, visibility: &PlanarGraph) -> Result<String> {
    let snapshot = GraphSnapshot::capture(obstacles, visibility);
    serde_json::to_string_pretty(&snapshot).map_err(|e| Error::Serialization(e.to_string()))
}

/// Deserializes both graphs from JSON produced by [`to_json`].
pub fn from_json(json: &str) -> Result<(ObstacleGraph, PlanarGraph)> {
    let snapshot: GraphSnapshot =
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
    snapshot.restore()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::{visible_points, ScanMode};

    fn build() -> (ObstacleGraph, PlanarGraph) {
        let obstacles = ObstacleGraph::from_polygons(
            vec![
                vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (0.0, 0.0)],
                vec![(5.0, 5.0)],
                vec![(4.0, 0.0), (5.0, 1.0), (4.0, 2.0)],
            ],
            Tolerance::new(9, 4),
        )
        .unwrap();
        let mut visibility = PlanarGraph::new();
        for &v in obstacles.vertices() {
            for w in visible_points(v, &obstacles, &[], ScanMode::Half) {
                visibility.add_edge(Edge::new(v, w));
            }
        }
        // A free point joined to one vertex
        visibility.add_edge(Edge::new(Point::new(-3.0, 1.0), Point::new(0.0, 2.0)));
        (obstacles, visibility)
    }

    #[test]
    fn roundtrip_preserves_graphs() {
        let (obstacles, visibility) = build();
        let json = to_json(&obstacles, &visibility).unwrap();
        let (obstacles2, visibility2) = from_json(&json).unwrap();

        assert_eq!(visibility2, visibility);
        assert_eq!(obstacles2.tolerance(), Tolerance::new(9, 4));
        assert_eq!(obstacles2.polygon_count(), obstacles.polygon_count());
        assert_eq!(obstacles2.vertices(), obstacles.vertices());
        for p in visibility.points() {
            assert_eq!(visibility2.get(p).unwrap().polygon_id, p.polygon_id);
        }
    }

    #[test]
    fn roundtrip_is_stable() {
        let (obstacles, visibility) = build();
        let json = to_json(&obstacles, &visibility).unwrap();
        let (obstacles2, visibility2) = from_json(&json).unwrap();
        assert_eq!(to_json(&obstacles2, &visibility2).unwrap(), json);
    }

    #[test]
    fn rejects_mismatched_polygon_ids() {
        let (obstacles, visibility) = build();
        let mut snapshot = GraphSnapshot::capture(&obstacles, &visibility);
        snapshot.vertices[0].polygon_id = Some(7);
        assert!(matches!(snapshot.restore(), Err(Error::Serialization(_))));
    }

    #[test]
    fn rejects_dangling_edges() {
        let (obstacles, visibility) = build();
        let mut snapshot = GraphSnapshot::capture(&obstacles, &visibility);
        snapshot.edges.push([0, snapshot.vertices.len()]);
        assert!(matches!(snapshot.restore(), Err(Error::Serialization(_))));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(from_json("{not json"), Err(Error::Serialization(_))));
    }
}
