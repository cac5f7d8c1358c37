// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The obstacle graph: polygon rings, their vertices and boundary edges.
//!
//! Built once from an ordered list of rings and read-only afterwards. Rings
//! of three or more vertices are numbered in input order and their vertices
//! are tagged with that number; shorter inputs are bare point sets.

use visgraph_geometry::polygon::ring_edges;
use visgraph_geometry::{Edge, Point, Polygon, Tolerance};

use crate::error::{Error, Result};
use crate::graph::PlanarGraph;

#[derive(Debug, Clone)]
pub struct ObstacleGraph {
    graph: PlanarGraph,
    /// Vertices in input order, each listed once.
    vertices: Vec<Point>,
    /// Boundary edges of each obstacle in ring order, indexed by polygon id.
    polygons: Vec<Vec<Edge>>,
    /// Normalized input rings, point sets included, in input order.
    rings: Vec<Polygon>,
    tolerance: Tolerance,
    max_x: f64,
}

impl ObstacleGraph {
    /// Builds the obstacle graph from rings of points.
    ///
    /// Each ring is normalized with [`Polygon::new`]; the first invalid ring
    /// aborts construction with its input index.
    pub fn from_polygons<I, R, P>(polygons: I, tolerance: Tolerance) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        let rings = polygons
            .into_iter()
            .enumerate()
            .map(|(index, ring)| {
                Polygon::new(ring).map_err(|source| Error::InvalidPolygon { index, source })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_rings(rings, tolerance))
    }

    /// Builds the obstacle graph from already normalized rings.
    pub fn from_rings(rings: Vec<Polygon>, tolerance: Tolerance) -> Self {
        let mut graph = PlanarGraph::new();
        let mut vertices = Vec::new();
        let mut polygons = Vec::new();
        let mut max_x = f64::NEG_INFINITY;

        for ring in &rings {
            let tagged: Vec<Point> = if ring.is_obstacle() {
                let id = polygons.len();
                ring.points()
                    .iter()
                    .map(|p| Point::with_polygon(p.x, p.y, id))
                    .collect()
            } else {
                ring.points().to_vec()
            };

            for &point in &tagged {
                max_x = max_x.max(point.x);
                if !graph.contains_point(point) {
                    graph.add_point(point);
                    vertices.push(point);
                }
            }

            let edges = ring_edges(&tagged);
            for &edge in &edges {
                graph.add_edge(edge);
            }
            if ring.is_obstacle() {
                polygons.push(edges);
            }
        }

        Self {
            graph,
            vertices,
            polygons,
            rings,
            tolerance,
            max_x,
        }
    }

    /// The boundary graph: every vertex with its incident boundary edges.
    pub fn graph(&self) -> &PlanarGraph {
        &self.graph
    }

    /// All vertices in first-seen input order.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Boundary edges of polygon `id` in ring order.
    pub fn polygon_edges(&self, id: usize) -> Option<&[Edge]> {
        self.polygons.get(id).map(Vec::as_slice)
    }

    /// The normalized rings this graph was built from.
    pub fn rings(&self) -> &[Polygon] {
        &self.rings
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Largest x coordinate of any vertex; `-inf` for an empty graph.
    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    /// Returns the stored vertex at `point`, with its polygon tag.
    pub fn canonical(&self, point: Point) -> Option<Point> {
        self.graph.get(point)
    }

    pub fn contains_vertex(&self, point: Point) -> bool {
        self.graph.contains_point(point)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.graph.edges()
    }

    pub fn edges_at(&self, point: Point) -> impl Iterator<Item = &Edge> + '_ {
        self.graph.edges_at(point)
    }

    /// True if `a` and `b` are joined by a boundary edge.
    pub fn are_adjacent(&self, a: Point, b: Point) -> bool {
        self.graph.contains_edge(&Edge::new(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Vec<(f64, f64)> {
        vec![(x, y), (x + size, y), (x + size, y + size), (x, y + size)]
    }

    #[test]
    fn builds_polygons_and_point_sets() {
        let g = ObstacleGraph::from_polygons(
            vec![
                square(0.0, 0.0, 1.0),
                vec![(5.0, 5.0)],
                vec![(7.0, 0.0), (8.0, 1.0)],
                square(3.0, 0.0, 1.0),
            ],
            Tolerance::default(),
        )
        .unwrap();

        assert_eq!(g.polygon_count(), 2);
        assert_eq!(g.vertex_count(), 4 + 1 + 2 + 4);
        assert_eq!(g.edges().count(), 4 + 1 + 4);
        assert_eq!(g.canonical(Point::new(3.0, 0.0)).unwrap().polygon_id, Some(1));
        assert_eq!(g.canonical(Point::new(5.0, 5.0)).unwrap().polygon_id, None);
        assert_eq!(g.canonical(Point::new(8.0, 1.0)).unwrap().polygon_id, None);
        assert_eq!(g.polygon_edges(1).unwrap().len(), 4);
        assert!(g.polygon_edges(2).is_none());
        assert_eq!(g.max_x(), 8.0);
    }

    #[test]
    fn per_polygon_edges_are_in_global_graph() {
        let g = ObstacleGraph::from_polygons(
            vec![square(0.0, 0.0, 2.0), vec![(3.0, 0.0), (4.0, 1.0), (3.0, 2.0)]],
            Tolerance::default(),
        )
        .unwrap();

        for id in 0..g.polygon_count() {
            for edge in g.polygon_edges(id).unwrap() {
                assert!(g.edges_at(edge.p1).any(|e| e == edge));
                assert!(g.edges_at(edge.p2).any(|e| e == edge));
                assert_eq!(edge.p1.polygon_id, Some(id));
            }
        }
    }

    #[test]
    fn ring_edges_follow_ring_order() {
        let g = ObstacleGraph::from_polygons(vec![square(0.0, 0.0, 1.0)], Tolerance::default())
            .unwrap();
        let edges = g.polygon_edges(0).unwrap();
        for pair in edges.windows(2) {
            assert_eq!(pair[0].p2, pair[1].p1);
        }
        assert_eq!(edges[3].p2, edges[0].p1);
        assert!(g.are_adjacent(Point::new(0.0, 0.0), Point::new(0.0, 1.0)));
        assert!(!g.are_adjacent(Point::new(0.0, 0.0), Point::new(1.0, 1.0)));
    }

    #[test]
    fn invalid_ring_reports_its_index() {
        let err = ObstacleGraph::from_polygons(
            vec![square(0.0, 0.0, 1.0), vec![(0.0, 0.0), (0.0, 0.0), (1.0, 1.0)]],
            Tolerance::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidPolygon { index: 1, .. }));

        let empty: Vec<Vec<(f64, f64)>> = vec![vec![]];
        assert!(ObstacleGraph::from_polygons(empty, Tolerance::default()).is_err());
    }
}
