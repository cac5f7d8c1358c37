// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Undirected point graph with Euclidean edge weights.
//!
//! The same structure backs both the obstacle boundary graph and the
//! visibility graph:
//! - **Nodes** = points, keyed by coordinate value
//! - **Edges** = unordered point pairs, weighted by their length
//!
//! Shortest paths can be searched over one graph extended by a second,
//! disposable overlay graph, which is how ad hoc query points are attached
//! without touching the persisted visibility graph.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};
use visgraph_geometry::{Edge, Point};

/// Mapping from each point to its incident edges, plus the global edge set.
#[derive(Debug, Clone, Default)]
pub struct PlanarGraph {
    /// Adjacency index: point → incident edges.
    adjacency: FxHashMap<Point, FxHashSet<Edge>>,
    edges: FxHashSet<Edge>,
}

impl PlanarGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Graph mutation
    // =========================================================================

    /// Adds an isolated point. Existing points keep their stored polygon tag.
    pub fn add_point(&mut self, point: Point) {
        self.adjacency.entry(point).or_default();
    }

    /// Adds an undirected edge. Returns `false` if the edge was already present.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if !self.edges.insert(edge) {
            return false;
        }
        self.adjacency.entry(edge.p1).or_default().insert(edge);
        self.adjacency.entry(edge.p2).or_default().insert(edge);
        true
    }

    /// Adds every edge of `other`. Returns the number of new edges.
    pub fn merge(&mut self, other: &PlanarGraph) -> usize {
        let mut added = 0;
        for point in other.adjacency.keys() {
            self.add_point(*point);
        }
        for edge in &other.edges {
            if self.add_edge(*edge) {
                added += 1;
            }
        }
        added
    }

    // =========================================================================
    // Graph accessors
    // =========================================================================

    pub fn point_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn contains_point(&self, point: Point) -> bool {
        self.adjacency.contains_key(&point)
    }

    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    /// Returns the stored copy of `point`, carrying its polygon tag.
    pub fn get(&self, point: Point) -> Option<Point> {
        self.adjacency.get_key_value(&point).map(|(p, _)| *p)
    }

    /// Edges incident to `point`. Empty if the point is unknown.
    pub fn edges_at(&self, point: Point) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacency.get(&point).into_iter().flatten()
    }

    /// Points joined to `point` by an edge.
    pub fn adjacent_points(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        self.edges_at(point).map(move |e| e.adjacent(point))
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }

    // =========================================================================
    // Path finding
    // =========================================================================

    /// Dijkstra's shortest path from `origin` to `destination`, with edge
    /// weights equal to Euclidean length.
    ///
    /// Edges of `overlay` are treated as part of this graph for the duration
    /// of the search. The search stops as soon as `destination` is settled.
    /// Returns the point sequence from `origin` to `destination` inclusive,
    /// or `None` if the destination is unreachable.
    pub fn shortest_path(
        &self,
        overlay: Option<&PlanarGraph>,
        origin: Point,
        destination: Point,
    ) -> Option<Vec<Point>> {
        let lookup = |p: Point| self.get(p).or_else(|| overlay.and_then(|o| o.get(p)));

        let source = lookup(origin)?;
        if origin == destination {
            return Some(vec![source]);
        }

        let mut dist: FxHashMap<Point, f64> = FxHashMap::default();
        let mut prev: FxHashMap<Point, Point> = FxHashMap::default();
        let mut settled: FxHashSet<Point> = FxHashSet::default();
        let mut heap = BinaryHeap::new();
        let mut seq = 0u64;

        dist.insert(source, 0.0);
        heap.push(DijkstraState {
            cost: 0.0,
            seq,
            point: source,
        });

        while let Some(DijkstraState { cost, point, .. }) = heap.pop() {
            if !settled.insert(point) {
                continue;
            }
            if point == destination {
                break;
            }

            let incident = self
                .edges_at(point)
                .chain(overlay.into_iter().flat_map(|o| o.edges_at(point)));
            for edge in incident {
                let neighbor = edge.adjacent(point);
                if settled.contains(&neighbor) {
                    continue;
                }
                let next_cost = cost + edge.length();
                let better = dist.get(&neighbor).map_or(true, |&d| next_cost < d);
                if better {
                    dist.insert(neighbor, next_cost);
                    prev.insert(neighbor, point);
                    seq += 1;
                    heap.push(DijkstraState {
                        cost: next_cost,
                        seq,
                        point: neighbor,
                    });
                }
            }
        }

        if !settled.contains(&destination) {
            return None;
        }

        // Reconstruct path
        let mut path = Vec::new();
        let mut current = lookup(destination).unwrap_or(destination);
        while let Some(&p) = prev.get(&current) {
            path.push(current);
            current = p;
        }
        path.push(source);
        path.reverse();
        Some(path)
    }
}

impl PartialEq for PlanarGraph {
    /// Graphs are equal when they hold the same points and the same edges.
    fn eq(&self, other: &Self) -> bool {
        self.edges == other.edges
            && self.adjacency.len() == other.adjacency.len()
            && self.adjacency.keys().all(|p| other.adjacency.contains_key(p))
    }
}

/// Internal state for Dijkstra's priority queue (min-heap by cost).
///
/// Equal costs pop in push order so ties resolve by relaxation order.
#[derive(Debug, Clone)]
struct DijkstraState {
    cost: f64,
    seq: u64,
    point: Point,
}

impl PartialEq for DijkstraState {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DijkstraState {}

impl PartialOrd for DijkstraState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DijkstraState {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn make_linear_graph() -> PlanarGraph {
        // (0,0) --1-- (1,0) --2-- (3,0) --3-- (6,0)
        let mut g = PlanarGraph::new();
        g.add_edge(Edge::new(p(0.0, 0.0), p(1.0, 0.0)));
        g.add_edge(Edge::new(p(1.0, 0.0), p(3.0, 0.0)));
        g.add_edge(Edge::new(p(3.0, 0.0), p(6.0, 0.0)));
        g
    }

    fn path_length(path: &[Point]) -> f64 {
        path.windows(2).map(|w| Edge::new(w[0], w[1]).length()).sum()
    }

    #[test]
    fn graph_basic_properties() {
        let g = make_linear_graph();
        assert_eq!(g.point_count(), 4);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.edges_at(p(1.0, 0.0)).count(), 2);
        assert_eq!(g.edges_at(p(9.0, 9.0)).count(), 0);
        let mut adjacent: Vec<f64> = g.adjacent_points(p(1.0, 0.0)).map(|q| q.x).collect();
        adjacent.sort_by(f64::total_cmp);
        assert_eq!(adjacent, vec![0.0, 3.0]);
    }

    #[test]
    fn duplicate_edge_is_idempotent() {
        let mut g = make_linear_graph();
        assert!(!g.add_edge(Edge::new(p(3.0, 0.0), p(1.0, 0.0))));
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.edges_at(p(1.0, 0.0)).count(), 2);
    }

    #[test]
    fn stored_point_keeps_polygon_tag() {
        let mut g = PlanarGraph::new();
        g.add_point(Point::with_polygon(1.0, 1.0, 2));
        g.add_point(p(1.0, 1.0));
        assert_eq!(g.point_count(), 1);
        assert_eq!(g.get(p(1.0, 1.0)).and_then(|q| q.polygon_id), Some(2));
    }

    #[test]
    fn dijkstra_shortest_path() {
        let g = make_linear_graph();
        let path = g.shortest_path(None, p(0.0, 0.0), p(6.0, 0.0)).unwrap();
        assert!((path_length(&path) - 6.0).abs() < 1e-10);
        assert_eq!(path, vec![p(0.0, 0.0), p(1.0, 0.0), p(3.0, 0.0), p(6.0, 0.0)]);
    }

    #[test]
    fn dijkstra_prefers_shorter_path() {
        let mut g = PlanarGraph::new();
        let (a, b, c) = (p(0.0, 0.0), p(2.0, 0.0), p(1.0, 5.0));
        g.add_edge(Edge::new(a, c));
        g.add_edge(Edge::new(c, b));
        g.add_edge(Edge::new(a, b));
        let path = g.shortest_path(None, a, b).unwrap();
        assert_eq!(path, vec![a, b]);
    }

    #[test]
    fn dijkstra_uses_overlay_edges() {
        let g = make_linear_graph();
        let mut overlay = PlanarGraph::new();
        let q = p(6.0, 4.0);
        overlay.add_edge(Edge::new(q, p(6.0, 0.0)));

        let path = g.shortest_path(Some(&overlay), p(0.0, 0.0), q).unwrap();
        assert_eq!(path.last(), Some(&q));
        assert!((path_length(&path) - 10.0).abs() < 1e-10);
        // The base graph is untouched
        assert!(!g.contains_point(q));
    }

    #[test]
    fn dijkstra_unreachable() {
        let mut g = make_linear_graph();
        g.add_edge(Edge::new(p(10.0, 10.0), p(11.0, 10.0)));
        assert!(g.shortest_path(None, p(0.0, 0.0), p(11.0, 10.0)).is_none());
        assert!(g.shortest_path(None, p(50.0, 0.0), p(0.0, 0.0)).is_none());
    }

    #[test]
    fn dijkstra_trivial_path() {
        let g = make_linear_graph();
        assert_eq!(
            g.shortest_path(None, p(1.0, 0.0), p(1.0, 0.0)),
            Some(vec![p(1.0, 0.0)])
        );
    }

    #[test]
    fn merge_counts_new_edges() {
        let mut g = make_linear_graph();
        let mut other = PlanarGraph::new();
        other.add_edge(Edge::new(p(0.0, 0.0), p(1.0, 0.0)));
        other.add_edge(Edge::new(p(0.0, 0.0), p(0.0, 1.0)));
        assert_eq!(g.merge(&other), 1);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.merge(&other), 0);
    }
}
