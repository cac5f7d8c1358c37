// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rotational sweep visibility.
//!
//! For one source point, candidates are visited in order of angle around the
//! source (nearest first at equal angle) while an [`OpenEdges`] set tracks
//! the obstacle edges crossing the sweep ray. A candidate is visible when the
//! nearest open edge does not block the chord to it.

use std::f64::consts::PI;

use rustc_hash::FxHashSet;
use visgraph_geometry::{
    angle_from, euclidean_distance, on_segment, orientation, segments_intersect, Orientation,
    Point,
};

use crate::obstacles::ObstacleGraph;
use crate::open_edges::OpenEdges;

/// How much of the circle around the source is swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScanMode {
    /// Angles in `[0, π)` only. Complete only when every other point is
    /// also swept, so each pair is found from one side.
    Half,
    /// The whole circle.
    #[default]
    Full,
}

impl ScanMode {
    #[inline]
    fn includes(self, angle: f64) -> bool {
        match self {
            ScanMode::Half => angle < PI,
            ScanMode::Full => true,
        }
    }
}

/// Returns every point visible from `source`.
///
/// Candidates are all obstacle vertices plus `extra` points, excluding
/// `source` itself. Visibility is blocked by obstacle edges and by chords
/// through the interior of the polygon both endpoints belong to; boundary
/// neighbours of `source` are always visible.
///
/// A `source` lying strictly inside an obstacle edge sees exactly that
/// edge's two endpoints.
pub fn visible_points(
    source: Point,
    obstacles: &ObstacleGraph,
    extra: &[Point],
    mode: ScanMode,
) -> Vec<Point> {
    let tol = obstacles.tolerance();
    let source = obstacles.canonical(source).unwrap_or(source);

    if !obstacles.contains_vertex(source) {
        if let Some(edge) = obstacles.edge_through(source) {
            return [edge.p1, edge.p2]
                .into_iter()
                .filter(|p| mode.includes(angle_from(source, *p)))
                .collect();
        }
    }

    let candidates = sorted_candidates(source, obstacles, extra);

    // Seed with edges crossing the ray toward +x
    let far = Point::new(obstacles.max_x().max(source.x) + 1.0, source.y);
    let mut open = OpenEdges::new(tol);
    for edge in obstacles.edges() {
        if edge.contains(source) {
            continue;
        }
        if segments_intersect(source, far, edge, tol)
            && !on_segment(source, edge.p1, far)
            && !on_segment(source, edge.p2, far)
        {
            open.insert(source, far, *edge);
        }
    }

    let mut visible = Vec::new();
    let mut prev: Option<Point> = None;
    let mut prev_visible = false;

    for (angle, p) in candidates {
        if !mode.includes(angle) {
            break;
        }

        // Edges ending at p close behind the ray
        if !open.is_empty() {
            for edge in obstacles.edges_at(p) {
                if orientation(source, p, edge.adjacent(p), tol) == Orientation::Clockwise {
                    open.delete(source, p, edge);
                }
            }
        }

        let behind_prev = prev.filter(|&q| {
            orientation(source, q, p, tol) == Orientation::Collinear && on_segment(source, q, p)
        });
        let mut is_visible = match behind_prev {
            None => open
                .smallest()
                .map_or(true, |nearest| !segments_intersect(source, p, &nearest, tol)),
            // Same ray as the previous point: visible only through it
            Some(_) if !prev_visible => false,
            Some(q) => {
                !open
                    .iter()
                    .any(|e| !e.contains(q) && segments_intersect(q, p, &e, tol))
                    && !obstacles.chord_crosses_own_polygon(q, p)
            }
        };

        if is_visible && !obstacles.are_adjacent(source, p) {
            is_visible = !obstacles.chord_crosses_own_polygon(source, p);
        }
        if is_visible {
            visible.push(p);
        }

        // Edges starting at p open ahead of the ray
        for edge in obstacles.edges_at(p) {
            if !edge.contains(source)
                && orientation(source, p, edge.adjacent(p), tol) == Orientation::CounterClockwise
            {
                open.insert(source, p, *edge);
            }
        }

        prev = Some(p);
        prev_visible = is_visible;
    }

    visible
}

/// Obstacle vertices and extra points other than `source`, each once,
/// ordered by angle around `source` then by distance.
fn sorted_candidates(
    source: Point,
    obstacles: &ObstacleGraph,
    extra: &[Point],
) -> Vec<(f64, Point)> {
    let mut seen: FxHashSet<Point> = FxHashSet::default();
    let extra = extra
        .iter()
        .map(|p| obstacles.canonical(*p).unwrap_or(*p));

    let mut keyed: Vec<(f64, f64, Point)> = obstacles
        .vertices()
        .iter()
        .copied()
        .chain(extra)
        .filter(|p| *p != source && seen.insert(*p))
        .map(|p| (angle_from(source, p), euclidean_distance(source, p), p))
        .collect();

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    keyed.into_iter().map(|(angle, _, p)| (angle, p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use visgraph_geometry::Tolerance;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn graph(polygons: Vec<Vec<(f64, f64)>>) -> ObstacleGraph {
        ObstacleGraph::from_polygons(polygons, Tolerance::default()).unwrap()
    }

    fn sorted(mut points: Vec<Point>) -> Vec<(f64, f64)> {
        points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        points.into_iter().map(|q| (q.x, q.y)).collect()
    }

    fn two_triangles() -> Vec<Vec<(f64, f64)>> {
        vec![
            vec![(0.0, 1.0), (1.0, 0.0), (2.0, 3.0)],
            vec![(3.0, 2.0), (3.5, 0.5), (4.5, 3.5)],
        ]
    }

    #[test]
    fn collinear_vertices_across_two_polygons() {
        let g = graph(two_triangles());
        let visible = visible_points(p(1.0, 4.0), &g, &[], ScanMode::Full);
        assert_eq!(
            sorted(visible),
            vec![(0.0, 1.0), (2.0, 3.0), (3.0, 2.0), (4.5, 3.5)]
        );
    }

    #[test]
    fn seeded_edges_block_first_candidates() {
        let g = graph(vec![
            vec![(2.0, 5.0), (3.0, 5.0), (2.0, 3.0)],
            vec![(3.0, 2.0), (3.5, 0.5), (4.5, 3.5)],
        ]);
        let visible = visible_points(p(1.0, 4.0), &g, &[], ScanMode::Full);
        assert_eq!(
            sorted(visible),
            vec![(2.0, 3.0), (2.0, 5.0), (3.0, 2.0), (3.5, 0.5)]
        );
    }

    #[test]
    fn collinear_chain_through_reflex_vertex() {
        let g = graph(vec![
            vec![(1.0, 1.0), (2.0, 3.0), (3.0, 1.0), (2.0, 2.0)],
            vec![(2.0, 4.0)],
        ]);
        let visible = visible_points(p(2.0, 1.0), &g, &[], ScanMode::Full);
        assert_eq!(sorted(visible), vec![(1.0, 1.0), (2.0, 2.0), (3.0, 1.0)]);
    }

    #[test]
    fn boundary_neighbours_always_visible() {
        let g = graph(vec![vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]]);
        let visible = visible_points(p(0.0, 0.0), &g, &[], ScanMode::Full);
        // The diagonal runs through the interior
        assert_eq!(sorted(visible), vec![(0.0, 2.0), (2.0, 0.0)]);
    }

    #[test]
    fn point_behind_edge_is_hidden() {
        let g = graph(vec![vec![(2.0, -1.0), (3.0, -1.0), (3.0, 1.0), (2.0, 1.0)]]);
        let extra = [p(6.0, 0.0)];
        let visible = visible_points(p(0.0, 0.0), &g, &extra, ScanMode::Full);
        assert!(!visible.contains(&p(6.0, 0.0)));
        assert!(visible.contains(&p(2.0, 1.0)));
        assert!(visible.contains(&p(2.0, -1.0)));
        assert!(!visible.contains(&p(3.0, 1.0)));
    }

    #[test]
    fn extra_points_are_candidates() {
        let g = graph(vec![vec![(2.0, 2.0), (3.0, 2.0), (3.0, 3.0)]]);
        let extra = [p(0.0, 5.0), p(5.0, 0.0)];
        let visible = visible_points(p(0.0, 0.0), &g, &extra, ScanMode::Full);
        assert!(visible.contains(&p(0.0, 5.0)));
        assert!(visible.contains(&p(5.0, 0.0)));
    }

    #[test]
    fn half_scan_covers_upper_half_plane() {
        let g = graph(vec![vec![(-1.0, 1.0), (1.0, 1.0), (1.0, 2.0)], vec![(0.0, -3.0)]]);
        let half = visible_points(p(0.0, 0.0), &g, &[], ScanMode::Half);
        assert!(half.iter().all(|q| angle_from(p(0.0, 0.0), *q) < PI));
        assert!(!half.contains(&p(0.0, -3.0)));
        let full = visible_points(p(0.0, 0.0), &g, &[], ScanMode::Full);
        assert!(full.contains(&p(0.0, -3.0)));
    }

    #[test]
    fn point_on_edge_sees_only_its_endpoints() {
        let g = graph(vec![
            vec![(0.0, 0.0), (4.0, 0.0), (2.0, 3.0)],
            vec![(10.0, 10.0)],
        ]);
        let visible = visible_points(p(2.0, 0.0), &g, &[p(2.0, -5.0)], ScanMode::Full);
        assert_eq!(sorted(visible), vec![(0.0, 0.0), (4.0, 0.0)]);
    }

    #[test]
    fn source_at_vertex_coordinates_uses_vertex_tag() {
        let g = graph(vec![vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]]);
        // Untagged query point coinciding with a vertex still rejects the diagonal
        let visible = visible_points(Point::new(2.0, 2.0), &g, &[], ScanMode::Full);
        assert!(!visible.contains(&p(0.0, 0.0)));
    }

    #[test]
    fn empty_obstacle_set() {
        let g = graph(vec![]);
        assert!(visible_points(p(0.0, 0.0), &g, &[], ScanMode::Full).is_empty());
        let visible = visible_points(p(0.0, 0.0), &g, &[p(1.0, 1.0)], ScanMode::Full);
        assert_eq!(visible, vec![p(1.0, 1.0)]);
    }
}
