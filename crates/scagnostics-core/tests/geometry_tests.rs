//! Structural properties of the hull, triangulation and spanning tree

mod common;

use common::generators::SimpleRng;
use proptest::prelude::*;
use scagnostics_core::geometry::{in_circle, orient};
use scagnostics_core::{dedupe, Geometry, Point};

fn unique_points(coords: &[(f64, f64)]) -> Vec<Point> {
    let points: Vec<Point> = coords.iter().map(|&c| Point::from(c)).collect();
    dedupe(&points).0.into_iter().map(|wp| wp.point).collect()
}

fn find(parent: &mut [usize], v: usize) -> usize {
    let mut root = v;
    while parent[root] != root {
        root = parent[root];
    }
    parent[v] = root;
    root
}

/// Union-find check that `edges` contain no cycle
fn is_acyclic(num_points: usize, edges: &[(usize, usize)]) -> bool {
    let mut parent: Vec<usize> = (0..num_points).collect();
    for &(a, b) in edges {
        let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
        if ra == rb {
            return false;
        }
        parent[ra] = rb;
    }
    true
}

#[test]
fn test_random_cloud_structures() {
    let mut rng = SimpleRng::new(2024);
    let points: Vec<Point> = (0..400)
        .map(|_| Point::new(rng.next_f64(), rng.next_f64()))
        .collect();
    let geometry = Geometry::build(&points);

    let n = points.len();
    let h = geometry.hull.vertices().len();
    // Euler bounds for a planar triangulation with `h` hull vertices
    let triangles = geometry.triangulation.triangles().len();
    let edges = geometry.triangulation.edges().len();
    assert!(triangles <= 2 * n - 2 - h);
    assert!(triangles > 2 * n - 2 - h - 10);
    assert!(edges <= 3 * n - 3 - h);
    assert_eq!(geometry.mst.edges().len(), n - 1);
}

#[test]
fn test_clustered_cloud_mst_spans() {
    let mut rng = SimpleRng::new(77);
    let mut points = Vec::new();
    for center in [(0.1, 0.1), (0.9, 0.2), (0.5, 0.95)] {
        for _ in 0..60 {
            points.push(Point::new(
                center.0 + 0.02 * rng.next_gaussian(),
                center.1 + 0.02 * rng.next_gaussian(),
            ));
        }
    }
    let geometry = Geometry::build(&points);
    assert_eq!(geometry.mst.edges().len(), points.len() - 1);
    assert_eq!(geometry.mst.connected_points(), points.len());
}

fn coords_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.0f64..1.0, 0.0f64..1.0), 3..80)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_hull_contains_every_point(coords in coords_strategy()) {
        let points = unique_points(&coords);
        let geometry = Geometry::build(&points);
        for p in &points {
            prop_assert!(geometry.hull.contains(&points, p, 1e-9));
        }
    }

    #[test]
    fn prop_hull_is_convex_ccw(coords in coords_strategy()) {
        let points = unique_points(&coords);
        let hull = Geometry::build(&points).hull;
        let vertices = hull.vertices();
        if vertices.len() >= 3 {
            for k in 0..vertices.len() {
                let a = &points[vertices[k]];
                let b = &points[vertices[(k + 1) % vertices.len()]];
                let c = &points[vertices[(k + 2) % vertices.len()]];
                prop_assert!(orient(a, b, c) > 0.0);
            }
        }
    }

    #[test]
    fn prop_mst_is_spanning_tree_of_triangulation(coords in coords_strategy()) {
        let points = unique_points(&coords);
        let geometry = Geometry::build(&points);
        let mst = &geometry.mst;
        let tri_edges: Vec<(usize, usize)> =
            geometry.triangulation.edges().iter().map(|e| (e.a, e.b)).collect();
        let mst_edges: Vec<(usize, usize)> = mst.edges().iter().map(|e| (e.a, e.b)).collect();

        prop_assert_eq!(mst_edges.len(), points.len() - 1);
        prop_assert!(is_acyclic(points.len(), &mst_edges));
        for edge in &mst_edges {
            prop_assert!(tri_edges.binary_search(edge).is_ok());
        }
    }

    #[test]
    fn prop_delaunay_empty_circumcircles(coords in coords_strategy()) {
        let points = unique_points(&coords);
        let geometry = Geometry::build(&points);
        for &[a, b, c] in geometry.triangulation.triangles() {
            for (k, p) in points.iter().enumerate() {
                if k == a || k == b || k == c {
                    continue;
                }
                prop_assert!(in_circle(&points[a], &points[b], &points[c], p) <= 1e-9);
            }
        }
    }
}
