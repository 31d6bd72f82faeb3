//! Euclidean minimum spanning tree over a triangulation
//!
//! The Euclidean MST is a subgraph of the Delaunay triangulation, so Prim's
//! algorithm only has to consider triangulation edges. Disconnected input
//! yields a spanning forest; isolated points keep degree zero.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use scagnostics_stats::SortedSample;
use serde::{Deserialize, Serialize};

use super::Edge;

/// Minimum spanning tree (or forest) of a point set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanningTree {
    num_points: usize,
    edges: Vec<Edge>,
    degrees: Vec<usize>,
    /// Incident edge indices per point
    adjacency: Vec<Vec<usize>>,
    total_length: f64,
}

/// Heap entry; the shortest edge pops first, ties by lower edge index
#[derive(Debug, Clone, Copy)]
struct Candidate {
    length: f64,
    edge: usize,
    to: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .length
            .total_cmp(&self.length)
            .then_with(|| other.edge.cmp(&self.edge))
    }
}

impl SpanningTree {
    /// Prim's algorithm over `graph_edges` on `num_points` vertices
    pub fn compute(num_points: usize, graph_edges: &[Edge]) -> Self {
        let mut incident: Vec<Vec<usize>> = vec![Vec::new(); num_points];
        for (k, edge) in graph_edges.iter().enumerate() {
            incident[edge.a].push(k);
            incident[edge.b].push(k);
        }

        let mut in_tree = vec![false; num_points];
        let mut heap = BinaryHeap::new();
        let mut edges = Vec::with_capacity(num_points.saturating_sub(1));

        for root in 0..num_points {
            if in_tree[root] {
                continue;
            }
            in_tree[root] = true;
            push_incident(&mut heap, &incident[root], graph_edges, root, &in_tree);

            while let Some(candidate) = heap.pop() {
                if in_tree[candidate.to] {
                    continue;
                }
                in_tree[candidate.to] = true;
                edges.push(graph_edges[candidate.edge]);
                push_incident(
                    &mut heap,
                    &incident[candidate.to],
                    graph_edges,
                    candidate.to,
                    &in_tree,
                );
            }
        }

        Self::from_edges(num_points, edges)
    }

    /// Build a tree from known edges
    pub fn from_edges(num_points: usize, edges: Vec<Edge>) -> Self {
        let mut degrees = vec![0; num_points];
        let mut adjacency = vec![Vec::new(); num_points];
        for (k, edge) in edges.iter().enumerate() {
            degrees[edge.a] += 1;
            degrees[edge.b] += 1;
            adjacency[edge.a].push(k);
            adjacency[edge.b].push(k);
        }
        let total_length = edges.iter().map(|e| e.length).sum();

        Self {
            num_points,
            edges,
            degrees,
            adjacency,
            total_length,
        }
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Tree edges in the order Prim's algorithm added them
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of tree edges incident to each point
    pub fn degrees(&self) -> &[usize] {
        &self.degrees
    }

    /// Indices into [`SpanningTree::edges`] incident to `v`
    pub fn incident(&self, v: usize) -> &[usize] {
        &self.adjacency[v]
    }

    /// Sum of edge lengths
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Edge lengths as a sorted sample for quantile queries
    pub fn sorted_lengths(&self) -> SortedSample {
        SortedSample::from_vec(self.edges.iter().map(|e| e.length).collect())
    }

    /// Points touched by at least one edge
    pub fn connected_points(&self) -> usize {
        self.degrees.iter().filter(|&&d| d > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

fn push_incident(
    heap: &mut BinaryHeap<Candidate>,
    incident: &[usize],
    graph_edges: &[Edge],
    from: usize,
    in_tree: &[bool],
) {
    for &k in incident {
        let edge = &graph_edges[k];
        let to = edge.other(from);
        if !in_tree[to] {
            heap.push(Candidate {
                length: edge.length,
                edge: k,
                to,
            });
        }
    }
}
