//! Secondary graphs derived from the spanning tree and the triangulation
//!
//! - [`PrunedTree`]: the MST with long "runt" leaves stripped, round by round
//! - [`AlphaShape`]: triangulation edges and triangles below a radius scale
//!   taken from the MST, with area and boundary length

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::PruningConfig;
use crate::geometry::{circumradius, triangle_area, SpanningTree, Triangulation};
use crate::types::Point;

/// Spanning tree with runt leaves removed
///
/// A leaf edge is a runt when it is much longer than every other edge still
/// attached at its join and longer than the median tree edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrunedTree {
    /// Per MST edge: still part of the pruned tree
    kept: Vec<bool>,
    removed_length: f64,
    total_length: f64,
    rounds: usize,
}

impl PrunedTree {
    pub fn compute(mst: &SpanningTree, config: &PruningConfig) -> Self {
        let edges = mst.edges();
        let mut kept = vec![true; edges.len()];
        let mut degrees = mst.degrees().to_vec();
        let mut removed_length = 0.0;
        let mut rounds = 0;

        let Some(median) = mst.sorted_lengths().median() else {
            return Self {
                kept,
                removed_length,
                total_length: mst.total_length(),
                rounds,
            };
        };

        while rounds < config.max_runt_depth {
            let mut runts = Vec::new();
            for (k, edge) in edges.iter().enumerate() {
                if !kept[k] || edge.length <= median {
                    continue;
                }
                let is_runt = [(edge.a, edge.b), (edge.b, edge.a)]
                    .into_iter()
                    .filter(|&(leaf, _)| degrees[leaf] == 1)
                    .any(|(_, join)| {
                        let longest_sibling = mst
                            .incident(join)
                            .iter()
                            .filter(|&&j| j != k && kept[j])
                            .map(|&j| edges[j].length)
                            .reduce(f64::max);
                        match longest_sibling {
                            Some(longest) => edge.length > config.runt_sibling_ratio * longest,
                            None => false,
                        }
                    });
                if is_runt {
                    runts.push(k);
                }
            }

            if runts.is_empty() {
                break;
            }
            rounds += 1;
            for k in runts {
                let edge = &edges[k];
                kept[k] = false;
                degrees[edge.a] -= 1;
                degrees[edge.b] -= 1;
                removed_length += edge.length;
            }
        }

        trace!(
            rounds,
            removed = kept.iter().filter(|&&k| !k).count(),
            removed_length,
            "pruned runt edges"
        );

        Self {
            kept,
            removed_length,
            total_length: mst.total_length(),
            rounds,
        }
    }

    /// Whether MST edge `k` survived pruning
    pub fn is_kept(&self, k: usize) -> bool {
        self.kept.get(k).copied().unwrap_or(false)
    }

    /// Indices of surviving MST edges
    pub fn kept_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.kept.iter().enumerate().filter(|(_, &k)| k).map(|(i, _)| i)
    }

    /// Indices of removed runt edges
    pub fn removed_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.kept.iter().enumerate().filter(|(_, &k)| !k).map(|(i, _)| i)
    }

    /// Total length of removed runt edges
    pub fn removed_length(&self) -> f64 {
        self.removed_length
    }

    /// Total length of the unpruned tree
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Number of rounds that removed something
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

/// Alpha shape of a triangulation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlphaShape {
    alpha: f64,
    /// Triangulation edge indices no longer than `2 * alpha`
    edges: Vec<usize>,
    /// Triangles with circumradius at most `alpha`
    triangles: Vec<[usize; 3]>,
    area: f64,
    perimeter: f64,
}

impl AlphaShape {
    pub fn compute(
        points: &[Point],
        triangulation: &Triangulation,
        mst: &SpanningTree,
        config: &PruningConfig,
    ) -> Self {
        let quantile = mst
            .sorted_lengths()
            .quantile(config.alpha_percentile)
            .unwrap_or(0.0);
        let alpha = config.alpha_cap.map_or(quantile, |cap| quantile.min(cap));

        let edges: Vec<usize> = triangulation
            .edges()
            .iter()
            .enumerate()
            .filter(|(_, e)| e.length <= 2.0 * alpha)
            .map(|(k, _)| k)
            .collect();

        let triangles: Vec<[usize; 3]> = triangulation
            .triangles()
            .iter()
            .copied()
            .filter(|&[a, b, c]| circumradius(&points[a], &points[b], &points[c]) <= alpha)
            .collect();

        let area = triangles.iter().fold(0.0, |sum, &[a, b, c]| {
            sum + triangle_area(&points[a], &points[b], &points[c])
        });

        // Boundary edges belong to exactly one shape triangle
        let mut uses: BTreeMap<(usize, usize), usize> = BTreeMap::new();
        for &[a, b, c] in &triangles {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *uses.entry((u.min(v), u.max(v))).or_insert(0) += 1;
            }
        }
        let perimeter = uses
            .iter()
            .filter(|(_, &count)| count == 1)
            .fold(0.0, |sum, (&(u, v), _)| sum + points[u].distance(&points[v]));

        trace!(
            alpha,
            edges = edges.len(),
            triangles = triangles.len(),
            area,
            perimeter,
            "built alpha shape"
        );

        Self {
            alpha,
            edges,
            triangles,
            area,
            perimeter,
        }
    }

    /// Radius scale of the shape
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Sum of triangle areas
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Length of the shape boundary
    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    /// True when no triangle passed the radius test
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}
