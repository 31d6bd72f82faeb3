//! The nine scagnostic measures
//!
//! Every measure is a closed-form ratio over the geometric graphs, clamped to
//! [0, 1]. A zero denominator or an empty graph yields 0.0 rather than NaN.
//!
//! Lengths are measured in unit-square coordinates. `q(p)` denotes the index
//! quantile of the sorted MST edge lengths.

use std::collections::BTreeMap;
use std::fmt;
use std::f64::consts::PI;

use scagnostics_stats::{spearman, SortedSample};
use serde::{Deserialize, Serialize};

use crate::geometry::{ConvexHull, SpanningTree};
use crate::prune::{AlphaShape, PrunedTree};
use crate::types::{total_weight, WeightedPoint};

/// Area or length below which a shape counts as degenerate
const DEGENERATE_EPSILON: f64 = 1e-12;

/// Cosine below which two MST edges at a vertex count as a straight run
const STRIATION_COSINE: f64 = -0.75;

/// One of the nine measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Outlying,
    Skewed,
    Clumpy,
    Sparse,
    Striated,
    Convex,
    Skinny,
    Stringy,
    Monotonic,
}

impl Metric {
    /// All measures in output order
    pub const ALL: [Metric; 9] = [
        Metric::Outlying,
        Metric::Skewed,
        Metric::Clumpy,
        Metric::Sparse,
        Metric::Striated,
        Metric::Convex,
        Metric::Skinny,
        Metric::Stringy,
        Metric::Monotonic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Outlying => "outlying",
            Metric::Skewed => "skewed",
            Metric::Clumpy => "clumpy",
            Metric::Sparse => "sparse",
            Metric::Striated => "striated",
            Metric::Convex => "convex",
            Metric::Skinny => "skinny",
            Metric::Stringy => "stringy",
            Metric::Monotonic => "monotonic",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values of the nine measures, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub outlying: f64,
    pub skewed: f64,
    pub clumpy: f64,
    pub sparse: f64,
    pub striated: f64,
    pub convex: f64,
    pub skinny: f64,
    pub stringy: f64,
    pub monotonic: f64,
}

impl Metrics {
    /// All measures at their 0.0 sentinel
    pub fn zeros() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Outlying => self.outlying,
            Metric::Skewed => self.skewed,
            Metric::Clumpy => self.clumpy,
            Metric::Sparse => self.sparse,
            Metric::Striated => self.striated,
            Metric::Convex => self.convex,
            Metric::Skinny => self.skinny,
            Metric::Stringy => self.stringy,
            Metric::Monotonic => self.monotonic,
        }
    }

    /// `(metric, value)` pairs in output order
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }

    /// Name to value mapping with exactly the nine keys
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        self.iter().map(|(m, v)| (m.name(), v)).collect()
    }

    /// Every value is finite
    pub fn is_finite(&self) -> bool {
        self.iter().all(|(_, v)| v.is_finite())
    }
}

/// Geometry and statistics the measures are computed from
#[derive(Debug, Clone, Copy)]
pub struct MetricInputs<'a> {
    /// Geometry-stage points, unit square
    pub points: &'a [WeightedPoint],
    pub hull: &'a ConvexHull,
    pub mst: &'a SpanningTree,
    pub pruned: &'a PrunedTree,
    pub alpha: &'a AlphaShape,
    /// Raw coordinates of the retained observations
    pub retained_x: &'a [f64],
    pub retained_y: &'a [f64],
}

impl Metrics {
    /// Compute all nine measures
    pub fn compute(inputs: &MetricInputs<'_>) -> Self {
        let monotonic = monotonic(inputs.retained_x, inputs.retained_y);
        if inputs.points.len() < 2 || inputs.mst.is_empty() {
            return Self {
                monotonic,
                ..Self::zeros()
            };
        }

        let c = sample_size_weight(inputs.retained_x.len());
        let lengths = inputs.mst.sorted_lengths();

        Self {
            outlying: outlying(inputs.pruned),
            skewed: skewed(&lengths, c),
            clumpy: clumpy(inputs.points, inputs.mst, inputs.pruned),
            sparse: sparse(&lengths, c),
            striated: striated(inputs.points, inputs.mst),
            convex: convex(inputs.alpha, inputs.hull, c),
            skinny: skinny(inputs.alpha, inputs.hull),
            stringy: stringy(inputs.mst),
            monotonic,
        }
    }
}

/// Damping weight for small samples: `0.7 + 0.3 / (1 + (n / 500)^2)`
pub fn sample_size_weight(n: usize) -> f64 {
    let r = n as f64 / 500.0;
    0.7 + 0.3 / (1.0 + r * r)
}

/// Clamp into [0, 1]; NaN, infinities and negative zero map to `0.0`
fn unit(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value.min(1.0)
    } else {
        0.0
    }
}

/// Share of MST length in pruned runt edges
pub fn outlying(pruned: &PrunedTree) -> f64 {
    let total = pruned.total_length();
    if total <= 0.0 {
        return 0.0;
    }
    unit(pruned.removed_length() / total)
}

/// `1 - c * (1 - (q90 - q50) / (q90 - q10))`
pub fn skewed(lengths: &SortedSample, c: f64) -> f64 {
    let (Some(q10), Some(q50), Some(q90)) = (
        lengths.quantile(0.1),
        lengths.quantile(0.5),
        lengths.quantile(0.9),
    ) else {
        return 0.0;
    };
    let spread = q90 - q10;
    if spread <= 0.0 {
        return 0.0;
    }
    let s = (q90 - q50) / spread;
    unit(1.0 - c * (1.0 - s))
}

/// Largest runt-cluster contrast over the pruned tree
///
/// Cutting a kept edge `e` splits the tree; on each side only edges shorter
/// than `e` are followed. The lighter side is the runt. Its contrast is
/// `min(1, 2 * w_runt / W) * (1 - longest_runt_edge / |e|)`.
pub fn clumpy(points: &[WeightedPoint], mst: &SpanningTree, pruned: &PrunedTree) -> f64 {
    let total = total_weight(points) as f64;
    if total <= 0.0 {
        return 0.0;
    }

    let edges = mst.edges();
    let mut best: f64 = 0.0;

    for k in pruned.kept_edges() {
        let cut = &edges[k];
        if cut.length <= 0.0 {
            continue;
        }
        let side_a = gather_side(points, mst, pruned, cut.a, k);
        let side_b = gather_side(points, mst, pruned, cut.b, k);

        let runt = if side_b.weight < side_a.weight
            || (side_b.weight == side_a.weight && side_b.nodes < side_a.nodes)
        {
            side_b
        } else {
            side_a
        };
        if runt.nodes < 2 {
            continue;
        }

        let mass = (2.0 * runt.weight as f64 / total).min(1.0);
        let value = mass * (1.0 - runt.longest / cut.length);
        best = best.max(value);
    }

    unit(best)
}

/// Component reached from one endpoint of a cut edge
#[derive(Debug, Clone, Copy)]
struct Side {
    weight: u64,
    nodes: usize,
    longest: f64,
}

fn gather_side(
    points: &[WeightedPoint],
    mst: &SpanningTree,
    pruned: &PrunedTree,
    start: usize,
    cut: usize,
) -> Side {
    let edges = mst.edges();
    let limit = edges[cut].length;

    let mut side = Side {
        weight: points[start].weight,
        nodes: 1,
        longest: 0.0,
    };
    let mut stack = vec![(start, cut)];
    while let Some((v, via)) = stack.pop() {
        for &k in mst.incident(v) {
            if k == via || !pruned.is_kept(k) || edges[k].length >= limit {
                continue;
            }
            // Tree edges: each neighbor is reached exactly once
            let next = edges[k].other(v);
            side.weight += points[next].weight;
            side.nodes += 1;
            side.longest = side.longest.max(edges[k].length);
            stack.push((next, k));
        }
    }
    side
}

/// `c * min(q90, 1)`
pub fn sparse(lengths: &SortedSample, c: f64) -> f64 {
    match lengths.quantile(0.9) {
        Some(q90) => unit(c * q90.min(1.0)),
        None => 0.0,
    }
}

/// Share of degree-2 MST vertices whose edges run nearly straight through
pub fn striated(points: &[WeightedPoint], mst: &SpanningTree) -> f64 {
    let edges = mst.edges();
    if edges.is_empty() {
        return 0.0;
    }

    let straight = (0..mst.num_points())
        .filter(|&v| mst.degrees()[v] == 2)
        .filter(|&v| {
            let incident = mst.incident(v);
            let origin = &points[v].point;
            let u = points[edges[incident[0]].other(v)].point.sub(origin);
            let w = points[edges[incident[1]].other(v)].point.sub(origin);
            let norms = u.0.hypot(u.1) * w.0.hypot(w.1);
            norms > 0.0 && (u.0 * w.0 + u.1 * w.1) / norms < STRIATION_COSINE
        })
        .count();

    unit(straight as f64 / edges.len() as f64)
}

/// `c * alpha_area / hull_area`
pub fn convex(alpha: &AlphaShape, hull: &ConvexHull, c: f64) -> f64 {
    if hull.area() <= DEGENERATE_EPSILON {
        return 0.0;
    }
    unit(c * alpha.area() / hull.area())
}

/// `1 - sqrt(4 * pi * A) / P` over the alpha shape, or the hull when the
/// alpha shape is empty
pub fn skinny(alpha: &AlphaShape, hull: &ConvexHull) -> f64 {
    let (area, perimeter) = if alpha.area() > 0.0 {
        (alpha.area(), alpha.perimeter())
    } else {
        (hull.area(), hull.perimeter())
    };
    if perimeter <= DEGENERATE_EPSILON {
        return 0.0;
    }
    unit(1.0 - (4.0 * PI * area).sqrt() / perimeter)
}

/// Share of MST vertices with degree at most two
pub fn stringy(mst: &SpanningTree) -> f64 {
    let vertices = mst.connected_points();
    if vertices == 0 {
        return 0.0;
    }
    let thin = mst.degrees().iter().filter(|&&d| d == 1 || d == 2).count();
    unit(thin as f64 / vertices as f64)
}

/// Squared Spearman correlation; 0 when either variable is constant
pub fn monotonic(x: &[f64], y: &[f64]) -> f64 {
    spearman(x, y).map_or(0.0, |rho| unit(rho * rho))
}
