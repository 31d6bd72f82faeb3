//! Delaunay triangulation by incremental Bowyer-Watson insertion
//!
//! Triangles live in an index arena with explicit neighbor links, so point
//! location is a visibility walk and cavity search is a breadth-first search
//! over neighbors. A large enclosing triangle seeds the mesh; its three
//! vertices and every edge touching them are discarded at the end.
//!
//! Inputs whose points all lie on one line (up to a relative tolerance) have no
//! triangles; their triangulation graph is the chain of consecutive points.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use super::{in_circle, orient, Edge};
use crate::types::{BoundingBox, Point};

/// Sentinel for a missing neighbor or unset scratch slot
const NONE: usize = usize::MAX;

/// Half-size of the enclosing triangle, in multiples of the data extent
const SUPER_SCALE: f64 = 50.0;

/// Relative tolerance for treating a point set as collinear
const COLLINEAR_TOLERANCE: f64 = 1e-12;

/// Delaunay triangulation of a point set
///
/// Edges and triangles reference indices of the source slice. Edges are unique,
/// ordered `a < b` and sorted; triangles are counter-clockwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Triangulation {
    num_points: usize,
    edges: Vec<Edge>,
    triangles: Vec<[usize; 3]>,
}

impl Triangulation {
    /// Triangulate `points`
    ///
    /// Exact duplicates are skipped during insertion and end up with no edges.
    pub fn compute(points: &[Point]) -> Self {
        if points.len() < 3 || is_collinear(points) {
            return Self::chain(points);
        }

        let mut mesh = Mesh::new(points);
        for index in insertion_order(points) {
            mesh.insert(index);
        }
        mesh.finish()
    }

    /// Graph of consecutive distinct points along their common line
    fn chain(points: &[Point]) -> Self {
        let mut order: Vec<usize> = (0..points.len()).collect();
        if let (Some(first), Some(last)) = (lex_min(points), lex_max(points)) {
            let (dx, dy) = points[last].sub(&points[first]);
            let project = |p: &Point| (p.x - points[first].x) * dx + (p.y - points[first].y) * dy;
            order.sort_by(|&i, &j| project(&points[i]).total_cmp(&project(&points[j])));
        }
        order.dedup_by(|a, b| points[*a] == points[*b]);

        let mut edges: Vec<Edge> = order
            .windows(2)
            .map(|pair| Edge::between(points, pair[0], pair[1]))
            .collect();
        sort_edges(&mut edges);

        Self {
            num_points: points.len(),
            edges,
            triangles: Vec::new(),
        }
    }

    /// Number of points in the source slice
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Unique edges between source points
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Counter-clockwise triangles between source points
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// True when no triangle exists (fewer than three points or collinear input)
    pub fn is_degenerate(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Neighbor lists per point, each sorted ascending
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.num_points];
        for edge in &self.edges {
            adjacency[edge.a].push(edge.b);
            adjacency[edge.b].push(edge.a);
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
        }
        adjacency
    }
}

/// A mesh triangle; `adj[i]` is the triangle across the edge opposite `v[i]`
#[derive(Debug, Clone, Copy)]
struct Tri {
    v: [usize; 3],
    adj: [usize; 3],
    alive: bool,
}

impl Tri {
    /// Edge opposite `v[i]`, oriented counter-clockwise
    fn edge(&self, i: usize) -> (usize, usize) {
        (self.v[(i + 1) % 3], self.v[(i + 2) % 3])
    }
}

/// Cavity boundary edge `a -> b`, with the triangle outside it and the cavity
/// triangle it came from
#[derive(Debug, Clone, Copy)]
struct BoundaryEdge {
    a: usize,
    b: usize,
    outer: usize,
    old: usize,
}

/// Working state of an incremental triangulation
struct Mesh {
    /// Source points followed by the three enclosing vertices
    coords: Vec<Point>,
    num_real: usize,
    tris: Vec<Tri>,
    last: usize,
    skipped: usize,

    // Scratch buffers reused across insertions
    in_cavity: Vec<bool>,
    cavity: Vec<usize>,
    protected: Vec<usize>,
    boundary: Vec<BoundaryEdge>,
    start_map: Vec<usize>,
    end_map: Vec<usize>,
}

impl Mesh {
    fn new(points: &[Point]) -> Self {
        let bounds = BoundingBox::from_points(points);
        let extent = bounds.width().max(bounds.height());
        let d = if extent > 0.0 { extent } else { 1.0 };
        let cx = (bounds.min[0] + bounds.max[0]) / 2.0;
        let cy = (bounds.min[1] + bounds.max[1]) / 2.0;
        let r = SUPER_SCALE * d;

        let num_real = points.len();
        let mut coords = Vec::with_capacity(num_real + 3);
        coords.extend_from_slice(points);
        coords.push(Point::new(cx - r, cy - r));
        coords.push(Point::new(cx + r, cy - r));
        coords.push(Point::new(cx, cy + r));

        let root = Tri {
            v: [num_real, num_real + 1, num_real + 2],
            adj: [NONE; 3],
            alive: true,
        };

        Self {
            coords,
            num_real,
            tris: vec![root],
            last: 0,
            skipped: 0,
            in_cavity: Vec::new(),
            cavity: Vec::new(),
            protected: Vec::new(),
            boundary: Vec::new(),
            start_map: vec![NONE; num_real + 3],
            end_map: vec![NONE; num_real + 3],
        }
    }

    fn insert(&mut self, index: usize) {
        let p = self.coords[index];

        let Some(seed) = self.locate(&p) else {
            warn!(index, "no triangle contains point, leaving it out of the triangulation");
            self.skipped += 1;
            return;
        };

        let seed_tri = self.tris[seed];
        if seed_tri.v.iter().any(|&v| self.coords[v] == p) {
            self.skipped += 1;
            return;
        }

        self.collect_cavity(seed, &p);
        self.repair_cavity(seed, &p);
        self.retriangulate(index);
    }

    /// Walk from the last created triangle towards `p`
    fn locate(&self, p: &Point) -> Option<usize> {
        let mut t = self.last;
        let max_steps = self.tris.len();

        'walk: for _ in 0..max_steps {
            let tri = &self.tris[t];
            for i in 0..3 {
                let (a, b) = tri.edge(i);
                if orient(&self.coords[a], &self.coords[b], p) < 0.0 {
                    if tri.adj[i] == NONE {
                        break 'walk;
                    }
                    t = tri.adj[i];
                    continue 'walk;
                }
            }
            return Some(t);
        }

        warn!("point location walk did not converge, falling back to a linear scan");
        self.tris.iter().position(|tri| {
            tri.alive
                && (0..3).all(|i| {
                    let (a, b) = tri.edge(i);
                    orient(&self.coords[a], &self.coords[b], p) >= 0.0
                })
        })
    }

    fn circumcircle_contains(&self, t: usize, p: &Point) -> bool {
        let [a, b, c] = self.tris[t].v;
        in_circle(&self.coords[a], &self.coords[b], &self.coords[c], p) > 0.0
    }

    fn mark(&mut self, t: usize) {
        self.in_cavity[t] = true;
        self.cavity.push(t);
    }

    /// Triangles whose circumcircle contains `p`, grown from the seed
    fn collect_cavity(&mut self, seed: usize, p: &Point) {
        self.in_cavity.resize(self.tris.len(), false);
        self.cavity.clear();
        self.protected.clear();

        self.mark(seed);
        self.protected.push(seed);

        // A point on an edge of the seed also splits the triangle across it
        let seed_tri = self.tris[seed];
        for i in 0..3 {
            let (a, b) = seed_tri.edge(i);
            let neighbor = seed_tri.adj[i];
            if neighbor != NONE
                && !self.in_cavity[neighbor]
                && orient(&self.coords[a], &self.coords[b], p) == 0.0
            {
                self.mark(neighbor);
                self.protected.push(neighbor);
            }
        }

        let mut head = 0;
        while head < self.cavity.len() {
            let t = self.cavity[head];
            head += 1;
            for i in 0..3 {
                let neighbor = self.tris[t].adj[i];
                if neighbor == NONE || self.in_cavity[neighbor] {
                    continue;
                }
                if self.circumcircle_contains(neighbor, p) {
                    self.mark(neighbor);
                }
            }
        }
    }

    /// Shrink the cavity until every boundary edge strictly faces `p`
    fn repair_cavity(&mut self, seed: usize, p: &Point) {
        loop {
            let mut removed = false;
            for k in 0..self.cavity.len() {
                let t = self.cavity[k];
                if !self.in_cavity[t] || self.protected.contains(&t) {
                    continue;
                }
                let tri = self.tris[t];
                let hidden = (0..3).any(|i| {
                    let neighbor = tri.adj[i];
                    if neighbor != NONE && self.in_cavity[neighbor] {
                        return false;
                    }
                    let (a, b) = tri.edge(i);
                    orient(&self.coords[a], &self.coords[b], p) <= 0.0
                });
                if hidden {
                    self.in_cavity[t] = false;
                    removed = true;
                }
            }
            if !removed {
                break;
            }
            self.keep_connected(seed);
        }

        let in_cavity = &self.in_cavity;
        self.cavity.retain(|&t| in_cavity[t]);
    }

    /// Drop cavity triangles no longer reachable from the seed
    fn keep_connected(&mut self, seed: usize) {
        let mut reached = vec![seed];
        let mut stack = vec![seed];
        while let Some(t) = stack.pop() {
            for &neighbor in &self.tris[t].adj {
                if neighbor != NONE && self.in_cavity[neighbor] && !reached.contains(&neighbor) {
                    reached.push(neighbor);
                    stack.push(neighbor);
                }
            }
        }
        for &t in &self.cavity {
            if self.in_cavity[t] && !reached.contains(&t) {
                self.in_cavity[t] = false;
            }
        }
    }

    /// Replace the cavity by a fan of triangles around `index`
    fn retriangulate(&mut self, index: usize) {
        self.boundary.clear();
        for &t in &self.cavity {
            let tri = self.tris[t];
            for i in 0..3 {
                let neighbor = tri.adj[i];
                if neighbor != NONE && self.in_cavity[neighbor] {
                    continue;
                }
                let (a, b) = tri.edge(i);
                self.boundary.push(BoundaryEdge {
                    a,
                    b,
                    outer: neighbor,
                    old: t,
                });
            }
        }

        for &t in &self.cavity {
            self.tris[t].alive = false;
            self.in_cavity[t] = false;
        }

        let first = self.tris.len();
        for (k, edge) in self.boundary.iter().enumerate() {
            self.start_map[edge.a] = first + k;
            self.end_map[edge.b] = first + k;
        }

        for (k, edge) in self.boundary.iter().enumerate() {
            let id = first + k;
            self.tris.push(Tri {
                v: [edge.a, edge.b, index],
                adj: [self.start_map[edge.b], self.end_map[edge.a], edge.outer],
                alive: true,
            });
            if edge.outer != NONE {
                for slot in self.tris[edge.outer].adj.iter_mut() {
                    if *slot == edge.old {
                        *slot = id;
                    }
                }
            }
        }

        for edge in &self.boundary {
            self.start_map[edge.a] = NONE;
            self.end_map[edge.b] = NONE;
        }

        self.last = first;
    }

    fn finish(self) -> Triangulation {
        let n = self.num_real;
        let mut pairs: Vec<(usize, usize)> = Vec::new();
        let mut triangles = Vec::new();

        for tri in self.tris.iter().filter(|tri| tri.alive) {
            for i in 0..3 {
                let (a, b) = tri.edge(i);
                if a < n && b < n {
                    pairs.push((a.min(b), a.max(b)));
                }
            }
            if tri.v.iter().all(|&v| v < n) {
                triangles.push(tri.v);
            }
        }

        pairs.sort_unstable();
        pairs.dedup();
        let edges: Vec<Edge> = pairs
            .into_iter()
            .map(|(a, b)| Edge::between(&self.coords, a, b))
            .collect();

        trace!(
            points = n,
            arena = self.tris.len(),
            skipped = self.skipped,
            triangles = triangles.len(),
            "delaunay triangulation complete"
        );

        Triangulation {
            num_points: n,
            edges,
            triangles,
        }
    }
}

/// Serpentine insertion order: horizontal bands by y, alternating x direction
///
/// Consecutive points stay close, which keeps the location walk short.
fn insertion_order(points: &[Point]) -> Vec<usize> {
    let bounds = BoundingBox::from_points(points);
    let bands = ((points.len() as f64).sqrt() / 2.0).ceil().max(1.0) as usize;
    let height = bounds.height();

    let band_of = |p: &Point| -> usize {
        if height <= 0.0 {
            return 0;
        }
        let band = ((p.y - bounds.min[1]) / height * bands as f64).floor() as usize;
        band.min(bands - 1)
    };

    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&i, &j| {
        let (bi, bj) = (band_of(&points[i]), band_of(&points[j]));
        bi.cmp(&bj).then_with(|| {
            let by_x = points[i].x.total_cmp(&points[j].x);
            if bi % 2 == 0 {
                by_x
            } else {
                by_x.reverse()
            }
        })
    });
    order
}

fn lex_min(points: &[Point]) -> Option<usize> {
    (0..points.len()).min_by(|&i, &j| {
        points[i]
            .x
            .total_cmp(&points[j].x)
            .then(points[i].y.total_cmp(&points[j].y))
    })
}

fn lex_max(points: &[Point]) -> Option<usize> {
    (0..points.len()).max_by(|&i, &j| {
        points[i]
            .x
            .total_cmp(&points[j].x)
            .then(points[i].y.total_cmp(&points[j].y))
    })
}

/// All points within a relative tolerance of one line (or all coincident)
fn is_collinear(points: &[Point]) -> bool {
    let (Some(first), Some(last)) = (lex_min(points), lex_max(points)) else {
        return true;
    };
    let a = &points[first];
    let b = &points[last];
    let len_sq = {
        let (dx, dy) = b.sub(a);
        dx * dx + dy * dy
    };
    if len_sq == 0.0 {
        return true;
    }
    points
        .iter()
        .all(|p| orient(a, b, p).abs() <= COLLINEAR_TOLERANCE * len_sq)
}

fn sort_edges(edges: &mut [Edge]) {
    edges.sort_by(|e, f| (e.a, e.b).cmp(&(f.a, f.b)));
}
