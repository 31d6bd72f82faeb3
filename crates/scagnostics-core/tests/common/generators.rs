//! Seeded synthetic point clouds
//!
//! Every generator is deterministic in its seed so failures reproduce.

#![allow(dead_code)]

/// SplitMix-style generator; no external RNG needed for fixtures
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(0x9E3779B97F4A7C15),
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64)
    }

    /// Standard normal via Box-Muller
    pub fn next_gaussian(&mut self) -> f64 {
        let u1 = self.next_f64().max(1e-10);
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

pub type Cloud = (Vec<f64>, Vec<f64>);

/// Independent uniform x and y
pub fn uniform(n: usize, seed: u64) -> Cloud {
    let mut rng = SimpleRng::new(seed);
    (0..n).map(|_| (rng.next_f64(), rng.next_f64())).unzip()
}

/// Perfectly correlated line `y = 2x + 1`
pub fn line(n: usize) -> Cloud {
    (0..n)
        .map(|i| {
            let x = i as f64;
            (x, 2.0 * x + 1.0)
        })
        .unzip()
}

/// Gaussian blob around `(cx, cy)`
pub fn cluster(n: usize, cx: f64, cy: f64, spread: f64, seed: u64) -> Cloud {
    let mut rng = SimpleRng::new(seed);
    (0..n)
        .map(|_| {
            (
                cx + spread * rng.next_gaussian(),
                cy + spread * rng.next_gaussian(),
            )
        })
        .unzip()
}

/// Two tight blobs far apart
pub fn two_clusters(n_each: usize, seed: u64) -> Cloud {
    let (mut x, mut y) = cluster(n_each, 0.0, 0.0, 0.05, seed);
    let (x2, y2) = cluster(n_each, 10.0, 10.0, 0.05, seed + 1);
    x.extend(x2);
    y.extend(y2);
    (x, y)
}

/// Points `(i, i * slope)`
pub fn collinear(n: usize, slope: f64) -> Cloud {
    (0..n).map(|i| (i as f64, i as f64 * slope)).unzip()
}

/// A unit-spread cluster at the origin plus `n_outliers` points on a circle
/// of radius 20, evenly spaced in angle
pub fn cluster_with_outliers(n_cluster: usize, n_outliers: usize, seed: u64) -> Cloud {
    let (mut x, mut y) = cluster(n_cluster, 0.0, 0.0, 1.0, seed);
    for k in 0..n_outliers {
        let angle = std::f64::consts::FRAC_PI_2
            + 2.0 * std::f64::consts::PI * k as f64 / n_outliers as f64;
        x.push(20.0 * angle.cos());
        y.push(20.0 * angle.sin());
    }
    (x, y)
}

/// Integer lattice points `(u, v)` with `|u|, |v| <= reach` accepted by `keep`
///
/// With `diagonal` each point maps to `(u - v, u + v)`, turning the pattern
/// by 45 degrees so that an elongated shape stays elongated after per-axis
/// normalization.
pub fn lattice(reach: i32, diagonal: bool, keep: impl Fn(f64, f64) -> bool) -> Cloud {
    let mut cloud: Cloud = (Vec::new(), Vec::new());
    for u in -reach..=reach {
        for v in -reach..=reach {
            let (u, v) = (u as f64, v as f64);
            if !keep(u, v) {
                continue;
            }
            let (x, y) = if diagonal { (u - v, u + v) } else { (u, v) };
            cloud.0.push(x);
            cloud.1.push(y);
        }
    }
    cloud
}
