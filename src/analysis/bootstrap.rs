//! Deterministic percentile-bootstrap confidence intervals.
//!
//! Effect sizes are reported with a 95% CI obtained by resampling each
//! group independently with replacement and taking the 2.5th and 97.5th
//! percentiles of the resampled estimates. The point estimate always comes
//! from the original samples, never from the resamples.
//!
//! Reproducibility does not depend on execution order: every comparison
//! derives its own stream seed from the configured base seed and a stable
//! comparison identity, so analyzing metrics in parallel or re-running a
//! single comparison yields bit-identical intervals.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::statistics::quantile;

const CI_LOWER_P: f64 = 0.025;
const CI_UPPER_P: f64 = 0.975;

/// A point estimate with its percentile-bootstrap interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapCi {
    /// Estimate computed from the original samples.
    pub point: f64,
    /// 2.5th percentile of the bootstrap distribution.
    pub lower: f64,
    /// 97.5th percentile of the bootstrap distribution.
    pub upper: f64,
    /// Number of resampling iterations performed.
    pub iterations: usize,
}

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Derive a per-comparison RNG seed from the base seed and a stable
/// comparison identity.
///
/// The identity string (metric plus group names) is hashed with FNV-1a and
/// mixed with the base seed and pair index through splitmix64, so distinct
/// comparisons get decorrelated streams while the same comparison is
/// reproducible across runs.
pub fn derive_seed(base_seed: u64, identity: &str, pair_index: usize) -> u64 {
    splitmix64(base_seed ^ fnv1a(identity.as_bytes()) ^ (pair_index as u64).rotate_left(32))
}

/// Percentile-bootstrap CI for a two-sample estimator.
///
/// Each iteration resamples `a` and `b` independently with replacement
/// (preserving group sizes) and re-evaluates `estimator`. Non-finite
/// resample estimates are discarded; if every iteration degenerates, the
/// interval collapses onto the point estimate.
pub fn bootstrap_ci<F>(
    a: &[f64],
    b: &[f64],
    estimator: F,
    iterations: usize,
    seed: u64,
) -> BootstrapCi
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    let point = estimator(a, b);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let mut resample_a = vec![0.0; a.len()];
    let mut resample_b = vec![0.0; b.len()];
    let mut estimates = Vec::with_capacity(iterations);

    for _ in 0..iterations {
        for slot in resample_a.iter_mut() {
            *slot = a[rng.random_range(0..a.len())];
        }
        for slot in resample_b.iter_mut() {
            *slot = b[rng.random_range(0..b.len())];
        }
        let estimate = estimator(&resample_a, &resample_b);
        if estimate.is_finite() {
            estimates.push(estimate);
        }
    }

    if estimates.is_empty() {
        return BootstrapCi { point, lower: point, upper: point, iterations };
    }

    estimates.sort_by(|x, y| x.total_cmp(y));
    BootstrapCi {
        point,
        lower: quantile(&estimates, CI_LOWER_P),
        upper: quantile(&estimates, CI_UPPER_P),
        iterations,
    }
}
