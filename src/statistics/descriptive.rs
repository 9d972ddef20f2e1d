//! Descriptive statistics over in-memory samples.
//!
//! All functions assume the caller has already validated that the input is
//! non-empty and finite (group construction does this once); they are pure
//! and allocate at most one sorted copy.

/// Arithmetic mean.
///
/// # Panics
///
/// Panics if `data` is empty.
pub fn mean(data: &[f64]) -> f64 {
    assert!(!data.is_empty(), "mean of empty slice");
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample variance with the n−1 denominator.
///
/// Returns 0.0 for a single observation.
pub fn sample_variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / (n - 1) as f64
}

/// Sample standard deviation with the n−1 denominator.
pub fn sample_std_dev(data: &[f64]) -> f64 {
    sample_variance(data).sqrt()
}

/// Median via a sorted copy.
///
/// # Panics
///
/// Panics if `data` is empty.
pub fn median(data: &[f64]) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    quantile(&sorted, 0.5)
}

/// Quantile of a sorted slice using linear interpolation.
///
/// This is the R-7 definition (the numpy default): for probability `p` the
/// target position is `h = (n-1)·p` and the result interpolates between the
/// surrounding order statistics.
///
/// # Panics
///
/// Panics if `sorted` is empty or `p` is outside [0, 1].
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    assert!(!sorted.is_empty(), "quantile of empty slice");
    assert!((0.0..=1.0).contains(&p), "quantile probability must be in [0, 1]");

    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = h - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Fisher-Pearson coefficient of skewness, g₁ = m₃ / m₂^(3/2).
///
/// Uses the biased moment estimator (the same convention as scipy's default
/// `skew`). Returns 0.0 when the second central moment vanishes, so constant
/// samples classify as symmetric rather than propagating NaN.
pub fn skewness(data: &[f64]) -> f64 {
    let n = data.len() as f64;
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let m2 = data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / n;
    if m2 <= 0.0 {
        return 0.0;
    }
    let m3 = data.iter().map(|&x| (x - m).powi(3)).sum::<f64>() / n;
    m3 / m2.powf(1.5)
}
