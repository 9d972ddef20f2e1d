//! Effect-size estimators and their bootstrap intervals.
//!
//! The measure is dictated by the selected test family, never chosen
//! independently: parametric tests report Cohen's d (pooled variance for
//! the equal-variance tests, average variance for the Welch variants) and
//! the rank-based tests report Cliff's delta. Mixing, say, Cohen's d with a
//! Mann-Whitney result would reintroduce exactly the normality assumption
//! the test selection just rejected.
//!
//! # References
//!
//! - Cohen (1988). Statistical Power Analysis for the Behavioral Sciences.
//! - Cliff (1993). "Dominance statistics: ordinal analyses to answer
//!   ordinal questions". Psychological Bulletin, 114(3), 494–509.

use crate::analysis::bootstrap::{bootstrap_ci, derive_seed};
use crate::config::Config;
use crate::error::AnalysisError;
use crate::profile::SampleGroup;
use crate::result::EffectSizeResult;
use crate::statistics::{mean, sample_variance};
use crate::types::{EffectSizeMeasure, TestType};

/// Cohen's d with the pooled-variance denominator.
///
/// Returns 0.0 when the pooled variance vanishes; identical groups have no
/// standardized difference and bootstrap resamples must stay finite.
pub fn cohens_d_pooled(a: &[f64], b: &[f64]) -> f64 {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let pooled_var =
        ((n1 - 1.0) * sample_variance(a) + (n2 - 1.0) * sample_variance(b)) / (n1 + n2 - 2.0);
    if pooled_var < 1e-300 {
        return 0.0;
    }
    (mean(a) - mean(b)) / pooled_var.sqrt()
}

/// Cohen's d with the average-variance denominator, √((s₁²+s₂²)/2).
///
/// Companion to the Welch tests: it does not assume a common variance, so
/// the group with more spread does not dominate the standardizer through
/// its sample size.
pub fn cohens_d_average_variance(a: &[f64], b: &[f64]) -> f64 {
    let avg_var = (sample_variance(a) + sample_variance(b)) / 2.0;
    if avg_var < 1e-300 {
        return 0.0;
    }
    (mean(a) - mean(b)) / avg_var.sqrt()
}

/// Cliff's delta: P(a > b) − P(a < b) over all cross-group pairs.
///
/// Ranges over [−1, 1]; ±1 means complete dominance of one group. Ties
/// contribute zero.
pub fn cliffs_delta(a: &[f64], b: &[f64]) -> f64 {
    let mut more = 0i64;
    let mut less = 0i64;
    for &x in a {
        for &y in b {
            if x > y {
                more += 1;
            } else if x < y {
                less += 1;
            }
        }
    }
    (more - less) as f64 / (a.len() * b.len()) as f64
}

/// Eta-squared for a one-way layout: SS_between / SS_total.
pub fn eta_squared(groups: &[&[f64]]) -> f64 {
    let total_n: usize = groups.iter().map(|g| g.len()).sum();
    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / total_n as f64;

    let ss_between: f64 = groups
        .iter()
        .map(|g| {
            let gm = mean(g);
            g.len() as f64 * (gm - grand_mean) * (gm - grand_mean)
        })
        .sum();
    let ss_total: f64 = groups
        .iter()
        .flat_map(|g| g.iter())
        .map(|&x| (x - grand_mean) * (x - grand_mean))
        .sum();

    if ss_total < 1e-300 {
        return 0.0;
    }
    (ss_between / ss_total).clamp(0.0, 1.0)
}

/// Cohen's f from eta-squared: f = √(η² / (1 − η²)).
pub fn cohens_f(eta_sq: f64) -> f64 {
    let eta_sq = eta_sq.clamp(0.0, 1.0 - 1e-12);
    (eta_sq / (1.0 - eta_sq)).sqrt()
}

/// The effect estimator aligned with a two-group test.
fn estimator_for(test_type: TestType) -> fn(&[f64], &[f64]) -> f64 {
    match test_type {
        TestType::StudentT | TestType::Anova => cohens_d_pooled,
        TestType::WelchT | TestType::WelchAnova => cohens_d_average_variance,
        TestType::MannWhitney | TestType::KruskalWallis => cliffs_delta,
    }
}

/// Compute the effect size for one comparison, with its bootstrap CI.
///
/// `pair_index` is the comparison's position in the metric's pairwise
/// family and feeds seed derivation so each comparison has its own
/// reproducible resampling stream. When the groups are exactly equal the
/// effect is reported as zero with a zero-width interval and no resampling.
///
/// # Errors
///
/// Propagates [`AnalysisError::InvalidConfidenceInterval`] if the bootstrap
/// interval fails to contain the point estimate.
pub fn compute_effect_size(
    metric: &str,
    a: &SampleGroup,
    b: &SampleGroup,
    test_type: TestType,
    exact_equality: bool,
    config: &Config,
    pair_index: usize,
) -> Result<EffectSizeResult, AnalysisError> {
    let measure = EffectSizeMeasure::for_test(test_type);
    let comparison = format!("{metric}/{}-vs-{}", a.name, b.name);

    if exact_equality {
        return EffectSizeResult::exact_equality(measure, test_type);
    }

    let seed = derive_seed(config.base_seed, &comparison, pair_index);
    let estimator = estimator_for(test_type);
    let ci = bootstrap_ci(
        &a.samples,
        &b.samples,
        estimator,
        config.bootstrap_iterations,
        seed,
    );
    tracing::debug!(
        comparison = %comparison,
        measure = %measure,
        point = ci.point,
        lower = ci.lower,
        upper = ci.upper,
        "effect size bootstrapped"
    );

    EffectSizeResult::new(&comparison, measure, test_type, ci)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EffectMagnitude;

    #[test]
    fn pooled_d_known_value() {
        // Means 2 and 4, both variances 1: d = -2.
        let a = [1.0, 2.0, 3.0];
        let b = [3.0, 4.0, 5.0];
        assert!((cohens_d_pooled(&a, &b) - (-2.0)).abs() < 1e-12);
    }

    #[test]
    fn pooled_d_degenerate_is_zero() {
        assert_eq!(cohens_d_pooled(&[2.0, 2.0], &[2.0, 2.0]), 0.0);
    }

    #[test]
    fn average_variance_d_differs_under_heteroscedasticity() {
        // With equal n the two denominators coincide, so the groups must
        // differ in size for the distinction to show.
        let a = [0.0, 1.0, 2.0];
        let b = [10.0, 10.1];
        let pooled = cohens_d_pooled(&a, &b);
        let avg = cohens_d_average_variance(&a, &b);
        assert!((pooled - avg).abs() > 1e-6, "pooled={pooled} avg={avg}");
    }

    #[test]
    fn cliffs_delta_complete_dominance() {
        let low = [1.0, 2.0, 3.0];
        let high = [4.0, 5.0, 6.0];
        assert_eq!(cliffs_delta(&high, &low), 1.0);
        assert_eq!(cliffs_delta(&low, &high), -1.0);
    }

    #[test]
    fn cliffs_delta_interleaved_is_zero() {
        let a = [1.0, 3.0, 5.0, 7.0];
        let b = [2.0, 4.0, 6.0, 8.0];
        // a beats b in 6 of 16 pairs and loses 10; delta = -0.25.
        assert!((cliffs_delta(&a, &b) - (-0.25)).abs() < 1e-12);
    }

    #[test]
    fn cliffs_delta_ties_contribute_zero() {
        let a = [1.0, 2.0];
        let b = [2.0, 3.0];
        // Pairs: (1,2)<, (1,3)<, (2,2)=, (2,3)<: delta = -3/4.
        assert!((cliffs_delta(&a, &b) - (-0.75)).abs() < 1e-12);
    }

    #[test]
    fn eta_squared_and_f() {
        let g1 = [1.0, 2.0, 3.0];
        let g2 = [4.0, 5.0, 6.0];
        let g3 = [7.0, 8.0, 9.0];
        let eta_sq = eta_squared(&[&g1, &g2, &g3]);
        assert!(eta_sq > 0.8, "well-separated groups: eta_sq={eta_sq}");
        assert!(cohens_f(eta_sq) > 2.0);
        assert_eq!(cohens_f(0.0), 0.0);
    }

    #[test]
    fn effect_result_for_separated_groups() {
        let a = SampleGroup::from_samples(
            "fast",
            &[10.0, 10.5, 11.0, 10.2, 10.8, 10.4, 10.6, 10.3, 10.7, 10.9],
        )
        .unwrap();
        let b = SampleGroup::from_samples(
            "slow",
            &[14.0, 14.5, 15.0, 14.2, 14.8, 14.4, 14.6, 14.3, 14.7, 14.9],
        )
        .unwrap();
        let config = Config::default();
        let result =
            compute_effect_size("runtime", &a, &b, TestType::StudentT, false, &config, 0).unwrap();
        assert_eq!(result.measure, EffectSizeMeasure::CohensD);
        assert!(result.value < -3.0, "huge separation: d={}", result.value);
        assert_eq!(result.magnitude, EffectMagnitude::Large);
        assert!(result.ci_lower <= result.value && result.value <= result.ci_upper);
    }

    #[test]
    fn exact_equality_short_circuits() {
        let a = SampleGroup::from_samples("a", &[2.0, 2.0, 2.0]).unwrap();
        let b = SampleGroup::from_samples("b", &[2.0, 2.0, 2.0]).unwrap();
        let config = Config::default();
        let result =
            compute_effect_size("m", &a, &b, TestType::MannWhitney, true, &config, 0).unwrap();
        assert_eq!(result.value, 0.0);
        assert_eq!(result.ci_lower, 0.0);
        assert_eq!(result.ci_upper, 0.0);
        assert!(result.exact_equality);
        assert_eq!(result.magnitude, EffectMagnitude::Negligible);
    }

    #[test]
    fn deterministic_across_calls() {
        let a = SampleGroup::from_samples("a", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let b = SampleGroup::from_samples("b", &[2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).unwrap();
        let config = Config::default();
        let r1 = compute_effect_size("m", &a, &b, TestType::WelchT, false, &config, 2).unwrap();
        let r2 = compute_effect_size("m", &a, &b, TestType::WelchT, false, &config, 2).unwrap();
        assert_eq!(r1.ci_lower, r2.ci_lower);
        assert_eq!(r1.ci_upper, r2.ci_upper);
    }
}
