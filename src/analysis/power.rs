//! Analytic power analysis via noncentral distributions.
//!
//! Achieved power for t-family comparisons comes from the noncentral t
//! distribution with noncentrality δ = d·√(n₁n₂/(n₁+n₂)); for the
//! F-family, from the noncentral F with λ = f²·N. Rank-based comparisons
//! are powered through a normal-equivalent conversion of Cliff's delta,
//! d = √2·Φ⁻¹((δ+1)/2), which treats the dominance probability as if it
//! arose from two equal-variance normal distributions.
//!
//! Sample-size recommendations solve for the smallest balanced per-group n
//! reaching the target power, by doubling until the target is bracketed and
//! then binary searching.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::statistics::{
    f_critical_value, noncentral_f_cdf, noncentral_t_cdf, normal_quantile,
    students_t_critical_value,
};
use crate::types::PowerAdequacy;

/// Below this per-group n the analytic approximations are not trustworthy
/// and power is reported as indeterminate.
const MIN_N_FOR_POWER: usize = 5;

/// Cap on the normal-equivalent |d| derived from Cliff's delta; beyond it
/// the conversion is extrapolating from (near-)complete dominance.
const MAX_CONVERTED_D: f64 = 5.0;

/// Largest per-group n the sample-size solver will consider.
const MAX_RECOMMENDED_N: usize = 1_000_000;

/// Effects smaller than this are treated as zero for power purposes.
const NEGLIGIBLE_EFFECT: f64 = 1e-8;

/// Power analysis for one comparison or omnibus test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerAnalysisResult {
    /// The effect size the power computation actually used (d for two-group
    /// comparisons, Cohen's f for omnibus tests), after any capping.
    pub effect_size: f64,
    /// Per-group sample sizes the computation ran with.
    pub group_sizes: Vec<usize>,
    /// Probability of detecting the observed effect at the given sample
    /// sizes, or `None` when indeterminate.
    pub achieved_power: Option<f64>,
    /// The configured target power.
    pub target_power: f64,
    /// Adequacy verdict against the target.
    pub adequacy: PowerAdequacy,
    /// Smallest balanced per-group n reaching the target, when the achieved
    /// power falls short and a finite answer exists.
    pub recommended_n_per_group: Option<usize>,
    /// Caveat attached to the verdict (tiny samples, capped effects,
    /// near-zero effects).
    pub note: Option<String>,
}

/// Convert Cliff's delta to a normal-equivalent Cohen's d.
///
/// Under two equal-variance normals, P(X > Y) = Φ(d/√2), so
/// d = √2·Φ⁻¹((δ+1)/2). Clamped to ±[`MAX_CONVERTED_D`] because the
/// mapping diverges as |δ| → 1.
pub fn delta_to_d(delta: f64) -> f64 {
    let p = ((delta + 1.0) / 2.0).clamp(1e-12, 1.0 - 1e-12);
    let d = core::f64::consts::SQRT_2 * normal_quantile(p);
    if d.abs() > MAX_CONVERTED_D {
        tracing::warn!(
            delta,
            "Cliff's delta implies near-complete dominance; capping the \
             normal-equivalent effect for power purposes"
        );
        MAX_CONVERTED_D.copysign(d)
    } else {
        d
    }
}

/// Power of a two-sided two-sample t-test for effect `d` at sizes `n1`/`n2`.
pub fn two_group_power(d: f64, n1: usize, n2: usize, alpha: f64) -> f64 {
    let n1f = n1 as f64;
    let n2f = n2 as f64;
    let df = n1f + n2f - 2.0;
    let ncp = d.abs() * (n1f * n2f / (n1f + n2f)).sqrt();
    let t_crit = students_t_critical_value(df, alpha);
    // Mass outside +-t_crit under the noncentral alternative.
    let upper = 1.0 - noncentral_t_cdf(t_crit, df, ncp);
    let lower = noncentral_t_cdf(-t_crit, df, ncp);
    (upper + lower).clamp(0.0, 1.0)
}

/// Power of a one-way F test for Cohen's f at the given group sizes.
pub fn anova_power(f_effect: f64, group_sizes: &[usize], alpha: f64) -> f64 {
    let k = group_sizes.len();
    let total_n: usize = group_sizes.iter().sum();
    let df1 = (k - 1) as f64;
    let df2 = (total_n - k) as f64;
    let lambda = f_effect * f_effect * total_n as f64;
    let f_crit = f_critical_value(df1, df2, alpha);
    (1.0 - noncentral_f_cdf(f_crit, df1, df2, lambda)).clamp(0.0, 1.0)
}

/// Power analysis of a two-group comparison with effect `d` (observed or
/// converted from Cliff's delta).
pub fn analyze_two_group_power(
    d: f64,
    n1: usize,
    n2: usize,
    config: &Config,
) -> PowerAnalysisResult {
    let group_sizes = vec![n1, n2];

    if n1.min(n2) < MIN_N_FOR_POWER {
        tracing::warn!(
            n1,
            n2,
            "sample too small for a trustworthy power estimate"
        );
        return PowerAnalysisResult {
            effect_size: d,
            group_sizes,
            achieved_power: None,
            target_power: config.target_power,
            adequacy: PowerAdequacy::Indeterminate,
            recommended_n_per_group: None,
            note: Some(format!(
                "smallest group has n = {} < {MIN_N_FOR_POWER}; the analytic power \
                 approximation is unreliable at this size",
                n1.min(n2)
            )),
        };
    }

    if d.abs() < NEGLIGIBLE_EFFECT {
        return PowerAnalysisResult {
            effect_size: d,
            group_sizes,
            achieved_power: Some(config.alpha),
            target_power: config.target_power,
            adequacy: PowerAdequacy::Insufficient,
            recommended_n_per_group: None,
            note: Some(
                "observed effect is indistinguishable from zero; no finite sample \
                 size reaches the target power"
                    .into(),
            ),
        };
    }

    // Enormous standardized effects put the noncentrality far outside the
    // region the approximations were fitted for; cap rather than report an
    // unstable number.
    let (d, cap_note) = if d.abs() > MAX_CONVERTED_D {
        tracing::warn!(d, "capping implausibly large effect for power analysis");
        (
            MAX_CONVERTED_D.copysign(d),
            Some(format!(
                "observed |d| exceeds {MAX_CONVERTED_D}; power was computed at the cap"
            )),
        )
    } else {
        (d, None)
    };

    let achieved = two_group_power(d, n1, n2, config.alpha);
    if achieved >= config.target_power {
        return PowerAnalysisResult {
            effect_size: d,
            group_sizes,
            achieved_power: Some(achieved),
            target_power: config.target_power,
            adequacy: PowerAdequacy::Sufficient,
            recommended_n_per_group: None,
            note: cap_note,
        };
    }

    let recommended = solve_min_n(
        |n| two_group_power(d, n, n, config.alpha),
        config.target_power,
        n1.max(n2),
    );
    let note = cap_note.or_else(|| {
        recommended.is_none().then(|| {
            format!(
                "reaching {:.0}% power for this effect would require more than \
                 {MAX_RECOMMENDED_N} observations per group",
                config.target_power * 100.0
            )
        })
    });
    PowerAnalysisResult {
        effect_size: d,
        group_sizes,
        achieved_power: Some(achieved),
        target_power: config.target_power,
        adequacy: PowerAdequacy::Insufficient,
        recommended_n_per_group: recommended,
        note,
    }
}

/// Power analysis of an omnibus F test across `group_sizes` with effect
/// Cohen's f.
pub fn analyze_anova_power(
    f_effect: f64,
    group_sizes: &[usize],
    config: &Config,
) -> PowerAnalysisResult {
    let k = group_sizes.len();
    let sizes = group_sizes.to_vec();
    let min_n = group_sizes.iter().copied().min().unwrap_or(0);
    if min_n < MIN_N_FOR_POWER {
        return PowerAnalysisResult {
            effect_size: f_effect,
            group_sizes: sizes,
            achieved_power: None,
            target_power: config.target_power,
            adequacy: PowerAdequacy::Indeterminate,
            recommended_n_per_group: None,
            note: Some(format!(
                "smallest group has n = {min_n} < {MIN_N_FOR_POWER}; the analytic \
                 power approximation is unreliable at this size"
            )),
        };
    }

    if f_effect.abs() < NEGLIGIBLE_EFFECT {
        return PowerAnalysisResult {
            effect_size: f_effect,
            group_sizes: sizes,
            achieved_power: Some(config.alpha),
            target_power: config.target_power,
            adequacy: PowerAdequacy::Insufficient,
            recommended_n_per_group: None,
            note: Some(
                "observed effect is indistinguishable from zero; no finite sample \
                 size reaches the target power"
                    .into(),
            ),
        };
    }

    let achieved = anova_power(f_effect, group_sizes, config.alpha);
    if achieved >= config.target_power {
        return PowerAnalysisResult {
            effect_size: f_effect,
            group_sizes: sizes,
            achieved_power: Some(achieved),
            target_power: config.target_power,
            adequacy: PowerAdequacy::Sufficient,
            recommended_n_per_group: None,
            note: None,
        };
    }

    let max_n = group_sizes.iter().copied().max().unwrap_or(MIN_N_FOR_POWER);
    let recommended = solve_min_n(
        |n| anova_power(f_effect, &vec![n; k], config.alpha),
        config.target_power,
        max_n,
    );
    PowerAnalysisResult {
        effect_size: f_effect,
        group_sizes: sizes,
        achieved_power: Some(achieved),
        target_power: config.target_power,
        adequacy: PowerAdequacy::Insufficient,
        recommended_n_per_group: recommended,
        note: recommended.is_none().then(|| {
            format!(
                "reaching {:.0}% power for this effect would require more than \
                 {MAX_RECOMMENDED_N} observations per group",
                config.target_power * 100.0
            )
        }),
    }
}

/// Smallest balanced per-group n with `power_at(n) >= target`, or `None`
/// when even [`MAX_RECOMMENDED_N`] falls short.
fn solve_min_n<F>(power_at: F, target: f64, start: usize) -> Option<usize>
where
    F: Fn(usize) -> f64,
{
    let mut hi = start.max(MIN_N_FOR_POWER);
    while power_at(hi) < target {
        if hi >= MAX_RECOMMENDED_N {
            return None;
        }
        hi = (hi * 2).min(MAX_RECOMMENDED_N);
    }

    let mut lo = 2usize;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if power_at(mid) >= target {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Some(hi)
}
