//! Assumption diagnostics and hypothesis-test selection.
//!
//! For each metric the selector runs Shapiro-Wilk normality per group and
//! Levene's variance-homogeneity test across groups, then picks the test
//! that matches the data:
//!
//! - two groups: normal ∧ equal variance → Student's t; normal ∧ unequal →
//!   Welch's t; otherwise Mann-Whitney U
//! - three or more: normal ∧ equal → one-way ANOVA; normal ∧ unequal →
//!   Welch's ANOVA; otherwise Kruskal-Wallis
//!
//! Groups with fewer than 3 observations cannot be normality-tested and are
//! conservatively treated as non-normal. Welch's ANOVA is computed directly
//! from the Welch (1951) weights rather than delegated to a library call.
//!
//! # References
//!
//! - Royston (1995). "Remark AS R94: A remark on Algorithm AS 181".
//!   Applied Statistics, 44(4), 547–551.
//! - Brown & Forsythe (1974). "Robust tests for the equality of variances".
//!   JASA, 69(346), 364–367.
//! - Welch (1951). "On the comparison of several mean values: an
//!   alternative approach". Biometrika, 38(3/4), 330–336.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::profile::SampleGroup;
use crate::statistics::{
    average_ranks, chi_squared_sf, f_sf, mean, median, normal_cdf, normal_quantile,
    sample_variance, students_t_sf, tie_correction,
};
use crate::types::TestType;

/// Statistic and p-value of a single hypothesis test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// The test statistic (t, F, U, or H depending on the test).
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

/// Result of the Shapiro-Wilk normality test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapiroWilk {
    /// The W statistic (0 < W ≤ 1); values near 1 suggest normality.
    pub w: f64,
    /// p-value; small values reject the null hypothesis of normality.
    pub p_value: f64,
}

/// Normality verdict for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNormality {
    /// Group name.
    pub group: String,
    /// Number of observations.
    pub n: usize,
    /// Shapiro-Wilk result, if the test was applicable (n ≥ 3).
    pub shapiro_wilk: Option<ShapiroWilk>,
    /// Whether the group is treated as normally distributed.
    pub normal: bool,
}

/// The selected test with its diagnostics and rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSelection {
    /// The selected hypothesis test.
    pub test_type: TestType,
    /// Raw test statistic.
    pub statistic: f64,
    /// Raw (uncorrected) p-value.
    pub p_value: f64,
    /// Whether every group passed the normality check.
    pub all_normal: bool,
    /// Whether Levene's test found variances compatible.
    pub equal_variance: bool,
    /// Per-group normality diagnostics.
    pub normality: Vec<GroupNormality>,
    /// True when every observation across all groups is identical; the
    /// selection then reports a no-difference result without testing.
    pub exact_equality: bool,
    /// Human-readable account of which assumptions passed and why the test
    /// was chosen.
    pub rationale: String,
}

/// Run diagnostics on `groups` and select the appropriate test.
///
/// # Errors
///
/// - [`AnalysisError::InsufficientSampleSize`] if fewer than two groups are
///   supplied.
/// - [`AnalysisError::DegenerateDistribution`] if some group has zero
///   variance while the groups are not all identical; Levene's test is
///   undefined there and the engine refuses to fabricate a statistic.
pub fn select_test(
    metric: &str,
    groups: &[SampleGroup],
    alpha: f64,
) -> Result<TestSelection, AnalysisError> {
    let k = groups.len();
    if k < 2 {
        return Err(AnalysisError::InsufficientSampleSize {
            context: format!("test selection for metric '{metric}'"),
            required: 2,
            actual: k,
        });
    }

    // All observations identical across every group: nothing to test.
    if all_observations_equal(groups) {
        let test_type = if k == 2 { TestType::MannWhitney } else { TestType::KruskalWallis };
        return Ok(TestSelection {
            test_type,
            statistic: 0.0,
            p_value: 1.0,
            all_normal: false,
            equal_variance: true,
            normality: Vec::new(),
            exact_equality: true,
            rationale: format!(
                "all observations across {k} groups are identical; reporting exact equality \
                 with no distributional testing"
            ),
        });
    }

    // A constant group alongside non-identical data: Levene's statistic is
    // undefined, and silently producing NaN downstream is worse than failing.
    if let Some(constant) = groups.iter().find(|g| g.is_constant()) {
        return Err(AnalysisError::DegenerateDistribution {
            group: constant.name.clone(),
            statistic: "Levene's variance-homogeneity test".into(),
        });
    }

    // Normality: Shapiro-Wilk per group; n < 3 is conservatively non-normal.
    let normality: Vec<GroupNormality> = groups
        .iter()
        .map(|g| {
            let sw = if g.n() >= 3 { shapiro_wilk(&g.samples) } else { None };
            let normal = sw.map(|r| r.p_value > alpha).unwrap_or(false);
            GroupNormality { group: g.name.clone(), n: g.n(), shapiro_wilk: sw, normal }
        })
        .collect();
    let all_normal = normality.iter().all(|g| g.normal);

    // Variance homogeneity across all groups.
    let sample_refs: Vec<&[f64]> = groups.iter().map(|g| g.samples.as_slice()).collect();
    let levene_result = levene(&sample_refs);
    let equal_variance = levene_result.map(|r| r.p_value > alpha).unwrap_or(false);

    let test_type = match (k == 2, all_normal, equal_variance) {
        (true, true, true) => TestType::StudentT,
        (true, true, false) => TestType::WelchT,
        (true, false, _) => TestType::MannWhitney,
        (false, true, true) => TestType::Anova,
        (false, true, false) => TestType::WelchAnova,
        (false, false, _) => TestType::KruskalWallis,
    };

    let outcome = match test_type {
        TestType::StudentT => student_t_test(&sample_refs[0], &sample_refs[1]),
        TestType::WelchT => welch_t_test(&sample_refs[0], &sample_refs[1]),
        TestType::MannWhitney => mann_whitney_u(&sample_refs[0], &sample_refs[1]),
        TestType::Anova => one_way_anova(&sample_refs),
        TestType::WelchAnova => welch_anova(&sample_refs),
        TestType::KruskalWallis => kruskal_wallis(&sample_refs),
    };

    let rationale = build_rationale(test_type, &normality, levene_result, alpha);
    tracing::debug!(
        metric,
        test = %test_type,
        statistic = outcome.statistic,
        p_value = outcome.p_value,
        "test selected"
    );

    Ok(TestSelection {
        test_type,
        statistic: outcome.statistic,
        p_value: outcome.p_value,
        all_normal,
        equal_variance,
        normality,
        exact_equality: false,
        rationale,
    })
}

fn all_observations_equal(groups: &[SampleGroup]) -> bool {
    let first = groups[0].samples[0];
    groups
        .iter()
        .all(|g| g.samples.iter().all(|&x| (x - first).abs() < 1e-12))
}

fn build_rationale(
    test_type: TestType,
    normality: &[GroupNormality],
    levene_result: Option<TestOutcome>,
    alpha: f64,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    let failing: Vec<&GroupNormality> = normality.iter().filter(|g| !g.normal).collect();
    if failing.is_empty() {
        let min_p = normality
            .iter()
            .filter_map(|g| g.shapiro_wilk.map(|r| r.p_value))
            .fold(f64::INFINITY, f64::min);
        parts.push(format!(
            "all groups passed Shapiro-Wilk normality (min p = {min_p:.3} > {alpha})"
        ));
    } else {
        for g in &failing {
            match g.shapiro_wilk {
                Some(r) => parts.push(format!(
                    "group '{}' failed Shapiro-Wilk normality (p = {:.3} <= {alpha})",
                    g.group, r.p_value
                )),
                None => parts.push(format!(
                    "group '{}' has n = {} < 3, treated as non-normal",
                    g.group, g.n
                )),
            }
        }
    }

    match levene_result {
        Some(r) if r.p_value > alpha => parts.push(format!(
            "Levene's test found no evidence of unequal variances (p = {:.3})",
            r.p_value
        )),
        Some(r) => parts.push(format!(
            "Levene's test indicated unequal variances (p = {:.3} <= {alpha})",
            r.p_value
        )),
        None => parts.push("Levene's test was not assessable; variances treated as unequal".into()),
    }

    format!("{}; selected {}", parts.join("; "), test_type.label())
}

// ============================================================================
// Shapiro-Wilk (Royston AS R94)
// ============================================================================

const SW_C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const SW_C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const SW_C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const SW_C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const SW_C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const SW_C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const SW_G: [f64; 2] = [-2.273, 0.459];

fn sw_poly(c: &[f64], x: f64) -> f64 {
    let mut result = c[c.len() - 1];
    for i in (0..c.len() - 1).rev() {
        result = result * x + c[i];
    }
    result
}

/// Shapiro-Wilk normality test via the Royston (1995) AS R94 approximation.
///
/// Coefficients come from Blom-approximated normal order statistics with
/// Royston's polynomial corrections; the p-value uses his normalizing
/// transformation (gamma-log for n ≤ 11, log-normal above). The
/// approximation was fitted for n ≤ 5000 and is extrapolated beyond.
///
/// Returns `None` if n < 3, the sample is constant, or any value is
/// non-finite.
pub fn shapiro_wilk(data: &[f64]) -> Option<ShapiroWilk> {
    let n = data.len();
    if n < 3 || data.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let mut x = data.to_vec();
    x.sort_by(|a, b| a.total_cmp(b));
    if x[n - 1] - x[0] < 1e-300 {
        return None;
    }

    if n == 3 {
        return shapiro_wilk_n3(&x);
    }

    let nn2 = n / 2;
    let a = sw_coefficients(n, nn2)?;
    let w = sw_statistic(&x, &a, n, nn2);
    if !(0.0..=1.0 + 1e-10).contains(&w) {
        return None;
    }
    let w = w.min(1.0);

    Some(ShapiroWilk { w, p_value: sw_p_value(w, n).clamp(0.0, 1.0) })
}

// Exact case: a = [1/sqrt(2), 0, -1/sqrt(2)], p = 1 - (6/pi)*acos(sqrt(W)).
fn shapiro_wilk_n3(x: &[f64]) -> Option<ShapiroWilk> {
    let a1 = core::f64::consts::FRAC_1_SQRT_2;
    let m = (x[0] + x[1] + x[2]) / 3.0;
    let ss: f64 = x.iter().map(|&v| (v - m) * (v - m)).sum();
    if ss < 1e-300 {
        return None;
    }
    let numerator = a1 * (x[2] - x[0]);
    let w = ((numerator * numerator) / ss).clamp(0.75, 1.0);
    let p = (1.0 - (6.0 / core::f64::consts::PI) * w.sqrt().acos()).clamp(0.0, 1.0);
    Some(ShapiroWilk { w, p_value: p })
}

fn sw_coefficients(n: usize, nn2: usize) -> Option<Vec<f64>> {
    let mut a = vec![0.0; nn2];

    // Blom's approximation for expected normal order statistics.
    let mut m = vec![0.0; nn2];
    let mut summ2 = 0.0;
    for (i, mi) in m.iter_mut().enumerate() {
        let p = (i as f64 + 1.0 - 0.375) / (n as f64 + 0.25);
        *mi = normal_quantile(p);
        summ2 += *mi * *mi;
    }
    summ2 *= 2.0;
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / (n as f64).sqrt();

    let a1 = sw_poly(&SW_C1, rsn) - m[0] / ssumm2;

    if n <= 5 {
        let fac_sq = summ2 - 2.0 * m[0] * m[0];
        let one_minus = 1.0 - 2.0 * a1 * a1;
        if fac_sq <= 0.0 || one_minus <= 0.0 {
            return None;
        }
        let fac = (fac_sq / one_minus).sqrt();
        a[0] = a1;
        for i in 1..nn2 {
            a[i] = -m[i] / fac;
        }
    } else {
        let a2 = -m[1] / ssumm2 + sw_poly(&SW_C2, rsn);
        let fac_sq = summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1];
        let one_minus = 1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2;
        if fac_sq <= 0.0 || one_minus <= 0.0 {
            return None;
        }
        let fac = (fac_sq / one_minus).sqrt();
        a[0] = a1;
        a[1] = a2;
        for i in 2..nn2 {
            a[i] = -m[i] / fac;
        }
    }

    Some(a)
}

fn sw_statistic(x: &[f64], a: &[f64], n: usize, nn2: usize) -> f64 {
    let mut sa = 0.0;
    for i in 0..nn2 {
        sa += a[i] * (x[n - 1 - i] - x[i]);
    }
    let m = mean(x);
    let ss: f64 = x.iter().map(|&v| (v - m) * (v - m)).sum();
    if ss < 1e-300 {
        return 1.0;
    }
    (sa * sa) / ss
}

fn sw_p_value(w: f64, n: usize) -> f64 {
    let nf = n as f64;
    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }
    let y = w1.ln();

    if n <= 11 {
        let gamma = sw_poly(&SW_G, nf);
        if y >= gamma {
            return 0.0;
        }
        let y2 = -(gamma - y).ln();
        let m = sw_poly(&SW_C3, nf);
        let s = sw_poly(&SW_C4, nf).exp();
        if s < 1e-300 {
            return 0.0;
        }
        1.0 - normal_cdf((y2 - m) / s)
    } else {
        let xx = nf.ln();
        let m = sw_poly(&SW_C5, xx);
        let s = sw_poly(&SW_C6, xx).exp();
        if s < 1e-300 {
            return 0.0;
        }
        1.0 - normal_cdf((y - m) / s)
    }
}

// ============================================================================
// Variance homogeneity
// ============================================================================

/// Levene's test for equality of variances, Brown-Forsythe (median) variant.
///
/// Computes zᵢⱼ = |xᵢⱼ − median(groupᵢ)| and applies one-way ANOVA to the
/// z-values. The median variant is robust to non-normality, which matters
/// here because Levene runs before normality is established.
///
/// Returns `None` when the z-values are themselves degenerate (e.g. every
/// group of size 2, where |x − median| is constant within each group).
pub fn levene(groups: &[&[f64]]) -> Option<TestOutcome> {
    if groups.len() < 2 {
        return None;
    }

    let z_groups: Vec<Vec<f64>> = groups
        .iter()
        .map(|g| {
            let med = median(g);
            g.iter().map(|&x| (x - med).abs()).collect()
        })
        .collect();
    let z_refs: Vec<&[f64]> = z_groups.iter().map(|v| v.as_slice()).collect();

    let outcome = one_way_anova(&z_refs);
    if !outcome.statistic.is_finite() || !outcome.p_value.is_finite() {
        return None;
    }
    Some(outcome)
}

// ============================================================================
// Two-group tests
// ============================================================================

/// Student's two-sample t-test with pooled variance.
pub fn student_t_test(a: &[f64], b: &[f64]) -> TestOutcome {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let v1 = sample_variance(a);
    let v2 = sample_variance(b);

    let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / (n1 + n2 - 2.0);
    let se = (pooled * (1.0 / n1 + 1.0 / n2)).sqrt();
    if se < 1e-300 {
        // Identical data is caught upstream; differing means with zero
        // spread is an arbitrarily strong difference.
        return TestOutcome { statistic: f64::INFINITY, p_value: 0.0 };
    }

    let t = (mean(a) - mean(b)) / se;
    let df = n1 + n2 - 2.0;
    TestOutcome { statistic: t, p_value: 2.0 * students_t_sf(t.abs(), df) }
}

/// Welch's two-sample t-test with Welch–Satterthwaite degrees of freedom.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> TestOutcome {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let v1 = sample_variance(a);
    let v2 = sample_variance(b);

    let se_sq = v1 / n1 + v2 / n2;
    if se_sq < 1e-300 {
        return TestOutcome { statistic: f64::INFINITY, p_value: 0.0 };
    }

    let t = (mean(a) - mean(b)) / se_sq.sqrt();
    let df = se_sq * se_sq
        / ((v1 / n1) * (v1 / n1) / (n1 - 1.0) + (v2 / n2) * (v2 / n2) / (n2 - 1.0));
    TestOutcome { statistic: t, p_value: 2.0 * students_t_sf(t.abs(), df) }
}

/// Mann-Whitney U test with tie-corrected normal approximation.
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> TestOutcome {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let n = a.len() + b.len();
    let nf = n as f64;

    let mut combined: Vec<(f64, usize)> = Vec::with_capacity(n);
    combined.extend(a.iter().map(|&v| (v, 0)));
    combined.extend(b.iter().map(|&v| (v, 1)));
    combined.sort_by(|x, y| x.0.total_cmp(&y.0));

    let ranks = average_ranks(&combined);
    let r1: f64 = combined
        .iter()
        .zip(ranks.iter())
        .filter(|((_, g), _)| *g == 0)
        .map(|(_, &r)| r)
        .sum();

    let u1 = r1 - n1 * (n1 + 1.0) / 2.0;

    let ties = tie_correction(&combined);
    let mu = n1 * n2 / 2.0;
    let sigma_sq = n1 * n2 / 12.0 * (nf + 1.0 - ties / (nf * (nf - 1.0)));
    if sigma_sq <= 0.0 {
        // All observations tied; no evidence of difference.
        return TestOutcome { statistic: u1, p_value: 1.0 };
    }

    let z = (u1 - mu) / sigma_sq.sqrt();
    TestOutcome { statistic: u1, p_value: 2.0 * (1.0 - normal_cdf(z.abs())) }
}

// ============================================================================
// Omnibus tests
// ============================================================================

/// Classical one-way ANOVA.
pub fn one_way_anova(groups: &[&[f64]]) -> TestOutcome {
    let k = groups.len();
    let total_n: usize = groups.iter().map(|g| g.len()).sum();

    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / total_n as f64;
    let group_means: Vec<f64> = groups.iter().map(|g| mean(g)).collect();

    let ss_between: f64 = groups
        .iter()
        .zip(group_means.iter())
        .map(|(g, &gm)| g.len() as f64 * (gm - grand_mean) * (gm - grand_mean))
        .sum();
    let ss_within: f64 = groups
        .iter()
        .zip(group_means.iter())
        .map(|(g, &gm)| g.iter().map(|&x| (x - gm) * (x - gm)).sum::<f64>())
        .sum();

    let df_between = (k - 1) as f64;
    let df_within = (total_n - k) as f64;
    let ms_between = ss_between / df_between;
    let ms_within = ss_within / df_within;

    if ms_within < 1e-300 {
        return if ss_between < 1e-300 {
            TestOutcome { statistic: 0.0, p_value: 1.0 }
        } else {
            TestOutcome { statistic: f64::INFINITY, p_value: 0.0 }
        };
    }

    let f = ms_between / ms_within;
    TestOutcome { statistic: f, p_value: f_sf(f, df_between, df_within) }
}

/// Welch's ANOVA, computed directly per Welch (1951).
///
/// Per-group weights wᵢ = nᵢ/sᵢ², weighted grand mean, and the
/// Welch–Satterthwaite-style denominator degrees of freedom
/// df₂ = (k²−1) / (3·Σ(1−wᵢ/W)²/(nᵢ−1)). A zero-variance group would make
/// its weight infinite and the grand mean NaN, so that case short-circuits
/// to the same convention `one_way_anova` uses for a vanishing
/// within-group mean square.
pub fn welch_anova(groups: &[&[f64]]) -> TestOutcome {
    let k = groups.len() as f64;

    if groups.iter().any(|g| sample_variance(g) < 1e-300) {
        let means: Vec<f64> = groups.iter().map(|g| mean(g)).collect();
        let all_means_equal = means.iter().all(|&m| (m - means[0]).abs() < 1e-12);
        return if all_means_equal {
            TestOutcome { statistic: 0.0, p_value: 1.0 }
        } else {
            TestOutcome { statistic: f64::INFINITY, p_value: 0.0 }
        };
    }

    let weights: Vec<f64> = groups
        .iter()
        .map(|g| g.len() as f64 / sample_variance(g))
        .collect();
    let w_total: f64 = weights.iter().sum();
    let means: Vec<f64> = groups.iter().map(|g| mean(g)).collect();
    let grand_mean = weights
        .iter()
        .zip(means.iter())
        .map(|(&w, &m)| w * m)
        .sum::<f64>()
        / w_total;

    let numerator = weights
        .iter()
        .zip(means.iter())
        .map(|(&w, &m)| w * (m - grand_mean) * (m - grand_mean))
        .sum::<f64>()
        / (k - 1.0);

    let spread: f64 = groups
        .iter()
        .zip(weights.iter())
        .map(|(g, &w)| {
            let frac = 1.0 - w / w_total;
            frac * frac / (g.len() as f64 - 1.0)
        })
        .sum();

    let denominator = 1.0 + 2.0 * (k - 2.0) / (k * k - 1.0) * spread;
    let f = numerator / denominator;

    if spread < 1e-300 {
        // All groups carry identical weight; fall back to the classical df.
        let total_n: usize = groups.iter().map(|g| g.len()).sum();
        return TestOutcome {
            statistic: f,
            p_value: f_sf(f, k - 1.0, (total_n - groups.len()) as f64),
        };
    }

    let df2 = (k * k - 1.0) / (3.0 * spread);
    TestOutcome { statistic: f, p_value: f_sf(f, k - 1.0, df2) }
}

/// Kruskal-Wallis H test with tie correction.
pub fn kruskal_wallis(groups: &[&[f64]]) -> TestOutcome {
    let k = groups.len();
    let total_n: usize = groups.iter().map(|g| g.len()).sum();
    let nf = total_n as f64;

    let mut combined: Vec<(f64, usize)> = Vec::with_capacity(total_n);
    for (gi, g) in groups.iter().enumerate() {
        combined.extend(g.iter().map(|&v| (v, gi)));
    }
    combined.sort_by(|a, b| a.0.total_cmp(&b.0));

    let ranks = average_ranks(&combined);
    let mut rank_sums = vec![0.0; k];
    for ((_, gi), &r) in combined.iter().zip(ranks.iter()) {
        rank_sums[*gi] += r;
    }

    let mean_rank = (nf + 1.0) / 2.0;
    let mut h = 0.0;
    for (gi, g) in groups.iter().enumerate() {
        let ni = g.len() as f64;
        let mean_rank_i = rank_sums[gi] / ni;
        h += ni * (mean_rank_i - mean_rank) * (mean_rank_i - mean_rank);
    }
    h *= 12.0 / (nf * (nf + 1.0));

    let ties = tie_correction(&combined);
    let denom = 1.0 - ties / (nf * nf * nf - nf);
    if denom <= 1e-15 {
        // Every observation tied with every other.
        return TestOutcome { statistic: 0.0, p_value: 1.0 };
    }
    h /= denom;

    TestOutcome { statistic: h, p_value: chi_squared_sf(h, (k - 1) as f64) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SampleGroup;

    // Blom-score samples: plug-in normal order statistics are about as
    // normal-looking as a finite sample can be, which makes Shapiro-Wilk
    // outcomes deterministic without an RNG.
    fn normal_scores(n: usize, loc: f64, scale: f64) -> Vec<f64> {
        (1..=n)
            .map(|i| {
                let p = (i as f64 - 0.375) / (n as f64 + 0.25);
                loc + scale * normal_quantile(p)
            })
            .collect()
    }

    fn exponential_scores(n: usize, rate: f64) -> Vec<f64> {
        (1..=n)
            .map(|i| {
                let p = (i as f64 - 0.375) / (n as f64 + 0.25);
                -(1.0 - p).ln() / rate
            })
            .collect()
    }

    fn group(name: &str, samples: &[f64]) -> SampleGroup {
        SampleGroup::from_samples(name, samples).unwrap()
    }

    #[test]
    fn shapiro_wilk_accepts_normal_scores() {
        let data = normal_scores(30, 10.0, 1.0);
        let r = shapiro_wilk(&data).unwrap();
        assert!(r.w > 0.95, "w={}", r.w);
        assert!(r.p_value > 0.05, "p={}", r.p_value);
    }

    #[test]
    fn shapiro_wilk_rejects_exponential_scores() {
        let data = exponential_scores(30, 1.0);
        let r = shapiro_wilk(&data).unwrap();
        assert!(r.p_value < 0.01, "p={}", r.p_value);
    }

    #[test]
    fn shapiro_wilk_small_symmetric_sample() {
        let data = [-1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5];
        let r = shapiro_wilk(&data).unwrap();
        assert!(r.w > 0.9);
        assert!(r.p_value > 0.05);
    }

    #[test]
    fn shapiro_wilk_rejects_degenerate_input() {
        assert!(shapiro_wilk(&[1.0, 1.0]).is_none());
        assert!(shapiro_wilk(&[2.0, 2.0, 2.0, 2.0]).is_none());
    }

    #[test]
    fn levene_detects_unequal_spread() {
        let tight = normal_scores(30, 5.0, 1.0);
        let wide = normal_scores(30, 5.0, 5.0);
        let r = levene(&[&tight, &wide]).unwrap();
        assert!(r.p_value < 0.01, "p={}", r.p_value);
    }

    #[test]
    fn levene_accepts_equal_spread() {
        let a = normal_scores(30, 5.0, 1.0);
        let b = normal_scores(30, 9.0, 1.0);
        let r = levene(&[&a, &b]).unwrap();
        assert!(r.p_value > 0.2, "p={}", r.p_value);
    }

    #[test]
    fn student_t_on_shifted_groups() {
        let a = normal_scores(20, 0.0, 1.0);
        let b = normal_scores(20, 2.0, 1.0);
        let r = student_t_test(&a, &b);
        assert!(r.statistic < 0.0);
        assert!(r.p_value < 0.001);
    }

    #[test]
    fn welch_t_handles_unequal_variances() {
        let a = normal_scores(15, 0.0, 1.0);
        let b = normal_scores(40, 0.0, 6.0);
        let r = welch_t_test(&a, &b);
        assert!(r.p_value > 0.5, "same means: p={}", r.p_value);
    }

    #[test]
    fn mann_whitney_disjoint_groups() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [6.0, 7.0, 8.0, 9.0, 10.0];
        let r = mann_whitney_u(&a, &b);
        assert!(r.p_value < 0.05);
        // U for the lower group is 0.
        assert_eq!(r.statistic, 0.0);
    }

    #[test]
    fn anova_separated_means() {
        let g1 = [5.0, 6.0, 7.0, 5.5, 6.5];
        let g2 = [8.0, 9.0, 8.5, 9.5, 8.0];
        let g3 = [4.0, 3.0, 3.5, 4.5, 4.0];
        let r = one_way_anova(&[&g1, &g2, &g3]);
        assert!(r.p_value < 0.01);
    }

    #[test]
    fn welch_anova_identical_groups_high_p() {
        let a = normal_scores(25, 10.0, 1.0);
        let b = normal_scores(25, 10.0, 3.0);
        let c = normal_scores(25, 10.0, 5.0);
        let r = welch_anova(&[&a, &b, &c]);
        assert!(r.statistic.abs() < 1e-9, "equal means give F ~ 0, got {}", r.statistic);
        assert!(r.p_value > 0.99);
    }

    #[test]
    fn welch_anova_separated_means() {
        let a = normal_scores(25, 10.0, 1.0);
        let b = normal_scores(25, 14.0, 3.0);
        let c = normal_scores(25, 20.0, 5.0);
        let r = welch_anova(&[&a, &b, &c]);
        assert!(r.statistic > 10.0);
        assert!(r.p_value < 0.001);
    }

    #[test]
    fn degenerate_groups_never_produce_nan() {
        // These are reachable without going through select_test's guards,
        // so a constant group must still map to a defined outcome.
        let constant = [4.0, 4.0, 4.0, 4.0];
        let varied = [1.0, 2.0, 3.0, 4.0, 5.0];

        for r in [
            student_t_test(&constant, &varied),
            welch_t_test(&constant, &varied),
            one_way_anova(&[&constant, &varied, &varied]),
            welch_anova(&[&constant, &varied, &varied]),
        ] {
            assert!(!r.statistic.is_nan(), "statistic is NaN: {r:?}");
            assert!((0.0..=1.0).contains(&r.p_value), "p out of range: {r:?}");
        }

        // Constant groups sharing one mean carry no evidence of difference.
        let r = welch_anova(&[&constant, &constant, &constant]);
        assert_eq!(r.statistic, 0.0);
        assert_eq!(r.p_value, 1.0);

        // A constant group at a different level is an unbounded separation.
        let shifted = [9.0, 9.0, 9.0, 9.0];
        let r = welch_anova(&[&constant, &shifted]);
        assert_eq!(r.statistic, f64::INFINITY);
        assert_eq!(r.p_value, 0.0);
    }

    #[test]
    fn kruskal_wallis_separated_groups() {
        let g1 = [1.0, 2.0, 3.0, 4.0, 5.0];
        let g2 = [6.0, 7.0, 8.0, 9.0, 10.0];
        let g3 = [11.0, 12.0, 13.0, 14.0, 15.0];
        let r = kruskal_wallis(&[&g1, &g2, &g3]);
        assert!(r.p_value < 0.01);
    }

    #[test]
    fn selects_student_t_for_normal_equal_variance() {
        let a = group("a", &normal_scores(30, 10.0, 1.0));
        let b = group("b", &normal_scores(30, 11.0, 1.0));
        let sel = select_test("metric", &[a, b], 0.05).unwrap();
        assert_eq!(sel.test_type, TestType::StudentT);
        assert!(sel.all_normal);
        assert!(sel.equal_variance);
        assert!(sel.rationale.contains("Student's t-test"));
    }

    #[test]
    fn selects_welch_t_for_unequal_variance() {
        let a = group("a", &normal_scores(30, 10.0, 1.0));
        let b = group("b", &normal_scores(30, 11.0, 5.0));
        let sel = select_test("metric", &[a, b], 0.05).unwrap();
        assert_eq!(sel.test_type, TestType::WelchT);
    }

    #[test]
    fn selects_mann_whitney_for_non_normal() {
        let a = group("a", &normal_scores(30, 10.0, 1.0));
        let b = group("b", &exponential_scores(30, 0.2));
        let sel = select_test("metric", &[a, b], 0.05).unwrap();
        assert_eq!(sel.test_type, TestType::MannWhitney);
        assert!(!sel.all_normal);
    }

    #[test]
    fn tiny_group_is_conservatively_non_normal() {
        let a = group("a", &[1.0, 2.0]);
        let b = group("b", &normal_scores(30, 5.0, 1.0));
        let sel = select_test("metric", &[a, b], 0.05).unwrap();
        assert_eq!(sel.test_type, TestType::MannWhitney);
        assert!(sel.rationale.contains("n = 2 < 3"));
    }

    #[test]
    fn three_group_decision_tree() {
        let a = normal_scores(30, 10.0, 1.0);
        let b = normal_scores(30, 10.0, 1.0);
        let c = normal_scores(30, 10.0, 1.0);

        let sel = select_test(
            "m",
            &[group("a", &a), group("b", &b), group("c", &c)],
            0.05,
        )
        .unwrap();
        assert_eq!(sel.test_type, TestType::Anova);

        let wide = normal_scores(30, 10.0, 5.0);
        let sel = select_test(
            "m",
            &[group("a", &a), group("b", &b), group("c", &wide)],
            0.05,
        )
        .unwrap();
        assert_eq!(sel.test_type, TestType::WelchAnova);

        let skewed = exponential_scores(30, 0.5);
        let sel = select_test(
            "m",
            &[group("a", &a), group("b", &b), group("c", &skewed)],
            0.05,
        )
        .unwrap();
        assert_eq!(sel.test_type, TestType::KruskalWallis);
    }

    #[test]
    fn all_equal_special_case() {
        let a = group("a", &[3.0, 3.0, 3.0]);
        let b = group("b", &[3.0, 3.0, 3.0, 3.0]);
        let sel = select_test("metric", &[a, b], 0.05).unwrap();
        assert!(sel.exact_equality);
        assert_eq!(sel.p_value, 1.0);
        assert_eq!(sel.statistic, 0.0);
        assert_eq!(sel.test_type, TestType::MannWhitney);
    }

    #[test]
    fn constant_group_with_differing_data_fails() {
        let a = group("a", &[3.0, 3.0, 3.0]);
        let b = group("b", &[1.0, 2.0, 3.0, 4.0]);
        let err = select_test("metric", &[a, b], 0.05).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateDistribution { .. }));
    }

    #[test]
    fn fewer_than_two_groups_rejected() {
        let a = group("a", &[1.0, 2.0, 3.0]);
        let err = select_test("metric", &[a], 0.05).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientSampleSize { .. }));
    }
}
