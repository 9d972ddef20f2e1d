//! Validated result types for a metric analysis.
//!
//! Constructors here enforce the cross-field invariants that individual
//! pipeline stages cannot see on their own: effect measures must align with
//! the selected test family, confidence intervals must contain their point
//! estimates, and the correction method must be consistent with the size of
//! the comparison family. A value of one of these types is therefore
//! internally consistent by construction.

use serde::{Deserialize, Serialize};

use crate::analysis::bootstrap::BootstrapCi;
use crate::analysis::power::PowerAnalysisResult;
use crate::error::AnalysisError;
use crate::profile::SampleGroup;
use crate::types::{CorrectionMethod, EffectMagnitude, EffectSizeMeasure, TestType};

/// Tolerance for CI-containment checks; percentile intervals are exact up
/// to floating-point round-off.
const CI_TOLERANCE: f64 = 1e-9;

/// An effect size with its bootstrap confidence interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSizeResult {
    /// The measure, dictated by the test family.
    pub measure: EffectSizeMeasure,
    /// Point estimate from the original samples.
    pub value: f64,
    /// Conventional magnitude band for `value`.
    pub magnitude: EffectMagnitude,
    /// Lower bound of the 95% bootstrap interval.
    pub ci_lower: f64,
    /// Upper bound of the 95% bootstrap interval.
    pub ci_upper: f64,
    /// Bootstrap iterations behind the interval.
    pub iterations: usize,
    /// False when the interval is degenerate (zero width from resampling
    /// collapse rather than exact equality).
    pub ci_valid: bool,
    /// True when the groups were exactly equal and no resampling ran.
    pub exact_equality: bool,
}

impl EffectSizeResult {
    /// Build a validated effect-size result from a bootstrap interval.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::UnsupportedTestTypeAlignment`] if `measure` does
    ///   not belong to `test_type`'s family.
    /// - [`AnalysisError::InvalidConfidenceInterval`] if the interval does
    ///   not contain the point estimate.
    pub fn new(
        comparison: &str,
        measure: EffectSizeMeasure,
        test_type: TestType,
        ci: BootstrapCi,
    ) -> Result<Self, AnalysisError> {
        if !measure.aligns_with(test_type) {
            return Err(AnalysisError::UnsupportedTestTypeAlignment { measure, test_type });
        }
        if ci.point < ci.lower - CI_TOLERANCE || ci.point > ci.upper + CI_TOLERANCE {
            return Err(AnalysisError::InvalidConfidenceInterval {
                comparison: comparison.to_string(),
                point: ci.point,
                ci_lower: ci.lower,
                ci_upper: ci.upper,
            });
        }
        Ok(Self {
            measure,
            value: ci.point,
            magnitude: EffectMagnitude::classify(measure, ci.point),
            ci_lower: ci.lower,
            ci_upper: ci.upper,
            iterations: ci.iterations,
            ci_valid: ci.upper - ci.lower > 0.0,
            exact_equality: false,
        })
    }

    /// Zero effect with a zero-width interval, for exactly-equal groups.
    pub fn exact_equality(
        measure: EffectSizeMeasure,
        test_type: TestType,
    ) -> Result<Self, AnalysisError> {
        if !measure.aligns_with(test_type) {
            return Err(AnalysisError::UnsupportedTestTypeAlignment { measure, test_type });
        }
        Ok(Self {
            measure,
            value: 0.0,
            magnitude: EffectMagnitude::Negligible,
            ci_lower: 0.0,
            ci_upper: 0.0,
            iterations: 0,
            ci_valid: true,
            exact_equality: true,
        })
    }
}

/// One pairwise comparison, fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// First group of the pair (effect signs read as "a minus b" or
    /// "a dominates b").
    pub group_a: String,
    /// Second group of the pair.
    pub group_b: String,
    /// The selected hypothesis test.
    pub test_type: TestType,
    /// Raw test statistic.
    pub statistic: f64,
    /// Uncorrected p-value.
    pub p_value: f64,
    /// Family-wise adjusted p-value; equals `p_value` when no correction
    /// applies.
    pub adjusted_p_value: f64,
    /// Significance verdict on the adjusted p-value.
    pub significant: bool,
    /// The correction method behind `adjusted_p_value`.
    pub correction_method: CorrectionMethod,
    /// Whether both groups passed the normality check.
    pub all_normal: bool,
    /// Whether Levene's test found the variances compatible.
    pub equal_variance: bool,
    /// Why this test was selected.
    pub rationale: String,
    /// True when both groups are identical on this metric.
    pub exact_equality: bool,
    /// Effect size with bootstrap CI.
    pub effect: EffectSizeResult,
    /// Power analysis for this pair.
    pub power: PowerAnalysisResult,
    /// Neutral prose summary for report assembly.
    pub summary: String,
}

/// Omnibus test across all groups of a metric (k ≥ 3 only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmnibusResult {
    /// ANOVA, Welch's ANOVA, or Kruskal-Wallis.
    pub test_type: TestType,
    /// F or H statistic.
    pub statistic: f64,
    /// p-value of the omnibus test.
    pub p_value: f64,
    /// Proportion of variance explained by group membership.
    pub eta_squared: f64,
    /// Cohen's f derived from eta-squared.
    pub cohens_f: f64,
    /// Significance at the configured alpha.
    pub significant: bool,
    /// Why this test was selected.
    pub rationale: String,
    /// Power analysis of the omnibus test.
    pub power: PowerAnalysisResult,
}

/// Record of the correction applied to a metric's comparison family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipleComparisonCorrection {
    /// Metric whose comparison family this record describes.
    pub metric: String,
    /// The method applied.
    pub method: CorrectionMethod,
    /// Number of comparisons in the family.
    pub family_size: usize,
    /// The family-wise significance level the correction controls.
    pub alpha: f64,
    /// The Bonferroni floor alpha/m (equals alpha when uncorrected).
    pub corrected_alpha: f64,
    /// Comparison labels ("a-vs-b"), in comparison order.
    pub labels: Vec<String>,
    /// Raw p-values, parallel to `labels`.
    pub raw_p_values: Vec<f64>,
    /// Adjusted p-values, parallel to `labels`.
    pub adjusted_p_values: Vec<f64>,
    /// Rejection decisions on the adjusted p-values, parallel to `labels`.
    pub rejected: Vec<bool>,
    /// Method explanation with its literature citation, for reports.
    pub citation: String,
}

impl MultipleComparisonCorrection {
    /// Build a validated correction record.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::CorrectionPolicyViolation`] if the method is
    /// inconsistent with the family size (no correction with more than one
    /// comparison, or Holm with fewer than two) or if the parallel vectors
    /// disagree in length.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        metric: &str,
        method: CorrectionMethod,
        alpha: f64,
        corrected_alpha: f64,
        labels: Vec<String>,
        raw_p_values: Vec<f64>,
        adjusted_p_values: Vec<f64>,
        rejected: Vec<bool>,
    ) -> Result<Self, AnalysisError> {
        let family_size = raw_p_values.len();
        let policy_ok = match method {
            CorrectionMethod::None => family_size <= 1,
            CorrectionMethod::Holm => family_size >= 2,
        };
        let lengths_ok = labels.len() == family_size
            && adjusted_p_values.len() == family_size
            && rejected.len() == family_size;
        if !policy_ok || !lengths_ok {
            return Err(AnalysisError::CorrectionPolicyViolation {
                metric: metric.to_string(),
                method,
                n_comparisons: family_size,
            });
        }
        debug_assert!(
            raw_p_values
                .iter()
                .zip(adjusted_p_values.iter())
                .all(|(raw, adj)| adj + CI_TOLERANCE >= *raw),
            "adjusted p-values must dominate raw ones"
        );
        let citation = match method {
            CorrectionMethod::None => {
                "single comparison; no family-wise correction applied".to_string()
            }
            CorrectionMethod::Holm => format!(
                "Holm-Bonferroni step-down correction over {family_size} comparisons \
                 (Holm, 1979, Scandinavian Journal of Statistics 6(2), 65-70)"
            ),
        };
        Ok(Self {
            metric: metric.to_string(),
            method,
            family_size,
            alpha,
            corrected_alpha,
            labels,
            raw_p_values,
            adjusted_p_values,
            rejected,
            citation,
        })
    }
}

/// Complete analysis of one metric across all groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricAnalysis {
    /// Metric name.
    pub metric: String,
    /// Per-group distribution profiles, in input order.
    pub groups: Vec<SampleGroup>,
    /// Omnibus test, present only with three or more groups.
    pub omnibus: Option<OmnibusResult>,
    /// All pairwise comparisons, in (i, j) order with i < j.
    pub comparisons: Vec<ComparisonResult>,
    /// The correction applied to the pairwise family.
    pub correction: MultipleComparisonCorrection,
    /// Significance level the analysis ran at.
    pub alpha: f64,
}
