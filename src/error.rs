//! Error types for the statistical comparison engine.

use thiserror::Error;

use crate::types::{CorrectionMethod, EffectSizeMeasure, TestType};

/// Errors surfaced by profiling, test selection, and result assembly.
///
/// Numeric edge cases that have a defensible statistical interpretation
/// (exact equality, zero-width intervals) are reported in results rather
/// than as errors; this enum covers the cases where proceeding would
/// fabricate a statistic.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Too few observations or groups for the requested computation.
    #[error("{context}: requires at least {required} observations, got {actual}")]
    InsufficientSampleSize {
        /// What was being computed.
        context: String,
        /// Minimum count for the computation to be defined.
        required: usize,
        /// Count actually supplied.
        actual: usize,
    },

    /// A group has zero variance where a spread-based statistic is needed.
    #[error("group '{group}' has zero variance; {statistic} is undefined")]
    DegenerateDistribution {
        /// The offending group.
        group: String,
        /// The statistic that cannot be computed.
        statistic: String,
    },

    /// A confidence interval does not contain its own point estimate.
    #[error(
        "comparison '{comparison}': confidence interval [{ci_lower}, {ci_upper}] \
         does not contain the point estimate {point}"
    )]
    InvalidConfidenceInterval {
        /// Stable comparison identifier (metric and group pair).
        comparison: String,
        /// Point estimate of the effect size.
        point: f64,
        /// Lower CI bound.
        ci_lower: f64,
        /// Upper CI bound.
        ci_upper: f64,
    },

    /// A correction method inconsistent with the number of comparisons.
    #[error(
        "metric '{metric}': correction method '{method}' is invalid for \
         {n_comparisons} comparison(s)"
    )]
    CorrectionPolicyViolation {
        /// The metric whose comparison family is affected.
        metric: String,
        /// The offending method.
        method: CorrectionMethod,
        /// Number of comparisons in the family.
        n_comparisons: usize,
    },

    /// An effect-size measure paired with a test family it does not match.
    #[error("effect measure '{measure}' does not align with test '{test_type}'")]
    UnsupportedTestTypeAlignment {
        /// The effect-size measure.
        measure: EffectSizeMeasure,
        /// The selected test.
        test_type: TestType,
    },

    /// An observation that is NaN or infinite.
    #[error("group '{group}' contains a non-finite observation ({value})")]
    NonFiniteSample {
        /// The offending group.
        group: String,
        /// The offending value.
        value: f64,
    },

    /// A configuration value outside its accepted range.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong and what was supplied.
        message: String,
    },
}
