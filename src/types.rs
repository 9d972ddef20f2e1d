//! Closed enums shared across the engine.
//!
//! Test families, effect-size measures, and classification levels are modeled
//! as exhaustive enums so that adding a test type is a compile-time-checked
//! change in every component that branches on it.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The hypothesis test selected for a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestType {
    /// Student's two-sample t-test (normal data, equal variances).
    StudentT,
    /// Welch's t-test (normal data, unequal variances).
    WelchT,
    /// Mann-Whitney U test (non-normal two-group data).
    MannWhitney,
    /// One-way ANOVA (normal data, equal variances, 3+ groups).
    Anova,
    /// Welch's ANOVA (normal data, unequal variances, 3+ groups).
    WelchAnova,
    /// Kruskal-Wallis H test (non-normal data, 3+ groups).
    KruskalWallis,
}

impl TestType {
    /// Whether this test assumes a parametric (normal-theory) model.
    pub fn is_parametric(self) -> bool {
        match self {
            TestType::StudentT | TestType::WelchT | TestType::Anova | TestType::WelchAnova => true,
            TestType::MannWhitney | TestType::KruskalWallis => false,
        }
    }

    /// Whether this test compares exactly two groups.
    pub fn is_two_group(self) -> bool {
        match self {
            TestType::StudentT | TestType::WelchT | TestType::MannWhitney => true,
            TestType::Anova | TestType::WelchAnova | TestType::KruskalWallis => false,
        }
    }

    /// Human-readable test name for rationale strings and reports.
    pub fn label(self) -> &'static str {
        match self {
            TestType::StudentT => "Student's t-test",
            TestType::WelchT => "Welch's t-test",
            TestType::MannWhitney => "Mann-Whitney U test",
            TestType::Anova => "one-way ANOVA",
            TestType::WelchAnova => "Welch's ANOVA",
            TestType::KruskalWallis => "Kruskal-Wallis H test",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Effect-size measure, chosen strictly by test family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectSizeMeasure {
    /// Standardized mean difference; aligns with the parametric tests.
    CohensD,
    /// Pairwise dominance probability difference; aligns with the
    /// non-parametric tests.
    CliffsDelta,
}

impl EffectSizeMeasure {
    /// Whether this measure is methodologically aligned with `test_type`.
    pub fn aligns_with(self, test_type: TestType) -> bool {
        match self {
            EffectSizeMeasure::CohensD => test_type.is_parametric(),
            EffectSizeMeasure::CliffsDelta => !test_type.is_parametric(),
        }
    }

    /// The measure aligned with a given test type.
    pub fn for_test(test_type: TestType) -> Self {
        if test_type.is_parametric() {
            EffectSizeMeasure::CohensD
        } else {
            EffectSizeMeasure::CliffsDelta
        }
    }
}

impl fmt::Display for EffectSizeMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectSizeMeasure::CohensD => f.write_str("Cohen's d"),
            EffectSizeMeasure::CliffsDelta => f.write_str("Cliff's delta"),
        }
    }
}

/// Multiple-comparison correction method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorrectionMethod {
    /// No correction; valid only for a single comparison.
    None,
    /// Holm-Bonferroni step-down procedure.
    Holm,
}

impl fmt::Display for CorrectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectionMethod::None => f.write_str("none"),
            CorrectionMethod::Holm => f.write_str("holm"),
        }
    }
}

/// Skewness classification of a sample distribution.
///
/// Thresholds follow the |skew| < 0.5 / ≤ 1.0 / ≤ 2.0 / > 2.0 convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkewnessLevel {
    /// |skew| < 0.5: approximately symmetric.
    Normal,
    /// 0.5 ≤ |skew| ≤ 1.0: moderately skewed.
    Moderate,
    /// 1.0 < |skew| ≤ 2.0: highly skewed.
    High,
    /// |skew| > 2.0: severely skewed; mean-based summaries are unreliable.
    Severe,
}

impl SkewnessLevel {
    /// Classify a Fisher-Pearson skewness coefficient.
    pub fn from_skewness(skew: f64) -> Self {
        let s = skew.abs();
        if s < 0.5 {
            SkewnessLevel::Normal
        } else if s <= 1.0 {
            SkewnessLevel::Moderate
        } else if s <= 2.0 {
            SkewnessLevel::High
        } else {
            SkewnessLevel::Severe
        }
    }

    /// The summary statistic that should lead when reporting this
    /// distribution.
    pub fn primary_summary(self) -> PrimarySummary {
        match self {
            SkewnessLevel::Normal => PrimarySummary::Mean,
            SkewnessLevel::Moderate | SkewnessLevel::High | SkewnessLevel::Severe => {
                PrimarySummary::Median
            }
        }
    }
}

impl fmt::Display for SkewnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkewnessLevel::Normal => f.write_str("normal"),
            SkewnessLevel::Moderate => f.write_str("moderate"),
            SkewnessLevel::High => f.write_str("high"),
            SkewnessLevel::Severe => f.write_str("severe"),
        }
    }
}

/// Which central-tendency statistic leads when summarizing a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimarySummary {
    /// Report the mean first (approximately symmetric data).
    Mean,
    /// Report the median first (skewed data).
    Median,
}

impl fmt::Display for PrimarySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimarySummary::Mean => f.write_str("mean"),
            PrimarySummary::Median => f.write_str("median"),
        }
    }
}

/// Whether a comparison had adequate statistical power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerAdequacy {
    /// Achieved power meets or exceeds the target.
    Sufficient,
    /// Achieved power falls short of the target; a larger sample is
    /// recommended.
    Insufficient,
    /// Power could not be determined (sample too small for the analytic
    /// approximation to be trustworthy).
    Indeterminate,
}

impl fmt::Display for PowerAdequacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerAdequacy::Sufficient => f.write_str("sufficient"),
            PowerAdequacy::Insufficient => f.write_str("insufficient"),
            PowerAdequacy::Indeterminate => f.write_str("indeterminate"),
        }
    }
}

/// Conventional magnitude bands for an observed effect size.
///
/// Bands follow Cohen (1988) for d and Romano et al. (2006) for Cliff's
/// delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectMagnitude {
    /// Below the small-effect band.
    Negligible,
    /// Small effect.
    Small,
    /// Medium effect.
    Medium,
    /// Large effect.
    Large,
}

impl EffectMagnitude {
    /// Classify an effect value under the conventions of its measure.
    pub fn classify(measure: EffectSizeMeasure, value: f64) -> Self {
        let v = value.abs();
        let (small, medium, large) = match measure {
            EffectSizeMeasure::CohensD => (0.2, 0.5, 0.8),
            EffectSizeMeasure::CliffsDelta => (0.147, 0.33, 0.474),
        };
        if v < small {
            EffectMagnitude::Negligible
        } else if v < medium {
            EffectMagnitude::Small
        } else if v < large {
            EffectMagnitude::Medium
        } else {
            EffectMagnitude::Large
        }
    }
}

impl fmt::Display for EffectMagnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectMagnitude::Negligible => f.write_str("negligible"),
            EffectMagnitude::Small => f.write_str("small"),
            EffectMagnitude::Medium => f.write_str("medium"),
            EffectMagnitude::Large => f.write_str("large"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skewness_thresholds() {
        assert_eq!(SkewnessLevel::from_skewness(0.0), SkewnessLevel::Normal);
        assert_eq!(SkewnessLevel::from_skewness(0.49), SkewnessLevel::Normal);
        assert_eq!(SkewnessLevel::from_skewness(0.5), SkewnessLevel::Moderate);
        assert_eq!(SkewnessLevel::from_skewness(-1.0), SkewnessLevel::Moderate);
        assert_eq!(SkewnessLevel::from_skewness(1.5), SkewnessLevel::High);
        assert_eq!(SkewnessLevel::from_skewness(-2.0), SkewnessLevel::High);
        assert_eq!(SkewnessLevel::from_skewness(3.5), SkewnessLevel::Severe);
    }

    #[test]
    fn primary_summary_follows_level() {
        assert_eq!(SkewnessLevel::Normal.primary_summary(), PrimarySummary::Mean);
        for level in [
            SkewnessLevel::Moderate,
            SkewnessLevel::High,
            SkewnessLevel::Severe,
        ] {
            assert_eq!(level.primary_summary(), PrimarySummary::Median);
        }
    }

    #[test]
    fn measure_alignment_is_exhaustive() {
        for test in [
            TestType::StudentT,
            TestType::WelchT,
            TestType::Anova,
            TestType::WelchAnova,
        ] {
            assert!(EffectSizeMeasure::CohensD.aligns_with(test));
            assert!(!EffectSizeMeasure::CliffsDelta.aligns_with(test));
            assert_eq!(EffectSizeMeasure::for_test(test), EffectSizeMeasure::CohensD);
        }
        for test in [TestType::MannWhitney, TestType::KruskalWallis] {
            assert!(EffectSizeMeasure::CliffsDelta.aligns_with(test));
            assert!(!EffectSizeMeasure::CohensD.aligns_with(test));
        }
    }

    #[test]
    fn magnitude_bands() {
        assert_eq!(
            EffectMagnitude::classify(EffectSizeMeasure::CohensD, 0.1),
            EffectMagnitude::Negligible
        );
        assert_eq!(
            EffectMagnitude::classify(EffectSizeMeasure::CohensD, -0.6),
            EffectMagnitude::Medium
        );
        assert_eq!(
            EffectMagnitude::classify(EffectSizeMeasure::CliffsDelta, 0.5),
            EffectMagnitude::Large
        );
    }
}
