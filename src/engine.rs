//! The metric analysis pipeline.
//!
//! [`Engine::analyze_metric`] runs the full sequence for one metric:
//! profile each group, run the omnibus test when there are three or more
//! groups, resolve every pairwise comparison (test selection, bootstrap
//! effect size, power analysis), and apply Holm correction across the
//! pairwise family. The output is a [`MetricAnalysis`] whose invariants
//! were checked at construction.

use crate::analysis::correction::holm_correction;
use crate::analysis::effect::{cohens_f, compute_effect_size, eta_squared};
use crate::analysis::power::{analyze_anova_power, analyze_two_group_power, delta_to_d};
use crate::analysis::selection::select_test;
use crate::config::Config;
use crate::error::AnalysisError;
use crate::format::describe_comparison;
use crate::profile::SampleGroup;
use crate::result::{
    ComparisonResult, EffectSizeResult, MetricAnalysis, MultipleComparisonCorrection,
    OmnibusResult,
};
use crate::types::{CorrectionMethod, EffectSizeMeasure};

/// Statistical comparison engine with a validated configuration.
#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
}

impl Engine {
    /// Create an engine after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidConfig`] for out-of-range settings.
    pub fn new(config: Config) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Engine with default configuration.
    pub fn with_defaults() -> Self {
        Self { config: Config::default() }
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze one metric from raw named samples.
    ///
    /// Convenience over [`Engine::analyze_groups`]: profiles each group
    /// first, rejecting groups with fewer than two or non-finite
    /// observations.
    pub fn analyze_metric(
        &self,
        metric: &str,
        samples: &[(&str, &[f64])],
    ) -> Result<MetricAnalysis, AnalysisError> {
        let groups = samples
            .iter()
            .map(|(name, data)| SampleGroup::from_samples(*name, data))
            .collect::<Result<Vec<_>, _>>()?;
        self.analyze_groups(metric, groups)
    }

    /// Analyze one metric from pre-profiled groups.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::InsufficientSampleSize`] with fewer than two
    ///   groups.
    /// - [`AnalysisError::DegenerateDistribution`] if a group has zero
    ///   variance while the data are not all identical.
    pub fn analyze_groups(
        &self,
        metric: &str,
        groups: Vec<SampleGroup>,
    ) -> Result<MetricAnalysis, AnalysisError> {
        let k = groups.len();
        if k < 2 {
            return Err(AnalysisError::InsufficientSampleSize {
                context: format!("analysis of metric '{metric}'"),
                required: 2,
                actual: k,
            });
        }
        tracing::info!(metric, groups = k, "analyzing metric");

        let omnibus = if k >= 3 { Some(self.run_omnibus(metric, &groups)?) } else { None };

        // Pairwise comparisons in (i, j) order; their raw p-values form the
        // metric's correction family.
        let mut pending = Vec::new();
        let mut raw_p_values = Vec::new();
        let mut pair_index = 0;
        for i in 0..k {
            for j in (i + 1)..k {
                let pair = self.run_pair(metric, &groups[i], &groups[j], pair_index)?;
                raw_p_values.push(pair.p_value);
                pending.push((i, j, pair));
                pair_index += 1;
            }
        }

        let family_size = raw_p_values.len();
        let (method, adjusted_p, corrected_alpha) = if family_size == 1 {
            (CorrectionMethod::None, raw_p_values.clone(), self.config.alpha)
        } else {
            let out = holm_correction(&raw_p_values, self.config.alpha);
            (CorrectionMethod::Holm, out.adjusted_p, out.corrected_alpha)
        };
        tracing::debug!(metric, family_size, %method, "correction applied");

        let mut labels = Vec::with_capacity(family_size);
        let mut rejected = Vec::with_capacity(family_size);
        let comparisons: Vec<ComparisonResult> = pending
            .into_iter()
            .zip(adjusted_p.iter())
            .map(|((i, j, pair), &adj)| {
                let significant = !pair.exact_equality && adj <= self.config.alpha;
                labels.push(format!("{}-vs-{}", groups[i].name, groups[j].name));
                rejected.push(significant);
                let summary = describe_comparison(
                    &groups[i],
                    &groups[j],
                    &pair.effect,
                    significant,
                    adj,
                    &pair.power,
                );
                ComparisonResult {
                    group_a: groups[i].name.clone(),
                    group_b: groups[j].name.clone(),
                    test_type: pair.test_type,
                    statistic: pair.statistic,
                    p_value: pair.p_value,
                    adjusted_p_value: adj,
                    significant,
                    correction_method: method,
                    all_normal: pair.all_normal,
                    equal_variance: pair.equal_variance,
                    rationale: pair.rationale,
                    exact_equality: pair.exact_equality,
                    effect: pair.effect,
                    power: pair.power,
                    summary,
                }
            })
            .collect();

        let correction = MultipleComparisonCorrection::new(
            metric,
            method,
            self.config.alpha,
            corrected_alpha,
            labels,
            raw_p_values,
            adjusted_p,
            rejected,
        )?;

        Ok(MetricAnalysis {
            metric: metric.to_string(),
            groups,
            omnibus,
            comparisons,
            correction,
            alpha: self.config.alpha,
        })
    }

    fn run_omnibus(
        &self,
        metric: &str,
        groups: &[SampleGroup],
    ) -> Result<OmnibusResult, AnalysisError> {
        let selection = select_test(metric, groups, self.config.alpha)?;
        let sample_refs: Vec<&[f64]> = groups.iter().map(|g| g.samples.as_slice()).collect();
        let sizes: Vec<usize> = groups.iter().map(|g| g.n()).collect();

        let eta_sq = if selection.exact_equality { 0.0 } else { eta_squared(&sample_refs) };
        let f_effect = cohens_f(eta_sq);
        let power = analyze_anova_power(f_effect, &sizes, &self.config);
        let significant = !selection.exact_equality && selection.p_value <= self.config.alpha;

        Ok(OmnibusResult {
            test_type: selection.test_type,
            statistic: selection.statistic,
            p_value: selection.p_value,
            eta_squared: eta_sq,
            cohens_f: f_effect,
            significant,
            rationale: selection.rationale,
            power,
        })
    }

    fn run_pair(
        &self,
        metric: &str,
        a: &SampleGroup,
        b: &SampleGroup,
        pair_index: usize,
    ) -> Result<PendingComparison, AnalysisError> {
        let pair = [a.clone(), b.clone()];
        let selection = select_test(metric, &pair, self.config.alpha)?;
        let effect = compute_effect_size(
            metric,
            a,
            b,
            selection.test_type,
            selection.exact_equality,
            &self.config,
            pair_index,
        )?;

        // Power works on the d scale; rank effects are converted through
        // their normal-equivalent.
        let d_equivalent = if selection.exact_equality {
            0.0
        } else {
            match effect.measure {
                EffectSizeMeasure::CohensD => effect.value,
                EffectSizeMeasure::CliffsDelta => delta_to_d(effect.value),
            }
        };
        let power = analyze_two_group_power(d_equivalent, a.n(), b.n(), &self.config);

        Ok(PendingComparison {
            test_type: selection.test_type,
            statistic: selection.statistic,
            p_value: selection.p_value,
            all_normal: selection.all_normal,
            equal_variance: selection.equal_variance,
            rationale: selection.rationale,
            exact_equality: selection.exact_equality,
            effect,
            power,
        })
    }
}

/// A resolved pair before family-wise adjustment.
struct PendingComparison {
    test_type: crate::types::TestType,
    statistic: f64,
    p_value: f64,
    all_normal: bool,
    equal_variance: bool,
    rationale: String,
    exact_equality: bool,
    effect: EffectSizeResult,
    power: crate::analysis::power::PowerAnalysisResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TestType;

    fn engine() -> Engine {
        Engine::with_defaults()
    }

    #[test]
    fn rejects_invalid_config() {
        let err = Engine::new(Config::new().with_alpha(2.0)).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig { .. }));
    }

    #[test]
    fn single_pair_gets_no_correction() {
        let a: Vec<f64> = (0..12).map(|i| 10.0 + (i % 5) as f64 * 0.4).collect();
        let b: Vec<f64> = (0..12).map(|i| 12.0 + (i % 5) as f64 * 0.4).collect();
        let analysis = engine().analyze_metric("runtime", &[("a", &a), ("b", &b)]).unwrap();
        assert_eq!(analysis.comparisons.len(), 1);
        assert!(analysis.omnibus.is_none());
        assert_eq!(analysis.correction.method, CorrectionMethod::None);
        assert_eq!(
            analysis.comparisons[0].p_value,
            analysis.comparisons[0].adjusted_p_value
        );
    }

    #[test]
    fn three_groups_yield_omnibus_and_holm() {
        let a: Vec<f64> = (0..15).map(|i| 10.0 + (i % 6) as f64 * 0.5).collect();
        let b: Vec<f64> = (0..15).map(|i| 13.0 + (i % 6) as f64 * 0.5).collect();
        let c: Vec<f64> = (0..15).map(|i| 16.0 + (i % 6) as f64 * 0.5).collect();
        let analysis = engine()
            .analyze_metric("score", &[("a", &a), ("b", &b), ("c", &c)])
            .unwrap();

        assert_eq!(analysis.comparisons.len(), 3);
        let omnibus = analysis.omnibus.unwrap();
        assert!(!omnibus.test_type.is_two_group());
        assert!(omnibus.eta_squared > 0.5);
        assert_eq!(analysis.correction.method, CorrectionMethod::Holm);
        for c in &analysis.comparisons {
            assert!(c.adjusted_p_value >= c.p_value);
        }
    }

    #[test]
    fn exact_equality_metric() {
        let same = [5.0, 5.0, 5.0, 5.0];
        let analysis = engine()
            .analyze_metric("constant", &[("a", &same), ("b", &same)])
            .unwrap();
        let c = &analysis.comparisons[0];
        assert!(c.exact_equality);
        assert!(!c.significant);
        assert_eq!(c.p_value, 1.0);
        assert_eq!(c.effect.value, 0.0);
        assert!(c.summary.contains("identical observations"));
    }

    #[test]
    fn degenerate_group_is_an_error() {
        let constant = [5.0, 5.0, 5.0, 5.0];
        let varied = [1.0, 2.0, 3.0, 4.0];
        let err = engine()
            .analyze_metric("m", &[("const", &constant), ("varied", &varied)])
            .unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateDistribution { .. }));
    }

    #[test]
    fn fewer_than_two_groups_rejected() {
        let err = engine()
            .analyze_metric("m", &[("only", &[1.0, 2.0, 3.0])])
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientSampleSize { .. }));
    }

    #[test]
    fn results_are_deterministic() {
        let a: Vec<f64> = (0..10).map(|i| 1.0 + i as f64 * 0.3).collect();
        let b: Vec<f64> = (0..10).map(|i| 2.0 + i as f64 * 0.25).collect();
        let first = engine().analyze_metric("m", &[("a", &a), ("b", &b)]).unwrap();
        let second = engine().analyze_metric("m", &[("a", &a), ("b", &b)]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rank_test_effect_is_cliffs_delta() {
        // Heavy right tail in one group forces the non-parametric branch.
        let skewed = [1.0, 1.1, 1.2, 1.05, 1.15, 1.1, 40.0, 55.0, 70.0, 90.0];
        let normal = [5.0, 5.2, 5.4, 5.1, 5.3, 5.25, 5.15, 5.35, 5.05, 5.45];
        let analysis = engine()
            .analyze_metric("latency", &[("s", &skewed), ("n", &normal)])
            .unwrap();
        let c = &analysis.comparisons[0];
        assert_eq!(c.test_type, TestType::MannWhitney);
        assert_eq!(c.effect.measure, EffectSizeMeasure::CliffsDelta);
        assert!((-1.0..=1.0).contains(&c.effect.value));
    }
}
