//! Per-group distribution profiling.
//!
//! A [`SampleGroup`] is constructed once per (metric, group) from
//! caller-supplied observations and is immutable thereafter. Construction
//! computes the descriptive statistics and the skewness classification that
//! later stages (test selection, report phrasing) key off.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::statistics::{mean, median, quantile, sample_std_dev, sample_variance, skewness};
use crate::types::{PrimarySummary, SkewnessLevel};

/// A named group of observations with its distribution profile.
///
/// Invariant: `skewness_level` and `primary_summary` are deterministic
/// functions of `skewness` (thresholds 0.5 / 1.0 / 2.0), established at
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleGroup {
    /// Group identifier (e.g. a framework name).
    pub name: String,
    /// The raw observations, in caller order.
    pub samples: Vec<f64>,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median.
    pub median: f64,
    /// Sample standard deviation (n−1 denominator).
    pub std_dev: f64,
    /// First quartile (linear interpolation).
    pub q1: f64,
    /// Third quartile (linear interpolation).
    pub q3: f64,
    /// Fisher-Pearson skewness coefficient.
    pub skewness: f64,
    /// Skewness classification.
    pub skewness_level: SkewnessLevel,
    /// Which central-tendency statistic should lead in reports.
    pub primary_summary: PrimarySummary,
    /// Caller-visible note for severely skewed distributions.
    pub note: Option<String>,
}

impl SampleGroup {
    /// Profile a group of observations.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::InsufficientSampleSize`] if fewer than 2
    ///   observations are supplied (the sample standard deviation is
    ///   undefined below that).
    /// - [`AnalysisError::NonFiniteSample`] if any observation is NaN or
    ///   infinite.
    pub fn from_samples(name: impl Into<String>, samples: &[f64]) -> Result<Self, AnalysisError> {
        let name = name.into();

        if samples.len() < 2 {
            return Err(AnalysisError::InsufficientSampleSize {
                context: format!("distribution profile of group '{name}'"),
                required: 2,
                actual: samples.len(),
            });
        }
        if let Some(&bad) = samples.iter().find(|v| !v.is_finite()) {
            return Err(AnalysisError::NonFiniteSample { group: name, value: bad });
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let skew = skewness(samples);
        let level = SkewnessLevel::from_skewness(skew);
        let note = match level {
            SkewnessLevel::Severe => Some(format!(
                "group '{name}' is severely skewed (skewness {skew:.2}); \
                 mean-based summaries are unreliable, median and quartiles are reported instead"
            )),
            SkewnessLevel::Normal | SkewnessLevel::Moderate | SkewnessLevel::High => None,
        };

        Ok(Self {
            mean: mean(samples),
            median: quantile(&sorted, 0.5),
            std_dev: sample_std_dev(samples),
            q1: quantile(&sorted, 0.25),
            q3: quantile(&sorted, 0.75),
            skewness: skew,
            skewness_level: level,
            primary_summary: level.primary_summary(),
            note,
            samples: samples.to_vec(),
            name,
        })
    }

    /// Number of observations.
    pub fn n(&self) -> usize {
        self.samples.len()
    }

    /// Sample variance (n−1 denominator).
    pub fn variance(&self) -> f64 {
        sample_variance(&self.samples)
    }

    /// Whether every observation in the group is identical.
    pub fn is_constant(&self) -> bool {
        self.samples
            .iter()
            .all(|&x| (x - self.samples[0]).abs() < 1e-12)
    }
}
