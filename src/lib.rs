//! Statistical comparison engine for multi-group benchmark data.
//!
//! Given per-group observations of a metric (e.g. completion time per
//! framework), the engine produces everything a comparative report needs:
//!
//! - Per-group distribution profiles with skewness classification, so
//!   skewed metrics lead with medians instead of means
//! - Assumption-driven test selection: Shapiro-Wilk and Levene diagnostics
//!   route each comparison to Student's t, Welch's t, Mann-Whitney U,
//!   one-way ANOVA, Welch's ANOVA, or Kruskal-Wallis
//! - Effect sizes aligned with the test family (Cohen's d or Cliff's
//!   delta) with deterministic percentile-bootstrap confidence intervals
//! - Analytic power analysis via noncentral distributions, with
//!   sample-size recommendations for underpowered comparisons
//! - Holm-Bonferroni correction across each metric's pairwise family
//!
//! Every result is reproducible: bootstrap streams are seeded from the
//! configured base seed and a stable comparison identity, so the same data
//! and configuration give bit-identical output regardless of execution
//! order.
//!
//! # Example
//!
//! ```
//! use groupwise::{Config, Engine};
//!
//! let engine = Engine::new(Config::default())?;
//! let a = [12.1, 11.8, 12.5, 12.0, 11.9, 12.3, 12.2, 11.7, 12.4, 12.6];
//! let b = [14.0, 13.6, 14.4, 13.9, 14.2, 13.8, 14.1, 13.7, 14.3, 14.5];
//! let analysis = engine.analyze_metric("completion_time", &[("alpha", &a), ("beta", &b)])?;
//!
//! let comparison = &analysis.comparisons[0];
//! assert!(comparison.effect.ci_lower <= comparison.effect.value);
//! assert!(comparison.effect.value <= comparison.effect.ci_upper);
//! # Ok::<(), groupwise::AnalysisError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod profile;
pub mod result;
pub mod statistics;
pub mod types;

pub use analysis::bootstrap::BootstrapCi;
pub use analysis::power::PowerAnalysisResult;
pub use analysis::selection::TestSelection;
pub use config::{Config, DEFAULT_SEED, MIN_BOOTSTRAP_ITERATIONS};
pub use engine::Engine;
pub use error::AnalysisError;
pub use profile::SampleGroup;
pub use result::{
    ComparisonResult, EffectSizeResult, MetricAnalysis, MultipleComparisonCorrection,
    OmnibusResult,
};
pub use types::{
    CorrectionMethod, EffectMagnitude, EffectSizeMeasure, PowerAdequacy, PrimarySummary,
    SkewnessLevel, TestType,
};
