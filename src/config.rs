//! Configuration for the statistical comparison engine.

use crate::error::AnalysisError;

/// Default deterministic seed for bootstrap resampling.
///
/// This seed ensures reproducibility: same seed + same data = same result.
/// The value `0x67726F7570` is "group" encoded in ASCII.
pub const DEFAULT_SEED: u64 = 0x67726F7570;

/// Minimum bootstrap iterations accepted by [`Config::validate`].
pub const MIN_BOOTSTRAP_ITERATIONS: usize = 10_000;

/// Configuration options for metric analysis.
///
/// All stages share one configuration: the significance level drives both
/// assumption diagnostics and hypothesis tests, the target power drives
/// sample-size recommendations, and the base seed makes every bootstrap
/// reproducible independent of execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Significance level for diagnostics and hypothesis tests.
    ///
    /// Used by the Shapiro-Wilk and Levene pre-checks as well as the
    /// significance decisions on adjusted p-values. Default: 0.05.
    pub alpha: f64,

    /// Target statistical power for sample-size recommendations.
    ///
    /// When a comparison's achieved power falls below this target, the
    /// engine solves for the per-group sample size that would reach it.
    /// Default: 0.80.
    pub target_power: f64,

    /// Number of bootstrap resampling iterations per confidence interval.
    ///
    /// Must be at least [`MIN_BOOTSTRAP_ITERATIONS`]. Default: 10,000.
    pub bootstrap_iterations: usize,

    /// Base seed for deterministic bootstrap resampling.
    ///
    /// Each comparison derives its own seed from this base and a stable
    /// comparison identity, so results are reproducible under any degree
    /// of caller-side parallelism. Default: [`DEFAULT_SEED`].
    pub base_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            target_power: 0.80,
            bootstrap_iterations: MIN_BOOTSTRAP_ITERATIONS,
            base_seed: DEFAULT_SEED,
        }
    }
}

impl Config {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the significance level.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the target power for sample-size recommendations.
    pub fn with_target_power(mut self, target_power: f64) -> Self {
        self.target_power = target_power;
        self
    }

    /// Set the number of bootstrap iterations.
    pub fn with_bootstrap_iterations(mut self, iterations: usize) -> Self {
        self.bootstrap_iterations = iterations;
        self
    }

    /// Set the base seed for bootstrap resampling.
    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidConfig`] if alpha or target power are
    /// outside (0, 1), or if the bootstrap iteration count is below
    /// [`MIN_BOOTSTRAP_ITERATIONS`].
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(AnalysisError::InvalidConfig {
                message: format!("alpha must be in (0, 1), got {}", self.alpha),
            });
        }
        if !(self.target_power > 0.0 && self.target_power < 1.0) {
            return Err(AnalysisError::InvalidConfig {
                message: format!("target_power must be in (0, 1), got {}", self.target_power),
            });
        }
        if self.bootstrap_iterations < MIN_BOOTSTRAP_ITERATIONS {
            return Err(AnalysisError::InvalidConfig {
                message: format!(
                    "bootstrap_iterations must be at least {}, got {}",
                    MIN_BOOTSTRAP_ITERATIONS, self.bootstrap_iterations
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn builder_chain() {
        let config = Config::new()
            .with_alpha(0.01)
            .with_target_power(0.9)
            .with_bootstrap_iterations(20_000)
            .with_base_seed(7);
        assert!(config.validate().is_ok());
        assert_eq!(config.alpha, 0.01);
        assert_eq!(config.bootstrap_iterations, 20_000);
    }

    #[test]
    fn rejects_out_of_range_alpha() {
        assert!(Config::new().with_alpha(0.0).validate().is_err());
        assert!(Config::new().with_alpha(1.0).validate().is_err());
        assert!(Config::new().with_alpha(f64::NAN).validate().is_err());
    }

    #[test]
    fn rejects_too_few_bootstrap_iterations() {
        let err = Config::new()
            .with_bootstrap_iterations(9_999)
            .validate()
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig { .. }));
    }
}
