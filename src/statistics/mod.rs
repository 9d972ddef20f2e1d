//! Low-level numeric building blocks.
//!
//! This module provides the scalar statistics the analysis layer is built
//! on:
//! - Descriptive statistics (mean, sample variance, interpolated quantiles,
//!   Fisher-Pearson skewness)
//! - Rank assignment with tie handling for the rank-based tests
//! - Central and noncentral distribution functions for p-values and
//!   analytic power

mod descriptive;
mod distribution;
mod rank;

pub use descriptive::{mean, median, quantile, sample_std_dev, sample_variance, skewness};
pub use distribution::{
    chi_squared_sf, f_critical_value, f_sf, noncentral_f_cdf, noncentral_t_cdf, normal_cdf,
    normal_quantile, students_t_critical_value, students_t_sf,
};
pub use rank::{average_ranks, tie_correction};
