//! Analysis pipeline stages.
//!
//! Each stage is usable on its own, but the intended flow (driven by
//! [`crate::engine`]) is: assumption diagnostics and test selection,
//! effect-size estimation with bootstrap intervals, power analysis, and
//! family-wise p-value correction.

pub mod bootstrap;
pub mod correction;
pub mod effect;
pub mod power;
pub mod selection;
