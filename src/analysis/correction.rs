//! Holm-Bonferroni multiple-comparison correction.
//!
//! All pairwise comparisons of one metric form a single correction family.
//! Holm's step-down procedure controls the family-wise error rate at alpha
//! while being uniformly more powerful than plain Bonferroni.
//!
//! # References
//!
//! - Holm (1979). "A simple sequentially rejective multiple test
//!   procedure". Scandinavian Journal of Statistics, 6(2), 65–70.

use serde::{Deserialize, Serialize};

/// Outcome of applying Holm's procedure to a family of raw p-values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolmOutcome {
    /// Adjusted p-values, in the same order as the input.
    pub adjusted_p: Vec<f64>,
    /// Whether each hypothesis is rejected at the family-wise alpha.
    pub rejected: Vec<bool>,
    /// The Bonferroni floor alpha/m, reported alongside for context.
    pub corrected_alpha: f64,
}

/// Apply the Holm step-down procedure.
///
/// Raw p-values are sorted ascending; the i-th smallest (0-based) is
/// multiplied by m−i, and a running maximum enforces monotonicity of the
/// adjusted sequence. Adjusted values are clipped to [0, 1] and a
/// hypothesis is rejected when its adjusted p-value is at most `alpha`.
///
/// Adjusted p-values are never smaller than the raw ones, and a family of
/// size one is returned unchanged.
pub fn holm_correction(p_values: &[f64], alpha: f64) -> HolmOutcome {
    let m = p_values.len();
    if m == 0 {
        return HolmOutcome {
            adjusted_p: Vec::new(),
            rejected: Vec::new(),
            corrected_alpha: alpha,
        };
    }

    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&i, &j| p_values[i].total_cmp(&p_values[j]));

    let mut adjusted = vec![0.0; m];
    let mut running_max = 0.0_f64;
    for (rank, &idx) in order.iter().enumerate() {
        let stepwise = p_values[idx] * (m - rank) as f64;
        running_max = running_max.max(stepwise).min(1.0);
        adjusted[idx] = running_max;
    }

    let rejected = adjusted.iter().map(|&p| p <= alpha).collect();
    HolmOutcome {
        adjusted_p: adjusted,
        rejected,
        corrected_alpha: alpha / m as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_comparison_unchanged() {
        let out = holm_correction(&[0.03], 0.05);
        assert_eq!(out.adjusted_p, vec![0.03]);
        assert_eq!(out.rejected, vec![true]);
        assert_eq!(out.corrected_alpha, 0.05);
    }

    #[test]
    fn holm_worked_example() {
        // Sorted: 0.005, 0.01, 0.03, 0.04 with multipliers 4, 3, 2, 1:
        // stepwise 0.02, 0.03, 0.06, 0.04; running max gives
        // 0.02, 0.03, 0.06, 0.06 mapped back to input order.
        let raw = [0.01, 0.04, 0.03, 0.005];
        let out = holm_correction(&raw, 0.05);
        let expected = [0.03, 0.06, 0.06, 0.02];
        for (a, e) in out.adjusted_p.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-12, "adjusted={:?}", out.adjusted_p);
        }
        assert_eq!(out.rejected, vec![true, false, false, true]);
        assert!((out.corrected_alpha - 0.0125).abs() < 1e-12);
    }

    #[test]
    fn adjusted_never_below_raw() {
        let raw = [0.001, 0.2, 0.05, 0.8, 0.013];
        let out = holm_correction(&raw, 0.05);
        for (adj, r) in out.adjusted_p.iter().zip(raw.iter()) {
            assert!(adj >= r);
        }
    }

    #[test]
    fn adjusted_clipped_to_one() {
        let out = holm_correction(&[0.6, 0.7, 0.9], 0.05);
        for p in &out.adjusted_p {
            assert!(*p <= 1.0);
        }
        assert_eq!(out.rejected, vec![false, false, false]);
    }

    #[test]
    fn monotone_in_sorted_order() {
        let raw = [0.04, 0.001, 0.02, 0.015, 0.3];
        let out = holm_correction(&raw, 0.05);
        let mut pairs: Vec<(f64, f64)> =
            raw.iter().copied().zip(out.adjusted_p.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        for w in pairs.windows(2) {
            assert!(w[0].1 <= w[1].1, "adjusted order violates monotonicity: {pairs:?}");
        }
    }

    #[test]
    fn empty_family_is_a_no_op() {
        let out = holm_correction(&[], 0.05);
        assert!(out.adjusted_p.is_empty());
    }
}
