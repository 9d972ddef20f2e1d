//! Rank assignment with tie handling.
//!
//! The rank-based tests (Mann-Whitney, Kruskal-Wallis) need average ranks
//! over a pooled sample and the Σ t(t²−1) tie-correction factor for their
//! variance formulas.

/// Tolerance for treating two observations as tied.
const TIE_EPS: f64 = 1e-12;

/// Assign average ranks (1-based) to pre-sorted `(value, label)` pairs.
///
/// Tied positions receive the average of the ranks they span, which keeps
/// rank sums exact under ties.
pub fn average_ranks(sorted: &[(f64, usize)]) -> Vec<f64> {
    let n = sorted.len();
    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && (sorted[j].0 - sorted[i].0).abs() < TIE_EPS {
            j += 1;
        }
        // Positions i..j are tied; ranks i+1..=j average to (i+1 + j) / 2.
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for rank in ranks.iter_mut().take(j).skip(i) {
            *rank = avg_rank;
        }
        i = j;
    }
    ranks
}

/// Tie-correction factor Σ tₖ(tₖ² − 1) over all tie groups in a pre-sorted
/// sample.
pub fn tie_correction(sorted: &[(f64, usize)]) -> f64 {
    let n = sorted.len();
    let mut correction = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && (sorted[j].0 - sorted[i].0).abs() < TIE_EPS {
            j += 1;
        }
        let t = (j - i) as f64;
        if t > 1.0 {
            correction += t * (t * t - 1.0);
        }
        i = j;
    }
    correction
}
