//! Neutral report phrasing.
//!
//! Produces the prose fragments a comparative report embeds: APA-style
//! p-value formatting and a one-sentence summary per comparison. The
//! phrasing is deliberately descriptive; it states direction, magnitude,
//! and uncertainty without causal language, and an underpowered
//! non-significant result is flagged rather than read as evidence of
//! equivalence.

use crate::analysis::power::PowerAnalysisResult;
use crate::profile::SampleGroup;
use crate::result::EffectSizeResult;
use crate::types::{EffectSizeMeasure, PowerAdequacy, PrimarySummary};

/// Format a p-value the way reports quote them: `p < 0.001` below that
/// threshold, `p = 0.042` otherwise (three decimals).
pub fn format_p_value(p: f64) -> String {
    if p < 0.001 {
        "p < 0.001".to_string()
    } else {
        format!("p = {p:.3}")
    }
}

/// Format an effect size with its interval, e.g.
/// `Cohen's d = 0.62 (95% CI [0.21, 1.05], medium)`.
pub fn format_effect(effect: &EffectSizeResult) -> String {
    format!(
        "{} = {:.2} (95% CI [{:.2}, {:.2}], {})",
        effect.measure, effect.value, effect.ci_lower, effect.ci_upper, effect.magnitude
    )
}

/// One-sentence neutral summary of a pairwise comparison.
pub fn describe_comparison(
    a: &SampleGroup,
    b: &SampleGroup,
    effect: &EffectSizeResult,
    significant: bool,
    adjusted_p: f64,
    power: &PowerAnalysisResult,
) -> String {
    if effect.exact_equality {
        return format!(
            "'{}' and '{}' have identical observations on this metric; no difference to report",
            a.name, b.name
        );
    }

    // Complete dominance deserves stronger wording than a p-value.
    if effect.measure == EffectSizeMeasure::CliffsDelta && effect.value.abs() >= 1.0 - 1e-9 {
        let (high, low) = if effect.value > 0.0 { (a, b) } else { (b, a) };
        return format!(
            "every observation of '{}' exceeds every observation of '{}' \
             ({}, {})",
            high.name,
            low.name,
            format_effect(effect),
            format_p_value(adjusted_p)
        );
    }

    let p_text = format_p_value(adjusted_p);
    if significant {
        let direction = if effect.value > 0.0 { "higher" } else { "lower" };
        format!(
            "'{}' scored {direction} than '{}' ({}, {}, {})",
            a.name,
            b.name,
            central_tendency(a, b),
            format_effect(effect),
            p_text
        )
    } else {
        match power.adequacy {
            PowerAdequacy::Insufficient => {
                let achieved = power
                    .achieved_power
                    .map(|p| format!("{:.0}%", p * 100.0))
                    .unwrap_or_else(|| "unknown".to_string());
                let recommendation = power
                    .recommended_n_per_group
                    .map(|n| format!("; about {n} observations per group would be needed"))
                    .unwrap_or_default();
                format!(
                    "no significant difference between '{}' and '{}' ({}), but achieved \
                     power was only {achieved} for the observed effect, so a real \
                     difference of this size could have been missed{recommendation}",
                    a.name, b.name, p_text
                )
            }
            PowerAdequacy::Indeterminate => format!(
                "no significant difference between '{}' and '{}' ({}); the sample is too \
                 small to assess whether the comparison had adequate power",
                a.name, b.name, p_text
            ),
            PowerAdequacy::Sufficient => format!(
                "no significant difference between '{}' and '{}' ({}), with adequate power \
                 ({:.0}%) to detect the observed effect",
                a.name,
                b.name,
                p_text,
                power.achieved_power.unwrap_or(0.0) * 100.0
            ),
        }
    }
}

// Quote medians when either distribution is skewed enough that its mean is
// not the leading summary.
fn central_tendency(a: &SampleGroup, b: &SampleGroup) -> String {
    let use_median = a.primary_summary == PrimarySummary::Median
        || b.primary_summary == PrimarySummary::Median;
    if use_median {
        format!(
            "median {:.2} vs {:.2}",
            a.median, b.median
        )
    } else {
        format!("mean {:.2} vs {:.2}", a.mean, b.mean)
    }
}
