//! Presentation values derived from a single prediction record.
//!
//! Source-mix percentages are rounded one component at a time. Three parts
//! of roughly a third each display as 33/33/33, and that 99% total is shown
//! as-is rather than being nudged back to 100.

use serde::Serialize;

use crate::models::{ConfidenceTier, PredictionRecord, SourceMix};

/// Whole-number source-mix percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceMixPercent {
    pub analyst: i64,
    pub model: i64,
    pub context: i64,
}

impl SourceMixPercent {
    /// "analyst 33% · model 33% · context 33%"
    pub fn label(&self) -> String {
        format!(
            "analyst {}% · model {}% · context {}%",
            self.analyst, self.model, self.context
        )
    }
}

pub fn source_mix_percent(mix: &SourceMix) -> SourceMixPercent {
    SourceMixPercent {
        analyst: to_percent(mix.analyst),
        model: to_percent(mix.model),
        context: to_percent(mix.context),
    }
}

fn to_percent(share: f64) -> i64 {
    (share * 100.0).round() as i64
}

/// Visual tag for a confidence tier. The tier is passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfidenceBadge {
    pub tier: ConfidenceTier,
    /// Style class, e.g. "badge high"
    pub class: &'static str,
}

pub fn confidence_badge(tier: ConfidenceTier) -> ConfidenceBadge {
    let class = match tier {
        ConfidenceTier::Low => "badge low",
        ConfidenceTier::Medium => "badge medium",
        ConfidenceTier::High => "badge high",
    };
    ConfidenceBadge { tier, class }
}

/// Probability with one decimal place, e.g. `61.5%` or `55.0%`.
///
/// A value sitting exactly halfway between two tenths rounds away from zero,
/// so `61.25` shows as `61.3%`. Values that only look like a tie in decimal
/// (`0.15` is stored just below it) round to the nearer tenth.
pub fn probability_display(probability: f64) -> String {
    match exact_twentieths(probability) {
        Some(twentieths) if twentieths % 2.0 != 0.0 => {
            format!("{:.1}%", (twentieths + twentieths.signum()) / 20.0)
        }
        _ => format!("{:.1}%", probability),
    }
}

/// `x * 20` when that product is an exact integer.
fn exact_twentieths(x: f64) -> Option<f64> {
    // Scaling by powers of two is exact; the sum's rounding error is recovered
    // with a two-sum so near-ties like 0.15 are not mistaken for ties.
    let (a, b) = (x * 4.0, x * 16.0);
    let sum = a + b;
    let b_part = sum - a;
    let error = (a - (sum - b_part)) + (b - b_part);
    (error == 0.0 && sum.is_finite() && sum.fract() == 0.0).then_some(sum)
}

/// All derived values for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub probability_display: String,
    pub badge: ConfidenceBadge,
    pub source_mix: SourceMixPercent,
    pub source_mix_label: String,
}

pub fn derive(p: &PredictionRecord) -> DerivedMetrics {
    let source_mix = source_mix_percent(&p.source_mix);
    DerivedMetrics {
        probability_display: probability_display(p.probability),
        badge: confidence_badge(p.confidence_tier),
        source_mix_label: source_mix.label(),
        source_mix,
    }
}
