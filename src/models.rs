use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse confidence label assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::Low => "low",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proportional contribution of each signal source (each 0.0–1.0).
///
/// The three parts are expected to sum to 1.0 but the backend does not
/// guarantee it, so no invariant is enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceMix {
    pub analyst: f64,
    pub model: f64,
    pub context: f64,
}

/// One forecasted outcome as returned by `GET /predictions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: String,
    /// Match/game this prediction refers to; predictions are grouped on it
    pub event: String,
    #[serde(default)]
    pub sport: String,
    #[serde(default)]
    pub league: String,
    /// e.g. "moneyline", "player prop"
    pub market_type: String,
    /// Free-text description of the predicted outcome
    pub prediction: String,
    /// Percentage (0–100)
    pub probability: f64,
    pub confidence_tier: ConfidenceTier,
    pub source_mix: SourceMix,
    pub event_date: DateTime<Utc>,
    /// Human-readable rationale, in display order
    #[serde(default)]
    pub factors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Backend-grouped event with its predictions (week/weekend listings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub sport: String,
    pub league: String,
    pub event: String,
    pub event_date: DateTime<Utc>,
    pub predictions: Vec<PredictionRecord>,
}
