//! User-selected filter criteria.
//!
//! Filtering happens server-side: the criteria are only turned into request
//! parameters, never evaluated against records locally.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::PredictionRecord;

/// Constraints narrowing which predictions are fetched.
///
/// `None` or an empty string means "no constraint" on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default)]
    pub league: Option<String>,
    #[serde(default)]
    pub market_type: Option<String>,
    /// "low" | "medium" | "high"
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_to: Option<DateTime<Utc>>,
}

impl FilterCriteria {
    /// Query parameters for `GET /predictions`, in a fixed order.
    /// Empty fields are omitted entirely rather than sent blank.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let text_fields = [
            ("sport", &self.sport),
            ("league", &self.league),
            ("market_type", &self.market_type),
            ("confidence", &self.confidence),
        ];

        let mut params: Vec<(&'static str, String)> = text_fields
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .map(|v| (key, v.to_string()))
            })
            .collect();

        if let Some(from) = self.date_from {
            params.push(("date_from", from.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(to) = self.date_to {
            params.push(("date_to", to.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        params
    }

    pub fn is_unconstrained(&self) -> bool {
        self.query_params().is_empty()
    }
}

/// Filter dimensions offered as suggestions in the filter inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub sports: Vec<String>,
    pub leagues: Vec<String>,
    pub market_types: Vec<String>,
}

/// Distinct non-empty values per dimension, in first-seen order.
pub fn filter_options(predictions: &[PredictionRecord]) -> FilterOptions {
    FilterOptions {
        sports: distinct(predictions.iter().map(|p| p.sport.as_str())),
        leagues: distinct(predictions.iter().map(|p| p.league.as_str())),
        market_types: distinct(predictions.iter().map(|p| p.market_type.as_str())),
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values.filter(|v| !v.is_empty()) {
        if !out.iter().any(|seen| seen == v) {
            out.push(v.to_string());
        }
    }
    out
}
