use async_trait::async_trait;

use super::error::FetchError;
use crate::models::{EventSummary, PredictionRecord};
use crate::view::FilterCriteria;

/// Anything that can serve prediction queries.
#[async_trait]
pub trait PredictionSource: Send + Sync {
    /// All predictions matching `criteria`; filtering is the source's job.
    async fn fetch_predictions(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Vec<PredictionRecord>, FetchError>;

    /// A single prediction, or `None` when the id is unknown.
    async fn fetch_prediction(&self, id: &str) -> Result<Option<PredictionRecord>, FetchError>;

    /// Events over the next seven days, ordered by event date.
    async fn fetch_week_events(&self) -> Result<Vec<EventSummary>, FetchError>;

    /// Events on the coming Saturday and Sunday, ordered by event date.
    async fn fetch_weekend_events(&self) -> Result<Vec<EventSummary>, FetchError>;

    /// Whether the backend answers its health check.
    async fn health(&self) -> Result<bool, FetchError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
