use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use url::{ParseError, Url};

use super::error::FetchError;
use super::source::PredictionSource;
use crate::models::{EventSummary, PredictionRecord};
use crate::view::FilterCriteria;

/// HTTP client for the prediction service REST API.
#[derive(Clone)]
pub struct PredictionClient {
    http: Client,
    /// e.g. `http://localhost:8000/api`
    base_url: Url,
}

impl PredictionClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid prediction service URL: {}", base_url))?;
        Ok(PredictionClient { http, base_url })
    }

    /// `<base>/<segments...>` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL for `GET /predictions` with only the non-empty criteria attached.
    pub fn predictions_url(&self, criteria: &FilterCriteria) -> Result<Url, FetchError> {
        let mut url = self.endpoint(&["predictions"])?;
        let params = criteria.query_params();
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PredictionSource for PredictionClient {
    fn name(&self) -> &str {
        "PredictionService"
    }

    async fn fetch_predictions(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Vec<PredictionRecord>, FetchError> {
        let url = self.predictions_url(criteria)?;
        let predictions: Vec<PredictionRecord> = self.get_json(url).await?;
        info!("Fetched {} predictions", predictions.len());
        Ok(predictions)
    }

    async fn fetch_prediction(&self, id: &str) -> Result<Option<PredictionRecord>, FetchError> {
        let url = self.endpoint(&["predictions", id])?;
        match self.get_json(url).await {
            Ok(p) => Ok(Some(p)),
            Err(FetchError::Status { status, .. }) if status == StatusCode::NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn fetch_week_events(&self) -> Result<Vec<EventSummary>, FetchError> {
        let url = self.endpoint(&["events", "week"])?;
        let events: Vec<EventSummary> = self.get_json(url).await?;
        info!("Fetched {} events for the week", events.len());
        Ok(events)
    }

    async fn fetch_weekend_events(&self) -> Result<Vec<EventSummary>, FetchError> {
        let url = self.endpoint(&["events", "weekend"])?;
        let events: Vec<EventSummary> = self.get_json(url).await?;
        info!("Fetched {} events for the weekend", events.len());
        Ok(events)
    }

    async fn health(&self) -> Result<bool, FetchError> {
        // Health lives at the service root, outside the API prefix.
        let url = self.base_url.join("/health")?;
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Ok(false);
        }
        let raw: serde_json::Value = serde_json::from_str(&resp.text().await?)?;
        Ok(raw["status"].as_str() == Some("ok"))
    }
}
