use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::gateway::PredictionSource;
use crate::view::{Action, FetchRequest, ViewState};

/// The dashboard's single view session.
///
/// Holds the latest [`ViewState`] snapshot and runs the fetches that filter
/// changes ask for. Readers always see a whole snapshot.
#[derive(Clone)]
pub struct Session {
    state: Arc<RwLock<ViewState>>,
    source: Arc<dyn PredictionSource>,
}

impl Session {
    pub fn new(source: Arc<dyn PredictionSource>) -> Self {
        Session {
            state: Arc::new(RwLock::new(ViewState::default())),
            source,
        }
    }

    pub fn source(&self) -> &Arc<dyn PredictionSource> {
        &self.source
    }

    pub async fn snapshot(&self) -> ViewState {
        self.state.read().await.clone()
    }

    /// Apply a user action. Returns the handle of the fetch it started, if any.
    pub async fn dispatch(&self, action: Action) -> Option<JoinHandle<()>> {
        let request = self.apply(action).await?;
        Some(self.start_fetch(request))
    }

    async fn apply(&self, action: Action) -> Option<FetchRequest> {
        let mut state = self.state.write().await;
        let (next, request) = state.reduce(action);
        *state = next;
        request
    }

    fn start_fetch(&self, request: FetchRequest) -> JoinHandle<()> {
        let session = self.clone();
        tokio::spawn(async move {
            let ticket = request.ticket;
            let result = match session.source.fetch_predictions(&request.criteria).await {
                Ok(predictions) => {
                    info!(
                        "Fetch #{} returned {} predictions from {}",
                        ticket.0,
                        predictions.len(),
                        session.source.name()
                    );
                    Ok(predictions)
                }
                Err(e) => {
                    warn!("Fetch #{} from {} failed: {}", ticket.0, session.source.name(), e);
                    Err(e.user_message().to_string())
                }
            };
            session.apply(Action::FetchCompleted { ticket, result }).await;
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::gateway::FetchError;
    use crate::models::fixtures::record;
    use crate::models::{EventSummary, PredictionRecord};
    use crate::view::FilterCriteria;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Serves one record per request, named after the sport filter.
    /// "slow" sleeps first and "down" fails.
    pub struct FakeSource;

    #[async_trait]
    impl PredictionSource for FakeSource {
        fn name(&self) -> &str {
            "Fake"
        }

        async fn fetch_predictions(
            &self,
            criteria: &FilterCriteria,
        ) -> Result<Vec<PredictionRecord>, FetchError> {
            let sport = criteria.sport.clone().unwrap_or_default();
            match sport.as_str() {
                "slow" => tokio::time::sleep(Duration::from_millis(200)).await,
                "down" => {
                    return Err(FetchError::Decode(
                        serde_json::from_str::<Vec<u8>>("not json").unwrap_err(),
                    ))
                }
                "none" => return Ok(vec![]),
                _ => {}
            }
            let mut p = record(&format!("{}-1", sport), &format!("{} event", sport));
            p.sport = sport;
            Ok(vec![p])
        }

        async fn fetch_prediction(&self, id: &str) -> Result<Option<PredictionRecord>, FetchError> {
            Ok((id == "known").then(|| record("known", "Known event")))
        }

        async fn fetch_week_events(&self) -> Result<Vec<EventSummary>, FetchError> {
            Ok(vec![])
        }

        async fn fetch_weekend_events(&self) -> Result<Vec<EventSummary>, FetchError> {
            Ok(vec![])
        }

        async fn health(&self) -> Result<bool, FetchError> {
            Ok(true)
        }
    }

    fn sport(s: &str) -> Action {
        Action::SetFilters(FilterCriteria {
            sport: Some(s.to_string()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_dispatch_fetches_and_applies() {
        let session = Session::new(Arc::new(FakeSource));
        let handle = session.dispatch(sport("soccer")).await.unwrap();
        handle.await.unwrap();

        let state = session.snapshot().await;
        assert!(!state.is_loading());
        assert_eq!(state.predictions()[0].id, "soccer-1");
    }

    #[tokio::test]
    async fn test_slow_older_fetch_cannot_overwrite_newer() {
        let session = Session::new(Arc::new(FakeSource));
        let slow = session.dispatch(sport("slow")).await.unwrap();
        let fast = session.dispatch(sport("nba")).await.unwrap();
        fast.await.unwrap();
        slow.await.unwrap();

        let state = session.snapshot().await;
        assert_eq!(state.predictions().len(), 1);
        assert_eq!(state.predictions()[0].id, "nba-1");
        assert_eq!(state.filters().sport.as_deref(), Some("nba"));
    }

    #[tokio::test]
    async fn test_failure_becomes_single_message() {
        let session = Session::new(Arc::new(FakeSource));
        let ok = session.dispatch(sport("soccer")).await.unwrap();
        ok.await.unwrap();
        let failed = session.dispatch(sport("down")).await.unwrap();
        failed.await.unwrap();

        let state = session.snapshot().await;
        assert!(state.predictions().is_empty());
        assert_eq!(
            state.error(),
            Some(crate::gateway::error::LOAD_FAILED_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_non_fetch_actions_start_nothing() {
        let session = Session::new(Arc::new(FakeSource));
        assert!(session
            .dispatch(Action::ToggleSort(crate::view::SortField::League))
            .await
            .is_none());
        assert!(session.dispatch(Action::SelectEvent(None)).await.is_none());
    }
}
