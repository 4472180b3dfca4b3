//! Immutable view-state snapshots and the single update entry point.
//!
//! Every user action and every fetch completion goes through
//! [`ViewState::reduce`], which returns the next snapshot plus, for filter
//! edits, the fetch that must be started. Each fetch carries a
//! [`FetchTicket`]; completions for anything older than the most recently
//! issued ticket are dropped so a slow early response can never overwrite
//! the results of a newer filter.

use std::sync::Arc;
use tracing::debug;

use super::filters::FilterCriteria;
use super::sorting::{SortField, SortState};
use crate::models::PredictionRecord;

/// Monotonic identifier of a fetch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(pub u64);

/// A fetch the caller must run and report back via [`Action::FetchCompleted`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub criteria: FilterCriteria,
}

#[derive(Debug)]
pub enum Action {
    /// Replace the filter criteria and fetch again
    SetFilters(FilterCriteria),
    /// Column-header click
    ToggleSort(SortField),
    /// Select an event for the detail view, or close it with `None`
    SelectEvent(Option<String>),
    /// Outcome of a fetch; the error is the user-facing message
    FetchCompleted {
        ticket: FetchTicket,
        result: Result<Vec<PredictionRecord>, String>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    filters: FilterCriteria,
    sort: SortState,
    /// Shared between snapshots; replaced wholesale on each applied fetch
    predictions: Arc<Vec<PredictionRecord>>,
    selected_event: Option<String>,
    error: Option<String>,
    loading: bool,
    last_issued: u64,
}

impl ViewState {
    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn predictions(&self) -> &[PredictionRecord] {
        &self.predictions
    }

    pub fn selected_event(&self) -> Option<&str> {
        self.selected_event.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Apply one action, returning the next snapshot and any fetch to start.
    pub fn reduce(&self, action: Action) -> (ViewState, Option<FetchRequest>) {
        let mut next = self.clone();
        match action {
            Action::SetFilters(criteria) => {
                next.last_issued += 1;
                next.filters = criteria.clone();
                next.loading = true;
                next.error = None;
                let request = FetchRequest {
                    ticket: FetchTicket(next.last_issued),
                    criteria,
                };
                (next, Some(request))
            }
            Action::ToggleSort(field) => {
                next.sort = self.sort.toggle(field);
                (next, None)
            }
            Action::SelectEvent(event) => {
                next.selected_event = event;
                (next, None)
            }
            Action::FetchCompleted { ticket, result } => {
                if ticket.0 < self.last_issued {
                    debug!(
                        "Discarding stale fetch result (ticket {} < latest {})",
                        ticket.0, self.last_issued
                    );
                    return (next, None);
                }
                next.loading = false;
                match result {
                    Ok(predictions) => {
                        next.predictions = Arc::new(predictions);
                        next.error = None;
                    }
                    Err(message) => {
                        next.predictions = Arc::new(Vec::new());
                        next.error = Some(message);
                    }
                }
                (next, None)
            }
        }
    }
}
