use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::filters::FilterCriteria;
use super::grouping::{group_by_event, EventGroup, EventGroups};
use super::metrics::{derive, DerivedMetrics};
use super::sorting::{sort_predictions, SortState};
use super::state::ViewState;
use crate::models::PredictionRecord;

/// One line of the sortable predictions table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub id: String,
    pub event: String,
    pub sport: String,
    pub league: String,
    pub market_type: String,
    pub prediction: String,
    pub probability: f64,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
}

/// A prediction inside an event card or the detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionCard {
    pub id: String,
    pub market_type: String,
    pub prediction: String,
    pub probability: f64,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
    pub factors: Vec<String>,
}

/// Event header plus its predictions, in fetch order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventCard {
    pub event: String,
    pub sport: String,
    pub league: String,
    pub event_date: DateTime<Utc>,
    /// e.g. "Sat 24 Oct 2026, 15:00 UTC"
    pub event_date_display: String,
    pub predictions: Vec<PredictionCard>,
}

/// Everything the renderer needs for one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub loading: bool,
    pub error: Option<String>,
    pub filters: FilterCriteria,
    pub sort: SortState,
    pub selected_event: Option<String>,
    pub table: Vec<TableRow>,
    pub events: Vec<EventCard>,
    pub detail: Option<EventCard>,
}

pub fn table_rows(predictions: &[PredictionRecord], sort: SortState) -> Vec<TableRow> {
    sort_predictions(predictions, sort)
        .into_iter()
        .map(|p| TableRow {
            id: p.id.clone(),
            event: p.event.clone(),
            sport: p.sport.clone(),
            league: p.league.clone(),
            market_type: p.market_type.clone(),
            prediction: p.prediction.clone(),
            probability: p.probability,
            metrics: derive(p),
        })
        .collect()
}

fn prediction_card(p: &PredictionRecord) -> PredictionCard {
    PredictionCard {
        id: p.id.clone(),
        market_type: p.market_type.clone(),
        prediction: p.prediction.clone(),
        probability: p.probability,
        metrics: derive(p),
        factors: p.factors.clone(),
    }
}

pub fn event_card(group: &EventGroup) -> EventCard {
    EventCard {
        event: group.event.clone(),
        sport: group.meta.sport.clone(),
        league: group.meta.league.clone(),
        event_date: group.meta.event_date,
        event_date_display: format_event_date(group.meta.event_date),
        predictions: group.predictions.iter().map(prediction_card).collect(),
    }
}

pub fn event_cards(groups: &EventGroups) -> Vec<EventCard> {
    groups.iter().map(event_card).collect()
}

/// Detail for `selected`; `None` when the event is not in the current set.
pub fn event_detail(groups: &EventGroups, selected: &str) -> Option<EventCard> {
    groups.get(selected).map(event_card)
}

pub fn format_event_date(date: DateTime<Utc>) -> String {
    date.format("%a %d %b %Y, %H:%M UTC").to_string()
}

/// Compose the table, grouped list and detail view from one state snapshot.
pub fn assemble(state: &ViewState) -> View {
    let predictions = state.predictions();
    let groups = group_by_event(predictions);
    let events = event_cards(&groups);
    let detail = state
        .selected_event()
        .and_then(|event| event_detail(&groups, event));
    debug!(
        "Assembled {} rows across {} events",
        predictions.len(),
        events.len()
    );

    View {
        loading: state.is_loading(),
        error: state.error().map(str::to_string),
        filters: state.filters().clone(),
        sort: state.sort(),
        selected_event: state.selected_event().map(str::to_string),
        table: table_rows(predictions, state.sort()),
        events,
        detail,
    }
}
