use serde::Serialize;
use std::collections::HashMap;

use crate::models::PredictionRecord;

/// Predictions sharing one `event` value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventGroup {
    pub event: String,
    /// First record seen for this event; only its event-level fields
    /// (sport, league, event_date) are meant for display.
    pub meta: PredictionRecord,
    /// Every record with this event, in input order
    pub predictions: Vec<PredictionRecord>,
}

/// Event groups keyed by event name, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventGroups {
    groups: Vec<EventGroup>,
    /// event → position in `groups`
    index: HashMap<String, usize>,
}

impl EventGroups {
    pub fn get(&self, event: &str) -> Option<&EventGroup> {
        self.index.get(event).map(|&i| &self.groups[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventGroup> {
        self.groups.iter()
    }
}

/// Partition predictions by event. Grouping is stable and keys keep the
/// position of their first occurrence.
pub fn group_by_event(predictions: &[PredictionRecord]) -> EventGroups {
    let mut out = EventGroups::default();
    for p in predictions {
        match out.index.get(&p.event) {
            Some(&i) => out.groups[i].predictions.push(p.clone()),
            None => {
                out.index.insert(p.event.clone(), out.groups.len());
                out.groups.push(EventGroup {
                    event: p.event.clone(),
                    meta: p.clone(),
                    predictions: vec![p.clone()],
                });
            }
        }
    }
    out
}
