use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::models::PredictionRecord;

/// Table column a user can sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Sport,
    League,
    Probability,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sport" => Ok(SortField::Sport),
            "league" => Ok(SortField::League),
            "probability" => Ok(SortField::Probability),
            other => Err(format!("unknown sort field: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    /// Highest probability first.
    fn default() -> Self {
        SortState {
            field: SortField::Probability,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    /// Column-header selection: the active field flips direction, a new
    /// field starts ascending.
    pub fn toggle(self, field: SortField) -> SortState {
        if field == self.field {
            SortState {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            SortState {
                field,
                direction: SortDirection::Asc,
            }
        }
    }
}

/// Return the predictions ordered by `state`. The input slice is left as is.
///
/// Probability compares numerically; sport and league compare
/// case-insensitively with an empty value sorting as "".
pub fn sort_predictions<'a>(
    predictions: &'a [PredictionRecord],
    state: SortState,
) -> Vec<&'a PredictionRecord> {
    let mut sorted: Vec<&PredictionRecord> = predictions.iter().collect();
    sorted.sort_by(|a, b| {
        let ord = compare(a, b, state.field);
        match state.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    sorted
}

fn compare(a: &PredictionRecord, b: &PredictionRecord, field: SortField) -> Ordering {
    match field {
        SortField::Probability => a
            .probability
            .partial_cmp(&b.probability)
            .unwrap_or(Ordering::Equal),
        SortField::Sport => a.sport.to_lowercase().cmp(&b.sport.to_lowercase()),
        SortField::League => a.league.to_lowercase().cmp(&b.league.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::record;

    fn with_probability(id: &str, probability: f64) -> PredictionRecord {
        let mut p = record(id, "A vs B");
        p.probability = probability;
        p
    }

    fn with_sport(id: &str, sport: &str) -> PredictionRecord {
        let mut p = record(id, "A vs B");
        p.sport = sport.to_string();
        p
    }

    fn by(field: SortField, direction: SortDirection) -> SortState {
        SortState { field, direction }
    }

    fn probabilities(sorted: &[&PredictionRecord]) -> Vec<f64> {
        sorted.iter().map(|p| p.probability).collect()
    }

    #[test]
    fn test_probability_ascending_and_descending() {
        let input = vec![
            with_probability("a", 10.0),
            with_probability("b", 5.0),
            with_probability("c", 20.0),
        ];
        let asc = sort_predictions(&input, by(SortField::Probability, SortDirection::Asc));
        assert_eq!(probabilities(&asc), vec![5.0, 10.0, 20.0]);

        let desc = sort_predictions(&input, by(SortField::Probability, SortDirection::Desc));
        assert_eq!(probabilities(&desc), vec![20.0, 10.0, 5.0]);
    }

    #[test]
    fn test_sport_is_case_insensitive() {
        let input = vec![
            with_sport("1", "Soccer"),
            with_sport("2", "baseball"),
            with_sport("3", "Tennis"),
        ];
        let asc = sort_predictions(&input, by(SortField::Sport, SortDirection::Asc));
        let sports: Vec<&str> = asc.iter().map(|p| p.sport.as_str()).collect();
        assert_eq!(sports, vec!["baseball", "Soccer", "Tennis"]);

        let desc = sort_predictions(&input, by(SortField::Sport, SortDirection::Desc));
        let sports: Vec<&str> = desc.iter().map(|p| p.sport.as_str()).collect();
        assert_eq!(sports, vec!["Tennis", "Soccer", "baseball"]);
    }

    #[test]
    fn test_empty_league_sorts_first_ascending() {
        let mut a = record("1", "X");
        a.league = "NBA".into();
        let mut b = record("2", "X");
        b.league = String::new();
        let input = vec![a, b];
        let asc = sort_predictions(&input, by(SortField::League, SortDirection::Asc));
        assert_eq!(asc[0].id, "2");
    }

    #[test]
    fn test_sorting_does_not_touch_input() {
        let input = vec![
            with_probability("a", 10.0),
            with_probability("b", 5.0),
            with_probability("c", 20.0),
        ];
        let before: Vec<*const PredictionRecord> = input.iter().map(|p| p as *const _).collect();

        let sorted = sort_predictions(&input, SortState::default());

        let after: Vec<*const PredictionRecord> = input.iter().map(|p| p as *const _).collect();
        assert_eq!(before, after);
        let ids: Vec<&str> = input.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        // Sorted output borrows the same records rather than copies.
        for s in &sorted {
            assert!(input.iter().any(|p| std::ptr::eq(*s, p)));
        }
    }

    #[test]
    fn test_toggle_same_field_flips_each_time() {
        let state = by(SortField::Sport, SortDirection::Asc);
        let once = state.toggle(SortField::Sport);
        assert_eq!(once.direction, SortDirection::Desc);
        let twice = once.toggle(SortField::Sport);
        assert_eq!(twice.direction, SortDirection::Asc);
        assert_eq!(twice.field, SortField::Sport);
    }

    #[test]
    fn test_toggle_new_field_resets_to_ascending() {
        let state = by(SortField::Probability, SortDirection::Desc);
        let next = state.toggle(SortField::League);
        assert_eq!(next, by(SortField::League, SortDirection::Asc));

        let from_asc = by(SortField::Sport, SortDirection::Asc);
        assert_eq!(
            from_asc.toggle(SortField::Probability).direction,
            SortDirection::Asc
        );
    }

    #[test]
    fn test_default_is_probability_descending() {
        assert_eq!(
            SortState::default(),
            by(SortField::Probability, SortDirection::Desc)
        );
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("league".parse::<SortField>(), Ok(SortField::League));
        assert!("market_type".parse::<SortField>().is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(sort_predictions(&[], SortState::default()).is_empty());
    }
}
