use serde::{Deserialize, Serialize};

use super::ids::SecurityId;
use super::transition::Transition;
use super::PeriodDate;

/// Name resolved for a security that never reported one.
pub const UNKNOWN_NAME: &str = "UNKNOWN";

/// A security's holding in one period. Absent periods are zero-filled with `name: None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub date: PeriodDate,
    pub shares: u64,
    pub value: u64,
    pub name: Option<String>,
}

impl Observation {
    pub fn absent(date: impl Into<PeriodDate>) -> Self {
        Self {
            date: date.into(),
            shares: 0,
            value: 0,
            name: None,
        }
    }
}

/// Full trajectory of one security across the analyzed periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: SecurityId,
    pub name: String,
    /// One observation per input period, most recent first.
    pub history: Vec<Observation>,
    /// `history.len() - 1` transitions, most recent first.
    pub transitions: Vec<Transition>,
    pub consecutive_decreases: usize,
    pub consecutive_increases: usize,
    pub current_shares: u64,
    pub current_value: u64,
}

impl AnalysisRecord {
    pub fn latest_transition(&self) -> Option<&Transition> {
        self.transitions.first()
    }

    /// Value held in the period before the most recent one (0 if unavailable).
    pub fn previous_value(&self) -> u64 {
        self.history.get(1).map(|o| o.value).unwrap_or(0)
    }

    pub fn is_held(&self) -> bool {
        self.current_shares > 0
    }
}
