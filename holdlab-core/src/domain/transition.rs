use serde::{Deserialize, Serialize};
use std::fmt;

use super::PeriodDate;

/// Classified change of a holding between two adjacent periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionType {
    New,
    Increase,
    Decrease,
    Liquidated,
    Unchanged,
}

impl TransitionType {
    /// Member of the reduction run set {DECREASE, LIQUIDATED}.
    pub fn is_reduction(self) -> bool {
        matches!(self, Self::Decrease | Self::Liquidated)
    }

    /// Member of the accumulation run set {INCREASE, NEW}.
    pub fn is_accumulation(self) -> bool {
        matches!(self, Self::Increase | Self::New)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Increase => "INCREASE",
            Self::Decrease => "DECREASE",
            Self::Liquidated => "LIQUIDATED",
            Self::Unchanged => "UNCHANGED",
        }
    }
}

impl fmt::Display for TransitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Change between the observation at `from_date` and the more recent one at `to_date`.
///
/// `percent` is unrounded; rounding happens when signals are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    #[serde(rename = "type")]
    pub kind: TransitionType,
    pub percent: f64,
    pub from_date: PeriodDate,
    pub to_date: PeriodDate,
}
