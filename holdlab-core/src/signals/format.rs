//! Reporting helpers shared by the signal lists.

use serde::{Deserialize, Serialize};

use crate::domain::{Transition, TransitionType};

/// Number of most recent transitions carried by a flagged item.
pub const RECENT_TRANSITIONS: usize = 4;

/// Round to two decimal places for reporting. Never returns `-0.0`.
pub fn round2(x: f64) -> f64 {
    let r = (x * 100.0).round() / 100.0;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

/// A transition as it appears in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedChange {
    /// `"<from> → <to>"`
    pub period: String,
    pub percent: f64,
    #[serde(rename = "type")]
    pub kind: TransitionType,
}

impl From<&Transition> for ReportedChange {
    fn from(t: &Transition) -> Self {
        Self {
            period: format!("{} → {}", t.from_date, t.to_date),
            percent: round2(t.percent),
            kind: t.kind,
        }
    }
}

/// The up-to-four most recent transitions, formatted.
pub fn recent_changes(transitions: &[Transition]) -> Vec<ReportedChange> {
    transitions
        .iter()
        .take(RECENT_TRANSITIONS)
        .map(ReportedChange::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(round2(20.0), 20.0);
        assert_eq!(round2(-33.333333), -33.33);
        assert_eq!(round2(12.345678), 12.35);
        assert_eq!(round2(0.001), 0.0);
    }

    #[test]
    fn tiny_negative_rounds_to_positive_zero() {
        assert_eq!(round2(-0.001).to_bits(), 0.0f64.to_bits());
        assert_eq!(round2(-0.0).to_bits(), 0.0f64.to_bits());
        assert_eq!(format!("{:.2}", round2(-0.004)), "0.00");
    }

    #[test]
    fn period_label_uses_arrow() {
        let t = Transition {
            kind: TransitionType::Decrease,
            percent: -12.3456,
            from_date: "2024-02-14".into(),
            to_date: "2024-05-15".into(),
        };
        let c = ReportedChange::from(&t);
        assert_eq!(c.period, "2024-02-14 → 2024-05-15");
        assert_eq!(c.percent, -12.35);
    }

    #[test]
    fn keeps_at_most_four() {
        let t: Vec<Transition> = (0..6)
            .map(|i| Transition {
                kind: TransitionType::Unchanged,
                percent: 0.0,
                from_date: format!("{}", i + 1),
                to_date: format!("{i}"),
            })
            .collect();
        let changes = recent_changes(&t);
        assert_eq!(changes.len(), 4);
        assert_eq!(changes[0].period, "1 → 0");
    }
}
