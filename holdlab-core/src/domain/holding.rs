use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::SecurityId;
use super::PeriodDate;

/// Aggregated position in one security for one disclosure period.
///
/// `value` is reported in thousands of currency units, as disclosed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub name: String,
    pub shares: u64,
    pub value: u64,
}

impl Holding {
    pub fn new(name: impl Into<String>, shares: u64, value: u64) -> Self {
        Self {
            name: name.into(),
            shares,
            value,
        }
    }
}

/// Per-period holdings, at most one entry per security.
pub type Holdings = BTreeMap<SecurityId, Holding>;

/// One disclosure period: its date key and the aggregated holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    pub date: PeriodDate,
    pub holdings: Holdings,
}

impl PeriodSnapshot {
    pub fn new(date: impl Into<PeriodDate>, holdings: Holdings) -> Self {
        Self {
            date: date.into(),
            holdings,
        }
    }

    /// Convenience constructor from `(id, name, shares, value)` tuples.
    pub fn from_rows<'a>(
        date: impl Into<PeriodDate>,
        rows: impl IntoIterator<Item = (&'a str, &'a str, u64, u64)>,
    ) -> Self {
        let holdings = rows
            .into_iter()
            .map(|(id, name, shares, value)| (SecurityId::from(id), Holding::new(name, shares, value)))
            .collect();
        Self::new(date, holdings)
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}
