//! Portfolio view: currently held positions ranked by value.

use serde::{Deserialize, Serialize};

use super::format::round2;
use crate::analysis::AnalysisMap;
use crate::domain::{SecurityId, TransitionType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentChange {
    pub percent: f64,
    #[serde(rename = "type")]
    pub kind: TransitionType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: SecurityId,
    pub name: String,
    pub shares: u64,
    /// Thousands of currency units.
    pub value: u64,
    pub value_in_millions: f64,
    pub most_recent_transition: Option<RecentChange>,
}

/// Held positions sorted by value, descending.
///
/// `sort_by` is stable, so equal values keep the map's identifier order.
pub fn build_portfolio(records: &AnalysisMap) -> Vec<PortfolioItem> {
    let mut items: Vec<PortfolioItem> = records
        .values()
        .filter(|r| r.is_held())
        .map(|r| PortfolioItem {
            id: r.id.clone(),
            name: r.name.clone(),
            shares: r.current_shares,
            value: r.current_value,
            value_in_millions: round2(r.current_value as f64 / 1000.0),
            most_recent_transition: r.latest_transition().map(|t| RecentChange {
                percent: round2(t.percent),
                kind: t.kind,
            }),
        })
        .collect();
    items.sort_by(|a, b| b.value.cmp(&a.value));
    items
}
