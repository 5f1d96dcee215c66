//! Watchlist: new positions and persistent accumulation.

use serde::{Deserialize, Serialize};

use super::format::{recent_changes, ReportedChange};
use crate::analysis::AnalysisMap;
use crate::domain::{AnalysisRecord, SecurityId, TransitionType};

/// Minimum accumulation run that flags a security.
pub const MIN_INCREASE_RUN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WatchSignal {
    NewPosition,
    ConsecutiveIncrease,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    pub id: SecurityId,
    pub name: String,
    pub signal: WatchSignal,
    pub detail: String,
    pub current_shares: u64,
    pub current_value: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Vec<ReportedChange>>,
}

/// New-position items first, then accumulation items.
pub fn build_watchlist(records: &AnalysisMap) -> Vec<WatchlistItem> {
    let new_positions = records
        .values()
        .filter(|r| r.latest_transition().map(|t| t.kind) == Some(TransitionType::New))
        .map(new_position_item);
    let accumulating = records
        .values()
        .filter(|r| r.consecutive_increases >= MIN_INCREASE_RUN && r.is_held())
        .map(accumulation_item);
    new_positions.chain(accumulating).collect()
}

fn new_position_item(r: &AnalysisRecord) -> WatchlistItem {
    WatchlistItem {
        id: r.id.clone(),
        name: r.name.clone(),
        signal: WatchSignal::NewPosition,
        detail: "new position".to_string(),
        current_shares: r.current_shares,
        current_value: r.current_value,
        changes: None,
    }
}

fn accumulation_item(r: &AnalysisRecord) -> WatchlistItem {
    WatchlistItem {
        id: r.id.clone(),
        name: r.name.clone(),
        signal: WatchSignal::ConsecutiveIncrease,
        detail: format!("{} consecutive quarterly increases", r.consecutive_increases),
        current_shares: r.current_shares,
        current_value: r.current_value,
        changes: Some(recent_changes(&r.transitions)),
    }
}
