//! Exclusion list: persistent reductions and full exits.

use serde::{Deserialize, Serialize};

use super::format::{recent_changes, ReportedChange};
use crate::analysis::AnalysisMap;
use crate::domain::{AnalysisRecord, SecurityId, TransitionType};

/// Minimum reduction run that flags a security.
pub const MIN_DECREASE_RUN: usize = 2;
/// Reduction run at which severity becomes HIGH.
pub const HIGH_DECREASE_RUN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExclusionReason {
    ConsecutiveDecrease,
    Liquidated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionItem {
    pub id: SecurityId,
    pub name: String,
    pub reason: ExclusionReason,
    pub detail: String,
    pub severity: Severity,
    pub current_shares: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<u64>,
    /// Value held before a liquidation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_value: Option<u64>,
    pub changes: Vec<ReportedChange>,
}

/// Severity for a reduction run of `run` quarters.
pub fn decrease_severity(run: usize) -> Severity {
    if run >= HIGH_DECREASE_RUN {
        Severity::High
    } else {
        Severity::Medium
    }
}

/// Consecutive-decrease items first, then liquidation items.
///
/// The passes are independent, so a record can appear under both reasons.
pub fn build_exclusion_list(records: &AnalysisMap) -> Vec<ExclusionItem> {
    let decreases = records
        .values()
        .filter(|r| r.consecutive_decreases >= MIN_DECREASE_RUN)
        .map(consecutive_decrease_item);
    let liquidations = records
        .values()
        .filter(|r| r.latest_transition().map(|t| t.kind) == Some(TransitionType::Liquidated))
        .map(liquidation_item);
    decreases.chain(liquidations).collect()
}

fn consecutive_decrease_item(r: &AnalysisRecord) -> ExclusionItem {
    ExclusionItem {
        id: r.id.clone(),
        name: r.name.clone(),
        reason: ExclusionReason::ConsecutiveDecrease,
        detail: format!("{} consecutive quarterly reductions", r.consecutive_decreases),
        severity: decrease_severity(r.consecutive_decreases),
        current_shares: r.current_shares,
        current_value: Some(r.current_value),
        previous_value: None,
        changes: recent_changes(&r.transitions),
    }
}

fn liquidation_item(r: &AnalysisRecord) -> ExclusionItem {
    ExclusionItem {
        id: r.id.clone(),
        name: r.name.clone(),
        reason: ExclusionReason::Liquidated,
        detail: "fully liquidated".to_string(),
        severity: Severity::High,
        current_shares: 0,
        current_value: None,
        previous_value: Some(r.previous_value()),
        changes: recent_changes(&r.transitions),
    }
}
