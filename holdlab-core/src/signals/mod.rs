//! Signal classifier: exclusion list, watchlist, and portfolio view.
//!
//! Each view is derived independently from the same analysis map; a
//! security may appear in several of them. Output order depends only on the
//! map (ascending identifier) and the stable value sort, so identical input
//! serializes to identical bytes.

pub mod exclusion;
pub mod format;
pub mod portfolio;
pub mod watchlist;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisMap;
use crate::domain::PeriodDate;

pub use exclusion::{build_exclusion_list, decrease_severity, ExclusionItem, ExclusionReason, Severity};
pub use format::{recent_changes, round2, ReportedChange};
pub use portfolio::{build_portfolio, PortfolioItem, RecentChange};
pub use watchlist::{build_watchlist, WatchSignal, WatchlistItem};

/// Provenance attached to a report. Not used for classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub source: String,
    pub analyzed_periods: Vec<PeriodDate>,
    pub latest_period: Option<PeriodDate>,
    pub total_positions: usize,
}

/// The three classified views plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalReport {
    pub metadata: ReportMetadata,
    pub exclusion_list: Vec<ExclusionItem>,
    pub watchlist: Vec<WatchlistItem>,
    pub portfolio: Vec<PortfolioItem>,
}

/// Classify analysis records into the exclusion list, watchlist, and portfolio.
pub fn classify_signals(
    records: &AnalysisMap,
    period_dates: &[PeriodDate],
    source_label: &str,
) -> SignalReport {
    let portfolio = build_portfolio(records);
    SignalReport {
        metadata: ReportMetadata {
            source: source_label.to_string(),
            analyzed_periods: period_dates.to_vec(),
            latest_period: period_dates.first().cloned(),
            total_positions: portfolio.len(),
        },
        exclusion_list: build_exclusion_list(records),
        watchlist: build_watchlist(records),
        portfolio,
    }
}
