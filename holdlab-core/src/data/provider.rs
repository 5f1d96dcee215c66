//! Holdings provider trait and structured error types.
//!
//! The HoldingsProvider trait abstracts over filing sources (SEC EDGAR, local
//! snapshot files, test doubles). The engine never sees a provider; the
//! pipeline turns provider output into period snapshots.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::domain::{Holdings, PeriodDate};

/// Reference to one 13F-HR filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filing {
    pub filing_date: PeriodDate,
    pub accession_number: String,
}

/// Structured error types for data operations.
///
/// These are designed to be displayable in CLI, log, and HTTP contexts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    Network(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("hard stop: provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("no 13F-HR filings found for CIK {cik}")]
    NoFilings { cik: String },

    #[error("filing document not found: {0}")]
    DocumentNotFound(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// Whether the error came from talking to the upstream service.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::RateLimited { .. }
                | Self::CircuitBreakerTripped
                | Self::ResponseFormatChanged(_)
                | Self::DocumentNotFound(_)
                | Self::Parse(_)
        )
    }
}

/// Trait for filing sources.
///
/// Implementations handle the specifics of one source. Caching sits above
/// this trait; providers don't know about it.
pub trait HoldingsProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// 13F-HR filings for a filer, most recent first.
    fn filings(&self, cik: &str) -> Result<Vec<Filing>, DataError>;

    /// Aggregated holdings disclosed in one filing.
    fn holdings(&self, cik: &str, filing: &Filing) -> Result<Holdings, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool;

    /// Time until an unavailable provider accepts requests again.
    fn remaining_cooldown(&self) -> Duration {
        Duration::ZERO
    }
}
