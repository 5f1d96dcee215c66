//! Source pipeline: filings → period snapshots → signal report.
//!
//! The N most recent filings of a source are fetched in parallel; the
//! collected snapshots keep the provider's most-recent-first order.

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use holdlab_core::analysis::analyze_trajectories;
use holdlab_core::data::{DataError, HoldingsProvider, Source};
use holdlab_core::domain::{PeriodDate, PeriodSnapshot};
use holdlab_core::error::AnalysisError;
use holdlab_core::signals::{classify_signals, SignalReport};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct SourceAnalysis {
    pub report: SignalReport,
    /// BLAKE3 over the snapshots that fed the report.
    pub dataset_hash: String,
}

/// Fetch up to `num_periods` of the most recent snapshots for `source`.
pub fn collect_snapshots(
    provider: &dyn HoldingsProvider,
    source: &Source,
    num_periods: usize,
) -> Result<Vec<PeriodSnapshot>, PipelineError> {
    let filings = provider.filings(&source.cik)?;
    if filings.is_empty() {
        return Err(DataError::NoFilings {
            cik: source.cik.clone(),
        }
        .into());
    }
    if filings.len() < num_periods {
        warn!(
            source = %source.name,
            available = filings.len(),
            requested = num_periods,
            "fewer filings than requested periods"
        );
    }

    let selected = &filings[..filings.len().min(num_periods)];
    let snapshots = selected
        .par_iter()
        .map(|filing| -> Result<PeriodSnapshot, DataError> {
            let holdings = provider.holdings(&source.cik, filing)?;
            debug!(
                date = %filing.filing_date,
                accession = %filing.accession_number,
                positions = holdings.len(),
                "filing parsed"
            );
            Ok(PeriodSnapshot::new(filing.filing_date.clone(), holdings))
        })
        .collect::<Result<Vec<_>, DataError>>()?;

    Ok(snapshots)
}

/// Run the engine over already-collected snapshots.
pub fn analyze_snapshots(
    snapshots: &[PeriodSnapshot],
    label: &str,
) -> Result<SignalReport, AnalysisError> {
    let records = analyze_trajectories(snapshots)?;
    let dates: Vec<PeriodDate> = snapshots.iter().map(|s| s.date.clone()).collect();
    Ok(classify_signals(&records, &dates, label))
}

/// Full pipeline for one source.
pub fn analyze_source(
    provider: &dyn HoldingsProvider,
    source: &Source,
    num_periods: usize,
) -> Result<SourceAnalysis, PipelineError> {
    info!(source = %source.name, cik = %source.cik, provider = provider.name(), "analyzing source");
    let snapshots = collect_snapshots(provider, source, num_periods)?;
    let report = analyze_snapshots(&snapshots, &source.name)?;
    info!(
        source = %source.name,
        periods = snapshots.len(),
        excluded = report.exclusion_list.len(),
        watched = report.watchlist.len(),
        positions = report.metadata.total_positions,
        "analysis complete"
    );
    Ok(SourceAnalysis {
        report,
        dataset_hash: dataset_hash(&snapshots),
    })
}

/// Deterministic BLAKE3 fingerprint of a snapshot list.
pub fn dataset_hash(snapshots: &[PeriodSnapshot]) -> String {
    let mut hasher = blake3::Hasher::new();
    for snap in snapshots {
        hasher.update(snap.date.as_bytes());
        for (id, h) in &snap.holdings {
            hasher.update(id.as_str().as_bytes());
            hasher.update(h.name.as_bytes());
            hasher.update(&h.shares.to_le_bytes());
            hasher.update(&h.value.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
