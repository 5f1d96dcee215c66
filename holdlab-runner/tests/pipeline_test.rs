mod common;

use common::{alpha_snapshots, alpha_source, MockProvider};
use holdlab_core::data::DataError;
use holdlab_core::signals::{ExclusionReason, Severity, WatchSignal};
use holdlab_runner::pipeline::{analyze_source, collect_snapshots, dataset_hash, PipelineError};

fn provider() -> MockProvider {
    MockProvider::default().with_snapshots("0000000001", alpha_snapshots())
}

#[test]
fn collects_requested_periods_in_order() {
    let snaps = collect_snapshots(&provider(), &alpha_source(), 4).unwrap();
    let dates: Vec<&str> = snaps.iter().map(|s| s.date.as_str()).collect();
    assert_eq!(dates, ["2025-02-14", "2024-11-14", "2024-08-14", "2024-05-15"]);
}

#[test]
fn fewer_filings_than_requested_uses_what_exists() {
    let snaps = collect_snapshots(&provider(), &alpha_source(), 12).unwrap();
    assert_eq!(snaps.len(), 5);
}

#[test]
fn only_selected_filings_are_downloaded() {
    let p = provider();
    collect_snapshots(&p, &alpha_source(), 2).unwrap();
    assert_eq!(p.holdings_calls.load(std::sync::atomic::Ordering::SeqCst), 2);
}

#[test]
fn missing_filings_surface_as_no_filings() {
    let err = collect_snapshots(&MockProvider::default(), &alpha_source(), 4).unwrap_err();
    assert!(matches!(err, PipelineError::Data(DataError::NoFilings { .. })));
}

#[test]
fn a_failing_download_fails_the_run() {
    let p = provider().failing_on("0000000000-24-000001");
    let err = analyze_source(&p, &alpha_source(), 4).unwrap_err();
    assert!(matches!(err, PipelineError::Data(DataError::Network(_))));
}

#[test]
fn full_run_classifies_signals() {
    let analysis = analyze_source(&provider(), &alpha_source(), 4).unwrap();
    let report = &analysis.report;

    assert_eq!(report.metadata.source, "Alpha Capital");
    assert_eq!(report.metadata.analyzed_periods.len(), 4);
    assert_eq!(report.metadata.latest_period.as_deref(), Some("2025-02-14"));

    let dec = report
        .exclusion_list
        .iter()
        .find(|i| i.id.as_str() == "DEC")
        .unwrap();
    assert_eq!(dec.reason, ExclusionReason::ConsecutiveDecrease);
    assert_eq!(dec.severity, Severity::High);

    let gone = report
        .exclusion_list
        .iter()
        .find(|i| i.id.as_str() == "GONE")
        .unwrap();
    assert_eq!(gone.reason, ExclusionReason::Liquidated);

    let signals: Vec<(&str, WatchSignal)> = report
        .watchlist
        .iter()
        .map(|i| (i.id.as_str(), i.signal))
        .collect();
    assert_eq!(
        signals,
        [("NEW", WatchSignal::NewPosition), ("ACC", WatchSignal::ConsecutiveIncrease)]
    );

    let ids: Vec<&str> = report.portfolio.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["ACC", "DEC", "NEW"]);

    let snaps = collect_snapshots(&provider(), &alpha_source(), 4).unwrap();
    assert_eq!(analysis.dataset_hash, dataset_hash(&snaps));
}
