mod common;

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

use common::{alpha_snapshots, registry, MockProvider};
use holdlab_runner::cache::{ManualClock, ResponseCache};
use holdlab_runner::service::{ServiceError, SignalService, SCHEMA_VERSION};

fn service() -> (SignalService, Arc<MockProvider>, Arc<ManualClock>) {
    let provider = Arc::new(MockProvider::default().with_snapshots("0000000001", alpha_snapshots()));
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()));
    let cache = ResponseCache::with_clock(Duration::hours(1), clock.clone());
    let svc = SignalService::new(provider.clone(), registry(), cache, 4);
    (svc, provider, clock)
}

#[test]
fn envelope_carries_source_provenance() {
    let (svc, _, _) = service();
    let env = svc.signals("alpha", false).unwrap();
    assert_eq!(env.schema_version, SCHEMA_VERSION);
    assert_eq!(env.source_key, "alpha");
    assert_eq!(env.cik, "0000000001");
    assert_eq!(env.flag, "A");
    assert_eq!(env.dataset_hash.len(), 64);
    assert_eq!(env.report.metadata.source, "Alpha Capital");
}

#[test]
fn second_call_is_served_from_cache() {
    let (svc, provider, _) = service();
    let first = svc.signals("alpha", false).unwrap();
    let second = svc.signals("alpha", false).unwrap();
    assert_eq!(first, second);
    assert_eq!(provider.filing_calls(), 1);
}

#[test]
fn force_refresh_bypasses_cache() {
    let (svc, provider, _) = service();
    svc.signals("alpha", false).unwrap();
    svc.signals("alpha", true).unwrap();
    assert_eq!(provider.filing_calls(), 2);
    assert_eq!(svc.cache().len(), 1);
}

#[test]
fn expired_entry_is_recomputed() {
    let (svc, provider, clock) = service();
    svc.signals("alpha", false).unwrap();

    clock.advance(Duration::minutes(59));
    svc.signals("alpha", false).unwrap();
    assert_eq!(provider.filing_calls(), 1);

    clock.advance(Duration::minutes(1));
    svc.signals("alpha", false).unwrap();
    assert_eq!(provider.filing_calls(), 2);
}

#[test]
fn unknown_source_is_rejected_without_fetching() {
    let (svc, provider, _) = service();
    let err = svc.signals("nope", false).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidSource(_)));
    assert_eq!(err.status_code(), 400);
    assert_eq!(provider.filing_calls(), 0);
}

#[test]
fn source_without_filings_is_not_found() {
    let (svc, _, _) = service();
    let err = svc.signals("empty", false).unwrap_err();
    assert!(matches!(err, ServiceError::NoFilingsFound(_)));
    assert_eq!(err.status_code(), 404);
    assert!(svc.cache().is_empty());
}

#[test]
fn unavailable_provider_is_an_upstream_error() {
    let provider = Arc::new(
        MockProvider::default()
            .with_snapshots("0000000001", alpha_snapshots())
            .in_cooldown(),
    );
    let svc = SignalService::new(
        provider.clone(),
        registry(),
        ResponseCache::new(Duration::hours(1)),
        4,
    );

    let err = svc.signals("alpha", true).unwrap_err();
    assert!(matches!(err, ServiceError::Upstream(_)));
    assert_eq!(err.status_code(), 502);
    assert!(err.public_message().contains("retry in 540s"));
    assert_eq!(provider.filing_calls(), 0);
    assert!(svc.cache().is_empty());
}

#[test]
fn cached_report_survives_provider_cooldown() {
    let (svc, provider, _) = service();
    let first = svc.signals("alpha", false).unwrap();

    provider.set_cooling_down(true);
    assert_eq!(svc.signals("alpha", false).unwrap(), first);
    assert!(matches!(
        svc.signals("alpha", true).unwrap_err(),
        ServiceError::Upstream(_)
    ));

    provider.set_cooling_down(false);
    svc.signals("alpha", true).unwrap();
    assert_eq!(provider.filing_calls(), 2);
}

#[test]
fn sources_lists_registry_in_key_order() {
    let (svc, _, _) = service();
    let keys: Vec<String> = svc.sources().into_iter().map(|s| s.key).collect();
    assert_eq!(keys, ["alpha", "empty"]);
}

#[test]
fn envelope_json_uses_camel_case() {
    let (svc, _, _) = service();
    let env = svc.signals("alpha", false).unwrap();
    let json = serde_json::to_value(&env).unwrap();
    assert_eq!(json["sourceKey"], "alpha");
    assert!(json["generatedAt"].is_string());
    assert!(json["exclusionList"].is_array());
    assert_eq!(json["metadata"]["totalPositions"], 3);
}
