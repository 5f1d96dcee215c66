//! Shared test doubles for runner integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use holdlab_core::data::{DataError, Filing, HoldingsProvider, Source, SourceRegistry};
use holdlab_core::domain::{Holdings, PeriodSnapshot};

/// In-memory provider serving fixed filings per CIK.
#[derive(Default)]
pub struct MockProvider {
    filings: HashMap<String, Vec<(Filing, Holdings)>>,
    failing_accession: Option<String>,
    cooling_down: AtomicBool,
    pub filing_calls: AtomicUsize,
    pub holdings_calls: AtomicUsize,
}

impl MockProvider {
    pub fn with_snapshots(mut self, cik: &str, snapshots: Vec<PeriodSnapshot>) -> Self {
        let entries = snapshots
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                let filing = Filing {
                    filing_date: s.date.clone(),
                    accession_number: format!("0000000000-24-{i:06}"),
                };
                (filing, s.holdings)
            })
            .collect();
        self.filings.insert(cik.to_string(), entries);
        self
    }

    pub fn failing_on(mut self, accession: &str) -> Self {
        self.failing_accession = Some(accession.to_string());
        self
    }

    /// Simulate a tripped breaker.
    pub fn in_cooldown(self) -> Self {
        self.set_cooling_down(true);
        self
    }

    pub fn set_cooling_down(&self, on: bool) {
        self.cooling_down.store(on, Ordering::SeqCst);
    }

    pub fn filing_calls(&self) -> usize {
        self.filing_calls.load(Ordering::SeqCst)
    }
}

impl HoldingsProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn filings(&self, cik: &str) -> Result<Vec<Filing>, DataError> {
        self.filing_calls.fetch_add(1, Ordering::SeqCst);
        match self.filings.get(cik) {
            Some(entries) if !entries.is_empty() => {
                Ok(entries.iter().map(|(f, _)| f.clone()).collect())
            }
            _ => Err(DataError::NoFilings {
                cik: cik.to_string(),
            }),
        }
    }

    fn holdings(&self, cik: &str, filing: &Filing) -> Result<Holdings, DataError> {
        self.holdings_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_accession.as_deref() == Some(filing.accession_number.as_str()) {
            return Err(DataError::Network("connection reset".into()));
        }
        self.filings
            .get(cik)
            .and_then(|entries| entries.iter().find(|(f, _)| f == filing))
            .map(|(_, h)| h.clone())
            .ok_or_else(|| DataError::DocumentNotFound(filing.accession_number.clone()))
    }

    fn is_available(&self) -> bool {
        !self.cooling_down.load(Ordering::SeqCst)
    }

    fn remaining_cooldown(&self) -> Duration {
        if self.is_available() {
            Duration::ZERO
        } else {
            Duration::from_secs(540)
        }
    }
}

pub fn registry() -> SourceRegistry {
    SourceRegistry::from_toml(
        r#"
[alpha]
name = "Alpha Capital"
cik = "0000000001"
flag = "A"

[empty]
name = "Empty Fund"
cik = "0000000002"
"#,
    )
    .unwrap()
}

pub fn alpha_source() -> Source {
    registry().get("alpha").unwrap().clone()
}

/// Five quarters, most recent first.
pub fn alpha_snapshots() -> Vec<PeriodSnapshot> {
    vec![
        PeriodSnapshot::from_rows(
            "2025-02-14",
            [("DEC", "Decline Co", 70, 7), ("ACC", "Accum Co", 300, 60), ("NEW", "New Co", 50, 5)],
        ),
        PeriodSnapshot::from_rows(
            "2024-11-14",
            [("DEC", "Decline Co", 80, 8), ("ACC", "Accum Co", 200, 40), ("GONE", "Gone Co", 10, 1)],
        ),
        PeriodSnapshot::from_rows(
            "2024-08-14",
            [("DEC", "Decline Co", 90, 9), ("ACC", "Accum Co", 100, 20), ("GONE", "Gone Co", 10, 1)],
        ),
        PeriodSnapshot::from_rows(
            "2024-05-15",
            [("DEC", "Decline Co", 100, 10), ("GONE", "Gone Co", 10, 1)],
        ),
        PeriodSnapshot::from_rows("2024-02-14", [("OLDEST", "Oldest Co", 1, 1)]),
    ]
}
