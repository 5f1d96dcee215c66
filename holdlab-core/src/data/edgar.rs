//! SEC EDGAR holdings provider.
//!
//! Lists 13F-HR filings from the submissions API and downloads the
//! information-table XML of each filing from the archives. Handles retries
//! with exponential backoff and the circuit breaker.
//!
//! SEC requires a descriptive User-Agent with contact details on every
//! request and blocks clients that exceed its fair-access rate.

use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::circuit_breaker::CircuitBreaker;
use super::info_table::holdings_from_xml;
use super::provider::{DataError, Filing, HoldingsProvider};
use crate::domain::Holdings;

const SUBMISSIONS_BASE: &str = "https://data.sec.gov/submissions";
const ARCHIVES_BASE: &str = "https://www.sec.gov/Archives/edgar/data";
const FORM_13F_HR: &str = "13F-HR";
const PRIMARY_DOC: &str = "primary_doc.xml";

/// Submissions API response (only the parts we read).
#[derive(Debug, Deserialize)]
struct SubmissionsResponse {
    filings: Option<SubmissionFilings>,
}

#[derive(Debug, Deserialize)]
struct SubmissionFilings {
    recent: Option<RecentFilings>,
}

/// Column-oriented list of recent filings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentFilings {
    form: Option<Vec<String>>,
    filing_date: Option<Vec<String>>,
    accession_number: Option<Vec<String>>,
}

/// Archive directory listing (`index.json`).
#[derive(Debug, Deserialize)]
struct DirectoryResponse {
    directory: Option<Directory>,
}

#[derive(Debug, Deserialize)]
struct Directory {
    item: Option<OneOrMany<DirectoryItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(t) => vec![t],
            Self::Many(v) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectoryItem {
    name: Option<String>,
}

/// Connection settings for EDGAR.
#[derive(Debug, Clone)]
pub struct EdgarConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub base_delay: Duration,
    pub submissions_base: String,
    pub archives_base: String,
}

impl Default for EdgarConfig {
    fn default() -> Self {
        Self {
            user_agent: "HoldLab contact@example.com".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            submissions_base: SUBMISSIONS_BASE.to_string(),
            archives_base: ARCHIVES_BASE.to_string(),
        }
    }
}

/// What the retry loop does with an HTTP status.
#[derive(Debug)]
pub(crate) enum StatusOutcome {
    Success,
    /// Trip the breaker and stop.
    Blocked,
    /// Record a failure and try again.
    Retry(DataError),
    /// Stop without touching the breaker.
    Fail(DataError),
}

/// Map a response status to its retry-loop outcome.
pub(crate) fn classify_status(
    status: reqwest::StatusCode,
    retry_after: Option<&str>,
    url: &str,
) -> StatusOutcome {
    if status.is_success() {
        return StatusOutcome::Success;
    }
    match status.as_u16() {
        403 => StatusOutcome::Blocked,
        429 => StatusOutcome::Retry(DataError::RateLimited {
            retry_after_secs: retry_after
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(60),
        }),
        404 => StatusOutcome::Fail(DataError::DocumentNotFound(url.to_string())),
        _ => StatusOutcome::Retry(DataError::Network(format!("HTTP {status} for {url}"))),
    }
}

/// SEC EDGAR provider.
pub struct EdgarProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
    submissions_base: String,
    archives_base: String,
}

impl EdgarProvider {
    pub fn new(config: EdgarConfig, circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            max_retries: config.max_retries,
            base_delay: config.base_delay,
            submissions_base: config.submissions_base.trim_end_matches('/').to_string(),
            archives_base: config.archives_base.trim_end_matches('/').to_string(),
        })
    }

    fn submissions_url(&self, cik: &str) -> String {
        format!("{}/CIK{cik}.json", self.submissions_base)
    }

    /// Archive folder of one filing. The folder uses the CIK without
    /// leading zeros and the accession number without dashes.
    fn archive_url(&self, cik: &str, accession_number: &str) -> String {
        let cik = cik.trim_start_matches('0');
        let accession = accession_number.replace('-', "");
        format!("{}/{cik}/{accession}", self.archives_base)
    }

    /// Execute a GET with retry and circuit breaker logic, returning the body.
    fn fetch_text(&self, url: &str, accept: &str) -> Result<String, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                tracing::warn!(url, attempt, delay_ms = delay.as_millis() as u64, "retrying EDGAR request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            tracing::debug!(url, attempt, "EDGAR request");
            match self.client.get(url).header("Accept", accept).send() {
                Ok(resp) => {
                    let retry_after = resp
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_owned);
                    match classify_status(resp.status(), retry_after.as_deref(), url) {
                        StatusOutcome::Success => {
                            let body = resp.text().map_err(|e| {
                                DataError::Network(format!("reading body of {url}: {e}"))
                            })?;
                            self.circuit_breaker.record_success();
                            return Ok(body);
                        }
                        StatusOutcome::Blocked => {
                            tracing::error!(url, "EDGAR returned 403; tripping circuit breaker");
                            self.circuit_breaker.trip();
                            return Err(DataError::CircuitBreakerTripped);
                        }
                        StatusOutcome::Retry(e) => {
                            tracing::warn!(url, error = %e, "EDGAR request failed");
                            self.circuit_breaker.record_failure();
                            last_error = Some(e);
                        }
                        StatusOutcome::Fail(e) => return Err(e),
                    }
                }
                Err(e) if e.is_timeout() => {
                    last_error = Some(DataError::Timeout(url.to_string()));
                }
                Err(e) if e.is_connect() => {
                    last_error = Some(DataError::Network(e.to_string()));
                }
                Err(e) => return Err(DataError::Network(e.to_string())),
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

/// Extract 13F-HR filings from a submissions API body, most recent first.
pub fn parse_filings(cik: &str, body: &str) -> Result<Vec<Filing>, DataError> {
    let resp: SubmissionsResponse = serde_json::from_str(body)
        .map_err(|e| DataError::ResponseFormatChanged(format!("submissions for CIK {cik}: {e}")))?;

    let recent = resp
        .filings
        .and_then(|f| f.recent)
        .ok_or_else(|| DataError::ResponseFormatChanged("missing filings.recent".into()))?;

    let (forms, dates, accessions) = match (recent.form, recent.filing_date, recent.accession_number) {
        (Some(f), Some(d), Some(a)) => (f, d, a),
        _ => {
            return Err(DataError::ResponseFormatChanged(
                "filings.recent is missing form, filingDate or accessionNumber".into(),
            ))
        }
    };

    let filings: Vec<Filing> = forms
        .iter()
        .zip(dates.iter().zip(accessions.iter()))
        .filter(|(form, (date, accession))| {
            form.as_str() == FORM_13F_HR && !date.is_empty() && !accession.is_empty()
        })
        .map(|(_, (date, accession))| Filing {
            filing_date: date.clone(),
            accession_number: accession.clone(),
        })
        .collect();

    if filings.is_empty() {
        return Err(DataError::NoFilings {
            cik: cik.to_string(),
        });
    }
    Ok(filings)
}

/// Pick the information-table document from an archive `index.json` body.
pub fn select_info_table(body: &str) -> Result<String, DataError> {
    let resp: DirectoryResponse = serde_json::from_str(body)
        .map_err(|e| DataError::ResponseFormatChanged(format!("archive index: {e}")))?;

    let items = resp
        .directory
        .and_then(|d| d.item)
        .ok_or_else(|| DataError::ResponseFormatChanged("archive index has no items".into()))?
        .into_vec();

    items
        .into_iter()
        .filter_map(|item| item.name)
        .find(|name| name.ends_with(".xml") && name != PRIMARY_DOC)
        .ok_or_else(|| DataError::DocumentNotFound("no information table XML in filing".into()))
}

impl HoldingsProvider for EdgarProvider {
    fn name(&self) -> &str {
        "sec_edgar"
    }

    fn filings(&self, cik: &str) -> Result<Vec<Filing>, DataError> {
        let body = self.fetch_text(&self.submissions_url(cik), "application/json")?;
        let filings = parse_filings(cik, &body)?;
        tracing::info!(cik, count = filings.len(), "listed 13F-HR filings");
        Ok(filings)
    }

    fn holdings(&self, cik: &str, filing: &Filing) -> Result<Holdings, DataError> {
        let base = self.archive_url(cik, &filing.accession_number);
        let index = self.fetch_text(&format!("{base}/index.json"), "application/json")?;
        let document = select_info_table(&index)?;
        let xml = self.fetch_text(&format!("{base}/{document}"), "application/xml")?;
        let holdings = holdings_from_xml(&xml)?;
        tracing::info!(
            cik,
            filing_date = %filing.filing_date,
            securities = holdings.len(),
            "parsed information table"
        );
        Ok(holdings)
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }

    fn remaining_cooldown(&self) -> Duration {
        self.circuit_breaker.remaining_cooldown()
    }
}
