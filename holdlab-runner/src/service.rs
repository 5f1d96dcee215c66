//! Signal service: cached per-source reports behind a registry lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use holdlab_core::data::{CircuitBreaker, DataError, EdgarProvider, HoldingsProvider, SourceRegistry};
use holdlab_core::error::AnalysisError;
use holdlab_core::signals::SignalReport;

use crate::cache::ResponseCache;
use crate::config::{AppConfig, ConfigError};
use crate::pipeline::{analyze_source, PipelineError};

/// Bumped when the envelope's serialized shape changes incompatibly.
pub const SCHEMA_VERSION: u32 = 1;

/// A signal report plus provenance for one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalEnvelope {
    pub schema_version: u32,
    pub source_key: String,
    pub cik: String,
    pub flag: String,
    pub generated_at: DateTime<Utc>,
    pub dataset_hash: String,
    #[serde(flatten)]
    pub report: SignalReport,
}

/// Registry entry as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub key: String,
    pub name: String,
    pub cik: String,
    pub flag: String,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid source: {0}")]
    InvalidSource(String),

    #[error("no filings found: {0}")]
    NoFilingsFound(String),

    #[error("SEC API error: {0}")]
    Upstream(String),

    #[error("SEC API request timed out: {0}")]
    Timeout(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidSource(_) => 400,
            Self::NoFilingsFound(_) => 404,
            Self::Upstream(_) => 502,
            Self::Timeout(_) => 504,
            Self::Internal(_) => 500,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSource(_) => "INVALID_SOURCE",
            Self::NoFilingsFound(_) => "NO_FILINGS_FOUND",
            Self::Upstream(_) => "SEC_API_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show an HTTP client. Internal details are masked.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidSource(_) => "Invalid source".to_string(),
            Self::NoFilingsFound(_) | Self::Upstream(_) | Self::Timeout(_) => self.to_string(),
            Self::Internal(_) => "An error occurred while fetching data".to_string(),
        }
    }
}

impl From<PipelineError> for ServiceError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Data(DataError::NoFilings { cik }) => Self::NoFilingsFound(cik),
            PipelineError::Analysis(AnalysisError::EmptyHistory) => {
                Self::NoFilingsFound("empty filing history".to_string())
            }
            PipelineError::Data(DataError::Timeout(msg)) => Self::Timeout(msg),
            PipelineError::Data(d) if d.is_upstream() => Self::Upstream(d.to_string()),
            PipelineError::Data(d) => Self::Internal(d.to_string()),
        }
    }
}

pub struct SignalService {
    provider: Arc<dyn HoldingsProvider>,
    registry: SourceRegistry,
    cache: ResponseCache<SignalEnvelope>,
    num_quarters: usize,
}

impl SignalService {
    pub fn new(
        provider: Arc<dyn HoldingsProvider>,
        registry: SourceRegistry,
        cache: ResponseCache<SignalEnvelope>,
        num_quarters: usize,
    ) -> Self {
        Self {
            provider,
            registry,
            cache,
            num_quarters,
        }
    }

    /// Service backed by SEC EDGAR, configured from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let breaker = Arc::new(CircuitBreaker::default_provider());
        let provider = EdgarProvider::new(config.edgar_config(), breaker)?;
        Ok(Self::new(
            Arc::new(provider),
            config.source_registry()?,
            ResponseCache::new(config.cache_ttl()),
            config.num_quarters,
        ))
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &ResponseCache<SignalEnvelope> {
        &self.cache
    }

    pub fn sources(&self) -> Vec<SourceInfo> {
        self.registry
            .sources
            .iter()
            .map(|(key, s)| SourceInfo {
                key: key.clone(),
                name: s.name.clone(),
                cik: s.cik.clone(),
                flag: s.flag.clone(),
            })
            .collect()
    }

    /// Report for `key`, served from cache unless expired or `force_refresh`.
    /// Fails fast with `Upstream` while the provider is cooling down.
    pub fn signals(&self, key: &str, force_refresh: bool) -> Result<SignalEnvelope, ServiceError> {
        let source = self
            .registry
            .get(key)
            .ok_or_else(|| ServiceError::InvalidSource(key.to_string()))?;

        if !force_refresh {
            if let Some(cached) = self.cache.get(key) {
                debug!(source = key, "cache hit");
                return Ok(cached);
            }
        }

        if !self.provider.is_available() {
            let cooldown = self.provider.remaining_cooldown();
            warn!(source = key, cooldown_secs = cooldown.as_secs(), "provider unavailable");
            return Err(ServiceError::Upstream(format!(
                "{} unavailable, retry in {}s",
                self.provider.name(),
                cooldown.as_secs()
            )));
        }

        let analysis = analyze_source(self.provider.as_ref(), source, self.num_quarters)
            .map_err(|e| {
                error!(source = key, error = %e, "pipeline failed");
                ServiceError::from(e)
            })?;

        let envelope = SignalEnvelope {
            schema_version: SCHEMA_VERSION,
            source_key: key.to_string(),
            cik: source.cik.clone(),
            flag: source.flag.clone(),
            generated_at: Utc::now(),
            dataset_hash: analysis.dataset_hash,
            report: analysis.report,
        };
        self.cache.set(key, envelope.clone());
        info!(source = key, refreshed = force_refresh, "report cached");
        Ok(envelope)
    }
}
