//! Application configuration: TOML file, then environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use holdlab_core::data::{DataError, EdgarConfig, SourceRegistry};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("environment variable {name}={value:?} is not a valid number")]
    InvalidEnv { name: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("data layer: {0}")]
    Data(#[from] DataError),
}

/// Runtime settings shared by the CLI and the HTTP server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Number of most recent filings analyzed per source.
    pub num_quarters: usize,
    pub cache_max_age_ms: u64,
    pub api_timeout_ms: u64,
    /// SEC requires a descriptive User-Agent with a contact address.
    pub user_agent: String,
    pub log_level: String,
    pub log_format: String,
    pub port: u16,
    pub sources_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            num_quarters: 4,
            cache_max_age_ms: 3_600_000,
            api_timeout_ms: 30_000,
            user_agent: "HoldLab contact@example.com".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            port: 3000,
            sources_file: None,
        }
    }
}

impl AppConfig {
    /// Defaults, overlaid by `path` when given, overlaid by the process
    /// environment, then validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Override fields from variables returned by `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = lookup("NUM_QUARTERS") {
            self.num_quarters = parse_env("NUM_QUARTERS", v)?;
        }
        if let Some(v) = lookup("CACHE_MAX_AGE") {
            self.cache_max_age_ms = parse_env("CACHE_MAX_AGE", v)?;
        }
        if let Some(v) = lookup("API_TIMEOUT") {
            self.api_timeout_ms = parse_env("API_TIMEOUT", v)?;
        }
        if let Some(v) = lookup("PORT") {
            self.port = parse_env("PORT", v)?;
        }
        if let Some(v) = lookup("USER_AGENT") {
            self.user_agent = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.log_level = v;
        }
        if let Some(v) = lookup("LOG_FORMAT") {
            self.log_format = v;
        }
        if let Some(v) = lookup("SOURCES_FILE") {
            self.sources_file = Some(PathBuf::from(v));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_quarters == 0 {
            return Err(ConfigError::Invalid("num_quarters must be at least 1".into()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("user_agent must not be empty".into()));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.cache_max_age_ms.min(i64::MAX as u64) as i64)
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_ms)
    }

    pub fn edgar_config(&self) -> EdgarConfig {
        EdgarConfig {
            user_agent: self.user_agent.clone(),
            timeout: self.api_timeout(),
            ..EdgarConfig::default()
        }
    }

    /// Registry from `sources_file`, or the built-in one.
    pub fn source_registry(&self) -> Result<SourceRegistry, ConfigError> {
        match &self.sources_file {
            Some(path) => Ok(SourceRegistry::from_file(path)?),
            None => Ok(SourceRegistry::default_sources()),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { name, value })
}
