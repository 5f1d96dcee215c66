//! Source registry — the institutional filers that can be analyzed.
//!
//! Stored as a TOML map of source key to `{name, cik, flag}`:
//!
//! ```toml
//! [berkshire]
//! name = "Berkshire Hathaway"
//! cik = "0001067983"
//! flag = "🇺🇸"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::provider::DataError;

/// One institutional filer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    /// SEC Central Index Key, zero-padded to ten digits.
    pub cik: String,
    #[serde(default)]
    pub flag: String,
}

/// Known sources keyed by a short slug (`berkshire`, `nps`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRegistry {
    pub sources: BTreeMap<String, Source>,
}

impl SourceRegistry {
    /// Load a registry from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a registry from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, DataError> {
        let registry: Self = toml::from_str(content)
            .map_err(|e| DataError::Parse(format!("source registry TOML: {e}")))?;
        if let Some((key, _)) = registry.sources.iter().find(|(_, s)| s.cik.trim().is_empty()) {
            return Err(DataError::Parse(format!("source '{key}' has an empty CIK")));
        }
        Ok(registry)
    }

    pub fn get(&self, key: &str) -> Option<&Source> {
        self.sources.get(key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.sources.keys().map(|k| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Built-in registry: Berkshire Hathaway and Korea's National Pension Service.
    pub fn default_sources() -> Self {
        let mut sources = BTreeMap::new();
        sources.insert(
            "berkshire".to_string(),
            Source {
                name: "Berkshire Hathaway".to_string(),
                cik: "0001067983".to_string(),
                flag: "🇺🇸".to_string(),
            },
        );
        sources.insert(
            "nps".to_string(),
            Source {
                name: "National Pension Service".to_string(),
                cik: "0001608046".to_string(),
                flag: "🇰🇷".to_string(),
            },
        );
        Self { sources }
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::default_sources()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_two_sources() {
        let reg = SourceRegistry::default();
        assert_eq!(reg.keys(), vec!["berkshire", "nps"]);
        assert_eq!(reg.get("berkshire").unwrap().cik, "0001067983");
    }

    #[test]
    fn parses_toml() {
        let reg = SourceRegistry::from_toml(
            r#"
            [scion]
            name = "Scion Asset Management"
            cik = "0001649339"
            "#,
        )
        .unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("scion").unwrap().flag, "");
    }

    #[test]
    fn rejects_empty_cik() {
        let err = SourceRegistry::from_toml("[x]\nname = \"X\"\ncik = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("empty CIK"));
    }

    #[test]
    fn unknown_key_is_none() {
        assert!(SourceRegistry::default().get("nope").is_none());
    }
}
