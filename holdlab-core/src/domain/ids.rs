use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of one security across periods (a CUSIP for 13F data).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecurityId(pub String);

impl SecurityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecurityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SecurityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SecurityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
