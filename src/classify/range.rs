//! The protected range value type.

use std::fmt;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A CIDR string failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid CIDR range '{range}': {reason}")]
pub struct RangeParseError {
    /// The offending text.
    pub range: String,
    /// Parser message.
    pub reason: String,
}

/// A configured CIDR prefix, kept exactly as written.
///
/// Host bits may be set (`192.168.1.5/24` covers `192.168.1.0/24`).
/// Validation happens in [`ProtectedRange::parse`]; [`ProtectedRange::new_unchecked`]
/// exists for ranges that arrive from elsewhere and are re-checked during
/// classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtectedRange(String);

impl ProtectedRange {
    /// Parses and validates a range.
    ///
    /// # Errors
    ///
    /// Returns [`RangeParseError`] when `text` is not `address/prefix`.
    pub fn parse(text: &str) -> Result<Self, RangeParseError> {
        let range = Self(text.trim().to_string());
        range.network()?;
        Ok(range)
    }

    /// Wraps a range without validating it.
    #[must_use]
    pub fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Parses the comma-separated form (`"10.0.0.0/8, 192.168.0.0/16"`).
    ///
    /// Whitespace around items is trimmed and empty items are dropped.
    ///
    /// # Errors
    ///
    /// Returns the first [`RangeParseError`] encountered.
    pub fn parse_list(text: &str) -> Result<Vec<Self>, RangeParseError> {
        text.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Returns the range text as configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the range into a network.
    ///
    /// # Errors
    ///
    /// Returns [`RangeParseError`] when the text is not valid CIDR.
    pub fn network(&self) -> Result<IpNet, RangeParseError> {
        self.0.trim().parse::<IpNet>().map_err(|e| RangeParseError {
            range: self.0.clone(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for ProtectedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProtectedRange {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
