//! Location key value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Opaque provider identifier for a place
///
/// The weather provider assigns every searchable place a stable string key.
/// Forecast lookups and favorite rows are keyed on it. The key is treated as
/// opaque: the only invariant is that it is not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationKey(String);

impl LocationKey {
    /// Parse a location key, rejecting blank input
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLocationKey` if the key is empty or
    /// consists only of whitespace.
    pub fn parse(key: &str) -> Result<Self, DomainError> {
        if key.trim().is_empty() {
            return Err(DomainError::InvalidLocationKey(key.to_string()));
        }
        Ok(Self(key.to_string()))
    }

    /// Get the key as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for LocationKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
