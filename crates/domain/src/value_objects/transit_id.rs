//! Transit record identifier value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Stable identifier assigned to a bus or stop by the directory source
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitId(String);

impl TransitId {
    /// Create an identifier, rejecting blank values
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::ValidationError(
                "transit id must not be empty".to_string(),
            ));
        }
        if trimmed.contains('/') {
            return Err(DomainError::ValidationError(format!(
                "transit id must not contain '/': {trimmed}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TransitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
