//! Validated free-text reason.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-blank explanation attached to a defect report or a cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reason(String);

impl Reason {
    /// Creates a validated reason. Surrounding whitespace is removed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyReason`] when the value is empty after
    /// trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyReason);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the reason text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Reason {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
