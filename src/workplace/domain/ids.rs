//! Identifier and validated scalar types for the workplace domain.

use super::WorkplaceDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a workplace record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkplaceId(Uuid);

impl WorkplaceId {
    /// Creates a new random workplace identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a workplace identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for WorkplaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkplaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-facing workplace code, unique across all workplaces.
///
/// Codes are trimmed but otherwise compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkplaceCode(String);

impl WorkplaceCode {
    /// Creates a validated workplace code.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceDomainError::EmptyCode`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkplaceDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(WorkplaceDomainError::EmptyCode);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for WorkplaceCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for WorkplaceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identity of the operator acting on a workplace or task.
///
/// The identity provider decides what the value means (login, badge number,
/// directory key); the core only compares and hashes it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorId(String);

impl OperatorId {
    /// Creates a validated operator identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceDomainError::EmptyOperator`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkplaceDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(WorkplaceDomainError::EmptyOperator);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for OperatorId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
