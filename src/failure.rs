//! Caller-facing classification of rejected operations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad category of a rejected registry or lifecycle operation.
///
/// Every rejection leaves workplaces and tasks unchanged, so callers only
/// need the category to decide whether to retry, correct their input, or
/// escalate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A precondition on the input or the current record state was violated.
    Validation,
    /// The workplace has no free seat. Expected in normal operation and safe
    /// to retry later.
    CapacityExceeded,
    /// The addressed record does not exist.
    NotFound,
    /// The entity store failed.
    Persistence,
}

impl FailureKind {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::NotFound => "not_found",
            Self::Persistence => "persistence",
        }
    }

    /// Returns `true` when retrying the same request later may succeed.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::CapacityExceeded | Self::Persistence)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
