//! Seat capacity of a workplace.

use super::WorkplaceDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Positive number of operators a workplace can seat at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Capacity(u32);

impl Capacity {
    /// Creates a validated capacity.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceDomainError::InvalidCapacity`] when the value is
    /// zero, negative, or larger than `u32::MAX`.
    pub fn new(value: i64) -> Result<Self, WorkplaceDomainError> {
        u32::try_from(value)
            .ok()
            .filter(|seats| *seats > 0)
            .map(Self)
            .ok_or(WorkplaceDomainError::InvalidCapacity(value))
    }

    /// Returns the number of seats.
    #[must_use]
    pub const fn seats(self) -> u32 {
        self.0
    }

    /// Returns `true` when `occupants` operators fit into this capacity.
    #[must_use]
    pub fn admits(self, occupants: usize) -> bool {
        u32::try_from(occupants).is_ok_and(|count| count <= self.0)
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<i64> for Capacity {
    type Error = WorkplaceDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Capacity> for i64 {
    fn from(value: Capacity) -> Self {
        Self::from(value.0)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
