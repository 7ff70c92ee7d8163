//! Error types for workplace domain validation and parsing.

use super::{OperatorId, WorkplaceId};
use thiserror::Error;

/// Errors returned while constructing or mutating workplaces.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkplaceDomainError {
    /// The workplace name is empty after trimming.
    #[error("workplace name must not be empty")]
    EmptyName,

    /// The workplace code is empty after trimming.
    #[error("workplace code must not be empty")]
    EmptyCode,

    /// The operator identifier is empty after trimming.
    #[error("operator identifier must not be empty")]
    EmptyOperator,

    /// Capacity must be a positive number of seats.
    #[error("capacity must be greater than 0, got {0}")]
    InvalidCapacity(i64),

    /// An occupancy change would seat more operators than the capacity allows.
    #[error("workplace {workplace_id} would seat {occupants} operators but has capacity {capacity}")]
    OccupancyExceedsCapacity {
        /// Workplace whose occupancy was being changed.
        workplace_id: WorkplaceId,
        /// Occupant count the change would have produced.
        occupants: usize,
        /// Current seat capacity.
        capacity: u32,
    },

    /// Every seat of the workplace is taken.
    #[error("workplace {workplace_id} is full ({capacity} seats); {operator} cannot be seated")]
    CapacityExceeded {
        /// Workplace that rejected the seat request.
        workplace_id: WorkplaceId,
        /// Operator that asked for a seat.
        operator: OperatorId,
        /// Current seat capacity.
        capacity: u32,
    },
}

impl WorkplaceDomainError {
    /// Returns `true` for the expected "no free seat" outcome.
    #[must_use]
    pub const fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }
}

/// Error returned while parsing workplace status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown workplace status: {0}")]
pub struct ParseWorkplaceStatusError(pub String);
