//! Domain model for workplaces and seat occupancy.
//!
//! The workplace aggregate keeps capacity, administrative status, and the
//! occupancy set together so that the seat invariant can be checked in one
//! place. Infrastructure concerns stay outside the domain boundary.

mod capacity;
mod error;
mod ids;
mod status;
mod workplace;

pub use capacity::Capacity;
pub use error::{ParseWorkplaceStatusError, WorkplaceDomainError};
pub use ids::{OperatorId, WorkplaceCode, WorkplaceId};
pub use status::WorkplaceStatus;
pub use workplace::{PersistedWorkplaceData, SeatAcquisition, Workplace, WorkplaceDetails};
