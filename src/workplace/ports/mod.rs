//! Port contracts for the workplace registry.
//!
//! Ports define infrastructure-agnostic interfaces used by registry services.

pub mod repository;

pub use repository::{WorkplaceRepository, WorkplaceRepositoryError, WorkplaceRepositoryResult};
