//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod query;
pub mod repository;

pub use query::TaskQuery;
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
