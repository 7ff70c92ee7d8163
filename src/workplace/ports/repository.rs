//! Repository port for workplace persistence and lookup.

use crate::workplace::domain::{Workplace, WorkplaceCode, WorkplaceId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workplace repository operations.
pub type WorkplaceRepositoryResult<T> = Result<T, WorkplaceRepositoryError>;

/// Workplace persistence contract.
///
/// Implementations store whole aggregates. Serialising concurrent
/// read-modify-write cycles on one workplace is the registry service's job,
/// not the repository's.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkplaceRepository: Send + Sync {
    /// Stores a new workplace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceRepositoryError::DuplicateWorkplace`] when the ID
    /// already exists or [`WorkplaceRepositoryError::DuplicateCode`] when any
    /// other workplace, archived or not, already uses the code.
    async fn store(&self, workplace: &Workplace) -> WorkplaceRepositoryResult<()>;

    /// Persists changes to an existing workplace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceRepositoryError::NotFound`] when the workplace does
    /// not exist.
    async fn update(&self, workplace: &Workplace) -> WorkplaceRepositoryResult<()>;

    /// Finds a workplace by identifier.
    ///
    /// Returns `None` when the workplace does not exist.
    async fn find_by_id(&self, id: WorkplaceId) -> WorkplaceRepositoryResult<Option<Workplace>>;

    /// Finds a workplace by its unique code, including archived workplaces.
    ///
    /// Returns `None` when no workplace uses the code.
    async fn find_by_code(
        &self,
        code: &WorkplaceCode,
    ) -> WorkplaceRepositoryResult<Option<Workplace>>;

    /// Returns all workplaces ordered by name.
    async fn list_all(&self) -> WorkplaceRepositoryResult<Vec<Workplace>>;

    /// Returns non-archived workplaces ordered by name.
    async fn list_active(&self) -> WorkplaceRepositoryResult<Vec<Workplace>>;
}

/// Errors returned by workplace repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkplaceRepositoryError {
    /// A workplace with the same identifier already exists.
    #[error("duplicate workplace identifier: {0}")]
    DuplicateWorkplace(WorkplaceId),

    /// Another workplace already uses the code.
    #[error("workplace code must be unique: {0}")]
    DuplicateCode(WorkplaceCode),

    /// The workplace was not found.
    #[error("workplace not found: {0}")]
    NotFound(WorkplaceId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkplaceRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
