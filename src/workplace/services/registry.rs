//! Service layer for workplace registration, administration, and seats.
//!
//! Every read-modify-write of a workplace happens while holding that
//! workplace's [`SeatLease`], so concurrent seat requests for the last free
//! seat are decided one at a time against the stored occupancy.

use crate::failure::FailureKind;
use crate::sync::{KeyedGuard, KeyedLocks};
use crate::workplace::{
    domain::{
        Capacity, OperatorId, SeatAcquisition, Workplace, WorkplaceCode, WorkplaceDetails,
        WorkplaceDomainError, WorkplaceId, WorkplaceStatus,
    },
    ports::{WorkplaceRepository, WorkplaceRepositoryError},
};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for registering a new workplace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWorkplaceRequest {
    name: String,
    code: String,
    capacity: i64,
    description: Option<String>,
    location: Option<String>,
    authorized_operators: Vec<String>,
}

impl CreateWorkplaceRequest {
    /// Creates a request with the required workplace fields.
    #[must_use]
    pub fn new(name: impl Into<String>, code: impl Into<String>, capacity: i64) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            capacity,
            description: None,
            location: None,
            authorized_operators: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the operators authorised to use the workplace.
    #[must_use]
    pub fn with_authorized_operators(mut self, operators: impl IntoIterator<Item = String>) -> Self {
        self.authorized_operators = operators.into_iter().collect();
        self
    }
}

/// Service-level errors for workplace registry operations.
#[derive(Debug, Error)]
pub enum WorkplaceRegistryError {
    /// Domain validation failed or no seat was free.
    #[error(transparent)]
    Domain(#[from] WorkplaceDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] WorkplaceRepositoryError),
    /// No workplace exists with the given identifier.
    #[error("workplace {0} not found")]
    NotFound(WorkplaceId),
}

impl WorkplaceRegistryError {
    /// Classifies the failure for callers.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(err) if err.is_capacity_exceeded() => FailureKind::CapacityExceeded,
            Self::Domain(_)
            | Self::Repository(
                WorkplaceRepositoryError::DuplicateCode(_)
                | WorkplaceRepositoryError::DuplicateWorkplace(_),
            ) => FailureKind::Validation,
            Self::Repository(WorkplaceRepositoryError::NotFound(_)) | Self::NotFound(_) => {
                FailureKind::NotFound
            }
            Self::Repository(WorkplaceRepositoryError::Persistence(_)) => FailureKind::Persistence,
        }
    }
}

/// Result type for workplace registry service operations.
pub type WorkplaceRegistryResult<T> = Result<T, WorkplaceRegistryError>;

/// Exclusive right to change one workplace's record.
///
/// Only the registry hands out leases. Holding one blocks every other
/// registry mutation of the same workplace until it is dropped.
pub struct SeatLease {
    guard: KeyedGuard<WorkplaceId>,
}

impl SeatLease {
    /// Returns the leased workplace.
    #[must_use]
    pub const fn workplace_id(&self) -> WorkplaceId {
        *self.guard.key()
    }
}

impl fmt::Debug for SeatLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeatLease")
            .field("workplace_id", &self.workplace_id())
            .finish()
    }
}

/// Workplace registry orchestration service.
pub struct WorkplaceRegistryService<R, C>
where
    R: WorkplaceRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    seat_locks: Arc<KeyedLocks<WorkplaceId>>,
}

impl<R, C> Clone for WorkplaceRegistryService<R, C>
where
    R: WorkplaceRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            seat_locks: Arc::clone(&self.seat_locks),
        }
    }
}

impl<R, C> WorkplaceRegistryService<R, C>
where
    R: WorkplaceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new workplace registry service.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            seat_locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Registers a new workplace with status `available` and no occupants.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceRegistryError::Domain`] for a blank name or code,
    /// a non-positive capacity, or a blank operator, and
    /// [`WorkplaceRegistryError::Repository`] with
    /// [`WorkplaceRepositoryError::DuplicateCode`] when the code is taken.
    pub async fn create(&self, request: CreateWorkplaceRequest) -> WorkplaceRegistryResult<Workplace> {
        let CreateWorkplaceRequest {
            name,
            code,
            capacity,
            description,
            location,
            authorized_operators,
        } = request;

        let workplace_code = WorkplaceCode::new(code)?;
        let seats = Capacity::new(capacity)?;
        let operators = authorized_operators
            .into_iter()
            .map(OperatorId::new)
            .collect::<Result<Vec<_>, _>>()?;

        let mut workplace =
            Workplace::new(workplace_code, name, seats, &*self.clock)?.with_authorized_operators(operators);
        if let Some(text) = description {
            workplace = workplace.with_description(text);
        }
        if let Some(text) = location {
            workplace = workplace.with_location(text);
        }

        self.repository.store(&workplace).await?;
        info!(
            workplace_id = %workplace.id(),
            code = %workplace.code(),
            capacity = workplace.capacity().seats(),
            "workplace registered"
        );
        Ok(workplace)
    }

    /// Finds a workplace by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceRegistryError::Repository`] when lookup fails.
    pub async fn find_by_id(&self, id: WorkplaceId) -> WorkplaceRegistryResult<Option<Workplace>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Finds a workplace by identifier, failing when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceRegistryError::NotFound`] when no workplace has the
    /// identifier, or repository errors.
    pub async fn get(&self, id: WorkplaceId) -> WorkplaceRegistryResult<Workplace> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(WorkplaceRegistryError::NotFound(id))
    }

    /// Finds a workplace by code, including archived workplaces.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceRegistryError::Domain`] for a blank code or
    /// repository errors.
    pub async fn find_by_code(&self, code: &str) -> WorkplaceRegistryResult<Option<Workplace>> {
        let wanted = WorkplaceCode::new(code)?;
        Ok(self.repository.find_by_code(&wanted).await?)
    }

    /// Returns every workplace ordered by name.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list_all(&self) -> WorkplaceRegistryResult<Vec<Workplace>> {
        Ok(self.repository.list_all().await?)
    }

    /// Returns non-archived workplaces ordered by name.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list_active(&self) -> WorkplaceRegistryResult<Vec<Workplace>> {
        Ok(self.repository.list_active().await?)
    }

    /// Overwrites the administrative status without touching occupancy.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceRegistryError::NotFound`] or repository errors.
    pub async fn set_status(
        &self,
        id: WorkplaceId,
        status: WorkplaceStatus,
    ) -> WorkplaceRegistryResult<Workplace> {
        let lease = self.lease(id).await;
        let (workplace, ()) = self
            .modify(&lease, |workplace, clock| {
                workplace.set_status(status, clock);
                Ok(())
            })
            .await?;
        info!(workplace_id = %id, status = %status, "workplace status changed");
        Ok(workplace)
    }

    /// Marks the workplace as available.
    ///
    /// # Errors
    ///
    /// See [`Self::set_status`].
    pub async fn set_available(&self, id: WorkplaceId) -> WorkplaceRegistryResult<Workplace> {
        self.set_status(id, WorkplaceStatus::Available).await
    }

    /// Marks the workplace as occupied.
    ///
    /// # Errors
    ///
    /// See [`Self::set_status`].
    pub async fn set_occupied(&self, id: WorkplaceId) -> WorkplaceRegistryResult<Workplace> {
        self.set_status(id, WorkplaceStatus::Occupied).await
    }

    /// Marks the workplace as under maintenance.
    ///
    /// # Errors
    ///
    /// See [`Self::set_status`].
    pub async fn set_maintenance(&self, id: WorkplaceId) -> WorkplaceRegistryResult<Workplace> {
        self.set_status(id, WorkplaceStatus::Maintenance).await
    }

    /// Marks the workplace as inactive.
    ///
    /// # Errors
    ///
    /// See [`Self::set_status`].
    pub async fn set_inactive(&self, id: WorkplaceId) -> WorkplaceRegistryResult<Workplace> {
        self.set_status(id, WorkplaceStatus::Inactive).await
    }

    /// Applies descriptive edits and an optional capacity change.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceRegistryError::Domain`] when the new capacity would
    /// leave more occupants than seats or the name is blank,
    /// [`WorkplaceRegistryError::NotFound`], or repository errors.
    pub async fn update_details(
        &self,
        id: WorkplaceId,
        details: WorkplaceDetails,
    ) -> WorkplaceRegistryResult<Workplace> {
        let lease = self.lease(id).await;
        let (workplace, ()) = self
            .modify(&lease, |workplace, clock| workplace.update_details(details, clock))
            .await?;
        Ok(workplace)
    }

    /// Replaces the operators authorised to use the workplace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceRegistryError::NotFound`] or repository errors.
    pub async fn set_authorized_operators(
        &self,
        id: WorkplaceId,
        operators: Vec<OperatorId>,
    ) -> WorkplaceRegistryResult<Workplace> {
        let lease = self.lease(id).await;
        let (workplace, ()) = self
            .modify(&lease, |workplace, clock| {
                workplace.set_authorized_operators(operators, clock);
                Ok(())
            })
            .await?;
        Ok(workplace)
    }

    /// Archives the workplace. Its code stays reserved.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceRegistryError::NotFound`] or repository errors.
    pub async fn archive(&self, id: WorkplaceId) -> WorkplaceRegistryResult<Workplace> {
        let lease = self.lease(id).await;
        let (workplace, ()) = self
            .modify(&lease, |workplace, clock| {
                workplace.archive(clock);
                Ok(())
            })
            .await?;
        info!(workplace_id = %id, "workplace archived");
        Ok(workplace)
    }

    /// Restores an archived workplace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceRegistryError::NotFound`] or repository errors.
    pub async fn restore(&self, id: WorkplaceId) -> WorkplaceRegistryResult<Workplace> {
        let lease = self.lease(id).await;
        let (workplace, ()) = self
            .modify(&lease, |workplace, clock| {
                workplace.restore(clock);
                Ok(())
            })
            .await?;
        info!(workplace_id = %id, "workplace restored");
        Ok(workplace)
    }

    /// Replaces the occupancy set wholesale (administrative bulk edit).
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceRegistryError::Domain`] with
    /// [`WorkplaceDomainError::OccupancyExceedsCapacity`] when the set does
    /// not fit, [`WorkplaceRegistryError::NotFound`], or repository errors.
    /// The stored occupancy is unchanged on error.
    pub async fn replace_current_operators(
        &self,
        id: WorkplaceId,
        operators: Vec<OperatorId>,
    ) -> WorkplaceRegistryResult<Workplace> {
        let lease = self.lease(id).await;
        let (workplace, ()) = self
            .modify(&lease, |workplace, clock| {
                workplace.replace_current_operators(operators, clock)
            })
            .await?;
        info!(
            workplace_id = %id,
            occupants = workplace.current_operators().len(),
            "workplace occupancy replaced"
        );
        Ok(workplace)
    }

    /// Seats `operator` at the workplace if a seat is free.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceRegistryError::Domain`] with
    /// [`WorkplaceDomainError::CapacityExceeded`] when the workplace is full,
    /// [`WorkplaceRegistryError::NotFound`], or repository errors.
    pub async fn try_acquire_seat(
        &self,
        id: WorkplaceId,
        operator: &OperatorId,
    ) -> WorkplaceRegistryResult<Workplace> {
        let lease = self.lease(id).await;
        let (workplace, _) = self.acquire_seat(&lease, operator).await?;
        Ok(workplace)
    }

    /// Frees the seat `operator` holds at the workplace. Freeing a seat that
    /// is not held is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceRegistryError::NotFound`] or repository errors.
    pub async fn release_seat(
        &self,
        id: WorkplaceId,
        operator: &OperatorId,
    ) -> WorkplaceRegistryResult<Workplace> {
        let lease = self.lease(id).await;
        self.release_seats(&lease, std::slice::from_ref(operator))
            .await
    }

    /// Waits for exclusive access to the workplace record.
    pub async fn lease(&self, id: WorkplaceId) -> SeatLease {
        SeatLease {
            guard: self.seat_locks.lock(id).await,
        }
    }

    /// Seats `operator` at the leased workplace if a seat is free.
    ///
    /// # Errors
    ///
    /// See [`Self::try_acquire_seat`].
    pub async fn acquire_seat(
        &self,
        lease: &SeatLease,
        operator: &OperatorId,
    ) -> WorkplaceRegistryResult<(Workplace, SeatAcquisition)> {
        let outcome = self
            .modify(lease, |workplace, clock| {
                workplace.try_acquire_seat(operator.clone(), clock)
            })
            .await;
        match &outcome {
            Ok((workplace, acquisition)) => debug!(
                workplace_id = %workplace.id(),
                operator = %operator,
                ?acquisition,
                occupants = workplace.current_operators().len(),
                "seat acquired"
            ),
            Err(err) => debug!(
                workplace_id = %lease.workplace_id(),
                operator = %operator,
                error = %err,
                "seat request refused"
            ),
        }
        outcome
    }

    /// Frees the seats held by `operators` at the leased workplace in one
    /// write. Operators without a seat are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceRegistryError::NotFound`] or repository errors.
    pub async fn release_seats(
        &self,
        lease: &SeatLease,
        operators: &[OperatorId],
    ) -> WorkplaceRegistryResult<Workplace> {
        let id = lease.workplace_id();
        let mut workplace = self.get(id).await?;
        let mut released = 0_usize;
        for operator in operators {
            if workplace.release_seat(operator, &*self.clock) {
                released += 1;
            }
        }
        if released > 0 {
            self.repository.update(&workplace).await?;
            debug!(workplace_id = %id, released, "seats released");
        }
        Ok(workplace)
    }

    async fn modify<T>(
        &self,
        lease: &SeatLease,
        change: impl FnOnce(&mut Workplace, &C) -> Result<T, WorkplaceDomainError>,
    ) -> WorkplaceRegistryResult<(Workplace, T)> {
        let mut workplace = self.get(lease.workplace_id()).await?;
        let outcome = change(&mut workplace, &*self.clock)?;
        self.repository.update(&workplace).await?;
        Ok((workplace, outcome))
    }
}
