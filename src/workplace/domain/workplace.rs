//! Workplace aggregate root.

use super::{Capacity, OperatorId, WorkplaceCode, WorkplaceDomainError, WorkplaceId, WorkplaceStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Workplace aggregate root.
///
/// Invariants maintained by every mutator:
///
/// - capacity is positive;
/// - the number of current operators never exceeds the capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workplace {
    id: WorkplaceId,
    code: WorkplaceCode,
    name: String,
    description: Option<String>,
    location: Option<String>,
    notes: Option<String>,
    capacity: Capacity,
    status: WorkplaceStatus,
    active: bool,
    authorized_operators: BTreeSet<OperatorId>,
    current_operators: BTreeSet<OperatorId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted workplace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedWorkplaceData {
    /// Persisted workplace identifier.
    pub id: WorkplaceId,
    /// Persisted unique code.
    pub code: WorkplaceCode,
    /// Persisted display name.
    pub name: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted location, if any.
    pub location: Option<String>,
    /// Persisted free-form notes, if any.
    pub notes: Option<String>,
    /// Persisted capacity.
    pub capacity: Capacity,
    /// Persisted administrative status.
    pub status: WorkplaceStatus,
    /// Persisted active flag.
    pub active: bool,
    /// Persisted authorised operators.
    pub authorized_operators: BTreeSet<OperatorId>,
    /// Persisted occupancy set.
    pub current_operators: BTreeSet<OperatorId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest change timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Editable descriptive fields of a workplace.
///
/// `None` leaves the corresponding field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkplaceDetails {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New notes.
    pub notes: Option<String>,
    /// New capacity.
    pub capacity: Option<Capacity>,
}

/// Outcome of a successful seat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatAcquisition {
    /// The operator took a previously free seat.
    Seated,
    /// The operator already occupied a seat; nothing changed.
    AlreadySeated,
}

impl SeatAcquisition {
    /// Returns `true` when the request changed the occupancy set.
    #[must_use]
    pub const fn changed_occupancy(self) -> bool {
        matches!(self, Self::Seated)
    }
}

impl Workplace {
    /// Creates a new available, active workplace with no occupants.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceDomainError::EmptyName`] when the name is blank.
    pub fn new(
        code: WorkplaceCode,
        name: impl Into<String>,
        capacity: Capacity,
        clock: &impl Clock,
    ) -> Result<Self, WorkplaceDomainError> {
        let display_name = required_name(name.into())?;
        let timestamp = clock.utc();
        Ok(Self {
            id: WorkplaceId::new(),
            code,
            name: display_name,
            description: None,
            location: None,
            notes: None,
            capacity,
            status: WorkplaceStatus::Available,
            active: true,
            authorized_operators: BTreeSet::new(),
            current_operators: BTreeSet::new(),
            created_at: timestamp,
            updated_at: timestamp,
        })
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

    /// Sets the authorised operators.
    #[must_use]
    pub fn with_authorized_operators(
        mut self,
        operators: impl IntoIterator<Item = OperatorId>,
    ) -> Self {
        self.authorized_operators = operators.into_iter().collect();
        self
    }

    /// Reconstructs a workplace from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWorkplaceData) -> Self {
        Self {
            id: data.id,
            code: data.code,
            name: data.name,
            description: data.description,
            location: data.location,
            notes: data.notes,
            capacity: data.capacity,
            status: data.status,
            active: data.active,
            authorized_operators: data.authorized_operators,
            current_operators: data.current_operators,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the workplace identifier.
    #[must_use]
    pub const fn id(&self) -> WorkplaceId {
        self.id
    }

    /// Returns the unique code.
    #[must_use]
    pub const fn code(&self) -> &WorkplaceCode {
        &self.code
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the location, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the seat capacity.
    #[must_use]
    pub const fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Returns the administrative status.
    #[must_use]
    pub const fn status(&self) -> WorkplaceStatus {
        self.status
    }

    /// Returns `false` once the workplace has been archived.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the operators authorised to use this workplace.
    #[must_use]
    pub const fn authorized_operators(&self) -> &BTreeSet<OperatorId> {
        &self.authorized_operators
    }

    /// Returns the operators currently occupying a seat.
    #[must_use]
    pub const fn current_operators(&self) -> &BTreeSet<OperatorId> {
        &self.current_operators
    }

    /// Returns the number of unoccupied seats.
    #[must_use]
    pub fn free_seats(&self) -> usize {
        usize::try_from(self.capacity.seats())
            .unwrap_or(usize::MAX)
            .saturating_sub(self.current_operators.len())
    }

    /// Returns `true` when `operator` occupies a seat.
    #[must_use]
    pub fn is_seated(&self, operator: &OperatorId) -> bool {
        self.current_operators.contains(operator)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest change timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Overwrites the administrative status. Occupancy is not touched.
    pub fn set_status(&mut self, status: WorkplaceStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Archives the workplace. Its code stays reserved.
    pub fn archive(&mut self, clock: &impl Clock) {
        self.active = false;
        self.touch(clock);
    }

    /// Restores an archived workplace.
    pub fn restore(&mut self, clock: &impl Clock) {
        self.active = true;
        self.touch(clock);
    }

    /// Replaces the authorised operator set.
    pub fn set_authorized_operators(
        &mut self,
        operators: impl IntoIterator<Item = OperatorId>,
        clock: &impl Clock,
    ) {
        self.authorized_operators = operators.into_iter().collect();
        self.touch(clock);
    }

    /// Applies descriptive edits and an optional capacity change.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceDomainError::EmptyName`] for a blank name or
    /// [`WorkplaceDomainError::OccupancyExceedsCapacity`] when the new
    /// capacity is smaller than the current occupant count. Nothing is
    /// changed on error.
    pub fn update_details(
        &mut self,
        details: WorkplaceDetails,
        clock: &impl Clock,
    ) -> Result<(), WorkplaceDomainError> {
        let new_name = details.name.map(required_name).transpose()?;
        if let Some(capacity) = details.capacity {
            self.ensure_fits(self.current_operators.len(), capacity)?;
            self.capacity = capacity;
        }
        if let Some(validated) = new_name {
            self.name = validated;
        }
        if let Some(description) = details.description {
            self.description = Some(description);
        }
        if let Some(location) = details.location {
            self.location = Some(location);
        }
        if let Some(notes) = details.notes {
            self.notes = Some(notes);
        }
        self.touch(clock);
        Ok(())
    }

    /// Seats `operator` if a seat is free.
    ///
    /// The capacity check happens before the membership check, so an operator
    /// who is already seated at a full workplace is still refused.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceDomainError::CapacityExceeded`] when every seat is
    /// taken. The occupancy set is unchanged on error.
    pub fn try_acquire_seat(
        &mut self,
        operator: OperatorId,
        clock: &impl Clock,
    ) -> Result<SeatAcquisition, WorkplaceDomainError> {
        if self.free_seats() == 0 {
            return Err(WorkplaceDomainError::CapacityExceeded {
                workplace_id: self.id,
                operator,
                capacity: self.capacity.seats(),
            });
        }
        if !self.current_operators.insert(operator) {
            return Ok(SeatAcquisition::AlreadySeated);
        }
        self.touch(clock);
        Ok(SeatAcquisition::Seated)
    }

    /// Frees the seat held by `operator`, if any.
    ///
    /// Returns `true` when a seat was freed.
    pub fn release_seat(&mut self, operator: &OperatorId, clock: &impl Clock) -> bool {
        let released = self.current_operators.remove(operator);
        if released {
            self.touch(clock);
        }
        released
    }

    /// Replaces the occupancy set wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`WorkplaceDomainError::OccupancyExceedsCapacity`] when the new
    /// set is larger than the capacity. Nothing is changed on error.
    pub fn replace_current_operators(
        &mut self,
        operators: impl IntoIterator<Item = OperatorId>,
        clock: &impl Clock,
    ) -> Result<(), WorkplaceDomainError> {
        let replacement: BTreeSet<OperatorId> = operators.into_iter().collect();
        self.ensure_fits(replacement.len(), self.capacity)?;
        self.current_operators = replacement;
        self.touch(clock);
        Ok(())
    }

    fn ensure_fits(&self, occupants: usize, capacity: Capacity) -> Result<(), WorkplaceDomainError> {
        if capacity.admits(occupants) {
            return Ok(());
        }
        Err(WorkplaceDomainError::OccupancyExceedsCapacity {
            workplace_id: self.id,
            occupants,
            capacity: capacity.seats(),
        })
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn required_name(raw: String) -> Result<String, WorkplaceDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(WorkplaceDomainError::EmptyName);
    }
    Ok(trimmed.to_owned())
}
