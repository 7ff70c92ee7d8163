//! Task aggregate root and its lifecycle transitions.

use super::{Reason, TaskDomainError, TaskId, TaskStatus};
use crate::workplace::domain::{OperatorId, WorkplaceId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Task aggregate root.
///
/// The aggregate owns its status, allow-list, and operator sets. It never
/// touches workplace occupancy: transitions that free operators return them so
/// the caller can release their seats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: String,
    workplace_id: Option<WorkplaceId>,
    customer_order_number: Option<String>,
    order_date: DateTime<Utc>,
    status: TaskStatus,
    defect_reason: Option<Reason>,
    notes: Option<String>,
    allowed_operators: BTreeSet<OperatorId>,
    operator_history: BTreeSet<OperatorId>,
    current_operators: BTreeSet<OperatorId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Validated input for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Display name; need not be unique.
    pub name: String,
    /// Operators permitted to start the task.
    pub allowed_operators: BTreeSet<OperatorId>,
    /// Workplace the task is performed at, if already known.
    pub workplace_id: Option<WorkplaceId>,
    /// Customer order reference.
    pub customer_order_number: Option<String>,
    /// Order timestamp; defaults to the creation time.
    pub order_date: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted display name.
    pub name: String,
    /// Persisted workplace reference.
    pub workplace_id: Option<WorkplaceId>,
    /// Persisted customer order reference.
    pub customer_order_number: Option<String>,
    /// Persisted order timestamp.
    pub order_date: DateTime<Utc>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted defect reason.
    pub defect_reason: Option<Reason>,
    /// Persisted notes.
    pub notes: Option<String>,
    /// Persisted allow-list.
    pub allowed_operators: BTreeSet<OperatorId>,
    /// Persisted operator history.
    pub operator_history: BTreeSet<OperatorId>,
    /// Persisted current operators.
    pub current_operators: BTreeSet<OperatorId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest change timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a `ready` task with no operators working it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskName`] for a blank name or
    /// [`TaskDomainError::EmptyAllowList`] when no operator is allowed.
    pub fn new(new_task: NewTask, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let NewTask {
            name,
            allowed_operators,
            workplace_id,
            customer_order_number,
            order_date,
        } = new_task;

        let trimmed_name = name.trim();
        if trimmed_name.is_empty() {
            return Err(TaskDomainError::EmptyTaskName);
        }
        if allowed_operators.is_empty() {
            return Err(TaskDomainError::EmptyAllowList);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            name: trimmed_name.to_owned(),
            workplace_id,
            customer_order_number,
            order_date: order_date.unwrap_or(timestamp),
            status: TaskStatus::Ready,
            defect_reason: None,
            notes: None,
            allowed_operators,
            operator_history: BTreeSet::new(),
            current_operators: BTreeSet::new(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            workplace_id: data.workplace_id,
            customer_order_number: data.customer_order_number,
            order_date: data.order_date,
            status: data.status,
            defect_reason: data.defect_reason,
            notes: data.notes,
            allowed_operators: data.allowed_operators,
            operator_history: data.operator_history,
            current_operators: data.current_operators,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the workplace reference, if any.
    #[must_use]
    pub const fn workplace_id(&self) -> Option<WorkplaceId> {
        self.workplace_id
    }

    /// Returns the customer order reference, if any.
    #[must_use]
    pub fn customer_order_number(&self) -> Option<&str> {
        self.customer_order_number.as_deref()
    }

    /// Returns the order timestamp.
    #[must_use]
    pub const fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the display color derived from the status.
    #[must_use]
    pub const fn color(&self) -> u8 {
        self.status.color()
    }

    /// Returns the defect reason, if the task was flagged.
    #[must_use]
    pub const fn defect_reason(&self) -> Option<&Reason> {
        self.defect_reason.as_ref()
    }

    /// Returns the accumulated notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the operators allowed to start the task.
    #[must_use]
    pub const fn allowed_operators(&self) -> &BTreeSet<OperatorId> {
        &self.allowed_operators
    }

    /// Returns every operator who has ever worked the task.
    #[must_use]
    pub const fn operator_history(&self) -> &BTreeSet<OperatorId> {
        &self.operator_history
    }

    /// Returns the operators currently working the task.
    #[must_use]
    pub const fn current_operators(&self) -> &BTreeSet<OperatorId> {
        &self.current_operators
    }

    /// Returns `true` when `operator` is currently working the task.
    #[must_use]
    pub fn is_worked_by(&self, operator: &OperatorId) -> bool {
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

    /// Checks that `operator` may start work and returns the workplace whose
    /// seat must be acquired first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskClosed`] for terminal tasks,
    /// [`TaskDomainError::WorkplaceRequired`] when no workplace is set, or
    /// [`TaskDomainError::OperatorNotAllowed`] when the operator is not on
    /// the allow-list.
    pub fn ensure_can_start(&self, operator: &OperatorId) -> Result<WorkplaceId, TaskDomainError> {
        if self.status.is_terminal() {
            return Err(TaskDomainError::TaskClosed {
                task_id: self.id,
                status: self.status,
            });
        }
        let workplace_id = self
            .workplace_id
            .ok_or(TaskDomainError::WorkplaceRequired(self.id))?;
        if !self.allowed_operators.contains(operator) {
            return Err(TaskDomainError::OperatorNotAllowed {
                task_id: self.id,
                operator: operator.clone(),
            });
        }
        Ok(workplace_id)
    }

    /// Records that `operator` started work. The caller must already hold
    /// the operator's workplace seat.
    ///
    /// # Errors
    ///
    /// See [`Self::ensure_can_start`]. Nothing changes on error.
    pub fn start(
        &mut self,
        operator: OperatorId,
        clock: &impl Clock,
    ) -> Result<WorkplaceId, TaskDomainError> {
        let workplace_id = self.ensure_can_start(&operator)?;
        self.status = TaskStatus::InProgress;
        self.operator_history.insert(operator.clone());
        self.current_operators.insert(operator);
        self.touch(clock);
        Ok(workplace_id)
    }

    /// Marks the task completed and returns the operators it released.
    ///
    /// Completion is allowed from every status.
    pub fn complete(&mut self, clock: &impl Clock) -> Vec<OperatorId> {
        self.status = TaskStatus::Completed;
        let released = self.clear_operators();
        self.touch(clock);
        released
    }

    /// Flags the task as defective and returns the operators it released.
    ///
    /// Flagging is allowed from every status.
    pub fn flag_defect(&mut self, reason: Reason, clock: &impl Clock) -> Vec<OperatorId> {
        self.status = TaskStatus::Defect;
        self.defect_reason = Some(reason);
        let released = self.clear_operators();
        self.touch(clock);
        released
    }

    /// Checks that `operator` may cancel the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotInProgress`] unless the task is in
    /// progress, or [`TaskDomainError::OperatorNotCurrent`] when the operator
    /// is not working it.
    pub fn ensure_can_cancel(&self, operator: &OperatorId) -> Result<(), TaskDomainError> {
        if self.status != TaskStatus::InProgress {
            return Err(TaskDomainError::NotInProgress {
                task_id: self.id,
                status: self.status,
            });
        }
        self.ensure_worked_by(operator)
    }

    /// Cancels the task on behalf of `operator`, appends `note_prefix` and the
    /// reason to the notes, and returns the operators it released.
    ///
    /// # Errors
    ///
    /// See [`Self::ensure_can_cancel`]. Nothing changes on error.
    pub fn cancel(
        &mut self,
        operator: &OperatorId,
        reason: &Reason,
        note_prefix: &str,
        clock: &impl Clock,
    ) -> Result<Vec<OperatorId>, TaskDomainError> {
        self.ensure_can_cancel(operator)?;
        self.status = TaskStatus::Cancelled;
        self.push_note(format!("{note_prefix}{reason}"));
        let released = self.clear_operators();
        self.touch(clock);
        Ok(released)
    }

    /// Takes `operator` off the task. The status is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::OperatorNotCurrent`] when the operator is
    /// not working the task.
    pub fn remove_operator(
        &mut self,
        operator: &OperatorId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_worked_by(operator)?;
        self.current_operators.remove(operator);
        self.touch(clock);
        Ok(())
    }

    /// Points the task at another workplace, or at none.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::OperatorsStillAssigned`] while any operator
    /// is working the task.
    pub fn assign_workplace(
        &mut self,
        workplace_id: Option<WorkplaceId>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.current_operators.is_empty() {
            return Err(TaskDomainError::OperatorsStillAssigned(self.id));
        }
        self.workplace_id = workplace_id;
        self.touch(clock);
        Ok(())
    }

    /// Appends a line to the notes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyNote`] for a blank note.
    pub fn append_note(&mut self, note: &str, clock: &impl Clock) -> Result<(), TaskDomainError> {
        let trimmed = note.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyNote);
        }
        self.push_note(trimmed.to_owned());
        self.touch(clock);
        Ok(())
    }

    fn ensure_worked_by(&self, operator: &OperatorId) -> Result<(), TaskDomainError> {
        if self.current_operators.contains(operator) {
            return Ok(());
        }
        Err(TaskDomainError::OperatorNotCurrent {
            task_id: self.id,
            operator: operator.clone(),
        })
    }

    fn push_note(&mut self, line: String) {
        self.notes = Some(match self.notes.take() {
            Some(existing) if !existing.is_empty() => format!("{existing}\n{line}"),
            _ => line,
        });
    }

    fn clear_operators(&mut self) -> Vec<OperatorId> {
        std::mem::take(&mut self.current_operators)
            .into_iter()
            .collect()
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
