//! Task lifecycle engine.
//!
//! Every operation locks the task first and, when seats are involved, leases
//! the task's workplace second. Both locks are held until the task record and
//! the workplace occupancy agree again, so a task is never left in progress
//! with an operator who does not hold a seat.

use super::seats::release_unless_still_worked;
use crate::config::WorkfloorConfig;
use crate::failure::FailureKind;
use crate::sync::KeyedLocks;
use crate::task::{
    domain::{NewTask, Reason, StatusGroup, Task, TaskDomainError, TaskId, group_by_status},
    ports::{TaskQuery, TaskRepository, TaskRepositoryError},
};
use crate::workplace::{
    domain::{OperatorId, WorkplaceId},
    ports::WorkplaceRepository,
    services::{SeatLease, WorkplaceRegistryError, WorkplaceRegistryService},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    name: String,
    allowed_operators: BTreeSet<OperatorId>,
    workplace_id: Option<WorkplaceId>,
    customer_order_number: Option<String>,
    order_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        allowed_operators: impl IntoIterator<Item = OperatorId>,
    ) -> Self {
        Self {
            name: name.into(),
            allowed_operators: allowed_operators.into_iter().collect(),
            workplace_id: None,
            customer_order_number: None,
            order_date: None,
        }
    }

    /// Sets the workplace the task is performed at.
    #[must_use]
    pub const fn at_workplace(mut self, workplace_id: WorkplaceId) -> Self {
        self.workplace_id = Some(workplace_id);
        self
    }

    /// Sets the customer order reference.
    #[must_use]
    pub fn with_customer_order_number(mut self, number: impl Into<String>) -> Self {
        self.customer_order_number = Some(number.into());
        self
    }

    /// Sets the order timestamp.
    #[must_use]
    pub const fn with_order_date(mut self, order_date: DateTime<Utc>) -> Self {
        self.order_date = Some(order_date);
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The workplace registry refused the seat change or failed.
    #[error(transparent)]
    Workplace(#[from] WorkplaceRegistryError),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// The task references a workplace that does not exist.
    #[error("workplace {0} does not exist")]
    UnknownWorkplace(WorkplaceId),
    /// A reason form was confirmed without a target task.
    #[error("no task selected")]
    MissingTaskReference,
}

impl TaskLifecycleError {
    /// Classifies the failure for callers.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(_)
            | Self::UnknownWorkplace(_)
            | Self::MissingTaskReference
            | Self::Repository(TaskRepositoryError::DuplicateTask(_)) => FailureKind::Validation,
            Self::Repository(TaskRepositoryError::NotFound(_)) | Self::NotFound(_) => {
                FailureKind::NotFound
            }
            Self::Repository(TaskRepositoryError::Persistence(_)) => FailureKind::Persistence,
            Self::Workplace(err) => err.kind(),
        }
    }

    /// Returns `true` when the workplace had no free seat.
    #[must_use]
    pub fn is_capacity_exceeded(&self) -> bool {
        self.kind() == FailureKind::CapacityExceeded
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
pub struct TaskLifecycleService<T, W, C>
where
    T: TaskRepository,
    W: WorkplaceRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<T>,
    registry: WorkplaceRegistryService<W, C>,
    clock: Arc<C>,
    task_locks: Arc<KeyedLocks<TaskId>>,
    cancel_note_prefix: Arc<str>,
}

impl<T, W, C> Clone for TaskLifecycleService<T, W, C>
where
    T: TaskRepository,
    W: WorkplaceRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            registry: self.registry.clone(),
            clock: Arc::clone(&self.clock),
            task_locks: Arc::clone(&self.task_locks),
            cancel_note_prefix: Arc::clone(&self.cancel_note_prefix),
        }
    }
}

impl<T, W, C> TaskLifecycleService<T, W, C>
where
    T: TaskRepository,
    W: WorkplaceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service sharing seat locks with `registry`.
    #[must_use]
    pub fn new(repository: Arc<T>, registry: WorkplaceRegistryService<W, C>, clock: Arc<C>) -> Self {
        Self {
            repository,
            registry,
            clock,
            task_locks: Arc::new(KeyedLocks::new()),
            cancel_note_prefix: Arc::from(WorkfloorConfig::default().cancel_note_prefix),
        }
    }

    /// Applies the lifecycle-related settings of `config`.
    #[must_use]
    pub fn with_config(mut self, config: &WorkfloorConfig) -> Self {
        self.cancel_note_prefix = Arc::from(config.cancel_note_prefix.as_str());
        self
    }

    /// Returns the workplace registry this service coordinates with.
    #[must_use]
    pub const fn registry(&self) -> &WorkplaceRegistryService<W, C> {
        &self.registry
    }

    /// Creates a `ready` task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for a blank name or an empty
    /// allow-list, [`TaskLifecycleError::UnknownWorkplace`] when the
    /// referenced workplace does not exist, or repository errors.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let CreateTaskRequest {
            name,
            allowed_operators,
            workplace_id,
            customer_order_number,
            order_date,
        } = request;

        if let Some(id) = workplace_id {
            self.ensure_workplace_exists(id).await?;
        }

        let task = Task::new(
            NewTask {
                name,
                allowed_operators,
                workplace_id,
                customer_order_number,
                order_date,
            },
            &*self.clock,
        )?;
        self.repository.store(&task).await?;
        info!(task_id = %task.id(), name = task.name(), "task created");
        Ok(task)
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn find_by_id(&self, id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Finds a task by identifier, failing when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] or repository errors.
    pub async fn get(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }

    /// Returns the tasks matching `query`.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn search(&self, query: &TaskQuery) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.search(query).await?)
    }

    /// Counts the tasks matching `query` per status, listing every status in
    /// fixed order even when its count is zero.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn status_summary(&self, query: &TaskQuery) -> TaskLifecycleResult<Vec<StatusGroup>> {
        let tasks = self.repository.search(query).await?;
        Ok(group_by_status(&tasks))
    }

    /// Starts work on the task for `operator`, seating them at the task's
    /// workplace.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the task is closed, has no
    /// workplace, or does not allow the operator;
    /// [`TaskLifecycleError::Workplace`] with a capacity-exceeded failure when
    /// no seat is free; or lookup and repository errors. Neither the task nor
    /// the workplace changes on error.
    pub async fn start_work(
        &self,
        task_id: TaskId,
        operator: &OperatorId,
    ) -> TaskLifecycleResult<Task> {
        let _task_lock = self.task_locks.lock(task_id).await;
        let mut task = self.get(task_id).await?;
        let workplace_id = task.start(operator.clone(), &*self.clock).inspect_err(|err| {
            debug!(task_id = %task_id, operator = %operator, error = %err, "start refused");
        })?;

        let lease = self.registry.lease(workplace_id).await;
        let (_, acquisition) = self.registry.acquire_seat(&lease, operator).await?;

        if let Err(err) = self.repository.update(&task).await {
            if acquisition.changed_occupancy() {
                self.undo_seat(&lease, operator).await;
            }
            return Err(err.into());
        }

        info!(
            task_id = %task_id,
            workplace_id = %workplace_id,
            operator = %operator,
            "work started"
        );
        Ok(task)
    }

    /// Completes the task from any status and frees its operators' seats.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] or storage errors; the
    /// transition itself has no preconditions.
    pub async fn complete_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let task = self
            .close_with(task_id, |task, clock| Ok(task.complete(clock)))
            .await?;
        info!(task_id = %task_id, "task completed");
        Ok(task)
    }

    /// Takes `operator` off the task. Their workplace seat is freed unless
    /// another in-progress task at the same workplace still has them.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the operator is not
    /// working the task, or lookup and repository errors.
    pub async fn remove_operator(
        &self,
        task_id: TaskId,
        operator: &OperatorId,
    ) -> TaskLifecycleResult<Task> {
        let task = self
            .close_with(task_id, |task, clock| {
                task.remove_operator(operator, clock)?;
                Ok(vec![operator.clone()])
            })
            .await?;
        info!(task_id = %task_id, operator = %operator, "operator left task");
        Ok(task)
    }

    /// Flags the task as defective from any status and frees its operators'
    /// seats.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the reason is blank, or
    /// lookup and repository errors.
    pub async fn flag_defect(&self, task_id: TaskId, reason: &str) -> TaskLifecycleResult<Task> {
        let task = self
            .close_with(task_id, |task, clock| {
                let validated = Reason::new(reason)?;
                Ok(task.flag_defect(validated, clock))
            })
            .await?;
        info!(task_id = %task_id, "task flagged as defect");
        Ok(task)
    }

    /// Cancels an in-progress task on behalf of an operator working it,
    /// recording the reason in the notes and freeing operator seats.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the task is not in
    /// progress, the operator is not working it, or the reason is blank; or
    /// lookup and repository errors.
    pub async fn cancel_task(
        &self,
        task_id: TaskId,
        operator: &OperatorId,
        reason: &str,
    ) -> TaskLifecycleResult<Task> {
        let prefix = Arc::clone(&self.cancel_note_prefix);
        let task = self
            .close_with(task_id, |task, clock| {
                task.ensure_can_cancel(operator)?;
                let validated = Reason::new(reason)?;
                task.cancel(operator, &validated, &prefix, clock)
            })
            .await?;
        info!(task_id = %task_id, operator = %operator, "task cancelled");
        Ok(task)
    }

    /// Points the task at another workplace, or at none.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] while operators are working the
    /// task, [`TaskLifecycleError::UnknownWorkplace`] for a missing workplace,
    /// or lookup and repository errors.
    pub async fn assign_workplace(
        &self,
        task_id: TaskId,
        workplace_id: Option<WorkplaceId>,
    ) -> TaskLifecycleResult<Task> {
        let _task_lock = self.task_locks.lock(task_id).await;
        if let Some(id) = workplace_id {
            self.ensure_workplace_exists(id).await?;
        }
        let mut task = self.get(task_id).await?;
        task.assign_workplace(workplace_id, &*self.clock)?;
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Appends a line to the task notes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for a blank note, or lookup and
    /// repository errors.
    pub async fn append_note(&self, task_id: TaskId, note: &str) -> TaskLifecycleResult<Task> {
        let _task_lock = self.task_locks.lock(task_id).await;
        let mut task = self.get(task_id).await?;
        task.append_note(note, &*self.clock)?;
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Applies a transition that may free operators, then releases the seats
    /// no other in-progress task at the workplace still needs.
    ///
    /// The task is written first. If the seat release then fails, the task
    /// is written back to its previous state before the error is returned.
    async fn close_with(
        &self,
        task_id: TaskId,
        transition: impl FnOnce(&mut Task, &C) -> Result<Vec<OperatorId>, TaskDomainError>,
    ) -> TaskLifecycleResult<Task> {
        let _task_lock = self.task_locks.lock(task_id).await;
        let original = self.get(task_id).await?;
        let mut task = original.clone();
        let freed = transition(&mut task, &*self.clock).inspect_err(|err| {
            debug!(task_id = %task_id, error = %err, "transition refused");
        })?;

        let Some(workplace_id) = task.workplace_id() else {
            self.repository.update(&task).await?;
            return Ok(task);
        };

        let lease = self.registry.lease(workplace_id).await;
        self.repository.update(&task).await?;
        let released = release_unless_still_worked(
            &*self.repository,
            &self.registry,
            &lease,
            task_id,
            &freed,
        )
        .await;
        if let Err(err) = released {
            self.undo_task(&original).await;
            return Err(err);
        }
        Ok(task)
    }

    async fn ensure_workplace_exists(&self, id: WorkplaceId) -> TaskLifecycleResult<()> {
        match self.registry.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(TaskLifecycleError::UnknownWorkplace(id)),
        }
    }

    async fn undo_seat(&self, lease: &SeatLease, operator: &OperatorId) {
        if let Err(err) = self
            .registry
            .release_seats(lease, std::slice::from_ref(operator))
            .await
        {
            warn!(
                workplace_id = %lease.workplace_id(),
                operator = %operator,
                error = %err,
                "failed to roll back seat after task update failure"
            );
        }
    }

    async fn undo_task(&self, original: &Task) {
        if let Err(err) = self.repository.update(original).await {
            warn!(
                task_id = %original.id(),
                error = %err,
                "failed to roll back task after seat release failure"
            );
        }
    }
}
