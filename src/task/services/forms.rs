//! Reason capture forms for defect reports and cancellations.
//!
//! A form is opened from an "active record" context, collects one required
//! text field, and feeds the matching lifecycle operation on confirmation.

use super::lifecycle::{TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService};
use crate::task::{
    domain::{Task, TaskId},
    ports::TaskRepository,
};
use crate::workplace::{domain::OperatorId, ports::WorkplaceRepository};
use mockable::Clock;

/// Caller-supplied context naming the record the user is looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveRecordContext {
    active_id: Option<TaskId>,
}

impl ActiveRecordContext {
    /// Creates a context pointing at `task_id`.
    #[must_use]
    pub const fn for_task(task_id: TaskId) -> Self {
        Self {
            active_id: Some(task_id),
        }
    }

    /// Returns the active task, if any.
    #[must_use]
    pub const fn active_id(&self) -> Option<TaskId> {
        self.active_id
    }
}

/// Form collecting the reason a task is defective.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefectReasonForm {
    task_id: Option<TaskId>,
    defect_reason: String,
}

impl DefectReasonForm {
    /// Opens the form pre-populated with the context's active task.
    #[must_use]
    pub const fn from_context(context: &ActiveRecordContext) -> Self {
        Self {
            task_id: context.active_id(),
            defect_reason: String::new(),
        }
    }

    /// Fills in the defect reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.defect_reason = reason.into();
        self
    }

    /// Returns the target task, if any.
    #[must_use]
    pub const fn task_id(&self) -> Option<TaskId> {
        self.task_id
    }

    /// Returns the reason entered so far.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.defect_reason
    }

    /// Flags the target task as defective with the entered reason.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::MissingTaskReference`] when no task is
    /// selected, otherwise the errors of
    /// [`TaskLifecycleService::flag_defect`].
    pub async fn confirm<T, W, C>(
        self,
        service: &TaskLifecycleService<T, W, C>,
    ) -> TaskLifecycleResult<Task>
    where
        T: TaskRepository,
        W: WorkplaceRepository,
        C: Clock + Send + Sync,
    {
        let task_id = self.task_id.ok_or(TaskLifecycleError::MissingTaskReference)?;
        service.flag_defect(task_id, &self.defect_reason).await
    }
}

/// Form collecting the reason an operator cancels a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancelReasonForm {
    task_id: Option<TaskId>,
    cancel_reason: String,
}

impl CancelReasonForm {
    /// Opens the form pre-populated with the context's active task.
    #[must_use]
    pub const fn from_context(context: &ActiveRecordContext) -> Self {
        Self {
            task_id: context.active_id(),
            cancel_reason: String::new(),
        }
    }

    /// Fills in the cancellation reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.cancel_reason = reason.into();
        self
    }

    /// Returns the target task, if any.
    #[must_use]
    pub const fn task_id(&self) -> Option<TaskId> {
        self.task_id
    }

    /// Returns the reason entered so far.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.cancel_reason
    }

    /// Cancels the target task on behalf of `operator`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::MissingTaskReference`] when no task is
    /// selected, otherwise the errors of
    /// [`TaskLifecycleService::cancel_task`].
    pub async fn confirm<T, W, C>(
        self,
        service: &TaskLifecycleService<T, W, C>,
        operator: &OperatorId,
    ) -> TaskLifecycleResult<Task>
    where
        T: TaskRepository,
        W: WorkplaceRepository,
        C: Clock + Send + Sync,
    {
        let task_id = self.task_id.ok_or(TaskLifecycleError::MissingTaskReference)?;
        service
            .cancel_task(task_id, operator, &self.cancel_reason)
            .await
    }
}

impl<T, W, C> TaskLifecycleService<T, W, C>
where
    T: TaskRepository,
    W: WorkplaceRepository,
    C: Clock + Send + Sync,
{
    /// Opens the defect form for an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] or repository errors.
    pub async fn open_defect_form(&self, task_id: TaskId) -> TaskLifecycleResult<DefectReasonForm> {
        let task = self.get(task_id).await?;
        Ok(DefectReasonForm::from_context(&ActiveRecordContext::for_task(
            task.id(),
        )))
    }

    /// Opens the cancellation form after checking that `operator` may cancel
    /// the task, so the user is not asked for a reason that will be refused.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the task is not in progress
    /// or the operator is not working it, or lookup errors.
    pub async fn open_cancel_form(
        &self,
        task_id: TaskId,
        operator: &OperatorId,
    ) -> TaskLifecycleResult<CancelReasonForm> {
        let task = self.get(task_id).await?;
        task.ensure_can_cancel(operator)?;
        Ok(CancelReasonForm::from_context(&ActiveRecordContext::for_task(
            task.id(),
        )))
    }
}
