//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use crate::workplace::domain::OperatorId;
use thiserror::Error;

/// Errors returned while constructing tasks or validating their transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// A task needs at least one operator allowed to work it.
    #[error("task must allow at least one operator")]
    EmptyAllowList,

    /// A defect or cancellation reason is empty after trimming.
    #[error("reason must not be empty")]
    EmptyReason,

    /// A note is empty after trimming.
    #[error("note must not be empty")]
    EmptyNote,

    /// Work cannot start on a task without a workplace.
    #[error("task {0} has no workplace; a workplace is required to start work")]
    WorkplaceRequired(TaskId),

    /// The operator is not on the task's allow-list.
    #[error("operator {operator} is not allowed to work on task {task_id}")]
    OperatorNotAllowed {
        /// Task the operator tried to work.
        task_id: TaskId,
        /// Operator that was refused.
        operator: OperatorId,
    },

    /// The operator is not currently working the task.
    #[error("operator {operator} is not currently working on task {task_id}")]
    OperatorNotCurrent {
        /// Task the operator addressed.
        task_id: TaskId,
        /// Operator that was refused.
        operator: OperatorId,
    },

    /// The transition requires an in-progress task.
    #[error("task {task_id} is {status}, not in progress")]
    NotInProgress {
        /// Task that was addressed.
        task_id: TaskId,
        /// Status the task was in.
        status: TaskStatus,
    },

    /// The task is closed and cannot be worked again.
    #[error("task {task_id} is {status} and cannot be started")]
    TaskClosed {
        /// Task that was addressed.
        task_id: TaskId,
        /// Terminal status the task was in.
        status: TaskStatus,
    },

    /// The workplace cannot change while operators are working the task.
    #[error("task {0} still has operators working on it")]
    OperatorsStillAssigned(TaskId),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
