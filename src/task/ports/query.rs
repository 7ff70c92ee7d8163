//! Filter predicates for task searches.

use crate::task::domain::{Task, TaskId, TaskStatus};
use crate::workplace::domain::{OperatorId, WorkplaceId};
use chrono::{DateTime, Utc};

/// Conjunction of optional task filters.
///
/// An empty query matches every task. Repository adapters may translate the
/// query into their own storage language, but must agree with
/// [`TaskQuery::matches`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    workplace_id: Option<WorkplaceId>,
    statuses: Option<Vec<TaskStatus>>,
    name_pattern: Option<String>,
    ordered_after: Option<DateTime<Utc>>,
    ordered_before: Option<DateTime<Utc>>,
    current_operator: Option<OperatorId>,
    excluded: Option<TaskId>,
}

impl TaskQuery {
    /// Creates a query matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps tasks referencing `workplace_id`.
    #[must_use]
    pub const fn at_workplace(mut self, workplace_id: WorkplaceId) -> Self {
        self.workplace_id = Some(workplace_id);
        self
    }

    /// Keeps tasks whose status is one of `statuses`.
    #[must_use]
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    /// Keeps tasks whose name contains `pattern`, ignoring case.
    #[must_use]
    pub fn name_contains(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into().to_lowercase());
        self
    }

    /// Keeps tasks ordered at or after `instant`.
    #[must_use]
    pub const fn ordered_since(mut self, instant: DateTime<Utc>) -> Self {
        self.ordered_after = Some(instant);
        self
    }

    /// Keeps tasks ordered strictly before `instant`.
    #[must_use]
    pub const fn ordered_before(mut self, instant: DateTime<Utc>) -> Self {
        self.ordered_before = Some(instant);
        self
    }

    /// Keeps tasks that `operator` is currently working.
    #[must_use]
    pub fn worked_by(mut self, operator: OperatorId) -> Self {
        self.current_operator = Some(operator);
        self
    }

    /// Drops the task with identifier `task_id` from the results.
    #[must_use]
    pub const fn excluding(mut self, task_id: TaskId) -> Self {
        self.excluded = Some(task_id);
        self
    }

    /// Returns `true` when `task` satisfies every filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.workplace_id
            .is_none_or(|workplace_id| task.workplace_id() == Some(workplace_id))
            && self
                .statuses
                .as_ref()
                .is_none_or(|statuses| statuses.contains(&task.status()))
            && self
                .name_pattern
                .as_ref()
                .is_none_or(|pattern| task.name().to_lowercase().contains(pattern.as_str()))
            && self
                .ordered_after
                .is_none_or(|instant| task.order_date() >= instant)
            && self
                .ordered_before
                .is_none_or(|instant| task.order_date() < instant)
            && self
                .current_operator
                .as_ref()
                .is_none_or(|operator| task.is_worked_by(operator))
            && self.excluded.is_none_or(|task_id| task.id() != task_id)
    }
}
