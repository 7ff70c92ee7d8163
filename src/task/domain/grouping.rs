//! Complete, fixed-order status grouping for dashboards.

use super::{Task, TaskStatus};
use serde::{Deserialize, Serialize};

/// Number of tasks in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusGroup {
    /// Grouped status.
    pub status: TaskStatus,
    /// Number of tasks with that status.
    pub count: usize,
}

/// Counts tasks per status.
///
/// The result always holds one entry per [`TaskStatus`], in
/// [`TaskStatus::ALL`] order, with zero counts for absent statuses.
pub fn group_by_status<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<StatusGroup> {
    let mut groups = TaskStatus::ALL.map(|status| StatusGroup { status, count: 0 });
    for task in tasks {
        if let Some(group) = groups.iter_mut().find(|group| group.status == task.status()) {
            group.count += 1;
        }
    }
    groups.to_vec()
}
