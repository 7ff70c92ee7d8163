//! In-memory repository for task lifecycle tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *stored = task.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn search(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut found: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| query.matches(task))
            .cloned()
            .collect();
        found.sort_by(|left, right| {
            left.name()
                .cmp(right.name())
                .then_with(|| left.id().cmp(&right.id()))
        });
        Ok(found)
    }
}
