//! Shared world state for task workflow BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use workfloor::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskId},
    services::{TaskLifecycleError, TaskLifecycleService},
};
use workfloor::workplace::{
    adapters::memory::InMemoryWorkplaceRepository, domain::WorkplaceId,
    services::WorkplaceRegistryService,
};

/// Engine type used by the BDD world.
pub type TestEngine =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryWorkplaceRepository, DefaultClock>;

/// Scenario world for task workflow behaviour tests.
pub struct TaskWorkflowWorld {
    pub engine: TestEngine,
    pub workplaces: HashMap<String, WorkplaceId>,
    pub tasks: HashMap<String, TaskId>,
    pub last_result: Option<Result<Task, TaskLifecycleError>>,
}

impl TaskWorkflowWorld {
    /// Creates a world with no workplaces or tasks.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(DefaultClock);
        let registry = WorkplaceRegistryService::new(
            Arc::new(InMemoryWorkplaceRepository::new()),
            Arc::clone(&clock),
        );
        Self {
            engine: TaskLifecycleService::new(
                Arc::new(InMemoryTaskRepository::new()),
                registry,
                clock,
            ),
            workplaces: HashMap::new(),
            tasks: HashMap::new(),
            last_result: None,
        }
    }

    /// Looks up a workplace registered earlier in the scenario by code.
    ///
    /// # Errors
    ///
    /// Returns an error when no workplace with that code was registered.
    pub fn workplace(&self, code: &str) -> Result<WorkplaceId, eyre::Report> {
        self.workplaces
            .get(code)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown workplace {code} in scenario world"))
    }

    /// Looks up a task created earlier in the scenario by name.
    ///
    /// # Errors
    ///
    /// Returns an error when no task with that name was created.
    pub fn task(&self, name: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown task {name} in scenario world"))
    }
}

impl Default for TaskWorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskWorkflowWorld {
    TaskWorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
