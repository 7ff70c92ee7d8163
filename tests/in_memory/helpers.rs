//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use workfloor::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::TaskId,
    services::{CreateTaskRequest, TaskLifecycleService},
};
use workfloor::workplace::{
    adapters::memory::InMemoryWorkplaceRepository,
    domain::{OperatorId, WorkplaceId},
    services::{CreateWorkplaceRequest, WorkplaceRegistryService},
};

/// Registry type wired to in-memory storage.
pub type TestRegistry = WorkplaceRegistryService<InMemoryWorkplaceRepository, DefaultClock>;

/// Lifecycle engine type wired to in-memory storage.
pub type TestEngine =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryWorkplaceRepository, DefaultClock>;

/// Provides a lifecycle engine whose registry shares the same seat locks.
#[fixture]
pub fn engine() -> TestEngine {
    let clock = Arc::new(DefaultClock);
    let registry = WorkplaceRegistryService::new(
        Arc::new(InMemoryWorkplaceRepository::new()),
        Arc::clone(&clock),
    );
    TaskLifecycleService::new(Arc::new(InMemoryTaskRepository::new()), registry, clock)
}

/// Builds an operator identifier.
///
/// # Panics
///
/// Panics when `name` is blank.
pub fn operator(name: &str) -> OperatorId {
    OperatorId::new(name).expect("valid operator")
}

/// Registers a workplace and returns its identifier.
///
/// # Errors
///
/// Returns an error if registration fails.
pub async fn register_workplace(
    engine: &TestEngine,
    code: &str,
    capacity: i64,
) -> eyre::Result<WorkplaceId> {
    let workplace = engine
        .registry()
        .create(CreateWorkplaceRequest::new(
            format!("Workplace {code}"),
            code,
            capacity,
        ))
        .await?;
    Ok(workplace.id())
}

/// Creates a ready task at `workplace_id` allowing `allowed`.
///
/// # Errors
///
/// Returns an error if task creation fails.
pub async fn create_task(
    engine: &TestEngine,
    workplace_id: WorkplaceId,
    name: &str,
    allowed: &[&str],
) -> eyre::Result<TaskId> {
    let task = engine
        .create_task(
            CreateTaskRequest::new(name, allowed.iter().map(|name| operator(name)))
                .at_workplace(workplace_id),
        )
        .await?;
    Ok(task.id())
}

/// Returns the names of the operators seated at `workplace_id`.
///
/// # Errors
///
/// Returns an error if the workplace cannot be loaded.
pub async fn seated(engine: &TestEngine, workplace_id: WorkplaceId) -> eyre::Result<Vec<String>> {
    let workplace = engine.registry().get(workplace_id).await?;
    Ok(workplace
        .current_operators()
        .iter()
        .map(ToString::to_string)
        .collect())
}
