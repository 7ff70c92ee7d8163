//! Deferred seat release shared by every transition that frees operators.
//!
//! An operator may work several in-progress tasks at one workplace while
//! holding a single seat there. The seat is only freed once no other
//! in-progress task at that workplace still lists the operator as current.

use super::lifecycle::TaskLifecycleResult;
use crate::task::{
    domain::{TaskId, TaskStatus},
    ports::{TaskQuery, TaskRepository},
};
use crate::workplace::{
    domain::OperatorId,
    ports::WorkplaceRepository,
    services::{SeatLease, WorkplaceRegistryService},
};
use mockable::Clock;
use tracing::debug;

/// Releases the seats of `operators` at the leased workplace, skipping
/// operators still working another in-progress task there.
///
/// Returns the operators whose seats were released. The caller must hold the
/// lease for the whole transition so that no other task at the workplace can
/// change its operators in between.
pub(super) async fn release_unless_still_worked<T, W, C>(
    tasks: &T,
    registry: &WorkplaceRegistryService<W, C>,
    lease: &SeatLease,
    released_by: TaskId,
    operators: &[OperatorId],
) -> TaskLifecycleResult<Vec<OperatorId>>
where
    T: TaskRepository + ?Sized,
    W: WorkplaceRepository,
    C: Clock + Send + Sync,
{
    if operators.is_empty() {
        return Ok(Vec::new());
    }

    let query = TaskQuery::new()
        .at_workplace(lease.workplace_id())
        .with_statuses([TaskStatus::InProgress])
        .excluding(released_by);
    let still_running = tasks.search(&query).await?;

    let (kept, releasable): (Vec<OperatorId>, Vec<OperatorId>) =
        operators.iter().cloned().partition(|operator| {
            still_running
                .iter()
                .any(|task| task.is_worked_by(operator))
        });

    if !kept.is_empty() {
        debug!(
            workplace_id = %lease.workplace_id(),
            task_id = %released_by,
            kept = kept.len(),
            "seats kept for operators working other tasks"
        );
    }
    if !releasable.is_empty() {
        registry.release_seats(lease, &releasable).await?;
    }
    Ok(releasable)
}
