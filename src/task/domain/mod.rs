//! Domain model for the task lifecycle.
//!
//! Tasks move through a closed set of statuses. The aggregate validates every
//! transition on its own fields; seat bookkeeping on the referenced workplace
//! is coordinated by the lifecycle service.

mod error;
mod grouping;
mod ids;
mod reason;
mod status;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use grouping::{StatusGroup, group_by_status};
pub use ids::TaskId;
pub use reason::Reason;
pub use status::{TaskStatus, color_for_stored_status};
pub use task::{NewTask, PersistedTaskData, Task};
