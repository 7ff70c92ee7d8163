//! Application services for task lifecycle orchestration.

mod forms;
mod lifecycle;
mod seats;

pub use forms::{ActiveRecordContext, CancelReasonForm, DefectReasonForm};
pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
