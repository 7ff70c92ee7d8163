//! Application services for workplace registry orchestration.

mod registry;

pub use registry::{
    CreateWorkplaceRequest, SeatLease, WorkplaceRegistryError, WorkplaceRegistryResult,
    WorkplaceRegistryService,
};
