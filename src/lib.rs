//! Workfloor: capacity-gated workplace occupancy and task lifecycle.
//!
//! This crate tracks shared physical workplaces with a finite number of
//! operator seats, and tasks that compete for those seats. Operators start,
//! leave, complete, cancel, or flag tasks; every transition keeps the task's
//! operators and the workplace occupancy consistent, and no workplace ever
//! seats more operators than its capacity, even under concurrent requests.
//!
//! # Architecture
//!
//! Workfloor follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory storage)
//!
//! # Modules
//!
//! - [`workplace`]: Workplace registry and seat occupancy
//! - [`task`]: Task status machine and operator assignment
//! - [`config`]: Runtime configuration
//! - [`failure`]: Coarse failure classification shared by both services
//! - [`sync`]: Keyed async locks used for seat serialisation
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod failure;
pub mod sync;
pub mod task;
pub mod telemetry;
pub mod workplace;
