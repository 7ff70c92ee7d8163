//! Task lifecycle engine for Workfloor.
//!
//! Tasks are units of work bound to at most one workplace and to an
//! allow-list of operators. The engine drives their status machine
//! (`ready`, `in_progress`, `completed`, `defect`, `cancelled`) and keeps the
//! referenced workplace's occupancy in step with the operators working each
//! task. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
