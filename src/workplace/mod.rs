//! Workplace registry for Workfloor.
//!
//! Tracks shared physical workplaces, their administrative status, the
//! operators authorised to use them, and the operators currently occupying
//! one of their seats. The registry is the only component allowed to change
//! a workplace's occupancy, and it never lets the number of occupants exceed
//! the workplace capacity. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
