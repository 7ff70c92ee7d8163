//! Adapter implementations of the workplace registry ports.

pub mod memory;
