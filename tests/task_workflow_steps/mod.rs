//! Step definitions for task workflow BDD scenarios.

pub mod world;

mod given;
mod then;
mod when;
