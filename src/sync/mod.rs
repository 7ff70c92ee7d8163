//! Per-key asynchronous mutual exclusion.
//!
//! Both the workplace registry and the task lifecycle engine serialise
//! read-modify-write cycles on a single record through a [`KeyedLocks`]
//! table. A caller holding a [`KeyedGuard`] for a key is the only writer of
//! that record until the guard is dropped.

mod keyed_locks;

pub use keyed_locks::{KeyedGuard, KeyedLocks};
