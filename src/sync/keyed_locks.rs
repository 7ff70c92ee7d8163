//! Lock table handing out one async mutex per key.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Table of lazily created async mutexes keyed by record identifier.
///
/// Locks for different keys never contend with each other. Entries live for
/// the lifetime of the table, so the table grows with the number of distinct
/// keys ever locked.
pub struct KeyedLocks<K> {
    slots: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Waits until the lock for `key` is free and returns its guard.
    pub async fn lock(&self, key: K) -> KeyedGuard<K> {
        let slot = self.slot(&key);
        let guard = slot.lock_owned().await;
        KeyedGuard { key, _guard: guard }
    }

    /// Returns the number of keys that have ever been locked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` when no key has been locked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &K) -> Arc<AsyncMutex<()>> {
        // The slot map only stores `Arc`s, so a poisoned map is still usable.
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key.clone()).or_default())
    }
}

impl<K> Default for KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for KeyedLocks<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedLocks").finish_non_exhaustive()
    }
}

/// Exclusive hold on one key of a [`KeyedLocks`] table.
pub struct KeyedGuard<K> {
    key: K,
    _guard: OwnedMutexGuard<()>,
}

impl<K> KeyedGuard<K> {
    /// Returns the key this guard holds.
    pub const fn key(&self) -> &K {
        &self.key
    }
}

impl<K: fmt::Debug> fmt::Debug for KeyedGuard<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedGuard").field("key", &self.key).finish()
    }
}
