//! Per-entity lock table
//!
//! Requests touching the same sensor (by uid or id) or the same barrier are
//! serialized through a lock handle taken from an [`EntityLocks`] table.
//! Acquisition is bounded by a timeout and fails with a retryable busy error
//! instead of waiting indefinitely.

use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use crate::service::error::{AccessControlError, AccessControlResult};

/// Shared handle on the lock of a single entity
#[derive(Debug, Clone, Default)]
pub struct EntityLock {
    inner: Arc<Mutex<()>>,
}

impl EntityLock {
    /// Acquire the lock, waiting at most `timeout`
    pub fn acquire(&self, timeout: Duration, resource: impl fmt::Display) -> AccessControlResult<MutexGuard<'_, ()>> {
        self.inner
            .try_lock_for(timeout)
            .ok_or_else(|| AccessControlError::busy(resource.to_string()))
    }
}

/// Table of lazily created per-entity locks
pub struct EntityLocks<K> {
    locks: Mutex<HashMap<K, EntityLock>>,
    timeout: Duration,
}

impl<K> fmt::Debug for EntityLocks<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityLocks")
            .field("entries", &self.locks.lock().len())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl<K: Eq + Hash + Clone> EntityLocks<K> {
    /// Create a lock table with the given acquisition timeout
    pub fn new(timeout: Duration) -> Self {
        Self { locks: Mutex::new(HashMap::new()), timeout }
    }

    /// Acquisition timeout applied by this table
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get (or create) the lock handle for `key`
    ///
    /// Callers hold the returned handle for the duration of the guarded
    /// section and call [`EntityLock::acquire`] on it.
    pub fn handle(&self, key: &K) -> EntityLock {
        self.locks.lock().entry(key.clone()).or_default().clone()
    }

    /// Drop the handle for `key` if no request currently holds it
    pub fn forget(&self, key: &K) {
        let mut locks = self.locks.lock();
        if let Some(lock) = locks.get(key) {
            if Arc::strong_count(&lock.inner) == 1 {
                locks.remove(key);
            }
        }
    }

    /// Number of entities with a lock handle
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    /// Whether the table has no lock handles
    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}
