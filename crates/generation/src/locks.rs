//! Per-record async mutual exclusion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

type LockMap = HashMap<String, Arc<tokio::sync::Mutex<()>>>;

/// Map of record id to an async mutex. Entries exist only while someone holds or waits on them.
#[derive(Debug, Clone, Default)]
pub struct RecordLocks {
    inner: Arc<Mutex<LockMap>>,
}

/// Held lock on one record; dropping it releases the record and prunes the map entry when
/// nobody else is waiting.
#[derive(Debug)]
pub struct RecordGuard {
    record_id: String,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<Mutex<LockMap>>,
}

impl RecordLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until the record is free and locks it.
    pub async fn acquire(&self, record_id: &str) -> RecordGuard {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(record_id.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        let guard = lock.lock_owned().await;
        RecordGuard {
            record_id: record_id.to_string(),
            guard: Some(guard),
            locks: self.inner.clone(),
        }
    }

    /// Number of records currently locked or waited on.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for RecordGuard {
    fn drop(&mut self) {
        // Release first so the strong count below only sees the map and any waiters.
        self.guard.take();
        let mut map = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(lock) = map.get(&self.record_id) {
            if Arc::strong_count(lock) == 1 {
                map.remove(&self.record_id);
            }
        }
    }
}
