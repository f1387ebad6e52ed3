use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::models::event::EventId;

type LockMap = Mutex<HashMap<EventId, Arc<AsyncMutex<()>>>>;

/// One async mutex per event id.
///
/// Admission, cancellation and check-in of the same event run one at a time so
/// that the capacity check and the write that follows it cannot interleave.
/// An entry lives only while some task holds or waits for it.
#[derive(Default)]
pub struct EventLocks {
    locks: Arc<LockMap>,
}

impl EventLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, event_id: EventId) -> EventLockGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(event_id).or_default().clone()
        };
        EventLockGuard {
            event_id,
            locks: Arc::clone(&self.locks),
            guard: Some(lock.lock_owned().await),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Held for the duration of one state change of an event.
pub struct EventLockGuard {
    event_id: EventId,
    locks: Arc<LockMap>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for EventLockGuard {
    fn drop(&mut self) {
        self.guard.take();

        // every clone of the entry is taken under this map lock, so a count of
        // one means nobody else is holding or waiting for it
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if locks
            .get(&self.event_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.event_id);
        }
    }
}
