//! Thread-safe handle around a [`QueueEngine`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::engine::QueueEngine;

/// Cheaply cloneable handle that serialises access to one engine.
///
/// Each closure passed to [`with`](Self::with) runs under a single lock
/// acquisition, so a whole operation (validate, mutate, record, notify) is
/// atomic with respect to other callers. Change listeners run while the lock
/// is held and must not call back into the handle.
#[derive(Clone)]
pub struct SharedQueueEngine {
    inner: Arc<Mutex<QueueEngine>>,
}

impl SharedQueueEngine {
    pub fn new(engine: QueueEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run a mutating operation.
    pub fn with<R>(&self, f: impl FnOnce(&mut QueueEngine) -> R) -> R {
        f(&mut self.lock())
    }

    /// Run a read-only query.
    pub fn read<R>(&self, f: impl FnOnce(&QueueEngine) -> R) -> R {
        f(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, QueueEngine> {
        // Engine operations validate before mutating, so state stays
        // consistent even if a listener panicked mid-notification.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SharedQueueEngine {
    fn default() -> Self {
        Self::new(QueueEngine::new())
    }
}
