use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-thread exclusive slots
///
/// Every writer of a thread's metadata or posts takes the thread's slot, so
/// admission, closing, summaries and seeding never interleave. Clones share
/// the same slots.
#[derive(Debug, Clone, Default)]
pub struct ThreadLocks {
    slots: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl ThreadLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive rights on a thread
    pub async fn lock(&self, thread_id: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().await;
            // Drop slots nobody holds or waits on
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(slots.entry(thread_id.to_string()).or_default())
        };
        slot.lock_owned().await
    }
}
