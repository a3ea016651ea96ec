//! Per-document debouncing of check runs.
//!
//! Each document gets its own pending timer, so rapid edits to one file
//! coalesce into a single check without suppressing pending checks for other
//! files.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Duration;

pub(crate) struct Debouncer {
    delay: Duration,
    pending: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Debouncer {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Schedule `action` to run after the quiet period, superseding any
    /// pending action for the same key.
    pub(crate) async fn schedule<F>(&self, key: &str, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock().await;

        if let Some(previous) = pending.remove(key) {
            previous.abort();
        }

        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        });

        pending.insert(key.to_string(), handle);
    }

    /// Drop any pending action for `key` without running it.
    pub(crate) async fn cancel(&self, key: &str) {
        if let Some(handle) = self.pending.lock().await.remove(key) {
            handle.abort();
        }
    }
}
