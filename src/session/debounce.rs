// src/session/debounce.rs
// Coalesces rapid successive persistence calls into one store write:
// persist at most once per quiescence window after the last mutation,
// cancel the pending timer on a new mutation, flush on demand.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::warn;

struct Pending {
    generation: u64,
    flush_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Keyed debouncer. Each key (session id) holds at most one pending
/// action; scheduling a new action for the same key cancels the previous
/// one before it fires.
#[derive(Clone)]
pub struct Debouncer {
    window: Duration,
    generation: Arc<AtomicU64>,
    pending: Arc<Mutex<HashMap<String, Pending>>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Schedule `action` to run after the quiescence window, replacing
    /// any action still pending for this key.
    pub fn schedule<F, Fut>(&self, key: &str, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst);
        let (flush_tx, flush_rx) = oneshot::channel();
        let window = self.window;
        let pending = Arc::clone(&self.pending);
        let task_key = key.to_string();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(window) => {}
                _ = flush_rx => {}
            }
            action().await;
            // Only clear our own entry: a newer schedule may have already
            // replaced it.
            let mut map = pending.lock().expect("debouncer lock");
            if map.get(&task_key).is_some_and(|p| p.generation == generation) {
                map.remove(&task_key);
            }
        });

        let previous = self.pending.lock().expect("debouncer lock").insert(
            key.to_string(),
            Pending {
                generation,
                flush_tx,
                handle,
            },
        );
        if let Some(previous) = previous {
            previous.handle.abort();
        }
    }

    /// Run the pending action for `key` now, if any, and wait for it.
    pub async fn flush(&self, key: &str) {
        let entry = self.pending.lock().expect("debouncer lock").remove(key);
        if let Some(entry) = entry {
            let _ = entry.flush_tx.send(());
            if let Err(e) = entry.handle.await {
                if !e.is_cancelled() {
                    warn!("Debounced save for {} panicked: {}", key, e);
                }
            }
        }
    }

    /// Run every pending action now. Called on shutdown so no trailing
    /// message-list write is lost.
    pub async fn flush_all(&self) {
        let entries: Vec<(String, Pending)> = self
            .pending
            .lock()
            .expect("debouncer lock")
            .drain()
            .collect();
        for (key, entry) in entries {
            let _ = entry.flush_tx.send(());
            if let Err(e) = entry.handle.await {
                if !e.is_cancelled() {
                    warn!("Debounced save for {} panicked: {}", key, e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn rapid_schedules_coalesce_into_one_run() {
        let debouncer = Debouncer::new(Duration::from_millis(40));
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let runs = Arc::clone(&runs);
            debouncer.schedule("session-1", move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn flush_runs_pending_action_immediately() {
        let debouncer = Debouncer::new(Duration::from_secs(60));
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&runs);
        debouncer.schedule("session-1", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        debouncer.flush("session-1").await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let debouncer = Debouncer::new(Duration::from_millis(20));
        let runs = Arc::new(AtomicUsize::new(0));

        for key in ["a", "b"] {
            let runs = Arc::clone(&runs);
            debouncer.schedule(key, move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn flush_all_drains_every_key() {
        let debouncer = Debouncer::new(Duration::from_secs(60));
        let runs = Arc::new(AtomicUsize::new(0));

        for key in ["a", "b", "c"] {
            let runs = Arc::clone(&runs);
            debouncer.schedule(key, move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
        }

        debouncer.flush_all().await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn latest_scheduled_action_wins() {
        let debouncer = Debouncer::new(Duration::from_millis(30));
        let value = Arc::new(AtomicUsize::new(0));

        for n in 1..=3 {
            let value = Arc::clone(&value);
            debouncer.schedule("session-1", move || async move {
                value.store(n, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(value.load(Ordering::SeqCst), 3);
    }
}
