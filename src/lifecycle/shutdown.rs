//! Cancellation coordination for pipeline runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

/// Coordinator for cooperative cancellation.
///
/// Provides a broadcast channel that long-running work can wait on, plus
/// a flag for cheap polling between steps. Cloning shares the same state.
#[derive(Clone)]
pub struct Cancellation {
    tx: broadcast::Sender<()>,
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    /// Create a new cancellation coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to the cancellation signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger cancellation. Idempotent.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
        let _ = self.tx.send(());
    }

    /// True once cancellation has been triggered.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_sets_flag_and_wakes_subscribers() {
        let cancel = Cancellation::new();
        let mut rx = cancel.subscribe();
        assert!(!cancel.is_cancelled());

        cancel.trigger();
        assert!(cancel.is_cancelled());
        rx.recv().await.unwrap();
    }

    #[test]
    fn test_trigger_without_subscribers_is_fine() {
        let cancel = Cancellation::new();
        cancel.trigger();
        cancel.trigger();
        assert!(cancel.is_cancelled());
    }
}
