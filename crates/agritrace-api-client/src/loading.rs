//! Process-wide in-flight request tracking.
//!
//! UI shells poll [`LoadingTracker::is_loading`] to drive a global busy
//! indicator. Requests issued through a client marked as background never
//! touch the tracker, so fast, frequent calls (signed-URL issuance, batched
//! deletion) do not flicker the interface.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counter of in-flight foreground requests.
#[derive(Clone, Debug, Default)]
pub struct LoadingTracker {
    active: Arc<AtomicUsize>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an in-flight request. The returned guard unregisters it
    /// when dropped, including on error paths.
    pub fn begin(&self) -> LoadingGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            active: Arc::clone(&self.active),
        }
    }

    /// Number of foreground requests currently in flight.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn is_loading(&self) -> bool {
        self.active() > 0
    }
}

/// RAII guard for one in-flight request.
#[derive(Debug)]
pub struct LoadingGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_counts_nested_guards() {
        let tracker = LoadingTracker::new();
        assert!(!tracker.is_loading());

        let first = tracker.begin();
        let second = tracker.begin();
        assert_eq!(tracker.active(), 2);

        drop(first);
        assert_eq!(tracker.active(), 1);
        drop(second);
        assert!(!tracker.is_loading());
    }

    #[test]
    fn clones_share_the_same_counter() {
        let tracker = LoadingTracker::new();
        let clone = tracker.clone();
        let _guard = tracker.begin();
        assert!(clone.is_loading());
    }
}
