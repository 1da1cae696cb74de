//! Global request-in-flight counter.

use std::sync::Arc;

use tokio::sync::watch;

/// Counts in-progress work; `is_loading` whenever the count is above zero.
///
/// Subscribers are woken when the counter leaves or returns to zero, not on
/// every increment.
#[derive(Debug, Clone)]
pub struct LoadingCounter {
    count: Arc<watch::Sender<usize>>,
}

impl LoadingCounter {
    /// Construct an idle counter.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            count: Arc::new(sender),
        }
    }

    /// Increment the counter.
    pub fn start(&self) {
        self.count.send_if_modified(|count| {
            *count += 1;
            *count == 1
        });
    }

    /// Decrement the counter, never below zero.
    pub fn stop(&self) {
        self.count.send_if_modified(|count| {
            if *count == 0 {
                return false;
            }
            *count -= 1;
            *count == 0
        });
    }

    /// Force the counter back to zero.
    pub fn reset(&self) {
        self.count.send_replace(0);
    }

    /// Start now and stop when the returned guard drops.
    #[must_use]
    pub fn guard(&self) -> LoadingGuard {
        self.start();
        LoadingGuard {
            counter: self.clone(),
        }
    }

    /// Whether any work is in progress.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.count() > 0
    }

    /// Current number of in-progress units.
    #[must_use]
    pub fn count(&self) -> usize {
        *self.count.borrow()
    }

    /// Receiver notified on idle/busy transitions; read the count with `borrow`.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.count.subscribe()
    }
}

impl Default for LoadingCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps the counter incremented for its lifetime.
#[derive(Debug)]
pub struct LoadingGuard {
    counter: LoadingCounter,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.counter.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_clamped_at_zero() {
        let loading = LoadingCounter::new();
        loading.start();
        loading.start();
        loading.stop();
        assert!(loading.is_loading());

        loading.stop();
        assert!(!loading.is_loading());

        loading.stop();
        assert!(!loading.is_loading());
        assert_eq!(loading.count(), 0);
    }

    #[test]
    fn subscribers_see_only_transitions() {
        let loading = LoadingCounter::new();
        let mut receiver = loading.subscribe();

        loading.start();
        assert!(receiver.has_changed().unwrap_or(false));
        assert_eq!(*receiver.borrow_and_update(), 1);

        loading.start();
        loading.stop();
        assert!(!receiver.has_changed().unwrap_or(true));
        assert_eq!(*receiver.borrow(), 1);

        loading.stop();
        assert!(receiver.has_changed().unwrap_or(false));
        assert_eq!(*receiver.borrow_and_update(), 0);
    }

    #[test]
    fn guard_pairs_start_and_stop() {
        let loading = LoadingCounter::new();
        {
            let _first = loading.guard();
            let _second = loading.guard();
            assert_eq!(loading.count(), 2);
        }
        assert!(!loading.is_loading());
    }

    #[test]
    fn reset_returns_to_idle() {
        let loading = LoadingCounter::new();
        loading.start();
        loading.start();
        loading.reset();
        assert_eq!(loading.count(), 0);
    }
}
