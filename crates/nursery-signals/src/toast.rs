//! Transient notification queue.
//!
//! Toasts are displayed in insertion order. Each toast with a non-zero
//! duration schedules its own removal; a zero duration keeps it until it is
//! dismissed explicitly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::debug;

/// Lifetime applied to success and info toasts.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5_000);
/// Lifetime applied to error toasts.
pub const DEFAULT_ERROR_TOAST_DURATION: Duration = Duration::from_millis(7_000);

/// Toast variants used across the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    /// Informational toast.
    Info,
    /// Success toast.
    Success,
    /// Error toast.
    Error,
}

impl ToastKind {
    /// Lowercase label used by renderers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Toast payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Toast {
    /// Monotonic toast identifier.
    pub id: u64,
    /// Display message for the toast.
    pub message: String,
    /// Severity classification.
    pub kind: ToastKind,
    /// Time before automatic removal; zero means sticky.
    pub duration: Duration,
}

#[derive(Debug)]
struct Queue {
    next_id: AtomicU64,
    toasts: watch::Sender<Vec<Toast>>,
}

impl Queue {
    fn remove(&self, id: u64) -> bool {
        self.toasts.send_if_modified(|toasts| {
            let before = toasts.len();
            toasts.retain(|toast| toast.id != id);
            toasts.len() != before
        })
    }
}

/// Ordered list of live toasts.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    queue: Arc<Queue>,
}

impl ToastQueue {
    /// Construct an empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (toasts, _) = watch::channel(Vec::new());
        Self {
            queue: Arc::new(Queue {
                next_id: AtomicU64::new(1),
                toasts,
            }),
        }
    }

    /// Append a toast and return its identifier.
    ///
    /// Expiry timers run on the ambient tokio runtime; without one the toast
    /// stays until dismissed.
    pub fn add(&self, message: impl Into<String>, kind: ToastKind, duration: Duration) -> u64 {
        let id = self.queue.next_id.fetch_add(1, Ordering::Relaxed);
        let toast = Toast {
            id,
            message: message.into(),
            kind,
            duration,
        };
        self.queue.toasts.send_modify(|toasts| toasts.push(toast));

        if !duration.is_zero() {
            schedule_expiry(Arc::downgrade(&self.queue), id, duration);
        }
        id
    }

    /// Success toast with the default lifetime.
    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.add(message, ToastKind::Success, DEFAULT_TOAST_DURATION)
    }

    /// Info toast with the default lifetime.
    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.add(message, ToastKind::Info, DEFAULT_TOAST_DURATION)
    }

    /// Error toast with the longer error lifetime.
    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.add(message, ToastKind::Error, DEFAULT_ERROR_TOAST_DURATION)
    }

    /// Dismiss a toast. Returns whether it was still present.
    pub fn remove(&self, id: u64) -> bool {
        self.queue.remove(id)
    }

    /// Dismiss every toast.
    pub fn clear(&self) {
        self.queue.toasts.send_replace(Vec::new());
    }

    /// Snapshot of live toasts in display order.
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.queue.toasts.borrow().clone()
    }

    /// Receiver woken whenever the list changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.queue.toasts.subscribe()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

fn schedule_expiry(queue: Weak<Queue>, id: u64, duration: Duration) {
    let Ok(handle) = Handle::try_current() else {
        debug!(toast_id = id, "no tokio runtime; toast stays until dismissed");
        return;
    };
    handle.spawn(async move {
        tokio::time::sleep(duration).await;
        if let Some(queue) = queue.upgrade() {
            queue.remove(id);
        }
    });
}
