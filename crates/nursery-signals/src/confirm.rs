//! Single-slot confirmation prompt.
//!
//! Callers `show` a dialog and await the returned [`PendingConfirmation`];
//! whoever renders the dialog answers through `confirm` or `cancel`. Only one
//! prompt is open at a time: a second `show` settles the first with
//! [`ConfirmationError::Superseded`].

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use serde::Serialize;
use tokio::sync::{oneshot, watch};
use tracing::debug;

use crate::error::{ConfirmationError, ConfirmationResult};

/// Visual treatment requested for the dialog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationVariant {
    /// Destructive action.
    Danger,
    /// Risky but recoverable action.
    Warning,
    /// Neutral prompt.
    #[default]
    Info,
}

/// Dialog contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConfirmationOptions {
    /// Dialog heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Label of the accepting button.
    pub confirm_label: String,
    /// Label of the declining button.
    pub cancel_label: String,
    /// Visual treatment.
    pub variant: ConfirmationVariant,
}

impl ConfirmationOptions {
    /// Options with default labels ("Confirm" / "Cancel") and the info variant.
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: "Confirm".to_string(),
            cancel_label: "Cancel".to_string(),
            variant: ConfirmationVariant::default(),
        }
    }

    /// Override the accepting button label.
    #[must_use]
    pub fn confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    /// Override the declining button label.
    #[must_use]
    pub fn cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = label.into();
        self
    }

    /// Override the visual treatment.
    #[must_use]
    pub const fn variant(mut self, variant: ConfirmationVariant) -> Self {
        self.variant = variant;
        self
    }
}

/// Snapshot published to renderers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConfirmationState {
    /// Whether a prompt is awaiting an answer.
    pub is_open: bool,
    /// Contents of the open prompt, kept after close so exit animations can
    /// still render it.
    pub options: Option<ConfirmationOptions>,
}

#[derive(Debug)]
struct Slot {
    pending: Mutex<Option<oneshot::Sender<ConfirmationResult<bool>>>>,
    state: watch::Sender<ConfirmationState>,
}

impl Slot {
    fn pending(&self) -> MutexGuard<'_, Option<oneshot::Sender<ConfirmationResult<bool>>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The `pending` guard is held across the state update so the published
    /// `is_open` always matches whether a sender is waiting.
    fn settle(&self, outcome: ConfirmationResult<bool>) -> bool {
        let mut pending = self.pending();
        let sender = pending.take();
        self.state.send_if_modified(|state| {
            let was_open = state.is_open;
            state.is_open = false;
            was_open
        });
        drop(pending);
        match sender {
            Some(sender) => {
                // The awaiting side may have been dropped; nothing to report then.
                let _ = sender.send(outcome);
                true
            }
            None => false,
        }
    }
}

/// Owner of the single confirmation slot.
#[derive(Debug, Clone)]
pub struct ConfirmationBroker {
    slot: Arc<Slot>,
}

impl ConfirmationBroker {
    /// Construct a broker with no open prompt.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(ConfirmationState::default());
        Self {
            slot: Arc::new(Slot {
                pending: Mutex::new(None),
                state,
            }),
        }
    }

    /// Open a prompt and return a future resolving to the user's answer.
    ///
    /// Any prompt still open is settled with `Superseded` first.
    pub fn show(&self, options: ConfirmationOptions) -> PendingConfirmation {
        let (sender, receiver) = oneshot::channel();
        let mut pending = self.slot.pending();
        let previous = pending.replace(sender);
        self.slot.state.send_replace(ConfirmationState {
            is_open: true,
            options: Some(options),
        });
        drop(pending);
        if let Some(previous) = previous {
            debug!("superseding open confirmation");
            let _ = previous.send(Err(ConfirmationError::Superseded));
        }
        PendingConfirmation { receiver }
    }

    /// Answer the open prompt affirmatively. Returns whether one was open.
    pub fn confirm(&self) -> bool {
        self.slot.settle(Ok(true))
    }

    /// Decline the open prompt. Returns whether one was open.
    pub fn cancel(&self) -> bool {
        self.slot.settle(Ok(false))
    }

    /// Close the open prompt without an answer.
    pub fn close(&self) -> bool {
        self.slot.settle(Err(ConfirmationError::Dismissed))
    }

    /// Current dialog snapshot.
    #[must_use]
    pub fn state(&self) -> ConfirmationState {
        self.slot.state.borrow().clone()
    }

    /// Receiver woken whenever the dialog opens or closes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConfirmationState> {
        self.slot.state.subscribe()
    }
}

impl Default for ConfirmationBroker {
    fn default() -> Self {
        Self::new()
    }
}

/// Answer to a prompt opened with [`ConfirmationBroker::show`].
///
/// Resolves to `Ok(true)` on confirm, `Ok(false)` on cancel, and an error when
/// superseded, closed, or when every broker handle is dropped.
#[derive(Debug)]
#[must_use = "a confirmation does nothing unless awaited"]
pub struct PendingConfirmation {
    receiver: oneshot::Receiver<ConfirmationResult<bool>>,
}

impl Future for PendingConfirmation {
    type Output = ConfirmationResult<bool>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(ConfirmationError::Dismissed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delete_prompt() -> ConfirmationOptions {
        ConfirmationOptions::new("Delete breed", "This cannot be undone.")
            .confirm_label("Delete")
            .variant(ConfirmationVariant::Danger)
    }

    #[tokio::test]
    async fn confirm_and_cancel_resolve_pending_prompt() {
        let broker = ConfirmationBroker::new();

        let pending = broker.show(delete_prompt());
        assert!(broker.state().is_open);
        assert!(broker.confirm());
        assert_eq!(pending.await, Ok(true));
        assert!(!broker.state().is_open);

        let pending = broker.show(delete_prompt());
        assert!(broker.cancel());
        assert_eq!(pending.await, Ok(false));
    }

    #[tokio::test]
    async fn second_show_supersedes_first() {
        let broker = ConfirmationBroker::new();
        let first = broker.show(delete_prompt());
        let second = broker.show(
            ConfirmationOptions::new("Archive", "Archive the nursery?")
                .variant(ConfirmationVariant::Warning),
        );

        assert_eq!(first.await, Err(ConfirmationError::Superseded));
        let state = broker.state();
        assert!(state.is_open);
        assert_eq!(
            state.options.map(|options| options.title),
            Some("Archive".to_string())
        );

        broker.confirm();
        assert_eq!(second.await, Ok(true));
    }

    #[tokio::test]
    async fn close_and_drop_dismiss() {
        let broker = ConfirmationBroker::new();
        let pending = broker.show(delete_prompt());
        assert!(broker.close());
        assert_eq!(pending.await, Err(ConfirmationError::Dismissed));
        assert!(!broker.close());

        let pending = broker.show(delete_prompt());
        drop(broker);
        assert_eq!(pending.await, Err(ConfirmationError::Dismissed));
    }

    #[test]
    fn open_flag_tracks_waiting_prompt_across_threads() {
        let broker = ConfirmationBroker::new();
        for _ in 0..50 {
            std::thread::scope(|scope| {
                scope.spawn(|| {
                    for _ in 0..200 {
                        drop(broker.show(delete_prompt()));
                    }
                });
                scope.spawn(|| {
                    for _ in 0..200 {
                        broker.confirm();
                    }
                });
            });
            let waiting = broker.slot.pending().is_some();
            assert_eq!(broker.state().is_open, waiting);
        }
    }

    #[test]
    fn answering_without_prompt_is_a_no_op() {
        let broker = ConfirmationBroker::new();
        assert!(!broker.confirm());
        assert!(!broker.cancel());
        assert_eq!(broker.state(), ConfirmationState::default());
    }

    #[test]
    fn options_keep_last_contents_after_close() {
        let broker = ConfirmationBroker::new();
        let mut receiver = broker.subscribe();
        let _pending = broker.show(delete_prompt());
        assert!(receiver.has_changed().unwrap_or(false));
        assert!(receiver.borrow_and_update().is_open);

        broker.cancel();
        let state = receiver.borrow_and_update().clone();
        assert!(!state.is_open);
        assert_eq!(
            state.options.map(|options| options.confirm_label),
            Some("Delete".to_string())
        );
    }
}
