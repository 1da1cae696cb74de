#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Observable UI state that non-UI code (the HTTP layer, CLI handlers) can
//! drive without knowing who renders it.
//!
//! Each registry is an explicitly constructed value with cheap `Clone`; state
//! changes are published through `tokio::sync::watch` so late subscribers
//! always observe the latest snapshot.

pub mod confirm;
pub mod error;
pub mod loading;
pub mod toast;

pub use confirm::{
    ConfirmationBroker, ConfirmationOptions, ConfirmationState, ConfirmationVariant,
    PendingConfirmation,
};
pub use error::ConfirmationError;
pub use loading::{LoadingCounter, LoadingGuard};
pub use toast::{
    DEFAULT_ERROR_TOAST_DURATION, DEFAULT_TOAST_DURATION, Toast, ToastKind, ToastQueue,
};

/// Bundle of the three registries, handed to whatever needs to signal the UI.
#[derive(Debug, Clone, Default)]
pub struct Signals {
    /// Global in-progress request counter.
    pub loading: LoadingCounter,
    /// Transient notifications.
    pub toasts: ToastQueue,
    /// Single-slot confirmation prompt.
    pub confirmations: ConfirmationBroker,
}

impl Signals {
    /// Construct a fresh, empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
