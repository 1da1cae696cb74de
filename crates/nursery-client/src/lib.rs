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
#![allow(clippy::redundant_pub_crate)]

//! Typed client for the nursery backend.
//!
//! Layout:
//! - `client.rs`: shared HTTP core, request coordination and session expiry
//! - `resources/`: endpoint methods grouped by backend collection
//! - `session.rs`: persisted session and lifecycle events
//! - `error.rs`: failure taxonomy and toast helper

mod client;
mod error;
mod resources;
mod session;

pub use client::{ApiClient, LOGIN_REDIRECT_DELAY};
pub use error::{
    ApiError, ApiResult, NETWORK_ERROR, NO_PERMISSION, RESOURCE_NOT_FOUND, SERVER_ERROR,
    UNAUTHORIZED_ACTION, UNEXPECTED_ERROR, VALIDATION_FAILED, notify_error,
};
pub use nursery_requests::CancellationToken;
pub use resources::{BreedFilter, InventoryFilter, SaplingFilter, TransactionFilter};
pub use session::{
    FileSessionStore, LOGIN_PATH, MemorySessionStore, Session, SessionError, SessionEvent,
    SessionResult, SessionStore,
};
