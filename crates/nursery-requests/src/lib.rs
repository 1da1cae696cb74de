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

//! Request coordination shared by every API call the admin client makes.
//!
//! Layout: `key.rs` (stable request identities), `coordinator.rs` (in-flight
//! coalescing plus the short-lived result cache), `error.rs` (abandonment
//! marker surfaced to callers that stop waiting).

pub mod coordinator;
pub mod error;
pub mod key;

pub use coordinator::{CachePolicy, CoordinatorStats, DEFAULT_TTL, RequestCoordinator};
pub use error::Abandoned;
pub use key::{QueryParams, RequestKey, generate_key};
pub use tokio_util::sync::CancellationToken;
