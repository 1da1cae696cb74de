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

//! Environment-driven configuration for the nursery admin client.
//!
//! Layout: `model.rs` (typed configuration and defaults), `loader.rs`
//! (environment lookup with `NEXT_PUBLIC_` precedence), `validate.rs`
//! (per-field parsing helpers).

pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{PUBLIC_PREFIX, lookup_var};
pub use model::{
    ClientConfig, DEFAULT_APP_NAME, DEFAULT_DEV_API_BASE_URL, DEFAULT_PROD_API_BASE_URL,
    DEFAULT_REQUEST_CACHE_TTL, DEFAULT_TIMEOUT, Profile,
};
