//! Top-level span helpers.

use tracing::Span;

use crate::init::build_sha;

/// Span wrapping one command invocation, carrying app identity and build SHA.
#[must_use]
pub fn app_span(app_name: &str, profile: &str, command: &str) -> Span {
    tracing::info_span!(
        "nursery",
        app = %app_name,
        profile = %profile,
        command = %command,
        build_sha = %build_sha()
    )
}
