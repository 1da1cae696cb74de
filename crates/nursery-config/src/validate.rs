//! Validation helpers and parsing utilities for environment values.

use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Parse the backend base URL; only absolute `http`/`https` URLs are accepted.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not an absolute
/// HTTP(S) URL.
pub fn parse_base_url(value: &str) -> ConfigResult<Url> {
    let url = Url::parse(value.trim())
        .map_err(|_| ConfigError::invalid("API_BASE_URL", value, "must be an absolute URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            "API_BASE_URL",
            value,
            "scheme must be http or https",
        ));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::invalid("API_BASE_URL", value, "must include a host"));
    }
    Ok(url)
}

/// Truthy values are exactly `true` and `1`; anything else is false.
#[must_use]
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

/// Parse a millisecond count, falling back to `default` when the value is
/// not a number.
#[must_use]
pub fn parse_millis_or(field: &'static str, value: &str, default: Duration) -> Duration {
    value.trim().parse::<u64>().map_or_else(
        |_| {
            warn!(field, value, "ignoring unparsable duration; using default");
            default
        },
        Duration::from_millis,
    )
}

/// Parse the request timeout. Unparsable values use `default`; zero is rejected
/// because it would make every request fail immediately.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the timeout is zero.
pub fn parse_timeout(value: &str, default: Duration) -> ConfigResult<Duration> {
    let timeout = parse_millis_or("API_TIMEOUT", value, default);
    if timeout.is_zero() {
        return Err(ConfigError::invalid(
            "API_TIMEOUT",
            value,
            "must be greater than zero",
        ));
    }
    Ok(timeout)
}
