//! Environment loader.
//!
//! Every key is looked up twice: the `NEXT_PUBLIC_`-prefixed form wins over the
//! bare key, and empty values count as unset. Loading goes through an injected
//! lookup function so tests never touch the process environment.

use std::path::PathBuf;

use tracing::debug;

use crate::error::ConfigResult;
use crate::model::{ClientConfig, DEFAULT_REQUEST_CACHE_TTL, Profile};
use crate::validate::{parse_base_url, parse_flag, parse_millis_or, parse_timeout};

/// Prefix whose variables take precedence over bare keys.
pub const PUBLIC_PREFIX: &str = "NEXT_PUBLIC_";

/// Resolve `key`, preferring `NEXT_PUBLIC_<key>`. Empty values are ignored.
pub fn lookup_var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&format!("{PUBLIC_PREFIX}{key}"))
        .filter(|value| !value.is_empty())
        .or_else(|| lookup(key).filter(|value| !value.is_empty()))
}

impl ClientConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ConfigError`] when a present value fails validation.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ConfigError`] when a present value fails validation.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup_var(&lookup, key);

        let profile = Profile::from_env_value(var("NODE_ENV").as_deref());
        let mut config = Self::defaults_for(profile)?;

        if let Some(value) = var("API_BASE_URL") {
            config.api_base_url = parse_base_url(&value)?;
        }
        if let Some(value) = var("APP_ENV") {
            config.app_env = value;
        }
        if let Some(value) = var("APP_NAME") {
            config.app_name = value;
        }
        if let Some(value) = var("ENABLE_DEBUG") {
            config.enable_debug = parse_flag(&value);
        }
        if let Some(value) = var("ENABLE_LOGGING") {
            config.enable_logging = parse_flag(&value);
        }
        if let Some(value) = var("API_TIMEOUT") {
            config.api_timeout = parse_timeout(&value, config.api_timeout)?;
        }
        if let Some(value) = var("REQUEST_CACHE_TTL_MS") {
            config.request_cache_ttl =
                parse_millis_or("REQUEST_CACHE_TTL_MS", &value, DEFAULT_REQUEST_CACHE_TTL);
        }
        config.session_path = var("SESSION_PATH").map_or_else(
            || default_session_path(lookup("HOME")),
            PathBuf::from,
        );

        debug!(
            profile = %config.profile,
            base_url = %config.api_base_url,
            "client configuration loaded"
        );
        Ok(config)
    }
}

fn default_session_path(home: Option<String>) -> PathBuf {
    home.filter(|home| !home.is_empty())
        .map_or_else(|| PathBuf::from(".nursery"), |home| PathBuf::from(home).join(".nursery"))
        .join("session.json")
}
