//! Typed client configuration and its defaults.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::error::ConfigResult;
use crate::validate::parse_base_url;

/// Backend used when nothing is configured outside production.
pub const DEFAULT_DEV_API_BASE_URL: &str = "http://localhost:8080";
/// Backend used when nothing is configured in production.
pub const DEFAULT_PROD_API_BASE_URL: &str = "https://api.your-production-domain.com";
/// Application display name.
pub const DEFAULT_APP_NAME: &str = "Nursery Management System";
/// Per-request transport timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);
/// Lifetime of cached GET results.
pub const DEFAULT_REQUEST_CACHE_TTL: Duration = Duration::from_millis(1_000);

/// Deployment profile, taken from `NODE_ENV`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Local development.
    #[default]
    Development,
    /// Production deployment.
    Production,
    /// Automated tests.
    Test,
}

impl Profile {
    /// Map a `NODE_ENV` value; anything unrecognised is development.
    #[must_use]
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("production") => Self::Production,
            Some(value) if value.eq_ignore_ascii_case("test") => Self::Test,
            _ => Self::Development,
        }
    }

    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }

    /// Whether this is the production profile.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientConfig {
    /// Absolute base URL of the backend API.
    pub api_base_url: Url,
    /// Deployment profile.
    pub profile: Profile,
    /// Free-form environment label (`APP_ENV`), defaults to the profile name.
    pub app_env: String,
    /// Application display name.
    pub app_name: String,
    /// Verbose diagnostics.
    pub enable_debug: bool,
    /// Whether to install a log subscriber at all.
    pub enable_logging: bool,
    /// Per-request transport timeout; never zero.
    pub api_timeout: Duration,
    /// Where the authenticated session is persisted.
    pub session_path: PathBuf,
    /// How long successful GET results are reused.
    pub request_cache_ttl: Duration,
}

impl ClientConfig {
    /// Defaults for a profile, before any environment overrides.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in base URL constants stop parsing.
    pub fn defaults_for(profile: Profile) -> ConfigResult<Self> {
        let base = if profile.is_production() {
            DEFAULT_PROD_API_BASE_URL
        } else {
            DEFAULT_DEV_API_BASE_URL
        };
        Ok(Self {
            api_base_url: parse_base_url(base)?,
            profile,
            app_env: profile.as_str().to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            enable_debug: !profile.is_production(),
            enable_logging: !profile.is_production(),
            api_timeout: DEFAULT_TIMEOUT,
            session_path: PathBuf::from(".nursery").join("session.json"),
            request_cache_ttl: DEFAULT_REQUEST_CACHE_TTL,
        })
    }

    /// Same configuration pointed at another backend.
    #[must_use]
    pub fn with_base_url(mut self, api_base_url: Url) -> Self {
        self.api_base_url = api_base_url;
        self
    }

    /// Join an API path (leading `/`) onto the base URL, keeping any base path
    /// prefix such as `/api`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.api_base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}
