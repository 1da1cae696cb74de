//! Failure taxonomy for backend calls.
//!
//! Every error is `Clone` because callers that join the same in-flight
//! request all receive the outcome; non-clone sources are rendered to text
//! when the error is classified.

use nursery_api_models::{ErrorBody, FieldErrors};
use nursery_requests::Abandoned;
use nursery_signals::ToastQueue;
use thiserror::Error;

/// Message used when the transport fails without a more specific reason.
pub const NETWORK_ERROR: &str = "Network error. Please check your connection.";
/// Default message for 401 responses.
pub const UNAUTHORIZED_ACTION: &str = "You are not authorized to perform this action.";
/// Message for 403 responses.
pub const NO_PERMISSION: &str = "You do not have permission to access this resource.";
/// Default message for 404 responses.
pub const RESOURCE_NOT_FOUND: &str = "The requested resource was not found.";
/// Default message for 400 and 422 responses.
pub const VALIDATION_FAILED: &str = "Validation failed";
/// Default message for gateway and server failures.
pub const SERVER_ERROR: &str = "Server error. Please try again later.";
/// Default message for any other status.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

/// Failure of a backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was received (connect failure, timeout, broken transport).
    #[error("{message}")]
    Network {
        /// User-facing description.
        message: String,
    },
    /// 401: the session is missing or expired.
    #[error("{message}")]
    Unauthorized {
        /// User-facing description.
        message: String,
    },
    /// 403: authenticated but not allowed.
    #[error("{message}")]
    Forbidden {
        /// User-facing description.
        message: String,
    },
    /// 404.
    #[error("{message}")]
    NotFound {
        /// User-facing description.
        message: String,
    },
    /// 400 or 422 with optional per-field messages.
    #[error("{message}")]
    Validation {
        /// Response status (400 or 422).
        status: u16,
        /// User-facing description.
        message: String,
        /// Field name to messages.
        field_errors: FieldErrors,
    },
    /// 500, 502, 503 or 504.
    #[error("{message}")]
    Server {
        /// Response status.
        status: u16,
        /// User-facing description.
        message: String,
    },
    /// Any other non-success status.
    #[error("{message}")]
    Unexpected {
        /// Response status.
        status: u16,
        /// User-facing description.
        message: String,
    },
    /// A success response whose body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Decoder diagnostic.
        message: String,
    },
    /// The request body could not be serialised.
    #[error("failed to encode request: {message}")]
    Encode {
        /// Encoder diagnostic.
        message: String,
    },
    /// A caller-supplied argument was rejected before any request was sent.
    #[error("{message}")]
    InvalidArgument {
        /// User-facing description.
        message: String,
    },
    /// Reading or writing the persisted session failed.
    #[error("session storage failed: {message}")]
    Session {
        /// Storage diagnostic.
        message: String,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    Client {
        /// Builder diagnostic.
        message: String,
    },
    /// The caller stopped waiting.
    #[error("request cancelled")]
    Cancelled,
}

/// Convenience alias for backend call results.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<Abandoned> for ApiError {
    fn from(_: Abandoned) -> Self {
        Self::Cancelled
    }
}

impl ApiError {
    /// Classify a non-success response.
    #[must_use]
    pub fn from_status(status: u16, body: &ErrorBody) -> Self {
        let message = |default: &str| body.message().unwrap_or(default).to_string();
        match status {
            401 => Self::Unauthorized {
                message: message(UNAUTHORIZED_ACTION),
            },
            403 => Self::Forbidden {
                message: NO_PERMISSION.to_string(),
            },
            404 => Self::NotFound {
                message: message(RESOURCE_NOT_FOUND),
            },
            400 | 422 => Self::Validation {
                status,
                message: message(VALIDATION_FAILED),
                field_errors: body.errors.clone().unwrap_or_default(),
            },
            500 | 502 | 503 | 504 => Self::Server {
                status,
                message: message(SERVER_ERROR),
            },
            _ => Self::Unexpected {
                status,
                message: message(UNEXPECTED_ERROR),
            },
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Text suitable for a toast or terminal line.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// HTTP status behind the error, when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Validation { status, .. }
            | Self::Server { status, .. }
            | Self::Unexpected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether no response was received.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Whether the backend answered with a 4xx status.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(400..=499))
    }

    /// Whether the backend answered with a 5xx status.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(500..))
    }

    /// Surface this error as an error toast and return the toast id.
    pub fn notify(&self, toasts: &ToastQueue) -> u64 {
        toasts.error(self.user_message())
    }
}

/// Surface `err` as an error toast.
pub fn notify_error(toasts: &ToastQueue, err: &ApiError) -> u64 {
    err.notify(toasts)
}
