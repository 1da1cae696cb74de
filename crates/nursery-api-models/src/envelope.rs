//! Response envelope, error body, and pagination types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field name to validation messages, as returned under `errors`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Wrapper every backend response body is delivered in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiEnvelope<T> {
    /// Backend-reported success flag.
    #[serde(default)]
    pub success: bool,
    /// Optional human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Payload.
    pub data: T,
}

/// Body shape of a failed response. Every field is optional because error
/// bodies are not guaranteed to be enveloped, or to be JSON at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Message to surface to the user.
    #[serde(default)]
    pub message: Option<String>,
    /// Per-field validation messages.
    #[serde(default)]
    pub errors: Option<FieldErrors>,
}

impl ErrorBody {
    /// Parse an error body, yielding an empty body when it is not JSON.
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// Non-empty message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|message| !message.is_empty())
    }
}

/// Page of results from a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    pub content: Vec<T>,
    /// Total number of items across all pages.
    pub total_elements: u64,
    /// Total number of pages.
    pub total_pages: u32,
    /// Requested page size.
    pub size: u32,
    /// Zero-based index of this page.
    pub number: u32,
    /// Whether a later page exists.
    #[serde(default)]
    pub has_next: bool,
    /// Whether an earlier page exists.
    #[serde(default)]
    pub has_previous: bool,
    /// Whether this is the first page.
    #[serde(default)]
    pub is_first: bool,
    /// Whether this is the last page.
    #[serde(default)]
    pub is_last: bool,
}

impl<T> Page<T> {
    /// Convert the items while keeping the pagination metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            size: self.size,
            number: self.number,
            has_next: self.has_next,
            has_previous: self.has_previous,
            is_first: self.is_first,
            is_last: self.is_last,
        }
    }

    /// One-based page label, e.g. `page 2 of 5`.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("page {} of {}", self.number + 1, self.total_pages.max(1))
    }
}

/// Page selection for listing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u32,
    /// Items per page.
    pub size: u32,
}

impl PageRequest {
    /// Page size used when a caller asks for a page without choosing a size.
    pub const DEFAULT_SIZE: u32 = 20;

    /// Build a request, substituting defaults for missing parts.
    #[must_use]
    pub fn new(page: Option<u32>, size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(0),
            size: size.unwrap_or(Self::DEFAULT_SIZE),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}
