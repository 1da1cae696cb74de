//! Resource endpoints, one module per backend collection.
//!
//! Listing endpoints come in two forms: a plain list (no paging parameters)
//! and a `*_page` variant that sends `page`/`size` and decodes a [`Page`].
//!
//! [`Page`]: nursery_api_models::Page

mod auth;
mod breeds;
mod dashboard;
mod inventory;
mod nursery;
mod payments;
mod saplings;
mod theme;
mod transactions;

pub use breeds::BreedFilter;
pub use inventory::InventoryFilter;
pub use saplings::SaplingFilter;
pub use transactions::TransactionFilter;

use nursery_api_models::PageRequest;
use nursery_requests::QueryParams;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// Incrementally built query string; absent values are skipped.
#[derive(Debug, Default)]
pub(crate) struct Query {
    params: QueryParams,
}

impl Query {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn opt(mut self, name: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|value| !value.is_empty()) {
            self.params
                .insert(name.to_string(), Value::String(value.to_string()));
        }
        self
    }

    pub(crate) fn page(mut self, page: PageRequest) -> Self {
        self.params.insert("page".to_string(), Value::from(page.page));
        self.params.insert("size".to_string(), Value::from(page.size));
        self
    }

    /// `None` when nothing was added, so the request key carries no params
    /// segment.
    pub(crate) fn build(self) -> Option<QueryParams> {
        (!self.params.is_empty()).then_some(self.params)
    }
}

/// Reject identifiers that are blank or would change the request path once
/// placed in a URL segment.
pub(crate) fn require_id<'a>(id: &'a str, what: &str) -> ApiResult<&'a str> {
    let id = id.trim();
    let reshapes_path = matches!(id, "." | "..")
        || id
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control());
    if id.is_empty() || reshapes_path {
        return Err(ApiError::invalid_argument(format!("Invalid {what} ID")));
    }
    Ok(id)
}
