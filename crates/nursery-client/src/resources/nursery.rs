//! Nursery records.

use nursery_api_models::{Nursery, NurseryRequest};
use reqwest::Method;

use super::require_id;
use crate::client::ApiClient;
use crate::error::ApiResult;

impl ApiClient {
    /// Every nursery visible to the operator.
    ///
    /// # Errors
    ///
    /// Returns the classified backend error.
    pub async fn list_nurseries(&self) -> ApiResult<Vec<Nursery>> {
        self.get("/nursery", None).await
    }

    /// One nursery.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::InvalidArgument`] for a blank id, otherwise
    /// the classified backend error.
    pub async fn get_nursery(&self, id: &str) -> ApiResult<Nursery> {
        let id = require_id(id, "nursery")?;
        self.get(&format!("/nursery/{id}"), None).await
    }

    /// Replace a nursery's details.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::InvalidArgument`] for a blank id, otherwise
    /// the classified backend error.
    pub async fn update_nursery(&self, id: &str, request: &NurseryRequest) -> ApiResult<Nursery> {
        let id = require_id(id, "nursery")?;
        self.send(Method::PUT, &format!("/nursery/{id}"), Some(request), &["/nursery"])
            .await
    }
}
