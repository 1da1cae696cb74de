//! Breeds (varieties of a sapling). The backend names the display field
//! `breedName`; everything here returns [`Breed`] with it mapped to `name`.

use nursery_api_models::{Breed, BreedRequest, BreedResponse, Page, PageRequest};
use reqwest::Method;

use super::{Query, require_id};
use crate::client::ApiClient;
use crate::error::ApiResult;

const INVALIDATES: &[&str] = &["/breeds", "/inventory", "/dashboard"];

/// Listing filter for breeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreedFilter {
    /// Restrict to one nursery.
    pub nursery_id: Option<String>,
    /// Restrict to one sapling.
    pub sapling_id: Option<String>,
}

impl BreedFilter {
    fn query(&self) -> Query {
        Query::new()
            .opt("nurseryId", self.nursery_id.as_deref())
            .opt("saplingId", self.sapling_id.as_deref())
    }
}

impl ApiClient {
    /// Breeds matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns the classified backend error.
    pub async fn list_breeds(&self, filter: &BreedFilter) -> ApiResult<Vec<Breed>> {
        let breeds: Vec<BreedResponse> = self.get("/breeds", filter.query().build()).await?;
        Ok(breeds.into_iter().map(Breed::from).collect())
    }

    /// One page of breeds matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns the classified backend error.
    pub async fn breeds_page(
        &self,
        filter: &BreedFilter,
        page: PageRequest,
    ) -> ApiResult<Page<Breed>> {
        let breeds: Page<BreedResponse> =
            self.get("/breeds", filter.query().page(page).build()).await?;
        Ok(breeds.map(Breed::from))
    }

    /// One breed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::InvalidArgument`] for a blank id, otherwise
    /// the classified backend error.
    pub async fn get_breed(&self, id: &str) -> ApiResult<Breed> {
        let id = require_id(id, "breed")?;
        let breed: BreedResponse = self.get(&format!("/breeds/{id}"), None).await?;
        Ok(breed.into())
    }

    /// Create a breed.
    ///
    /// # Errors
    ///
    /// Returns the classified backend error.
    pub async fn create_breed(&self, request: &BreedRequest) -> ApiResult<Breed> {
        let breed: BreedResponse = self
            .send(Method::POST, "/breeds", Some(request), INVALIDATES)
            .await?;
        Ok(breed.into())
    }

    /// Replace a breed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::InvalidArgument`] for a blank id, otherwise
    /// the classified backend error.
    pub async fn update_breed(&self, id: &str, request: &BreedRequest) -> ApiResult<Breed> {
        let id = require_id(id, "breed")?;
        let breed: BreedResponse = self
            .send(Method::PUT, &format!("/breeds/{id}"), Some(request), INVALIDATES)
            .await?;
        Ok(breed.into())
    }

    /// Delete a breed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::InvalidArgument`] for a blank id, otherwise
    /// the classified backend error.
    pub async fn delete_breed(&self, id: &str) -> ApiResult<()> {
        let id = require_id(id, "breed")?;
        self.send_empty::<()>(Method::DELETE, &format!("/breeds/{id}"), None, INVALIDATES)
            .await
    }

    /// Whether any stock movement references the breed. Breeds with history
    /// cannot be deleted.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::InvalidArgument`] for a blank id, otherwise
    /// the classified backend error.
    pub async fn breed_has_transactions(&self, id: &str) -> ApiResult<bool> {
        let id = require_id(id, "breed")?;
        self.get(&format!("/breeds/{id}/has-transactions"), None)
            .await
    }
}
