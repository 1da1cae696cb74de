//! Stock levels and stock movements.

use nursery_api_models::{
    Inventory, InventoryTransactionBody, InventoryTransactionRequest, Page, PageRequest,
    Transaction, TransactionResponse, validate_quantity,
};
use reqwest::Method;

use super::{Query, require_id};
use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};

const INVALIDATES: &[&str] = &["/inventory", "/transactions", "/dashboard"];

/// Listing filter for stock levels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    /// Restrict to one nursery.
    pub nursery_id: Option<String>,
    /// Restrict to breeds of one sapling.
    pub sapling_id: Option<String>,
}

impl InventoryFilter {
    fn query(&self) -> Query {
        Query::new()
            .opt("nurseryId", self.nursery_id.as_deref())
            .opt("saplingId", self.sapling_id.as_deref())
    }
}

impl ApiClient {
    /// Stock levels matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns the classified backend error.
    pub async fn list_inventory(&self, filter: &InventoryFilter) -> ApiResult<Vec<Inventory>> {
        self.get("/inventory", filter.query().build()).await
    }

    /// One page of stock levels matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns the classified backend error.
    pub async fn inventory_page(
        &self,
        filter: &InventoryFilter,
        page: PageRequest,
    ) -> ApiResult<Page<Inventory>> {
        self.get("/inventory", filter.query().page(page).build()).await
    }

    /// Stock of one breed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] for a blank id, otherwise the
    /// classified backend error.
    pub async fn inventory_for_breed(&self, breed_id: &str) -> ApiResult<Inventory> {
        let breed_id = require_id(breed_id, "breed")?;
        self.get(&format!("/inventory/breed/{breed_id}"), None)
            .await
    }

    /// Record a stock movement for a breed.
    ///
    /// The quantity is checked locally first: adjustments must be non-zero and
    /// every other kind strictly positive.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] for a blank id or a rejected
    /// quantity, otherwise the classified backend error.
    pub async fn record_inventory_transaction(
        &self,
        breed_id: &str,
        request: InventoryTransactionRequest,
    ) -> ApiResult<Transaction> {
        let breed_id = require_id(breed_id, "breed")?;
        validate_quantity(request.transaction_type, request.quantity)
            .map_err(|err| ApiError::invalid_argument(err.to_string()))?;
        let body = InventoryTransactionBody::from(request);
        let created: TransactionResponse = self
            .send(
                Method::POST,
                &format!("/inventory/{breed_id}/transaction"),
                Some(&body),
                INVALIDATES,
            )
            .await?;
        Ok(created.into())
    }
}
