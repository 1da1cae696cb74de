//! Stock movement history.

use nursery_api_models::{Page, PageRequest, Transaction, TransactionResponse};
use reqwest::Method;

use super::{Query, require_id};
use crate::client::ApiClient;
use crate::error::ApiResult;

const INVALIDATES: &[&str] = &["/transactions", "/inventory", "/dashboard", "/payments"];

/// Listing filter for transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Restrict to one breed.
    pub breed_id: Option<String>,
    /// Restrict to one nursery.
    pub nursery_id: Option<String>,
}

impl TransactionFilter {
    fn query(&self) -> Query {
        Query::new()
            .opt("breedId", self.breed_id.as_deref())
            .opt("nurseryId", self.nursery_id.as_deref())
    }
}

impl ApiClient {
    /// Transactions matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns the classified backend error.
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> ApiResult<Vec<Transaction>> {
        let transactions: Vec<TransactionResponse> =
            self.get("/transactions", filter.query().build()).await?;
        Ok(transactions.into_iter().map(Transaction::from).collect())
    }

    /// One page of transactions matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns the classified backend error.
    pub async fn transactions_page(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> ApiResult<Page<Transaction>> {
        let transactions: Page<TransactionResponse> = self
            .get("/transactions", filter.query().page(page).build())
            .await?;
        Ok(transactions.map(Transaction::from))
    }

    /// One transaction.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::InvalidArgument`] for a blank id, otherwise
    /// the classified backend error.
    pub async fn get_transaction(&self, id: &str) -> ApiResult<Transaction> {
        let id = require_id(id, "transaction")?;
        let transaction: TransactionResponse =
            self.get(&format!("/transactions/{id}"), None).await?;
        Ok(transaction.into())
    }

    /// Reverse a transaction; the backend records a compensating movement.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::InvalidArgument`] for a blank id, otherwise
    /// the classified backend error.
    pub async fn undo_transaction(&self, id: &str) -> ApiResult<()> {
        let id = require_id(id, "transaction")?;
        self.send_empty::<()>(
            Method::POST,
            &format!("/transactions/{id}/undo"),
            None,
            INVALIDATES,
        )
        .await
    }

    /// Hide a transaction from listings without reversing it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::InvalidArgument`] for a blank id, otherwise
    /// the classified backend error.
    pub async fn soft_delete_transaction(&self, id: &str) -> ApiResult<()> {
        let id = require_id(id, "transaction")?;
        self.send_empty::<()>(
            Method::POST,
            &format!("/transactions/{id}/soft-delete"),
            None,
            INVALIDATES,
        )
        .await
    }
}
