//! Payments recorded against transactions.

use nursery_api_models::{Payment, PaymentRequest, PaymentResponse};
use reqwest::Method;

use super::require_id;
use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};

const INVALIDATES: &[&str] = &["/payments", "/dashboard"];

fn check_amount(request: &PaymentRequest) -> ApiResult<()> {
    if request.amount.is_finite() && request.amount > 0.0 {
        Ok(())
    } else {
        Err(ApiError::invalid_argument("Amount must be greater than 0"))
    }
}

impl ApiClient {
    /// Payments made against one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] for a blank id, otherwise the
    /// classified backend error.
    pub async fn payments_for_transaction(&self, transaction_id: &str) -> ApiResult<Vec<Payment>> {
        let transaction_id = require_id(transaction_id, "transaction")?;
        let payments: Vec<PaymentResponse> = self
            .get(&format!("/payments/transaction/{transaction_id}"), None)
            .await?;
        Ok(payments.into_iter().map(Payment::from).collect())
    }

    /// One payment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] for a blank id, otherwise the
    /// classified backend error.
    pub async fn get_payment(&self, id: &str) -> ApiResult<Payment> {
        let id = require_id(id, "payment")?;
        let payment: PaymentResponse = self.get(&format!("/payments/{id}"), None).await?;
        Ok(payment.into())
    }

    /// Record a payment against a transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] for a blank id or a non-positive
    /// amount, otherwise the classified backend error.
    pub async fn create_payment(
        &self,
        transaction_id: &str,
        request: &PaymentRequest,
    ) -> ApiResult<Payment> {
        let transaction_id = require_id(transaction_id, "transaction")?;
        check_amount(request)?;
        let payment: PaymentResponse = self
            .send(
                Method::POST,
                &format!("/payments/transaction/{transaction_id}"),
                Some(request),
                INVALIDATES,
            )
            .await?;
        Ok(payment.into())
    }

    /// Replace a payment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] for a blank id or a non-positive
    /// amount, otherwise the classified backend error.
    pub async fn update_payment(&self, id: &str, request: &PaymentRequest) -> ApiResult<Payment> {
        let id = require_id(id, "payment")?;
        check_amount(request)?;
        let payment: PaymentResponse = self
            .send(Method::PUT, &format!("/payments/{id}"), Some(request), INVALIDATES)
            .await?;
        Ok(payment.into())
    }

    /// Hide a payment from listings.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] for a blank id, otherwise the
    /// classified backend error.
    pub async fn soft_delete_payment(&self, id: &str) -> ApiResult<()> {
        let id = require_id(id, "payment")?;
        self.send_empty::<()>(
            Method::POST,
            &format!("/payments/{id}/soft-delete"),
            None,
            INVALIDATES,
        )
        .await
    }
}
