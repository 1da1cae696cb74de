//! Payments recorded against transactions.
//!
//! The backend serialises `amount` inconsistently (number, numeric string, or
//! null); [`PaymentResponse`] accepts all three and [`Payment`] always carries
//! a finite number.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Payment category label as used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PaymentType(pub String);

impl PaymentType {
    /// Borrow the raw label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaymentType {
    fn from(value: &str) -> Self {
        Self(value.to_ascii_uppercase())
    }
}

/// Payment as consumed by screens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Backend identifier.
    pub id: String,
    /// Transaction paid against.
    pub transaction_id: String,
    /// Owning nursery.
    pub nursery_id: String,
    /// Breed of the paid transaction.
    pub breed_id: String,
    /// Payment category.
    #[serde(rename = "type")]
    pub kind: PaymentType,
    /// Amount; never NaN.
    pub amount: f64,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Operator who recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_phone: Option<String>,
    /// Whether the payment was soft-deleted.
    #[serde(default)]
    pub is_deleted: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
enum LooseAmount {
    Number(f64),
    Text(String),
}

impl LooseAmount {
    fn normalise(amount: Option<Self>) -> f64 {
        let value = match amount {
            Some(Self::Number(value)) => value,
            Some(Self::Text(text)) => text.trim().parse().unwrap_or(f64::NAN),
            None => 0.0,
        };
        if value.is_finite() { value } else { 0.0 }
    }
}

/// Payment as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    /// Backend identifier.
    pub id: String,
    /// Transaction paid against.
    pub transaction_id: String,
    /// Owning nursery.
    pub nursery_id: String,
    /// Breed of the paid transaction.
    pub breed_id: String,
    /// Payment category.
    #[serde(rename = "type")]
    pub kind: PaymentType,
    #[serde(default)]
    amount: Option<LooseAmount>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Operator who recorded it.
    #[serde(default)]
    pub user_phone: Option<String>,
    /// Whether the payment was soft-deleted.
    #[serde(default)]
    pub is_deleted: Option<bool>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl PaymentResponse {
    /// Amount normalised to a finite number; missing or unparsable is zero.
    #[must_use]
    pub fn amount(&self) -> f64 {
        LooseAmount::normalise(self.amount.clone())
    }
}

impl From<PaymentResponse> for Payment {
    fn from(payment: PaymentResponse) -> Self {
        let amount = LooseAmount::normalise(payment.amount);
        Self {
            id: payment.id,
            transaction_id: payment.transaction_id,
            nursery_id: payment.nursery_id,
            breed_id: payment.breed_id,
            kind: payment.kind,
            amount,
            description: payment.description,
            user_phone: payment.user_phone,
            is_deleted: payment.is_deleted.unwrap_or(false),
            created_at: payment.created_at,
            updated_at: payment.updated_at,
        }
    }
}

/// Body for creating or replacing a payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Transaction paid against.
    pub transaction_id: String,
    /// Payment category.
    #[serde(rename = "type")]
    pub kind: PaymentType,
    /// Amount.
    pub amount: f64,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
