//! Inventory transaction records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of stock movement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Stock sold.
    Sell,
    /// Stock received from a supplier.
    Receive,
    /// Stock planted in the nursery.
    Planted,
    /// Manual correction, signed.
    Adjust,
    /// Compensation for lost or damaged stock.
    Compensation,
    /// A type this client does not know about.
    #[serde(other)]
    Unknown,
}

impl TransactionType {
    /// Wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sell => "SELL",
            Self::Receive => "RECEIVE",
            Self::Planted => "PLANTED",
            Self::Adjust => "ADJUST",
            Self::Compensation => "COMPENSATION",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "SELL" => Ok(Self::Sell),
            "RECEIVE" => Ok(Self::Receive),
            "PLANTED" => Ok(Self::Planted),
            "ADJUST" => Ok(Self::Adjust),
            "COMPENSATION" => Ok(Self::Compensation),
            other => Err(format!("unknown transaction type '{other}'")),
        }
    }
}

/// Transaction as consumed by screens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Backend identifier.
    pub id: String,
    /// Owning nursery.
    pub nursery_id: String,
    /// Breed whose stock moved.
    pub breed_id: String,
    /// Breed display name; the backend does not include it, callers fill it in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed_name: Option<String>,
    /// Movement kind.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Signed quantity change.
    pub delta: i64,
    /// Free-form reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Operator who recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_phone: Option<String>,
    /// Transaction that reversed this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reversed_by_txn_id: Option<String>,
    /// Whether this transaction is itself a reversal.
    #[serde(default)]
    pub is_undo: bool,
    /// Whether this transaction was soft-deleted.
    #[serde(default)]
    pub is_deleted: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Transaction as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Backend identifier.
    pub id: String,
    /// Owning nursery.
    pub nursery_id: String,
    /// Breed whose stock moved.
    pub breed_id: String,
    /// Signed quantity change.
    pub delta: i64,
    /// Movement kind.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Free-form reason.
    #[serde(default)]
    pub reason: Option<String>,
    /// Operator who recorded it.
    #[serde(default)]
    pub user_phone: Option<String>,
    /// Transaction that reversed this one.
    #[serde(default)]
    pub reversed_by_txn_id: Option<String>,
    /// Whether this transaction is itself a reversal.
    #[serde(default)]
    pub is_undo: Option<bool>,
    /// Whether this transaction was soft-deleted.
    #[serde(default)]
    pub is_deleted: Option<bool>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<TransactionResponse> for Transaction {
    fn from(transaction: TransactionResponse) -> Self {
        Self {
            id: transaction.id,
            nursery_id: transaction.nursery_id,
            breed_id: transaction.breed_id,
            breed_name: None,
            kind: transaction.kind,
            delta: transaction.delta,
            reason: transaction.reason,
            user_phone: transaction.user_phone,
            reversed_by_txn_id: transaction.reversed_by_txn_id,
            is_undo: transaction.is_undo.unwrap_or(false),
            is_deleted: transaction.is_deleted.unwrap_or(false),
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_types_decode_without_failing() {
        let response: TransactionResponse = serde_json::from_value(json!({
            "id": "t1",
            "nurseryId": "n1",
            "breedId": "b1",
            "delta": -4,
            "type": "TRANSFER",
            "isDeleted": null,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .expect("transaction decodes");

        let transaction = Transaction::from(response);
        assert_eq!(transaction.kind, TransactionType::Unknown);
        assert_eq!(transaction.delta, -4);
        assert!(!transaction.is_deleted);
        assert_eq!(transaction.breed_name, None);
    }

    #[test]
    fn transaction_type_parses_case_insensitively() {
        assert_eq!("sell".parse::<TransactionType>(), Ok(TransactionType::Sell));
        assert_eq!(
            "Adjust".parse::<TransactionType>(),
            Ok(TransactionType::Adjust)
        );
        assert!("gift".parse::<TransactionType>().is_err());
        assert_eq!(TransactionType::Planted.to_string(), "PLANTED");
    }
}
