//! Stock levels and stock movements.

use serde::{Deserialize, Serialize};

use crate::transaction::TransactionType;

/// Current stock of one breed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    /// Backend identifier.
    pub id: String,
    /// Breed this stock belongs to.
    pub breed_id: String,
    /// Breed display name.
    pub breed_name: String,
    /// Units on hand.
    pub quantity: i64,
    /// Owning nursery.
    pub nursery_id: String,
}

/// Movement as entered by an operator. `quantity` is positive for sell and
/// planted movements and signed for adjustments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryTransactionRequest {
    /// Movement kind.
    pub transaction_type: TransactionType,
    /// Quantity as entered.
    pub quantity: i64,
    /// Optional free-form note.
    pub notes: Option<String>,
}

/// Body posted to `/inventory/{breedId}/transaction`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryTransactionBody {
    /// Quantity as entered; the backend applies the sign for the movement kind.
    pub delta: i64,
    /// Movement kind.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Note, omitted when blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<InventoryTransactionRequest> for InventoryTransactionBody {
    fn from(request: InventoryTransactionRequest) -> Self {
        Self {
            delta: request.quantity,
            kind: request.transaction_type,
            reason: request.notes.filter(|notes| !notes.trim().is_empty()),
        }
    }
}
