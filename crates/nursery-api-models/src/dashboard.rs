//! Dashboard aggregates.

use serde::{Deserialize, Serialize};

use crate::transaction::TransactionType;

/// Headline figures for one nursery.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Number of sapling species.
    pub total_sapling_count: u64,
    /// Units on hand across all breeds.
    pub total_inventory_quantity: i64,
    /// Sales in the last 48 hours.
    pub sales_last48_hours: f64,
    /// Sales in the last month.
    pub sales_last_month: f64,
    /// Sales in the last year.
    pub sales_last_year: f64,
    /// Sales since the nursery was created.
    pub sales_all_time: f64,
}

/// Row of the recent-activity feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecentTransaction {
    /// Transaction identifier.
    pub id: String,
    /// Breed whose stock moved.
    pub breed_id: String,
    /// Breed display name.
    pub breed_name: String,
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
    /// Whether the transaction was soft-deleted.
    #[serde(default)]
    pub is_deleted: bool,
    /// Creation timestamp.
    pub created_at: String,
}
