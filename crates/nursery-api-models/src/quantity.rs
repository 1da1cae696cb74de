//! Inventory delta arithmetic used to preview and validate stock movements.

use thiserror::Error;

use crate::transaction::TransactionType;

/// Projected stock after a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityProjection {
    /// Units on hand after the movement.
    pub upcoming: i64,
    /// Whether the projection keeps stock non-negative.
    pub is_valid: bool,
}

/// Project the stock level after applying a movement.
///
/// For a new movement (`current_delta` is `None`) planted stock is added,
/// sold stock subtracted, and adjustments applied with their sign. When an
/// existing movement is edited, `current_delta` is its recorded delta and only
/// the difference to the new delta is applied. A missing quantity leaves the
/// stock unchanged and is never valid.
#[must_use]
pub fn upcoming_quantity(
    current: i64,
    kind: TransactionType,
    quantity: Option<i64>,
    current_delta: Option<i64>,
) -> QuantityProjection {
    let Some(quantity) = quantity else {
        return QuantityProjection {
            upcoming: current,
            is_valid: false,
        };
    };

    let upcoming = match current_delta {
        Some(previous) => {
            let next = match kind {
                TransactionType::Sell => -quantity.saturating_abs(),
                TransactionType::Planted => quantity.saturating_abs(),
                TransactionType::Adjust => quantity,
                _ => previous,
            };
            current.saturating_add(next.saturating_sub(previous))
        }
        None => match kind {
            TransactionType::Planted | TransactionType::Adjust => current.saturating_add(quantity),
            TransactionType::Sell => current.saturating_sub(quantity),
            _ => current,
        },
    };

    QuantityProjection {
        upcoming,
        is_valid: upcoming >= 0,
    }
}

/// Rejections for an operator-entered movement quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuantityError {
    /// Adjustments must move stock.
    #[error("Adjustment quantity cannot be 0")]
    ZeroAdjustment,
    /// Non-adjustment movements take a positive quantity.
    #[error("Quantity must be greater than 0")]
    NotPositive,
}

/// Check an entered quantity against the rules for its movement kind.
///
/// # Errors
///
/// Returns [`QuantityError::ZeroAdjustment`] for a zero adjustment and
/// [`QuantityError::NotPositive`] for any other kind with a quantity below 1.
pub const fn validate_quantity(kind: TransactionType, quantity: i64) -> Result<(), QuantityError> {
    match kind {
        TransactionType::Adjust if quantity == 0 => Err(QuantityError::ZeroAdjustment),
        TransactionType::Adjust => Ok(()),
        _ if quantity <= 0 => Err(QuantityError::NotPositive),
        _ => Ok(()),
    }
}
