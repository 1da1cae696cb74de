//! Command handlers grouped by backend collection.

pub(crate) mod auth;
pub(crate) mod breeds;
pub(crate) mod dashboard;
pub(crate) mod inventory;
pub(crate) mod payments;
pub(crate) mod saplings;
pub(crate) mod theme;
pub(crate) mod transactions;
