#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the nursery backend API.
//!
//! Wire shapes that differ from what screens consume (`breedName`, loosely
//! typed payment amounts, the inventory transaction body) are decoded into a
//! `*Response` type and converted here, so the mapping lives in one place.

pub mod auth;
pub mod breed;
pub mod dashboard;
pub mod envelope;
pub mod inventory;
pub mod nursery;
pub mod payment;
pub mod quantity;
pub mod sapling;
pub mod theme;
pub mod transaction;

pub use auth::{LoginRequest, LoginResponse, User};
pub use breed::{Breed, BreedMode, BreedRequest, BreedResponse};
pub use dashboard::{DashboardSummary, RecentTransaction};
pub use envelope::{ApiEnvelope, ErrorBody, FieldErrors, Page, PageRequest};
pub use inventory::{Inventory, InventoryTransactionBody, InventoryTransactionRequest};
pub use nursery::{Nursery, NurseryRequest};
pub use payment::{Payment, PaymentRequest, PaymentResponse, PaymentType};
pub use quantity::{QuantityError, QuantityProjection, upcoming_quantity, validate_quantity};
pub use sapling::{Sapling, SaplingRequest};
pub use theme::{Theme, ThemeRequest};
pub use transaction::{Transaction, TransactionResponse, TransactionType};
