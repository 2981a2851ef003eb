//! Services module for invoice-service.

pub mod cache;
pub mod database;
pub mod error;
pub mod metrics;
pub mod store;

pub use cache::{Revalidate, ViewCache};
pub use database::Database;
pub use error::{StoreError, StoreErrorKind};
pub use metrics::{get_metrics, init_metrics};
pub use store::InvoiceStore;
