//! Persistence seam for invoices.

use async_trait::async_trait;

use crate::models::{CreateInvoice, Invoice, InvoiceFields};
use crate::services::error::StoreError;

/// One SQL statement per call; no transactions span calls.
///
/// Ids are opaque strings here, but [`Database`](crate::services::Database)
/// casts invoice and customer ids to `uuid`: anything else (`"inv-42"`,
/// `"cust-1"`) fails there with [`StoreErrorKind::InvalidInput`](crate::services::StoreErrorKind).
///
/// `update_invoice` and `delete_invoice` report the number of rows affected so
/// callers can tell a missing id from a real change.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert a row and return the store-assigned id.
    async fn insert_invoice(&self, input: &CreateInvoice) -> Result<String, StoreError>;

    async fn update_invoice(&self, id: &str, changes: &InvoiceFields) -> Result<u64, StoreError>;

    async fn delete_invoice(&self, id: &str) -> Result<u64, StoreError>;

    async fn get_invoice(&self, id: &str) -> Result<Option<Invoice>, StoreError>;

    /// Every invoice, newest first.
    async fn list_invoices(&self) -> Result<Vec<Invoice>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
