//! Domain models for invoice-service.

mod invoice;

pub use invoice::{CreateInvoice, Invoice, InvoiceFields, InvoiceStatus};
