//! HTTP handlers for invoice-service.

pub mod health;
pub mod invoices;
