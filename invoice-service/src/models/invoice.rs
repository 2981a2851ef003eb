//! Invoice model for invoice-service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }

    /// Strict parse; anything other than the two literals is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invoice row as stored. Identifiers are opaque strings; `amount` is in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,
    pub amount: i32,
    pub status: String,
    pub date: NaiveDate,
}

impl Invoice {
    pub fn status(&self) -> Option<InvoiceStatus> {
        InvoiceStatus::parse(&self.status)
    }
}

/// The user-editable fields after validation, amount already in cents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFields {
    pub customer_id: String,
    pub amount_in_cents: i32,
    pub status: InvoiceStatus,
}

/// Input for inserting an invoice. `date` is assigned by the service, never the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateInvoice {
    pub customer_id: String,
    pub amount_in_cents: i32,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

impl CreateInvoice {
    pub fn new(fields: InvoiceFields, date: NaiveDate) -> Self {
        Self {
            customer_id: fields.customer_id,
            amount_in_cents: fields.amount_in_cents,
            status: fields.status,
            date,
        }
    }
}
