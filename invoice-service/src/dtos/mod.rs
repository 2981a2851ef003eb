//! Wire shapes exchanged with the dashboard pages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::models::Invoice;

/// Field name → human-readable messages, keyed by the form's field names.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Raw invoice form submission. Every field is untrusted and may be absent;
/// anything else the page posts (`id`, `date`, ...) is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct InvoiceForm {
    #[serde(rename = "customerId")]
    #[validate(
        required(message = "Please select a customer..."),
        custom(function = "crate::validation::validate_customer_id")
    )]
    pub customer_id: Option<String>,
    #[validate(
        required(message = "Please enter an Amount greater than 0."),
        custom(function = "crate::validation::validate_amount")
    )]
    pub amount: Option<String>,
    #[validate(
        required(message = "Please select an invoice status"),
        custom(function = "crate::validation::validate_status")
    )]
    pub status: Option<String>,
}

impl InvoiceForm {
    pub fn new(customer_id: &str, amount: &str, status: &str) -> Self {
        Self {
            customer_id: Some(customer_id.to_string()),
            amount: Some(amount.to_string()),
            status: Some(status.to_string()),
        }
    }
}

/// Form state handed back to the page after a rejected submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormState {
    pub fn invalid(errors: FieldErrors, message: &str) -> Self {
        Self {
            errors: Some(errors),
            message: Some(message.to_string()),
        }
    }

    pub fn message(message: &str) -> Self {
        Self {
            errors: None,
            message: Some(message.to_string()),
        }
    }

    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors
            .as_ref()
            .and_then(|errors| errors.get(field))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Body of the invoice-listing view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceListing {
    pub invoices: Vec<Invoice>,
}
