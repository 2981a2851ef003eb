//! Invoice form rules.
//!
//! Create and update share one schema over `customerId`, `amount` and `status`,
//! declared on [`InvoiceForm`] with `#[derive(Validate)]`. The custom checks
//! below back those attributes; [`invoice_fields`] turns a form that passed
//! into typed fields with the amount in cents.

use std::borrow::Cow;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use validator::{ValidationError, ValidationErrors};

use crate::dtos::{FieldErrors, InvoiceForm};
use crate::models::{InvoiceFields, InvoiceStatus};

pub const CUSTOMER_ID_FIELD: &str = "customerId";
pub const AMOUNT_FIELD: &str = "amount";
pub const STATUS_FIELD: &str = "status";

pub const CUSTOMER_REQUIRED: &str = "Please select a customer...";
pub const AMOUNT_NOT_A_NUMBER: &str = "Please enter a valid Amount.";
pub const AMOUNT_NOT_POSITIVE: &str = "Please enter an Amount greater than 0.";
pub const AMOUNT_TOO_LARGE: &str = "Amount is too large.";
pub const STATUS_INVALID: &str = "Please select an invoice status";

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// A present customer id must not be blank.
pub fn validate_customer_id(customer_id: &str) -> Result<(), ValidationError> {
    if customer_id.trim().is_empty() {
        return Err(field_error("required", CUSTOMER_REQUIRED));
    }
    Ok(())
}

pub fn validate_status(status: &str) -> Result<(), ValidationError> {
    InvoiceStatus::parse(status)
        .map(|_| ())
        .ok_or_else(|| field_error("enum", STATUS_INVALID))
}

pub fn validate_amount(amount: &str) -> Result<(), ValidationError> {
    amount_in_cents(amount).map(|_| ())
}

/// Coerce a form value to a number. A blank field counts as zero.
fn coerce_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }

    if let Ok(amount) = raw
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(raw))
    {
        return Ok(amount);
    }

    // Numeric, but beyond what Decimal holds.
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value <= 0.0 => Ok(Decimal::ZERO),
        Ok(value) if value.is_finite() => {
            Decimal::from_f64(value).ok_or_else(|| field_error("range", AMOUNT_TOO_LARGE))
        }
        _ => Err(field_error("type", AMOUNT_NOT_A_NUMBER)),
    }
}

/// Major units → minor units, rounding half away from zero.
pub fn to_cents(amount: Decimal) -> Option<i32> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i32()
}

/// The stored amount: strictly positive whole cents that fit the column.
pub fn amount_in_cents(raw: &str) -> Result<i32, ValidationError> {
    let amount = coerce_amount(raw)?;
    if amount <= Decimal::ZERO {
        return Err(field_error("range", AMOUNT_NOT_POSITIVE));
    }

    match to_cents(amount) {
        None => Err(field_error("range", AMOUNT_TOO_LARGE)),
        // Rounds away to nothing.
        Some(cents) if cents <= 0 => Err(field_error("range", AMOUNT_NOT_POSITIVE)),
        Some(cents) => Ok(cents),
    }
}

fn rejected(field: &'static str, error: ValidationError) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    errors
}

/// Typed fields from a form that passed `validate()`.
pub fn invoice_fields(form: &InvoiceForm) -> Result<InvoiceFields, ValidationErrors> {
    let customer_id = form
        .customer_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| rejected(CUSTOMER_ID_FIELD, field_error("required", CUSTOMER_REQUIRED)))?;

    let amount_in_cents = amount_in_cents(form.amount.as_deref().unwrap_or_default())
        .map_err(|error| rejected(AMOUNT_FIELD, error))?;

    let status = form
        .status
        .as_deref()
        .and_then(InvoiceStatus::parse)
        .ok_or_else(|| rejected(STATUS_FIELD, field_error("enum", STATUS_INVALID)))?;

    Ok(InvoiceFields {
        customer_id: customer_id.to_string(),
        amount_in_cents,
        status,
    })
}

/// Flatten validator output into the page's `{ field: [messages] }` shape.
pub fn flatten_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let messages = field_errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| error.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
