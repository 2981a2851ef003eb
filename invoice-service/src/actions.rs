//! Invoice create/update/delete actions.
//!
//! Each action is one validate → write → invalidate pass. Nothing is raised to
//! the caller: validation and store failures come back as a [`FormState`]
//! inside [`ActionOutcome::Rejected`], and success tells the caller where to
//! navigate next.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dtos::{FormState, InvoiceForm};
use crate::models::{CreateInvoice, InvoiceFields};
use crate::services::metrics::{ACTIONS_TOTAL, MISSING_ROWS_TOTAL, STORE_ERRORS_TOTAL};
use crate::services::{InvoiceStore, Revalidate, StoreError};
use crate::validation::{flatten_errors, invoice_fields};

/// The invoice-listing view: invalidated after every write, target of redirects.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// Source of the creation date.
pub type Clock = fn() -> NaiveDate;

const CREATE_MISSING_FIELDS: &str = "Missing Fields. Failed to create invoice";
const UPDATE_MISSING_FIELDS: &str = "Missing Fields. Failed to update invoice";

pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The write landed; navigate to this path.
    Redirect(String),
    /// The write landed; stay on the current page.
    Completed,
    /// Nothing was written (or the write failed); render this state.
    Rejected(FormState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    fn database_error_message(&self) -> &'static str {
        match self {
            Operation::Create => "Database error: Failed to create invoice",
            Operation::Update => "Database error: Failed to update invoice",
            Operation::Delete => "Database error: Failed to delete invoice",
        }
    }
}

#[derive(Clone)]
pub struct InvoiceActions {
    store: Arc<dyn InvoiceStore>,
    revalidator: Arc<dyn Revalidate>,
    clock: Clock,
}

impl InvoiceActions {
    pub fn new(store: Arc<dyn InvoiceStore>, revalidator: Arc<dyn Revalidate>) -> Self {
        Self {
            store,
            revalidator,
            clock: utc_today,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Validate the form and insert a new invoice dated today.
    ///
    /// `_prior_state` is whatever the page last rendered; it does not affect the result.
    #[instrument(skip_all)]
    pub async fn create_invoice(
        &self,
        _prior_state: &FormState,
        form: &InvoiceForm,
    ) -> ActionOutcome {
        let op = Operation::Create;
        let fields = match self.validate(op, CREATE_MISSING_FIELDS, form) {
            Ok(fields) => fields,
            Err(rejected) => return rejected,
        };

        let input = CreateInvoice::new(fields, (self.clock)());

        match self.store.insert_invoice(&input).await {
            Ok(id) => {
                info!(invoice_id = %id, date = %input.date, "Invoice created");
                self.succeed(op, Some(INVOICES_PATH))
            }
            Err(err) => self.store_failed(op, err),
        }
    }

    /// Validate the form and overwrite customer, amount and status of `id`.
    /// The creation date is never touched.
    #[instrument(skip(self, _prior_state, form), fields(invoice_id = %id))]
    pub async fn update_invoice(
        &self,
        id: &str,
        _prior_state: &FormState,
        form: &InvoiceForm,
    ) -> ActionOutcome {
        let op = Operation::Update;
        let fields = match self.validate(op, UPDATE_MISSING_FIELDS, form) {
            Ok(fields) => fields,
            Err(rejected) => return rejected,
        };

        match self.store.update_invoice(id, &fields).await {
            Ok(rows) => {
                self.note_missing_row(op, id, rows);
                info!(rows_affected = rows, "Invoice updated");
                self.succeed(op, Some(INVOICES_PATH))
            }
            Err(err) => self.store_failed(op, err),
        }
    }

    /// Hard-delete `id`. Deleting an id that does not exist still succeeds.
    #[instrument(skip(self), fields(invoice_id = %id))]
    pub async fn delete_invoice(&self, id: &str) -> ActionOutcome {
        let op = Operation::Delete;

        match self.store.delete_invoice(id).await {
            Ok(rows) => {
                self.note_missing_row(op, id, rows);
                info!(rows_affected = rows, "Invoice deleted");
                self.succeed(op, None)
            }
            Err(err) => self.store_failed(op, err),
        }
    }

    fn validate(
        &self,
        op: Operation,
        missing_fields_message: &'static str,
        form: &InvoiceForm,
    ) -> Result<InvoiceFields, ActionOutcome> {
        form.validate()
            .and_then(|()| invoice_fields(form))
            .map_err(|errors| {
                let errors = flatten_errors(&errors);
                info!(
                    operation = op.as_str(),
                    fields = ?errors.keys().collect::<Vec<_>>(),
                    "Invoice form rejected"
                );
                ACTIONS_TOTAL
                    .with_label_values(&[op.as_str(), "invalid"])
                    .inc();
                ActionOutcome::Rejected(FormState::invalid(errors, missing_fields_message))
            })
    }

    fn succeed(&self, op: Operation, redirect: Option<&str>) -> ActionOutcome {
        self.revalidator.revalidate_path(INVOICES_PATH);
        ACTIONS_TOTAL
            .with_label_values(&[op.as_str(), "success"])
            .inc();

        match redirect {
            Some(path) => ActionOutcome::Redirect(path.to_string()),
            None => ActionOutcome::Completed,
        }
    }

    fn store_failed(&self, op: Operation, err: StoreError) -> ActionOutcome {
        warn!(
            operation = op.as_str(),
            kind = err.kind.as_str(),
            error = %err,
            "Invoice write failed"
        );
        STORE_ERRORS_TOTAL
            .with_label_values(&[err.operation, err.kind.as_str()])
            .inc();
        ACTIONS_TOTAL
            .with_label_values(&[op.as_str(), "store_error"])
            .inc();

        ActionOutcome::Rejected(FormState::message(op.database_error_message()))
    }

    fn note_missing_row(&self, op: Operation, id: &str, rows: u64) {
        if rows == 0 {
            warn!(
                operation = op.as_str(),
                invoice_id = %id,
                "No invoice matched; reporting success"
            );
            MISSING_ROWS_TOTAL.with_label_values(&[op.as_str()]).inc();
        }
    }
}
