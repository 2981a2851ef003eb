//! Invoice form endpoints and the cached listing view.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use dashboard_core::error::AppError;

use crate::actions::{ActionOutcome, INVOICES_PATH};
use crate::dtos::{FormState, InvoiceForm, InvoiceListing};
use crate::models::Invoice;
use crate::services::metrics::CACHE_LOOKUPS_TOTAL;
use crate::services::StoreErrorKind;
use crate::startup::AppState;

pub const CACHE_STATUS_HEADER: &str = "x-cache";

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        match self {
            ActionOutcome::Redirect(path) => Redirect::to(&path).into_response(),
            ActionOutcome::Completed => StatusCode::NO_CONTENT.into_response(),
            ActionOutcome::Rejected(state) => {
                // Field errors are the user's to fix; a bare message means the write failed.
                let status = if state.errors.is_some() {
                    StatusCode::UNPROCESSABLE_ENTITY
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, Json(state)).into_response()
            }
        }
    }
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Form(form): Form<InvoiceForm>,
) -> ActionOutcome {
    state
        .actions
        .create_invoice(&FormState::default(), &form)
        .await
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<InvoiceForm>,
) -> ActionOutcome {
    state
        .actions
        .update_invoice(&id, &FormState::default(), &form)
        .await
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ActionOutcome {
    state.actions.delete_invoice(&id).await
}

/// Listing view, served from the view cache and re-rendered after invalidation.
pub async fn list_invoices(State(state): State<AppState>) -> Result<Response, AppError> {
    if let Some(cached) = state.cache.get(INVOICES_PATH) {
        CACHE_LOOKUPS_TOTAL.with_label_values(&["hit"]).inc();
        let mut response = json_body(cached.body.clone(), "hit");
        response
            .headers_mut()
            .insert(header::AGE, HeaderValue::from(cached.age_secs()));
        return Ok(response);
    }
    CACHE_LOOKUPS_TOTAL.with_label_values(&["miss"]).inc();

    let generation = state.cache.generation();
    let invoices = state.store.list_invoices().await?;
    let body: Arc<str> = serde_json::to_string(&InvoiceListing { invoices })
        .map_err(|e| AppError::InternalError(e.into()))?
        .into();

    state.cache.store(INVOICES_PATH, generation, body.clone());

    Ok(json_body(body, "miss"))
}

/// Single invoice, for pre-filling the edit form.
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Invoice>, AppError> {
    let invoice = match state.store.get_invoice(&id).await {
        Ok(invoice) => invoice,
        // A malformed id cannot name a stored invoice.
        Err(err) if err.kind == StoreErrorKind::InvalidInput => None,
        Err(err) => return Err(err.into()),
    };

    invoice
        .map(Json)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))
}

fn json_body(body: Arc<str>, cache_status: &'static str) -> Response {
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (
                header::HeaderName::from_static(CACHE_STATUS_HEADER),
                HeaderValue::from_static(cache_status),
            ),
        ],
        body.to_string(),
    )
        .into_response()
}
