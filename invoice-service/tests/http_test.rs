mod common;

use common::{fixed_today, FailingStore, InMemoryStore, TestApp, CUSTOMER_ID};
use invoice_service::dtos::{FormState, InvoiceListing};
use invoice_service::handlers::invoices::CACHE_STATUS_HEADER;
use invoice_service::services::StoreErrorKind;
use reqwest::StatusCode;
use std::sync::Arc;

fn cache_status(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(CACHE_STATUS_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn(Arc::new(InMemoryStore::new())).await;

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "invoice-service");
}

#[tokio::test]
async fn health_check_reports_unavailable_store() {
    let app = TestApp::spawn(Arc::new(FailingStore::new(StoreErrorKind::Connectivity))).await;

    assert_eq!(app.get("/health").await.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(app.get("/ready").await.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn create_redirects_to_listing() {
    let store = Arc::new(InMemoryStore::new());
    let app = TestApp::spawn(store.clone()).await;

    let response = app
        .post_form(
            "/dashboard/invoices",
            &[
                ("customerId", CUSTOMER_ID),
                ("amount", "42.10"),
                ("status", "paid"),
                ("date", "1999-01-01"),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()["location"].to_str().unwrap(),
        "/dashboard/invoices"
    );
    let invoices = store.invoices();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].amount, 4210);
    assert_ne!(invoices[0].date, chrono::NaiveDate::from_ymd_opt(1999, 1, 1).unwrap());
}

#[tokio::test]
async fn invalid_form_returns_field_errors() {
    let store = Arc::new(InMemoryStore::new());
    let app = TestApp::spawn(store.clone()).await;

    let response = app
        .post_form("/dashboard/invoices", &[("amount", "0"), ("status", "paid")])
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let state: FormState = response.json().await.unwrap();
    assert_eq!(
        state.field_errors("customerId"),
        ["Please select a customer...".to_string()]
    );
    assert_eq!(
        state.field_errors("amount"),
        ["Please enter an Amount greater than 0.".to_string()]
    );
    assert_eq!(
        state.message.as_deref(),
        Some("Missing Fields. Failed to create invoice")
    );
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn store_failure_returns_message_only() {
    let app = TestApp::spawn(Arc::new(FailingStore::new(StoreErrorKind::Other))).await;

    let response = app
        .post_form(
            "/dashboard/invoices/inv-1/edit",
            &[("customerId", CUSTOMER_ID), ("amount", "3"), ("status", "pending")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Database error: Failed to update invoice");
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn update_redirects_and_delete_completes() {
    let store = Arc::new(InMemoryStore::new());
    let id = store.seed(CUSTOMER_ID, 500, "pending", fixed_today());
    let app = TestApp::spawn(store.clone()).await;

    let response = app
        .post_form(
            &format!("/dashboard/invoices/{}/edit", id),
            &[("customerId", CUSTOMER_ID), ("amount", "7"), ("status", "paid")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(store.find(&id).unwrap().amount, 700);

    let response = app
        .post_form(&format!("/dashboard/invoices/{}/delete", id), &[])
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(store.find(&id).is_none());
}

#[tokio::test]
async fn listing_is_cached_until_a_write_invalidates_it() {
    let store = Arc::new(InMemoryStore::new());
    store.seed(CUSTOMER_ID, 100, "paid", fixed_today());
    let app = TestApp::spawn(store.clone()).await;

    let first = app.get("/dashboard/invoices").await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(cache_status(&first), "miss");

    let second = app.get("/dashboard/invoices").await;
    assert_eq!(cache_status(&second), "hit");
    assert!(second.headers().contains_key("age"));
    assert!(!first.headers().contains_key("age"));
    let listing: InvoiceListing = second.json().await.unwrap();
    assert_eq!(listing.invoices.len(), 1);
    assert_eq!(store.lists(), 1);

    app.post_form(
        "/dashboard/invoices",
        &[("customerId", CUSTOMER_ID), ("amount", "2"), ("status", "pending")],
    )
    .await;

    let third = app.get("/dashboard/invoices").await;
    assert_eq!(cache_status(&third), "miss");
    let listing: InvoiceListing = third.json().await.unwrap();
    assert_eq!(listing.invoices.len(), 2);
    assert_eq!(store.lists(), 2);
}

#[tokio::test]
async fn rejected_write_keeps_cached_listing() {
    let app = TestApp::spawn(Arc::new(InMemoryStore::new())).await;

    app.get("/dashboard/invoices").await;
    app.post_form("/dashboard/invoices", &[("amount", "abc")]).await;

    assert_eq!(cache_status(&app.get("/dashboard/invoices").await), "hit");
}

#[tokio::test]
async fn get_invoice_returns_stored_row_or_404() {
    let store = Arc::new(InMemoryStore::new());
    let id = store.seed(CUSTOMER_ID, 1234, "pending", fixed_today());
    let app = TestApp::spawn(store).await;

    let response = app.get(&format!("/dashboard/invoices/{}", id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["amount"], 1234);
    assert_eq!(body["status"], "pending");

    let response = app.get("/dashboard/invoices/inv-missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_endpoint_exposes_action_counters() {
    let app = TestApp::spawn(Arc::new(InMemoryStore::new())).await;
    app.post_form(
        "/dashboard/invoices",
        &[("customerId", CUSTOMER_ID), ("amount", "1"), ("status", "paid")],
    )
    .await;

    let body = app.get("/metrics").await.text().await.unwrap();

    assert!(body.contains("invoice_actions_total"));
    assert!(body.contains("invoice_http_requests_total"));
}
