//! Application startup and lifecycle management.

use crate::actions::InvoiceActions;
use crate::config::InvoiceConfig;
use crate::handlers::{health, invoices};
use crate::services::metrics::metrics_middleware;
use crate::services::{init_metrics, Database, InvoiceStore, ViewCache};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use dashboard_core::error::AppError;
use dashboard_core::middleware::{request_id_middleware, REQUEST_ID_HEADER};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub actions: InvoiceActions,
    pub store: Arc<dyn InvoiceStore>,
    pub cache: Arc<ViewCache>,
}

impl AppState {
    pub fn new(store: Arc<dyn InvoiceStore>) -> Self {
        let cache = Arc::new(ViewCache::new());
        let actions = InvoiceActions::new(store.clone(), cache.clone());
        Self {
            actions,
            store,
            cache,
        }
    }
}

/// Build the router with every route and layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics_handler))
        .route(
            "/dashboard/invoices",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route("/dashboard/invoices/:id", get(invoices::get_invoice))
        .route("/dashboard/invoices/:id/edit", post(invoices::update_invoice))
        .route(
            "/dashboard/invoices/:id/delete",
            post(invoices::delete_invoice),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    http_listener: TcpListener,
    state: AppState,
    database: Option<Database>,
}

impl Application {
    /// Connect to Postgres, migrate, and bind the listener.
    pub async fn build(config: InvoiceConfig) -> Result<Self, AppError> {
        Self::build_internal(config, true).await
    }

    /// Build the application without running migrations.
    /// Use this in tests when migrations are already applied by the test harness.
    pub async fn build_without_migrations(config: InvoiceConfig) -> Result<Self, AppError> {
        Self::build_internal(config, false).await
    }

    async fn build_internal(config: InvoiceConfig, run_migrations: bool) -> Result<Self, AppError> {
        let db = Database::new(&config.database).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        if run_migrations {
            db.run_migrations().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to run migrations");
                e
            })?;
        }

        let mut app = Self::build_with_store(&config, Arc::new(db.clone())).await?;
        app.database = Some(db);
        Ok(app)
    }

    /// Bind the listener around an already constructed store.
    pub async fn build_with_store(
        config: &InvoiceConfig,
        store: Arc<dyn InvoiceStore>,
    ) -> Result<Self, AppError> {
        init_metrics();

        let http_addr = config.common.socket_addr();
        let http_listener = TcpListener::bind(http_addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %http_addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        tracing::info!(http_port = http_port, "Invoice service listener bound");

        Ok(Self {
            http_port,
            http_listener,
            state: AppState::new(store),
            database: None,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Get the application state.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Serve until `shutdown` resolves, then drain requests and close the pool.
    pub async fn run_with_shutdown<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = build_router(self.state);

        tracing::info!(
            service = "invoice-service",
            version = env!("CARGO_PKG_VERSION"),
            http_port = self.http_port,
            "Service ready to accept connections"
        );

        let result = axum::serve(self.http_listener, router)
            .with_graceful_shutdown(shutdown)
            .await;

        if let Some(db) = self.database {
            db.close().await;
        }

        result.map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            std::io::Error::other(format!("HTTP server error: {}", e))
        })
    }
}
