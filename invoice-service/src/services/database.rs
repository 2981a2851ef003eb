//! Database service for invoice-service.

use crate::config::DatabaseConfig;
use crate::models::{CreateInvoice, Invoice, InvoiceFields};
use crate::services::error::StoreError;
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::store::InvoiceStore;
use async_trait::async_trait;
use dashboard_core::error::AppError;
use secrecy::ExposeSecret;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(config), fields(service = "invoice-service"))]
    pub async fn new(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            ssl_mode = ?config.ssl_mode,
            "Connecting to PostgreSQL"
        );

        let options = PgConnectOptions::from_str(config.url.expose_secret())
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid POSTGRES_URL: {}", e)))?
            .ssl_mode(config.ssl_mode);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Duration::from_secs(600))
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Close every pooled connection. Pending acquires fail with `PoolClosed`.
    pub async fn close(&self) {
        info!("Closing PostgreSQL connection pool");
        self.pool.close().await;
    }
}

#[async_trait]
impl InvoiceStore for Database {
    #[instrument(skip(self, input), fields(customer_id = %input.customer_id, status = %input.status))]
    async fn insert_invoice(&self, input: &CreateInvoice) -> Result<String, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_invoice"])
            .start_timer();

        let id = sqlx::query_scalar::<_, String>(
            r#"
            INSERT INTO invoices (customer_id, amount, status, date)
            VALUES ($1::uuid, $2, $3, $4)
            RETURNING id::text
            "#,
        )
        .bind(&input.customer_id)
        .bind(input.amount_in_cents)
        .bind(input.status.as_str())
        .bind(input.date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx("insert_invoice", e))?;

        timer.observe_duration();

        info!(invoice_id = %id, amount = input.amount_in_cents, "Invoice inserted");

        Ok(id)
    }

    #[instrument(skip(self, changes), fields(invoice_id = %id))]
    async fn update_invoice(&self, id: &str, changes: &InvoiceFields) -> Result<u64, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_invoice"])
            .start_timer();

        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET customer_id = $2::uuid, amount = $3, status = $4
            WHERE id = $1::uuid
            "#,
        )
        .bind(id)
        .bind(&changes.customer_id)
        .bind(changes.amount_in_cents)
        .bind(changes.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx("update_invoice", e))?;

        timer.observe_duration();

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(invoice_id = %id))]
    async fn delete_invoice(&self, id: &str) -> Result<u64, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_invoice"])
            .start_timer();

        let result = sqlx::query("DELETE FROM invoices WHERE id = $1::uuid")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("delete_invoice", e))?;

        timer.observe_duration();

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(invoice_id = %id))]
    async fn get_invoice(&self, id: &str) -> Result<Option<Invoice>, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_invoice"])
            .start_timer();

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id::text AS id, customer_id::text AS customer_id, amount, status, date
            FROM invoices
            WHERE id = $1::uuid
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx("get_invoice", e))?;

        timer.observe_duration();

        Ok(invoice)
    }

    #[instrument(skip(self))]
    async fn list_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_invoices"])
            .start_timer();

        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id::text AS id, customer_id::text AS customer_id, amount, status, date
            FROM invoices
            ORDER BY date DESC, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx("list_invoices", e))?;

        timer.observe_duration();

        Ok(invoices)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("health_check", e))?;
        Ok(())
    }
}
