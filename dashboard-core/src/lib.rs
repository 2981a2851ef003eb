//! dashboard-core: Shared infrastructure for the dashboard services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
