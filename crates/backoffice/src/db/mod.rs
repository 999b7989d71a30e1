//! Database operations for the back office `PostgreSQL`.
//!
//! ## Tables
//!
//! - `customers` - Managed resource (created/edited/deleted by actions)
//! - `products` - Managed resource (created/deleted by actions)
//! - `invoices` - Read-only join source for customer rollups
//!
//! All queries are parameterized and run as single statements; there is no
//! cross-statement transaction and no optimistic concurrency - concurrent
//! edits to the same row race at the store and the last write wins.
//!
//! # Migrations
//!
//! Migrations live in `crates/backoffice/migrations/` and run via:
//! ```bash
//! cargo run -p acme-cli -- migrate
//! ```

pub mod customers;
pub mod pagination;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use customers::{Customer, CustomerRepository, CustomerWithTotals};
pub use pagination::{PageRequest, total_pages};
pub use products::{Product, ProductDetail, ProductRepository};

/// Embedded migrations, shared with the CLI.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
