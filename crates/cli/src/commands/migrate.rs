//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! acme-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! Migration files live in `crates/backoffice/migrations/` and are embedded
//! into the binary at compile time, so the command works from any directory.

use tracing::info;

use acme_backoffice::db;

/// Run back office database migrations.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is missing, the connection fails, or a
/// migration cannot be applied.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    info!("Running migrations...");
    db::MIGRATOR.run(&pool).await?;

    info!("Migrations complete");
    Ok(())
}
