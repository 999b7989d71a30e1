//! CLI subcommand implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;

use acme_backoffice::db;

/// Connect to the back office database using `DATABASE_URL`.
pub async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "DATABASE_URL not set")?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&database_url).await?)
}
