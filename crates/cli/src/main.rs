//! Acme CLI - Database migrations and development seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run back office database migrations
//! acme-cli migrate
//!
//! # Seed the database with demo customers, products and invoices
//! acme-cli seed
//!
//! # Wipe demo rows before reseeding
//! acme-cli seed --clear
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed database with demo data

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "acme-cli")]
#[command(author, version, about = "Acme back office CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo data
    Seed {
        /// Delete existing demo rows before inserting
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { clear } => commands::seed::run(clear).await?,
    }
    Ok(())
}
