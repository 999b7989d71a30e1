//! Seed the database with demo data for local development.
//!
//! Inserts a handful of customers with a mix of pending and paid invoices,
//! plus a small product catalog, so the list pages have something to show.
//! Demo customers are recognizable by the `@demo.acme.test` email domain;
//! `--clear` deletes them (and their invoices) before reseeding.

use sqlx::PgPool;
use tracing::info;

use acme_core::{CustomerId, InvoiceStatus};

const DEMO_DOMAIN: &str = "demo.acme.test";

struct DemoCustomer {
    name: &'static str,
    email_local: &'static str,
    // (amount in cents, status)
    invoices: &'static [(i32, InvoiceStatus)],
}

const DEMO_CUSTOMERS: &[DemoCustomer] = &[
    DemoCustomer {
        name: "Amy Burns",
        email_local: "amy",
        invoices: &[
            (5_400, InvoiceStatus::Pending),
            (12_500, InvoiceStatus::Paid),
        ],
    },
    DemoCustomer {
        name: "Balazs Orban",
        email_local: "balazs",
        invoices: &[
            (8_945, InvoiceStatus::Paid),
            (1_000, InvoiceStatus::Paid),
            (3_200, InvoiceStatus::Pending),
        ],
    },
    DemoCustomer {
        name: "Delba de Oliveira",
        email_local: "delba",
        invoices: &[(44_800, InvoiceStatus::Pending)],
    },
    DemoCustomer {
        name: "Lee Robinson",
        email_local: "lee",
        invoices: &[],
    },
    DemoCustomer {
        name: "Michael Novotny",
        email_local: "michael",
        invoices: &[
            (666, InvoiceStatus::Pending),
            (32_545, InvoiceStatus::Paid),
        ],
    },
    DemoCustomer {
        name: "Evil Rabbit",
        email_local: "evil",
        invoices: &[(15_795, InvoiceStatus::Paid)],
    },
];

const DEMO_PRODUCTS: &[(&str, i32)] = &[
    ("Anvil", 12_999),
    ("Rocket Skates", 8_450),
    ("Giant Rubber Band", 1_599),
    ("Dehydrated Boulders", 22_000),
    ("Earthquake Pills", 4_925),
];

/// Seed demo customers, invoices and products.
///
/// # Errors
///
/// Returns an error if the connection fails or any insert fails.
pub async fn run(clear: bool) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    if clear {
        clear_demo_rows(&pool).await?;
    }

    for customer in DEMO_CUSTOMERS {
        let email = format!("{}@{DEMO_DOMAIN}", customer.email_local);
        let id = sqlx::query_scalar::<_, CustomerId>(
            "INSERT INTO customers (name, email, image_url) VALUES ($1, $2, '') RETURNING id",
        )
        .bind(customer.name)
        .bind(&email)
        .fetch_one(&pool)
        .await?;

        for (amount, status) in customer.invoices {
            sqlx::query("INSERT INTO invoices (customer_id, amount, status) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(amount)
                .bind(status.as_str())
                .execute(&pool)
                .await?;
        }
    }
    info!(count = DEMO_CUSTOMERS.len(), "Seeded demo customers");

    for &(name, amount) in DEMO_PRODUCTS {
        sqlx::query("INSERT INTO products (name, image_url, amount) VALUES ($1, '', $2)")
            .bind(name)
            .bind(amount)
            .execute(&pool)
            .await?;
    }
    info!(count = DEMO_PRODUCTS.len(), "Seeded demo products");

    Ok(())
}

async fn clear_demo_rows(pool: &PgPool) -> Result<(), sqlx::Error> {
    let pattern = format!("%@{DEMO_DOMAIN}");

    sqlx::query(
        "DELETE FROM invoices WHERE customer_id IN \
         (SELECT id FROM customers WHERE email LIKE $1)",
    )
    .bind(&pattern)
    .execute(pool)
    .await?;

    let deleted = sqlx::query("DELETE FROM customers WHERE email LIKE $1")
        .bind(&pattern)
        .execute(pool)
        .await?
        .rows_affected();

    let product_names: Vec<&str> = DEMO_PRODUCTS.iter().map(|&(name, _)| name).collect();
    sqlx::query("DELETE FROM products WHERE name = ANY($1)")
        .bind(&product_names)
        .execute(pool)
        .await?;

    info!(deleted, "Cleared existing demo customers and products");
    Ok(())
}
