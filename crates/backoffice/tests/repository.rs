//! Repository integration tests against a real `PostgreSQL` database.
//!
//! These tests require a running database:
//!
//! ```bash
//! export DATABASE_URL=postgres://localhost/acme_backoffice_test
//! cargo test -p acme-backoffice -- --ignored
//! ```
//!
//! Rows are namespaced with a per-test UUID marker so tests can rerun
//! against a dirty database and run concurrently with each other.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use secrecy::SecretString;
use sqlx::PgPool;
use uuid::Uuid;

use acme_backoffice::actions::DeleteOutcome;
use acme_backoffice::actions::customers::delete_customer;
use acme_backoffice::cache::{CustomerListPage, ListKey};
use acme_backoffice::config::BackofficeConfig;
use acme_backoffice::db::{self, CustomerRepository, PageRequest, ProductRepository};
use acme_backoffice::forms::ImagePolicy;
use acme_backoffice::state::AppState;
use acme_core::{CustomerId, InvoiceStatus};

const PAGE_SIZE: u32 = 6;

async fn setup_pool() -> PgPool {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPool::connect(&url).await.expect("connect to database");
    db::MIGRATOR.run(&pool).await.expect("run migrations");
    pool
}

fn marker() -> String {
    Uuid::new_v4().simple().to_string()
}

fn request(query: &str, page: u32) -> PageRequest {
    PageRequest::from_raw(Some(query), Some(&page.to_string()))
}

fn state_over(pool: PgPool, asset_root: &std::path::Path) -> AppState {
    let config = BackofficeConfig {
        database_url: SecretString::from("postgres://localhost/unused"),
        host: "127.0.0.1".parse().expect("valid address"),
        port: 0,
        asset_root: asset_root.to_path_buf(),
        customers_per_page: PAGE_SIZE,
        products_per_page: PAGE_SIZE,
        image_policy: ImagePolicy::default(),
        sentry_dsn: None,
        sentry_environment: None,
    };
    AppState::new(config, pool)
}

async fn insert_customer(pool: &PgPool, name: &str, email: &str) -> CustomerId {
    sqlx::query_scalar::<_, CustomerId>(
        "INSERT INTO customers (name, email, image_url) VALUES ($1, $2, '') RETURNING id",
    )
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn insert_invoice(pool: &PgPool, customer_id: CustomerId, amount: i32, status: &InvoiceStatus) {
    sqlx::query("INSERT INTO invoices (customer_id, amount, status) VALUES ($1, $2, $3)")
        .bind(customer_id)
        .bind(amount)
        .bind(status.as_str())
        .execute(pool)
        .await
        .unwrap();
}

// ============================================================================
// Pagination & filtering
// ============================================================================

#[tokio::test]
#[ignore = "requires a running PostgreSQL database (set DATABASE_URL)"]
async fn test_product_pagination_bounds_and_descending_order() {
    let pool = setup_pool().await;
    let repository = ProductRepository::new(&pool, PAGE_SIZE);
    let mark = marker();

    for i in 0..8 {
        repository
            .insert(&format!("{mark}-product-{i}"), "", 100 * (i + 1))
            .await
            .unwrap();
    }

    let page_one = repository.list_filtered(&request(&mark, 1)).await.unwrap();
    let page_two = repository.list_filtered(&request(&mark, 2)).await.unwrap();

    assert_eq!(page_one.len(), 6);
    assert_eq!(page_two.len(), 2);

    // Descending by name: product-7 first, and page two continues where
    // page one stopped.
    assert_eq!(page_one[0].name, format!("{mark}-product-7"));
    assert_eq!(page_two[0].name, format!("{mark}-product-1"));
    assert_eq!(page_two[1].name, format!("{mark}-product-0"));

    assert_eq!(repository.count_pages(&request(&mark, 1)).await.unwrap(), 2);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database (set DATABASE_URL)"]
async fn test_invalid_page_input_behaves_as_page_one() {
    let pool = setup_pool().await;
    let repository = ProductRepository::new(&pool, PAGE_SIZE);
    let mark = marker();

    repository.insert(&format!("{mark}-only"), "", 100).await.unwrap();

    for raw_page in [None, Some("0"), Some("-3"), Some("junk")] {
        let request = PageRequest::from_raw(Some(&mark), raw_page);
        let rows = repository.list_filtered(&request).await.unwrap();
        assert_eq!(rows.len(), 1, "page input {raw_page:?}");
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database (set DATABASE_URL)"]
async fn test_search_without_matches_yields_no_rows_and_zero_pages() {
    let pool = setup_pool().await;
    let repository = ProductRepository::new(&pool, PAGE_SIZE);
    let mark = marker();

    let rows = repository.list_filtered(&request(&mark, 1)).await.unwrap();
    assert!(rows.is_empty());
    assert_eq!(repository.count_pages(&request(&mark, 1)).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database (set DATABASE_URL)"]
async fn test_customer_filter_matches_name_or_email_case_insensitively() {
    let pool = setup_pool().await;
    let repository = CustomerRepository::new(&pool, PAGE_SIZE);
    let mark = marker();

    insert_customer(&pool, &format!("{mark}-Amy"), "amy@example.com").await;
    insert_customer(&pool, "Unrelated", &format!("{mark}@example.com")).await;

    let upper = mark.to_uppercase();
    let rows = repository.list_filtered(&request(&upper, 1)).await.unwrap();
    assert_eq!(rows.len(), 2);
}

// ============================================================================
// Rollups
// ============================================================================

#[tokio::test]
#[ignore = "requires a running PostgreSQL database (set DATABASE_URL)"]
async fn test_zero_invoice_customer_appears_with_zero_totals() {
    let pool = setup_pool().await;
    let repository = CustomerRepository::new(&pool, PAGE_SIZE);
    let mark = marker();

    insert_customer(&pool, &format!("{mark}-loner"), "loner@example.com").await;

    let rows = repository.list_filtered(&request(&mark, 1)).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.total_invoices, 0);
    assert_eq!(row.total_pending, "$0.00");
    assert_eq!(row.total_paid, "$0.00");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database (set DATABASE_URL)"]
async fn test_rollup_sums_pending_and_paid_separately() {
    let pool = setup_pool().await;
    let repository = CustomerRepository::new(&pool, PAGE_SIZE);
    let mark = marker();

    let id = insert_customer(&pool, &format!("{mark}-billed"), "billed@example.com").await;
    insert_invoice(&pool, id, 1000, &InvoiceStatus::Pending).await;
    insert_invoice(&pool, id, 250, &InvoiceStatus::Pending).await;
    insert_invoice(&pool, id, 123_456, &InvoiceStatus::Paid).await;
    // Statuses outside the aggregated set contribute nothing.
    insert_invoice(&pool, id, 999, &InvoiceStatus::from("voided")).await;

    let rows = repository.list_filtered(&request(&mark, 1)).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.total_invoices, 4);
    assert_eq!(row.total_pending, "$12.50");
    assert_eq!(row.total_paid, "$1,234.56");
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
#[ignore = "requires a running PostgreSQL database (set DATABASE_URL)"]
async fn test_update_replaces_every_editable_field() {
    let pool = setup_pool().await;
    let repository = CustomerRepository::new(&pool, PAGE_SIZE);
    let mark = marker();

    let id = insert_customer(&pool, &format!("{mark}-before"), "before@example.com").await;
    sqlx::query("UPDATE customers SET image_url = '/customers/old.png' WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    // The edit form carried no upload, so image_url is replaced with empty.
    repository
        .update(id, &format!("{mark}-after"), "after@example.com", "")
        .await
        .unwrap();

    let customer = repository.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(customer.name, format!("{mark}-after"));
    assert_eq!(customer.email, "after@example.com");
    assert_eq!(customer.image_url, "");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database (set DATABASE_URL)"]
async fn test_delete_nonexistent_customer_succeeds() {
    let pool = setup_pool().await;
    let repository = CustomerRepository::new(&pool, PAGE_SIZE);

    repository.delete(CustomerId::generate()).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database (set DATABASE_URL)"]
async fn test_delete_nonexistent_customer_invalidates_cached_lists() {
    let pool = setup_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let state = state_over(pool, dir.path());

    let key = ListKey {
        query: marker(),
        page: 1,
    };
    state
        .cache()
        .put_customers(
            key.clone(),
            Arc::new(CustomerListPage {
                customers: vec![],
                total_pages: 0,
            }),
        )
        .await;
    assert!(state.cache().get_customers(&key).await.is_some());

    // The id matches no row; the delete still succeeds and the stale
    // cached page is dropped.
    let outcome = delete_customer(&state, CustomerId::generate()).await;

    assert!(matches!(outcome, DeleteOutcome::Completed));
    assert!(state.cache().get_customers(&key).await.is_none());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database (set DATABASE_URL)"]
async fn test_get_by_id_not_found_is_none() {
    let pool = setup_pool().await;
    let repository = ProductRepository::new(&pool, PAGE_SIZE);

    assert!(repository
        .get_by_id(acme_core::ProductId::generate())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database (set DATABASE_URL)"]
async fn test_product_amount_written_as_is_and_divided_only_on_detail() {
    let pool = setup_pool().await;
    let repository = ProductRepository::new(&pool, PAGE_SIZE);
    let mark = marker();

    // A form submission of "25" (dollars) stores 25, not 2500.
    repository.insert(&format!("{mark}-widget"), "", 25).await.unwrap();

    let rows = repository.list_filtered(&request(&mark, 1)).await.unwrap();
    assert_eq!(rows[0].amount, 25);

    let detail = repository.get_by_id(rows[0].id).await.unwrap().unwrap();
    assert!((detail.amount - 0.25).abs() < f64::EPSILON);
}
