//! Product repository: filtered list reads and the single-statement writes
//! used by the mutation actions.
//!
//! List rows carry `amount` as raw minor units; only the single-record read
//! divides by 100 for display. The write path persists the submitted number
//! unchanged, so the two never pass through the same conversion. The form
//! components compensate; tests pin both sides.

use serde::Serialize;
use sqlx::PgPool;

use acme_core::ProductId;

use super::RepositoryError;
use super::pagination::{PageRequest, total_pages};

/// A product row as persisted. `amount` is raw minor units; `data` is an
/// opaque payload no mutation form produces.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub image_url: String,
    pub data: String,
    pub amount: i32,
}

/// A single product prepared for display: `amount` converted to major units.
/// This conversion happens only on this path.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub id: ProductId,
    pub name: String,
    pub image_url: String,
    pub data: String,
    pub amount: f64,
}

impl From<Product> for ProductDetail {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            image_url: product.image_url,
            data: product.data,
            amount: f64::from(product.amount) / 100.0,
        }
    }
}

/// Product list query: case-insensitive substring filter on name, ordered
/// descending by name (the customer list orders ascending; the asymmetry is
/// what the list components expect).
const LIST_SQL: &str = r"
    SELECT
        products.id,
        products.name,
        products.image_url,
        products.data,
        products.amount
    FROM products
    WHERE
        products.name ILIKE $1
    ORDER BY products.name DESC
    LIMIT $2 OFFSET $3
";

const COUNT_SQL: &str = r"
    SELECT COUNT(*)
    FROM products
    WHERE
        products.name ILIKE $1
";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
    page_size: u32,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository with the configured list page size.
    #[must_use]
    pub const fn new(pool: &'a PgPool, page_size: u32) -> Self {
        Self { pool, page_size }
    }

    /// Fetch one page of products matching the filter, amounts raw.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_filtered(
        &self,
        request: &PageRequest,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(LIST_SQL)
            .bind(request.like_pattern())
            .bind(i64::from(self.page_size))
            .bind(request.offset(self.page_size))
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Total page count for the filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_pages(&self, request: &PageRequest) -> Result<u32, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(COUNT_SQL)
            .bind(request.like_pattern())
            .fetch_one(self.pool)
            .await?;

        Ok(total_pages(count, self.page_size))
    }

    /// Get a product by ID with its amount converted to major units.
    /// `None` signals not-found.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT products.id, products.name, products.image_url, products.data, products.amount
            FROM products
            WHERE products.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product.map(ProductDetail::from))
    }

    /// Insert a new product. The amount is stored exactly as validated -
    /// no conversion to minor units happens on the write path.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        &self,
        name: &str,
        image_url: &str,
        amount: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO products (name, image_url, amount)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(name)
        .bind(image_url)
        .bind(amount)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Delete a product by ID. Deleting a nonexistent ID is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
