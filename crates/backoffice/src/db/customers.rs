//! Customer repository: filtered list reads with invoice rollups, plus the
//! single-statement writes used by the mutation actions.

use serde::Serialize;
use sqlx::PgPool;

use acme_core::{CustomerId, Money};

use super::RepositoryError;
use super::pagination::{PageRequest, total_pages};

/// A customer row as persisted.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    /// Empty string or a public path under the customer asset directory.
    pub image_url: String,
}

/// A customer list row with its derived invoice rollup.
///
/// The rollup is recomputed on every list read and never persisted. The
/// money sums leave this layer already formatted as currency strings.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerWithTotals {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_pending: String,
    pub total_paid: String,
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerRollupRow {
    id: CustomerId,
    name: String,
    email: String,
    image_url: String,
    total_invoices: i64,
    total_pending: Option<i64>,
    total_paid: Option<i64>,
}

impl From<CustomerRollupRow> for CustomerWithTotals {
    fn from(row: CustomerRollupRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            image_url: row.image_url,
            total_invoices: row.total_invoices,
            total_pending: Money::new(row.total_pending.unwrap_or(0)).to_display(),
            total_paid: Money::new(row.total_paid.unwrap_or(0)).to_display(),
        }
    }
}

/// Customer list query: case-insensitive substring filter on name or email,
/// left join against invoices so zero-invoice customers still appear, grouped
/// by the customer identity columns. Invoices whose `customer_id` matches no
/// customer never join and are silently excluded.
const LIST_SQL: &str = r"
    SELECT
        customers.id,
        customers.name,
        customers.email,
        customers.image_url,
        COUNT(invoices.id) AS total_invoices,
        SUM(CASE WHEN invoices.status = 'pending' THEN invoices.amount ELSE 0 END) AS total_pending,
        SUM(CASE WHEN invoices.status = 'paid' THEN invoices.amount ELSE 0 END) AS total_paid
    FROM customers
    LEFT JOIN invoices ON customers.id = invoices.customer_id
    WHERE
        customers.name ILIKE $1 OR
        customers.email ILIKE $1
    GROUP BY customers.id, customers.name, customers.email, customers.image_url
    ORDER BY customers.name ASC
    LIMIT $2 OFFSET $3
";

const COUNT_SQL: &str = r"
    SELECT COUNT(*)
    FROM customers
    WHERE
        customers.name ILIKE $1 OR
        customers.email ILIKE $1
";

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
    page_size: u32,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository with the configured list page size.
    #[must_use]
    pub const fn new(pool: &'a PgPool, page_size: u32) -> Self {
        Self { pool, page_size }
    }

    /// Fetch one page of customers matching the filter, with rollups.
    ///
    /// Ordered ascending by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_filtered(
        &self,
        request: &PageRequest,
    ) -> Result<Vec<CustomerWithTotals>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRollupRow>(LIST_SQL)
            .bind(request.like_pattern())
            .bind(i64::from(self.page_size))
            .bind(request.offset(self.page_size))
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(CustomerWithTotals::from).collect())
    }

    /// Total page count for the filter, counted without the join.
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

    /// Get a customer by ID. `None` signals not-found; the caller decides
    /// how to render that.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            r"
            SELECT customers.id, customers.name, customers.email, customers.image_url
            FROM customers
            WHERE customers.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// Insert a new customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        &self,
        name: &str,
        email: &str,
        image_url: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO customers (name, email, image_url)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(name)
        .bind(email)
        .bind(image_url)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Replace every editable field of a customer. `image_url` is written
    /// as given, including empty when the edit form carried no upload - the
    /// forms have no partial-update semantics.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: CustomerId,
        name: &str,
        email: &str,
        image_url: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE customers
            SET name = $2, email = $3, image_url = $4
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(image_url)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Delete a customer by ID. Deleting a nonexistent ID is not an error;
    /// no distinct not-found outcome exists at this layer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
