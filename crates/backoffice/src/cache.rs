//! Cached list views, invalidated after every mutation.
//!
//! List reads are cached per `(query, page)` using `moka` (5-minute TTL).
//! Each resource owns its own cache so a mutation can invalidate exactly the
//! list views that went stale. Rollups are part of the cached customer rows,
//! so an invoice-affecting change shows up on the next list read after
//! invalidation.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::db::{CustomerWithTotals, Product};

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Cache key for one page of a filtered list view.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct ListKey {
    pub query: String,
    pub page: u32,
}

/// One cached page of the customer list.
#[derive(Debug, Clone)]
pub struct CustomerListPage {
    pub customers: Vec<CustomerWithTotals>,
    pub total_pages: u32,
}

/// One cached page of the product list.
#[derive(Debug, Clone)]
pub struct ProductListPage {
    pub products: Vec<Product>,
    pub total_pages: u32,
}

/// Per-resource caches over the list read results.
#[derive(Clone)]
pub struct ListCache {
    customers: Cache<ListKey, Arc<CustomerListPage>>,
    products: Cache<ListKey, Arc<ProductListPage>>,
}

impl ListCache {
    /// Create the caches with their capacity and TTL bounds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            customers: build_cache(),
            products: build_cache(),
        }
    }

    /// Look up a cached customer list page.
    pub async fn get_customers(&self, key: &ListKey) -> Option<Arc<CustomerListPage>> {
        self.customers.get(key).await
    }

    /// Store a customer list page.
    pub async fn put_customers(&self, key: ListKey, page: Arc<CustomerListPage>) {
        self.customers.insert(key, page).await;
    }

    /// Look up a cached product list page.
    pub async fn get_products(&self, key: &ListKey) -> Option<Arc<ProductListPage>> {
        self.products.get(key).await
    }

    /// Store a product list page.
    pub async fn put_products(&self, key: ListKey, page: Arc<ProductListPage>) {
        self.products.insert(key, page).await;
    }

    /// Mark every cached customer list page stale. Called after each
    /// customer mutation, successful deletes of nonexistent rows included.
    pub fn invalidate_customers(&self) {
        self.customers.invalidate_all();
    }

    /// Mark every cached product list page stale.
    pub fn invalidate_products(&self) {
        self.products.invalidate_all();
    }
}

impl Default for ListCache {
    fn default() -> Self {
        Self::new()
    }
}

fn build_cache<V>() -> Cache<ListKey, Arc<V>>
where
    V: Send + Sync + 'static,
{
    Cache::builder()
        .max_capacity(CACHE_CAPACITY)
        .time_to_live(CACHE_TTL)
        .build()
}
