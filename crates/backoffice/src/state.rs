//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::assets::AssetStore;
use crate::cache::ListCache;
use crate::config::BackofficeConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration. Requests
/// share no other mutable state; every read and mutation is independent.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BackofficeConfig,
    pool: PgPool,
    assets: AssetStore,
    cache: ListCache,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Back office configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: BackofficeConfig, pool: PgPool) -> Self {
        let assets = AssetStore::new(config.asset_root.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                assets,
                cache: ListCache::new(),
            }),
        }
    }

    /// Get a reference to the back office configuration.
    #[must_use]
    pub fn config(&self) -> &BackofficeConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the uploaded-asset store.
    #[must_use]
    pub fn assets(&self) -> &AssetStore {
        &self.inner.assets
    }

    /// Get a reference to the list view cache.
    #[must_use]
    pub fn cache(&self) -> &ListCache {
        &self.inner.cache
    }
}
