use async_trait::async_trait;
use shinkoku_core::db::{DbConfig, SessionStore, StoreError, StoreFactory};
use tracing::info;

use crate::repository::SqliteSessionStore;

/// [`StoreFactory`] for SQLite.
///
/// Register this with a [`shinkoku_core::db::StoreRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use shinkoku_core::db::StoreRegistry;
/// use shinkoku_db_sqlite::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens the database named by `config.connection_string` and brings its
    /// schema up to date.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SessionStore>, StoreError> {
        let store = SqliteSessionStore::new(&config.connection_string).await?;
        store.run_migrations().await?;
        info!(database = %config.connection_string, "sqlite store ready");
        Ok(Box::new(store))
    }
}
