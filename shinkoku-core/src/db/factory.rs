use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::repository::{SessionStore, StoreError};

/// Backend-agnostic store configuration.
///
/// `backend` must match the [`StoreFactory::backend_name`] of a registered
/// factory. `connection_string` is handed to that factory as-is.
///
/// | backend    | connection_string examples          |
/// |------------|-------------------------------------|
/// | `sqlite`   | `shinkoku.db`, `:memory:`           |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"sqlite"`).
    pub backend: String,
    /// Opaque value forwarded to the factory's `create` method.
    pub connection_string: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        }
    }
}

/// One implementation per storage backend, registered with a
/// [`StoreRegistry`] at startup.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Opens (or creates) the backing storage and returns a ready store.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SessionStore>, StoreError>;
}

/// The backends a host can open, looked up by [`DbConfig::backend`].
#[derive(Default)]
pub struct StoreRegistry {
    factories: Vec<Box<dyn StoreFactory>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        factory: Box<dyn StoreFactory>,
    ) {
        self.factories.push(factory);
    }

    /// Opens a store with the factory named by `config.backend`.
    ///
    /// An unknown name is a [`StoreError::Configuration`]; factory errors are
    /// returned unchanged.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SessionStore>, StoreError> {
        match self
            .factories
            .iter()
            .find(|factory| factory.backend_name() == config.backend)
        {
            Some(factory) => factory.create(config).await,
            None => {
                let known: Vec<_> = self.factories.iter().map(|f| f.backend_name()).collect();
                Err(StoreError::Configuration(format!(
                    "unknown backend '{}'; available: {}",
                    config.backend,
                    known.join(", ")
                )))
            }
        }
    }
}
