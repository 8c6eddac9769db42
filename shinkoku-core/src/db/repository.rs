use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DataSnapshot, SettingsSnapshot};

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Durable home of the two session records.
///
/// The data record holds the raw field strings, the settings record holds
/// mode and year. Loads return `Ok(None)` when a record was never saved;
/// a record that exists but cannot be decoded is a
/// [`StoreError::Serialization`].
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load_data(&self) -> Result<Option<DataSnapshot>, StoreError>;
    async fn load_settings(&self) -> Result<Option<SettingsSnapshot>, StoreError>;

    async fn save_data(
        &self,
        data: &DataSnapshot,
    ) -> Result<(), StoreError>;

    async fn save_settings(
        &self,
        settings: &SettingsSnapshot,
    ) -> Result<(), StoreError>;

    /// Removes both records.
    async fn clear(&self) -> Result<(), StoreError>;
}
