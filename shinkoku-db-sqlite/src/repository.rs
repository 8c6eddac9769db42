use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use shinkoku_core::{
    DATA_RECORD_KEY, DataSnapshot, SETTINGS_RECORD_KEY, SessionStore, SettingsSnapshot,
    StoreError,
};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

/// Session records kept in a single SQLite key-value table.
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    /// Opens `database_url`, creating the file if needed.
    ///
    /// Accepts a bare path (`shinkoku.db`), a `sqlite:` URL or `:memory:`.
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StoreError::Configuration(e.to_string()))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn read_record(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT value FROM records WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(|row| {
            row.try_get("value")
                .map_err(|e| StoreError::Database(e.to_string()))
        })
        .transpose()
    }

    async fn write_record(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO records (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        debug!(key, bytes = value.len(), "record written");
        Ok(())
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn load_data(&self) -> Result<Option<DataSnapshot>, StoreError> {
        match self.read_record(DATA_RECORD_KEY).await? {
            Some(json) => Ok(Some(DataSnapshot::from_json(&json)?)),
            None => Ok(None),
        }
    }

    async fn load_settings(&self) -> Result<Option<SettingsSnapshot>, StoreError> {
        match self.read_record(SETTINGS_RECORD_KEY).await? {
            Some(json) => Ok(Some(SettingsSnapshot::from_json(&json)?)),
            None => Ok(None),
        }
    }

    async fn save_data(
        &self,
        data: &DataSnapshot,
    ) -> Result<(), StoreError> {
        self.write_record(DATA_RECORD_KEY, &data.to_json()?).await
    }

    async fn save_settings(
        &self,
        settings: &SettingsSnapshot,
    ) -> Result<(), StoreError> {
        self.write_record(SETTINGS_RECORD_KEY, &settings.to_json()?)
            .await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM records WHERE key IN (?, ?)")
            .bind(DATA_RECORD_KEY)
            .bind(SETTINGS_RECORD_KEY)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use shinkoku_core::{CalculationContext, FieldId, FilingMode, RawInputs, TaxYear};

    use super::*;

    async fn setup_test_db() -> SqliteSessionStore {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let store = SqliteSessionStore::new_with_pool(pool).await;
        store
            .run_migrations()
            .await
            .expect("Failed to run migrations");
        store
    }

    async fn insert_raw_record(
        store: &SqliteSessionStore,
        key: &str,
        value: &str,
    ) {
        sqlx::query("INSERT INTO records (key, value, updated_at) VALUES (?, ?, '2025-01-01T00:00:00Z')")
            .bind(key)
            .bind(value)
            .execute(store.pool())
            .await
            .expect("Failed to insert record");
    }

    async fn record_count(store: &SqliteSessionStore) -> i64 {
        sqlx::query("SELECT COUNT(*) AS n FROM records")
            .fetch_one(store.pool())
            .await
            .expect("Failed to count records")
            .get("n")
    }

    // =========================================================================
    // load tests
    // =========================================================================

    #[tokio::test]
    async fn empty_store_has_no_records() {
        let store = setup_test_db().await;

        assert_eq!(store.load_data().await, Ok(None));
        assert_eq!(store.load_settings().await, Ok(None));
    }

    #[tokio::test]
    async fn corrupt_record_is_a_serialization_error() {
        let store = setup_test_db().await;
        insert_raw_record(&store, DATA_RECORD_KEY, "[1, 2").await;

        let result = store.load_data().await;

        assert!(
            matches!(result, Err(StoreError::Serialization(_))),
            "got {result:?}"
        );
    }

    #[tokio::test]
    async fn reads_records_written_by_other_hosts() {
        let store = setup_test_db().await;
        insert_raw_record(
            &store,
            DATA_RECORD_KEY,
            r#"{"inc-salary":"5000000","inc-expenses":"42"}"#,
        )
        .await;
        insert_raw_record(&store, SETTINGS_RECORD_KEY, r#"{"mode":"employee"}"#).await;

        let data = store.load_data().await.unwrap().unwrap();
        let settings = store.load_settings().await.unwrap().unwrap();

        assert_eq!(data.to_raw().get(FieldId::IncSalary), Some("5000000"));
        assert_eq!(settings.to_context(), CalculationContext::default());
    }

    // =========================================================================
    // save tests
    // =========================================================================

    #[tokio::test]
    async fn save_overwrites_previous_record() {
        let store = setup_test_db().await;
        let mut raw = RawInputs::new();
        raw.set(FieldId::IncSales, "100");
        store.save_data(&DataSnapshot::from_raw(&raw)).await.unwrap();

        raw.set(FieldId::IncSales, "200");
        store.save_data(&DataSnapshot::from_raw(&raw)).await.unwrap();
        let loaded = store.load_data().await.unwrap().unwrap();

        assert_eq!(loaded.to_raw().get(FieldId::IncSales), Some("200"));
        assert_eq!(record_count(&store).await, 1);
        let updated_at: String = sqlx::query("SELECT updated_at FROM records WHERE key = ?")
            .bind(DATA_RECORD_KEY)
            .fetch_one(store.pool())
            .await
            .expect("Failed to read updated_at")
            .get("updated_at");
        assert!(chrono::DateTime::parse_from_rfc3339(&updated_at).is_ok());
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let store = setup_test_db().await;
        let context = CalculationContext::new(FilingMode::Business, TaxYear::Y2025);

        store
            .save_settings(&SettingsSnapshot::from_context(&context))
            .await
            .unwrap();
        let loaded = store.load_settings().await.unwrap().unwrap();

        assert_eq!(loaded.to_context(), context);
    }

    #[tokio::test]
    async fn clear_removes_only_session_records() {
        let store = setup_test_db().await;
        store.save_data(&DataSnapshot::default()).await.unwrap();
        store
            .save_settings(&SettingsSnapshot::default())
            .await
            .unwrap();
        insert_raw_record(&store, "unrelated", "{}").await;

        store.clear().await.unwrap();

        assert_eq!(store.load_data().await, Ok(None));
        assert_eq!(store.load_settings().await, Ok(None));
        assert_eq!(record_count(&store).await, 1);
    }
}
