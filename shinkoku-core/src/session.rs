//! Working state of one worksheet and its round trip through a store.
//!
//! A [`Session`] holds what the filer typed plus the selected mode and year.
//! Every read of derived figures goes through [`Session::recompute`], so the
//! session itself never caches a result.

use tracing::{debug, info, warn};

use crate::calculations::{ComputationResult, recompute, sum_monthly_sales};
use crate::db::{SessionStore, StoreError};
use crate::models::{
    CalculationContext, DataSnapshot, FieldId, FilingMode, RawInputs, SettingsSnapshot, TaxYear,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    raw: RawInputs,
    context: CalculationContext,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a session from persisted records; an absent record leaves the
    /// corresponding state at its default.
    pub fn from_snapshots(
        data: Option<DataSnapshot>,
        settings: Option<SettingsSnapshot>,
    ) -> Self {
        Self {
            raw: data.map(|data| data.to_raw()).unwrap_or_default(),
            context: settings
                .map(|settings| settings.to_context())
                .unwrap_or_default(),
        }
    }

    pub fn raw(&self) -> &RawInputs {
        &self.raw
    }

    pub fn context(&self) -> CalculationContext {
        self.context
    }

    pub fn set_field(
        &mut self,
        field: FieldId,
        value: impl Into<String>,
    ) {
        let value = value.into();
        debug!(field = %field, value = %value, "field edited");
        self.raw.set(field, value);
    }

    pub fn set_mode(
        &mut self,
        mode: FilingMode,
    ) {
        self.context.mode = mode;
    }

    pub fn set_year(
        &mut self,
        year: TaxYear,
    ) {
        self.context.year = year;
    }

    /// Replaces `inc-sales` with the sum of twelve monthly entries and
    /// returns that sum.
    pub fn apply_monthly_sales<S: AsRef<str>>(
        &mut self,
        months: &[S],
    ) -> i64 {
        let total = sum_monthly_sales(months);
        self.set_field(FieldId::IncSales, total.to_string());
        total
    }

    /// Back to an empty worksheet with default mode and year.
    pub fn reset(&mut self) {
        self.raw.clear();
        self.context = CalculationContext::default();
    }

    pub fn recompute(&self) -> ComputationResult {
        recompute(&self.raw, self.context)
    }

    pub fn data_snapshot(&self) -> DataSnapshot {
        DataSnapshot::from_raw(&self.raw)
    }

    pub fn settings_snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot::from_context(&self.context)
    }

    /// Restores a session from `store`.
    ///
    /// A record that cannot be decoded is treated as absent. Any other store
    /// failure is returned.
    pub async fn load(store: &dyn SessionStore) -> Result<Self, StoreError> {
        let data = absent_if_corrupt(store.load_data().await, "data")?;
        let settings = absent_if_corrupt(store.load_settings().await, "settings")?;

        let session = Self::from_snapshots(data, settings);
        info!(
            mode = session.context.mode.as_str(),
            year = session.context.year.as_str(),
            "session restored"
        );
        Ok(session)
    }

    /// Writes both records.
    pub async fn save(
        &self,
        store: &dyn SessionStore,
    ) -> Result<(), StoreError> {
        store.save_data(&self.data_snapshot()).await?;
        store.save_settings(&self.settings_snapshot()).await?;
        debug!("session saved");
        Ok(())
    }

    /// Clears the store and this session.
    pub async fn reset_store(
        &mut self,
        store: &dyn SessionStore,
    ) -> Result<(), StoreError> {
        store.clear().await?;
        self.reset();
        info!("session reset");
        Ok(())
    }
}

fn absent_if_corrupt<T>(
    loaded: Result<Option<T>, StoreError>,
    record: &str,
) -> Result<Option<T>, StoreError> {
    match loaded {
        Err(StoreError::Serialization(reason)) => {
            warn!(record, %reason, "discarding unreadable record");
            Ok(None)
        }
        other => other,
    }
}
