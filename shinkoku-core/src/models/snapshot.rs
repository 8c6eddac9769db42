//! Shapes of the two records a durable store keeps for a worksheet.
//!
//! The store owns these records; the engine only needs to rebuild its working
//! state from them. Both are plain JSON objects so that any key-value backend
//! can hold them as text.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{CalculationContext, DERIVED_EXPENSES_KEY, FieldId, FilingMode, RawInputs, TaxYear};

/// Store key of the field-value record.
pub const DATA_RECORD_KEY: &str = "shinkokunData";

/// Store key of the mode/year record.
pub const SETTINGS_RECORD_KEY: &str = "shinkokunSettings";

/// Field id → raw text, exactly as entered.
///
/// Decoding is per key: numbers are kept as their JSON text, `null` is
/// treated as absent, and any other non-string value drops only that key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DataSnapshot(pub BTreeMap<String, String>);

impl<'de> Deserialize<'de> for DataSnapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(Self(
            values
                .into_iter()
                .filter_map(|(key, value)| match value {
                    Value::String(text) => Some((key, text)),
                    Value::Number(number) => Some((key, number.to_string())),
                    Value::Null => None,
                    other => {
                        warn!(key = %key, value = %other, "dropping non-text persisted value");
                        None
                    }
                })
                .collect(),
        ))
    }
}

impl DataSnapshot {
    /// Captures every entered field; untouched fields are written as `""`.
    pub fn from_raw(raw: &RawInputs) -> Self {
        Self(
            FieldId::ALL
                .iter()
                .map(|field| {
                    (
                        field.as_str().to_string(),
                        raw.get(*field).unwrap_or_default().to_string(),
                    )
                })
                .collect(),
        )
    }

    /// Rebuilds raw inputs, ignoring keys that are not entered fields.
    pub fn to_raw(&self) -> RawInputs {
        let mut raw = RawInputs::new();
        for (key, value) in &self.0 {
            match FieldId::parse(key) {
                Some(field) => raw.set(field, value.clone()),
                None if key == DERIVED_EXPENSES_KEY => {
                    debug!("ignoring persisted derived expense total");
                }
                None => debug!(key = %key, "ignoring unknown persisted field"),
            }
        }
        raw
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// `{mode, year}` as last selected.
///
/// Values are kept as text so an unrecognised selection degrades to the
/// default instead of making the whole record unreadable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

impl SettingsSnapshot {
    pub fn from_context(context: &CalculationContext) -> Self {
        Self {
            mode: Some(context.mode.as_str().to_string()),
            year: Some(context.year.as_str().to_string()),
        }
    }

    /// Resolves the stored selection, falling back to the defaults for
    /// missing or unrecognised values.
    pub fn to_context(&self) -> CalculationContext {
        let mode = match self.mode.as_deref() {
            None | Some("") => FilingMode::default(),
            Some(text) => FilingMode::parse(text).unwrap_or_else(|| {
                warn!(mode = %text, "unrecognised persisted mode; using default");
                FilingMode::default()
            }),
        };
        let year = match self.year.as_deref() {
            None | Some("") => TaxYear::default(),
            Some(text) => TaxYear::parse(text).unwrap_or_else(|| {
                warn!(year = %text, "unrecognised persisted year; using default");
                TaxYear::default()
            }),
        };
        CalculationContext::new(mode, year)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn data_snapshot_writes_every_field() {
        let mut raw = RawInputs::new();
        raw.set(FieldId::IncSalary, "4000000");

        let snapshot = DataSnapshot::from_raw(&raw);

        assert_eq!(snapshot.0.len(), FieldId::COUNT);
        assert_eq!(snapshot.0["inc-salary"], "4000000");
        assert_eq!(snapshot.0["tax-paid"], "");
    }

    #[test]
    fn data_snapshot_drops_derived_and_unknown_keys() {
        let snapshot = DataSnapshot::from_json(
            r#"{"inc-sales":"900","inc-expenses":"123","legacy-field":"1"}"#,
        )
        .unwrap();

        let raw = snapshot.to_raw();

        assert_eq!(raw.iter().collect::<Vec<_>>(), vec![(FieldId::IncSales, "900")]);
    }

    #[test]
    fn data_snapshot_decodes_each_value_on_its_own() {
        let snapshot = DataSnapshot::from_json(
            r#"{"inc-sales":5000,"ded-life":null,"exp-rent":[1],"tax-paid":"100"}"#,
        )
        .unwrap();

        let raw = snapshot.to_raw();

        assert_eq!(raw.get(FieldId::IncSales), Some("5000"));
        assert_eq!(raw.get(FieldId::TaxPaid), Some("100"));
        assert_eq!(raw.get(FieldId::DedLife), None);
        assert_eq!(raw.get(FieldId::ExpRent), None);
    }

    #[test]
    fn data_snapshot_that_is_not_an_object_is_an_error() {
        assert!(DataSnapshot::from_json(r#"["inc-sales"]"#).is_err());
    }

    #[test]
    fn settings_snapshot_missing_keys_use_defaults() {
        let snapshot = SettingsSnapshot::from_json("{}").unwrap();

        assert_eq!(snapshot.to_context(), CalculationContext::default());
    }

    #[test]
    fn settings_snapshot_unknown_values_use_defaults() {
        let snapshot = SettingsSnapshot {
            mode: Some("freelance".to_string()),
            year: Some("2025".to_string()),
        };

        let context = snapshot.to_context();

        assert_eq!(context.mode, FilingMode::Employee);
        assert_eq!(context.year, TaxYear::Y2025);
    }

    #[test]
    fn settings_snapshot_uses_flat_record_shape() {
        let context = CalculationContext::new(FilingMode::Business, TaxYear::Y2025);

        let json = SettingsSnapshot::from_context(&context).to_json().unwrap();

        assert_eq!(json, r#"{"mode":"business","year":"2025"}"#);
    }
}
