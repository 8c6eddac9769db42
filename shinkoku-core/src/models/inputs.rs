use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::FieldId;

/// Free-text values as typed into the worksheet, keyed by field.
///
/// A field that was never touched is simply absent; it normalizes to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawInputs {
    values: BTreeMap<FieldId, String>,
}

impl RawInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(
        &mut self,
        field: FieldId,
        value: impl Into<String>,
    ) {
        self.values.insert(field, value.into());
    }

    pub fn get(
        &self,
        field: FieldId,
    ) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(FieldId, S)> for RawInputs {
    fn from_iter<I: IntoIterator<Item = (FieldId, S)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(field, value)| (field, value.into()))
                .collect(),
        }
    }
}

/// Integer value for every entered field, plus the derived expense total.
///
/// Built by [`crate::calculations::normalize`]; the expense total is written
/// only by the expense aggregation step of a recompute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedInputs {
    values: [i64; FieldId::COUNT],
    expenses: i64,
}

impl NormalizedInputs {
    /// A record with every field at zero.
    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        field: FieldId,
    ) -> i64 {
        self.values[field.index()]
    }

    pub(crate) fn set(
        &mut self,
        field: FieldId,
        value: i64,
    ) {
        self.values[field.index()] = value;
    }

    /// The derived `inc-expenses` value.
    pub fn expenses(&self) -> i64 {
        self.expenses
    }

    pub(crate) fn set_expenses(
        &mut self,
        total: i64,
    ) {
        self.expenses = total;
    }

    /// Saturating sum of the given fields.
    pub fn sum(
        &self,
        fields: &[FieldId],
    ) -> i64 {
        fields
            .iter()
            .fold(0i64, |total, field| total.saturating_add(self.get(*field)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, i64)> + '_ {
        FieldId::ALL.iter().map(|field| (*field, self.get(*field)))
    }
}
