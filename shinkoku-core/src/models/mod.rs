mod context;
mod field_id;
mod filing_mode;
mod inputs;
mod snapshot;
mod tax_year;

pub use context::CalculationContext;
pub use field_id::{DERIVED_EXPENSES_KEY, FieldGroup, FieldId};
pub use filing_mode::FilingMode;
pub use inputs::{NormalizedInputs, RawInputs};
pub use snapshot::{DATA_RECORD_KEY, DataSnapshot, SETTINGS_RECORD_KEY, SettingsSnapshot};
pub use tax_year::TaxYear;
