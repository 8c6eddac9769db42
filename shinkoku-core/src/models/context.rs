use serde::{Deserialize, Serialize};

use super::{FilingMode, TaxYear};

/// Mode and year a recompute runs under.
///
/// Callers own the current context and pass it into every computation; the
/// engine keeps no ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CalculationContext {
    pub mode: FilingMode,
    pub year: TaxYear,
}

impl CalculationContext {
    pub fn new(
        mode: FilingMode,
        year: TaxYear,
    ) -> Self {
        Self { mode, year }
    }
}
