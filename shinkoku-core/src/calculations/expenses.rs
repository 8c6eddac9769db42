//! Business expense aggregation.
//!
//! | Quantity        | Derivation                                           |
//! |-----------------|------------------------------------------------------|
//! | general total   | supplies + travel + comm + rent + other + entert     |
//! | cost of goods   | opening stock + purchases - closing stock            |
//! | expense total   | general total + max(0, cost of goods)                |
//!
//! Cost of goods may come out negative (closing stock above opening stock plus
//! purchases). It is reported as-is but contributes nothing to the total.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{FieldId, NormalizedInputs};

/// Result of expense aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpenseSummary {
    /// Sum of the six general expense categories.
    pub general_total: i64,

    /// Opening stock + purchases - closing stock, unfloored.
    pub cogs: i64,

    /// `general_total + max(0, cogs)`; the value of the derived `inc-expenses` field.
    pub total: i64,
}

impl ExpenseSummary {
    /// Cost of goods as it counts toward the total.
    pub fn counted_cogs(&self) -> i64 {
        self.cogs.max(0)
    }
}

/// Aggregates expenses and writes the total into the derived expense slot.
pub fn aggregate_expenses(inputs: &mut NormalizedInputs) -> ExpenseSummary {
    let general_total = inputs.sum(&FieldId::GENERAL_EXPENSES);
    let cogs = cost_of_goods(inputs);

    if cogs < 0 {
        debug!(cogs, "cost of goods is negative; not counted toward expenses");
    }

    let mut summary = ExpenseSummary {
        general_total,
        cogs,
        total: 0,
    };
    summary.total = general_total.saturating_add(summary.counted_cogs());
    inputs.set_expenses(summary.total);
    summary
}

fn cost_of_goods(inputs: &NormalizedInputs) -> i64 {
    inputs
        .get(FieldId::ExpStockStart)
        .saturating_add(inputs.get(FieldId::ExpPurchase))
        .saturating_sub(inputs.get(FieldId::ExpStockEnd))
}
