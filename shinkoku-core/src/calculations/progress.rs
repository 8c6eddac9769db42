//! Completion progress of the worksheet.
//!
//! Progress counts the active fields holding a non-zero value, over one less
//! than the number of active fields. The blue-deduction field never earns
//! credit because it usually holds its standard amount from the start, and the
//! denominator is reduced by one to account for it. Filling every field that
//! can earn credit therefore lands exactly on 1.0 in business mode; in employee
//! mode the ratio is capped at 1.0.

use serde::{Deserialize, Serialize};

use crate::models::{FieldGroup, FieldId, FilingMode, NormalizedInputs};

/// Progress through the active part of the worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// Number of fields relevant to the current mode.
    pub active_fields: usize,

    /// Active fields with a non-zero value, excluding the blue deduction.
    pub filled_fields: usize,

    /// `min(1.0, filled / (active - 1))`.
    pub ratio: f64,
}

/// Fields relevant to `mode`, in worksheet order.
pub fn active_fields(mode: FilingMode) -> Vec<FieldId> {
    FieldId::ALL
        .iter()
        .copied()
        .filter(|field| match mode {
            FilingMode::Employee => !is_business_only(*field),
            FilingMode::Business => *field != FieldId::IncSalary,
        })
        .collect()
}

fn is_business_only(field: FieldId) -> bool {
    matches!(field, FieldId::IncSales | FieldId::IncBlueDeduction)
        || field.group() == FieldGroup::Expense
}

/// Measures progress for `mode` over normalized values.
pub fn track_progress(
    mode: FilingMode,
    inputs: &NormalizedInputs,
) -> ProgressSummary {
    let active = active_fields(mode);
    let filled = active
        .iter()
        .filter(|field| **field != FieldId::IncBlueDeduction && inputs.get(**field) != 0)
        .count();

    // The active set is never smaller than 12, so the guard only keeps the
    // division total.
    let denominator = active.len().saturating_sub(1).max(1);
    let ratio = (filled as f64 / denominator as f64).min(1.0);

    ProgressSummary {
        active_fields: active.len(),
        filled_fields: filled,
        ratio,
    }
}
