//! Income deductions (所得控除) and the taxable base.
//!
//! The deduction list always holds eight entries: the basic deduction followed
//! by the seven itemized deductions in report order. Every entry counts toward
//! the total; the report hides entries whose amount is not positive.
//!
//! # Basic deduction
//!
//! | Year | Income ≤ 1,320,000 | Otherwise |
//! |------|--------------------|-----------|
//! | 2024 | 480,000            | 480,000   |
//! | 2025 | 950,000            | 480,000   |
//!
//! # Example
//!
//! ```
//! use shinkoku_core::calculations::{BasicDeductionPolicy, DeductionWorksheet};
//! use shinkoku_core::{NormalizedInputs, TaxYear};
//!
//! let worksheet = DeductionWorksheet::new(BasicDeductionPolicy::for_year(TaxYear::Y2025));
//! let summary = worksheet.calculate(1_320_000, &NormalizedInputs::zeroed());
//!
//! assert_eq!(summary.basic_deduction, 950_000);
//! assert_eq!(summary.taxable_base, 370_000);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{FieldId, NormalizedInputs, TaxYear};

/// Report label of the basic deduction entry.
pub const BASIC_DEDUCTION_LABEL: &str = "基礎控除";

/// Basic-deduction rule for one filing year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicDeductionPolicy {
    /// Amount granted when no reduced-income tier applies.
    pub standard_amount: i64,

    /// Optional raised tier: `(income ceiling, amount)`. Applies when income
    /// is at or below the ceiling.
    pub low_income_tier: Option<(i64, i64)>,
}

impl BasicDeductionPolicy {
    pub const STANDARD_AMOUNT: i64 = 480_000;
    pub const LOW_INCOME_CEILING_2025: i64 = 1_320_000;
    pub const LOW_INCOME_AMOUNT_2025: i64 = 950_000;

    pub fn for_year(year: TaxYear) -> Self {
        match year {
            TaxYear::Y2024 => Self {
                standard_amount: Self::STANDARD_AMOUNT,
                low_income_tier: None,
            },
            TaxYear::Y2025 => Self {
                standard_amount: Self::STANDARD_AMOUNT,
                low_income_tier: Some((
                    Self::LOW_INCOME_CEILING_2025,
                    Self::LOW_INCOME_AMOUNT_2025,
                )),
            },
        }
    }

    /// Basic deduction granted for `income`.
    pub fn amount_for(
        &self,
        income: i64,
    ) -> i64 {
        match self.low_income_tier {
            Some((ceiling, amount)) if income <= ceiling => amount,
            _ => self.standard_amount,
        }
    }
}

/// One row of the deduction list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeductionEntry {
    /// Source field; `None` for the basic deduction.
    pub field: Option<FieldId>,
    pub label: &'static str,
    pub amount: i64,
}

impl DeductionEntry {
    /// Whether the report shows this entry.
    pub fn is_reported(&self) -> bool {
        self.amount > 0
    }
}

/// Result of the deduction step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeductionSummary {
    pub basic_deduction: i64,

    /// Basic deduction first, then the itemized deductions in report order.
    pub entries: Vec<DeductionEntry>,

    /// Sum of all eight entries.
    pub total_deductions: i64,

    /// `max(0, income - total_deductions)`.
    pub taxable_base: i64,
}

/// Calculator for the deduction list and taxable base.
#[derive(Debug, Clone)]
pub struct DeductionWorksheet {
    policy: BasicDeductionPolicy,
}

impl DeductionWorksheet {
    pub fn new(policy: BasicDeductionPolicy) -> Self {
        Self { policy }
    }

    /// Builds the deduction list for the income computed in the same recompute.
    pub fn calculate(
        &self,
        display_income: i64,
        inputs: &NormalizedInputs,
    ) -> DeductionSummary {
        let basic_deduction = self.policy.amount_for(display_income);

        let entries: Vec<DeductionEntry> = std::iter::once(DeductionEntry {
            field: None,
            label: BASIC_DEDUCTION_LABEL,
            amount: basic_deduction,
        })
        .chain(FieldId::ITEMIZED_DEDUCTIONS.iter().map(|field| DeductionEntry {
            field: Some(*field),
            label: field.report_label().unwrap_or(field.as_str()),
            amount: inputs.get(*field),
        }))
        .collect();

        let total_deductions = self.total_deductions(&entries);
        let taxable_base = self.taxable_base(display_income, total_deductions);

        DeductionSummary {
            basic_deduction,
            entries,
            total_deductions,
            taxable_base,
        }
    }

    fn total_deductions(
        &self,
        entries: &[DeductionEntry],
    ) -> i64 {
        entries
            .iter()
            .fold(0i64, |total, entry| total.saturating_add(entry.amount))
    }

    fn taxable_base(
        &self,
        display_income: i64,
        total_deductions: i64,
    ) -> i64 {
        let base = display_income.saturating_sub(total_deductions);
        if base < 0 {
            debug!(
                display_income,
                total_deductions, "deductions exceed income; taxable base floored at 0"
            );
        }
        base.max(0)
    }
}
