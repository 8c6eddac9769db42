//! The full recompute pass.
//!
//! Every edit to the worksheet runs the same pipeline from scratch:
//! normalize → expenses → income → deductions → progress. Nothing is carried
//! over from a previous pass, so calling [`recompute`] twice with the same
//! arguments yields equal results.

use serde::Serialize;
use tracing::debug;

use super::deductions::{BasicDeductionPolicy, DeductionEntry, DeductionWorksheet};
use super::expenses::{ExpenseSummary, aggregate_expenses};
use super::income::aggregate_income;
use super::normalize::normalize;
use super::progress::{ProgressSummary, track_progress};
use crate::models::{CalculationContext, NormalizedInputs, RawInputs};

/// Everything derived from one set of raw inputs under one context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputationResult {
    /// Normalized inputs, including the derived expense total.
    pub inputs: NormalizedInputs,

    pub display_income: i64,

    /// Business profit floored at zero; `None` in employee mode.
    pub business_profit: Option<i64>,

    /// General total, unfloored cost of goods and expense total.
    pub expenses: ExpenseSummary,

    pub basic_deduction: i64,

    /// Basic deduction followed by the seven itemized deductions.
    pub deductions: Vec<DeductionEntry>,

    pub total_deductions: i64,

    /// `max(0, display_income - total_deductions)`.
    pub taxable_base: i64,

    pub income_lines: Vec<String>,

    pub expense_breakdown_lines: Vec<String>,

    pub progress: ProgressSummary,
}

impl ComputationResult {
    pub fn progress_ratio(&self) -> f64 {
        self.progress.ratio
    }
}

/// Recomputes the worksheet from raw inputs.
///
/// # Example
///
/// ```
/// use shinkoku_core::calculations::recompute;
/// use shinkoku_core::{CalculationContext, FieldId, FilingMode, RawInputs, TaxYear};
///
/// let raw: RawInputs = [
///     (FieldId::IncSales, "5000000"),
///     (FieldId::ExpRent, "1200000"),
///     (FieldId::ExpPurchase, "300000"),
///     (FieldId::IncBlueDeduction, "650000"),
/// ]
/// .into_iter()
/// .collect();
///
/// let result = recompute(&raw, CalculationContext::new(FilingMode::Business, TaxYear::Y2024));
///
/// assert_eq!(result.expenses.total, 1_500_000);
/// assert_eq!(result.display_income, 2_850_000);
/// assert_eq!(result.taxable_base, 2_370_000);
/// ```
pub fn recompute(
    raw: &RawInputs,
    context: CalculationContext,
) -> ComputationResult {
    let mut inputs = normalize(raw);
    let expenses = aggregate_expenses(&mut inputs);
    let income = aggregate_income(context.mode, &inputs);
    let deductions = DeductionWorksheet::new(BasicDeductionPolicy::for_year(context.year))
        .calculate(income.display_income, &inputs);
    let progress = track_progress(context.mode, &inputs);

    debug!(
        mode = context.mode.as_str(),
        year = context.year.as_str(),
        display_income = income.display_income,
        expense_total = expenses.total,
        total_deductions = deductions.total_deductions,
        taxable_base = deductions.taxable_base,
        progress = progress.ratio,
        "recomputed worksheet"
    );

    ComputationResult {
        inputs,
        display_income: income.display_income,
        business_profit: income.business_profit,
        expenses,
        basic_deduction: deductions.basic_deduction,
        deductions: deductions.entries,
        total_deductions: deductions.total_deductions,
        taxable_base: deductions.taxable_base,
        income_lines: income.income_lines,
        expense_breakdown_lines: income.expense_breakdown_lines,
        progress,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{FieldId, FilingMode, TaxYear};

    fn business_2024() -> CalculationContext {
        CalculationContext::new(FilingMode::Business, TaxYear::Y2024)
    }

    fn raw(values: &[(FieldId, &str)]) -> RawInputs {
        values.iter().map(|(field, value)| (*field, *value)).collect()
    }

    #[test]
    fn business_scenario_matches_worked_example() {
        let raw = raw(&[
            (FieldId::IncSales, "5000000"),
            (FieldId::ExpSupplies, "200000"),
            (FieldId::ExpRent, "1000000"),
            (FieldId::ExpStockStart, "100000"),
            (FieldId::ExpPurchase, "400000"),
            (FieldId::ExpStockEnd, "200000"),
            (FieldId::IncBlueDeduction, "650000"),
        ]);

        let result = recompute(&raw, business_2024());

        assert_eq!(result.expenses.general_total, 1200000);
        assert_eq!(result.expenses.cogs, 300000);
        assert_eq!(result.expenses.total, 1500000);
        assert_eq!(result.inputs.expenses(), 1500000);
        assert_eq!(result.business_profit, Some(2850000));
        assert_eq!(result.display_income, 2850000);
        assert_eq!(result.total_deductions, 480000);
        assert_eq!(result.taxable_base, 2370000);
    }

    #[test]
    fn recompute_is_idempotent() {
        let raw = raw(&[(FieldId::IncSalary, "4500000"), (FieldId::DedSocial, "650000")]);
        let context = CalculationContext::default();

        let first = recompute(&raw, context);
        let second = recompute(&raw, context);

        assert_eq!(first, second);
    }

    #[test]
    fn floors_hold_when_everything_is_a_loss() {
        let raw = raw(&[
            (FieldId::IncSales, "100"),
            (FieldId::ExpTravel, "900000"),
            (FieldId::DedSocial, "5000000"),
        ]);

        let result = recompute(&raw, business_2024());

        assert_eq!(result.business_profit, Some(0));
        assert_eq!(result.taxable_base, 0);
    }

    #[test]
    fn basic_deduction_follows_year_and_current_income() {
        let at_ceiling = raw(&[(FieldId::IncSalary, "1320000")]);
        let above_ceiling = raw(&[(FieldId::IncSalary, "1320001")]);
        let y2025 = CalculationContext::new(FilingMode::Employee, TaxYear::Y2025);

        assert_eq!(recompute(&at_ceiling, y2025).basic_deduction, 950000);
        assert_eq!(recompute(&above_ceiling, y2025).basic_deduction, 480000);
        assert_eq!(
            recompute(&at_ceiling, CalculationContext::default()).basic_deduction,
            480000
        );
    }

    #[test]
    fn mode_switch_changes_income_but_keeps_inputs() {
        let raw = raw(&[(FieldId::IncSalary, "3000000"), (FieldId::IncSales, "800000")]);

        let employee = recompute(&raw, CalculationContext::default());
        let business = recompute(&raw, business_2024());

        assert_eq!(employee.display_income, 3000000);
        assert_eq!(business.display_income, 800000);
        assert_eq!(employee.inputs, business.inputs);
    }

    #[test]
    fn garbage_input_behaves_as_zero() {
        let garbage = raw(&[(FieldId::IncSalary, "lots"), (FieldId::TaxPaid, "")]);

        let result = recompute(&garbage, CalculationContext::default());

        assert_eq!(result, recompute(&RawInputs::new(), CalculationContext::default()));
    }
}
