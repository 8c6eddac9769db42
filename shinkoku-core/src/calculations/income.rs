//! Income aggregation for both filing modes.
//!
//! * Employee: income is the salary figure as entered.
//! * Business: income is `max(0, sales - expenses - blue deduction)`.
//!
//! Both modes then add miscellaneous and dividend income. Alongside the
//! figure, this step produces the income lines of the report and, for business
//! filers, the itemized expense breakdown.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::common::format_amount;
use crate::models::{FieldId, FilingMode, NormalizedInputs};

/// Result of income aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IncomeSummary {
    /// Income carried into the deduction step.
    pub display_income: i64,

    /// Business profit after expenses and blue deduction, floored at zero.
    /// `None` for employee filers.
    pub business_profit: Option<i64>,

    /// Report lines for the filing-input section, in order.
    pub income_lines: Vec<String>,

    /// One line per non-zero general expense category (business only).
    pub expense_breakdown_lines: Vec<String>,
}

/// Aggregates income for `mode`.
///
/// Expects the derived expense total to be present in `inputs` already.
pub fn aggregate_income(
    mode: FilingMode,
    inputs: &NormalizedInputs,
) -> IncomeSummary {
    let mut summary = match mode {
        FilingMode::Employee => employee_income(inputs),
        FilingMode::Business => business_income(inputs),
    };

    let misc = inputs.get(FieldId::IncMisc);
    let dividend = inputs.get(FieldId::IncDividend);
    summary.display_income = summary
        .display_income
        .saturating_add(misc)
        .saturating_add(dividend);

    if misc != 0 {
        summary
            .income_lines
            .push(format!("- 雑所得(副業等): {} 円", format_amount(misc)));
    }
    if dividend != 0 {
        summary
            .income_lines
            .push(format!("- 配当所得: {} 円", format_amount(dividend)));
    }

    summary
}

fn employee_income(inputs: &NormalizedInputs) -> IncomeSummary {
    let salary = inputs.get(FieldId::IncSalary);
    IncomeSummary {
        display_income: salary,
        business_profit: None,
        income_lines: vec![format!("- 給与の収入金額: {} 円", format_amount(salary))],
        expense_breakdown_lines: Vec::new(),
    }
}

fn business_income(inputs: &NormalizedInputs) -> IncomeSummary {
    let sales = inputs.get(FieldId::IncSales);
    let expenses = inputs.expenses();
    let blue = inputs.get(FieldId::IncBlueDeduction);

    let margin = sales.saturating_sub(expenses).saturating_sub(blue);
    if margin < 0 {
        debug!(sales, expenses, blue, "business result is a loss; profit floored at 0");
    }
    let profit = margin.max(0);

    IncomeSummary {
        display_income: profit,
        business_profit: Some(profit),
        income_lines: vec![format!(
            "- 事業所得: {} 円 (売上 {} - 経費 {} - 青色控除 {})",
            format_amount(profit),
            format_amount(sales),
            format_amount(expenses),
            format_amount(blue),
        )],
        expense_breakdown_lines: expense_breakdown(inputs),
    }
}

fn expense_breakdown(inputs: &NormalizedInputs) -> Vec<String> {
    FieldId::GENERAL_EXPENSES
        .iter()
        .filter_map(|field| {
            let amount = inputs.get(*field);
            let label = field.report_label()?;
            (amount != 0).then(|| format!("  - {label}: {} 円", format_amount(amount)))
        })
        .collect()
}
