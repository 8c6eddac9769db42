//! Parameters for the visual surface: the sales/expense balance beam, the
//! deduction flow and per-field highlight states.
//!
//! The balance beam only exists for business filers. It tilts toward the
//! heavier side by at most [`MAX_TILT_DEGREES`], measured against a reference
//! of at least [`MIN_SCALE_REFERENCE`] yen so small figures do not swing it
//! fully. Each pan carries up to [`MAX_BLOCKS`] blocks whose opacity fades by
//! [`BLOCK_FADE_STEP`] per block.

use serde::{Deserialize, Serialize};

use crate::calculations::ComputationResult;
use crate::models::{CalculationContext, FieldId};

pub const MIN_SCALE_REFERENCE: i64 = 1_000_000;
pub const MAX_TILT_DEGREES: f64 = 15.0;
pub const MAX_BLOCKS: usize = 10;
pub const BLOCK_FADE_STEP: f64 = 0.05;

/// One block in a pan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub opacity: f64,
}

/// A stack of blocks representing one side of the balance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockStack {
    pub amount: i64,
    pub blocks: Vec<Block>,
}

impl BlockStack {
    fn build(
        amount: i64,
        max_ref: i64,
    ) -> Self {
        let count = block_count(amount, max_ref);
        Self {
            amount,
            blocks: (0..count)
                .map(|i| Block {
                    opacity: 1.0 - i as f64 * BLOCK_FADE_STEP,
                })
                .collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.blocks.len()
    }
}

/// Sales vs. expenses balance beam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceScale {
    /// `max(1_000_000, sales, expenses)`.
    pub max_ref: i64,

    /// `(sales - expenses) / max_ref`, clamped to `[-1, 1]`.
    pub ratio: f64,

    /// Beam rotation in degrees; negative tilts toward the sales side.
    pub angle_deg: f64,

    pub income_stack: BlockStack,
    pub expense_stack: BlockStack,

    /// `max(0, sales - expenses)`, shown on the beam (before blue deduction).
    pub gross_profit: i64,

    /// Cost of goods as counted toward expenses.
    pub cogs_summary: i64,

    /// General expense total.
    pub other_expense_summary: i64,
}

/// Income → deductions → taxable base figures, shown in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionFlow {
    pub total_income: i64,
    pub basic_deduction: i64,
    pub total_deductions: i64,
    pub taxable_base: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightState {
    Highlighted,
    Dimmed,
}

/// Highlight flag for one input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldHighlight {
    pub field: FieldId,
    pub state: HighlightState,
}

/// Everything the visual surface needs after a recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualParams {
    /// `None` in employee mode.
    pub balance: Option<BalanceScale>,
    pub flow: DeductionFlow,
    /// One entry per field, in worksheet order.
    pub highlights: Vec<FieldHighlight>,
}

/// `min(10, ceil(amount / (max_ref / 10)))`; non-positive amounts get no blocks.
pub fn block_count(
    amount: i64,
    max_ref: i64,
) -> usize {
    let step = max_ref as f64 / MAX_BLOCKS as f64;
    let step = if step == 0.0 { 1.0 } else { step };
    let blocks = (amount as f64 / step).ceil();
    if blocks <= 0.0 {
        0
    } else {
        (blocks as usize).min(MAX_BLOCKS)
    }
}

/// Computes the balance beam from sales and the expense total.
pub fn balance_scale(result: &ComputationResult) -> BalanceScale {
    let sales = result.inputs.get(FieldId::IncSales);
    let expenses = result.expenses.total;

    let max_ref = MIN_SCALE_REFERENCE.max(sales).max(expenses);
    let ratio = ((sales as f64 - expenses as f64) / max_ref as f64).clamp(-1.0, 1.0);

    BalanceScale {
        max_ref,
        ratio,
        angle_deg: -ratio * MAX_TILT_DEGREES,
        income_stack: BlockStack::build(sales, max_ref),
        expense_stack: BlockStack::build(expenses, max_ref),
        gross_profit: sales.saturating_sub(expenses).max(0),
        cogs_summary: result.expenses.counted_cogs(),
        other_expense_summary: result.expenses.general_total,
    }
}

/// Maps a computation onto visual parameters.
pub fn to_visual_params(
    result: &ComputationResult,
    context: &CalculationContext,
) -> VisualParams {
    let balance = context.mode.is_business().then(|| balance_scale(result));

    let flow = DeductionFlow {
        total_income: result.display_income,
        basic_deduction: result.basic_deduction,
        total_deductions: result.total_deductions,
        taxable_base: result.taxable_base,
    };

    let highlights = result
        .inputs
        .iter()
        .map(|(field, value)| FieldHighlight {
            field,
            state: if value > 0 {
                HighlightState::Highlighted
            } else {
                HighlightState::Dimmed
            },
        })
        .collect();

    VisualParams {
        balance,
        flow,
        highlights,
    }
}
