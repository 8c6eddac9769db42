//! Worksheet calculations.
//!
//! Each step is a pure function over the normalized record plus the
//! calculation context; [`recompute`] runs them in order.

pub mod common;
pub mod deductions;
pub mod engine;
pub mod expenses;
pub mod income;
pub mod normalize;
pub mod progress;

pub use deductions::{
    BASIC_DEDUCTION_LABEL, BasicDeductionPolicy, DeductionEntry, DeductionSummary,
    DeductionWorksheet,
};
pub use engine::{ComputationResult, recompute};
pub use expenses::{ExpenseSummary, aggregate_expenses};
pub use income::{IncomeSummary, aggregate_income};
pub use normalize::{normalize, parse_amount, sum_monthly_sales};
pub use progress::{ProgressSummary, active_fields, track_progress};
