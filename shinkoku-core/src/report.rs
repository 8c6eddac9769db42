//! The e-Tax transcription memo.
//!
//! The memo is meant to be copied verbatim next to the e-Tax filing screens,
//! so its layout is fixed: section order, headings, bullet style and the
//! conditions under which a line appears never vary for the same inputs.
//!
//! ```text
//! ## 【e-Tax 清書用メモ】 2024年分 (個人事業主)
//! 作成: 2025/2/16 | しんこくん
//!
//! ### 1. 収入・決算の入力
//! #### 事業所得の内訳 (決算書用)        ← business only
//! ...
//! #### 申告書への入力
//! ...
//! ### 2. 所得控除の入力
//! ...
//! ### 3. 税額控除・支払済み
//! ...
//! ---
//! *このメモは...*
//! ```

use chrono::NaiveDate;

use crate::calculations::ComputationResult;
use crate::calculations::common::format_amount;
use crate::models::{CalculationContext, FieldId};

/// Product name printed on the generation line.
pub const PRODUCT_NAME: &str = "しんこくん";

/// Closing line of every memo.
pub const DISCLAIMER: &str = "*このメモはブラウザの個人用データ(Local)に保存されています。*";

/// Japanese short date without zero padding, e.g. `2025/3/7`.
pub fn format_report_date(date: NaiveDate) -> String {
    date.format("%Y/%-m/%-d").to_string()
}

/// Renders the memo for `result` computed under `context`, dated `date`.
///
/// Pure: the same arguments always produce the same text.
pub fn to_report_text(
    result: &ComputationResult,
    context: &CalculationContext,
    date: NaiveDate,
) -> String {
    let inputs = &result.inputs;
    let mut lines = vec![
        format!(
            "## 【e-Tax 清書用メモ】 {}年分 ({}) ",
            context.year.as_str(),
            context.mode.display_name()
        ),
        format!("作成: {} | {}", format_report_date(date), PRODUCT_NAME),
        String::new(),
        "### 1. 収入・決算の入力".to_string(),
    ];

    if context.mode.is_business() {
        lines.push("#### 事業所得の内訳 (決算書用)".to_string());
        lines.push(format!(
            "- 売上金額合計: {} 円",
            format_amount(inputs.get(FieldId::IncSales))
        ));
        lines.push(format!("- **経費合計: {} 円**", format_amount(result.expenses.total)));
        lines.extend(result.expense_breakdown_lines.iter().cloned());
        lines.push(format!(
            "- 青色申告特別控除: {} 円",
            format_amount(inputs.get(FieldId::IncBlueDeduction))
        ));
        lines.push(String::new());
    }
    lines.push("#### 申告書への入力".to_string());
    lines.extend(result.income_lines.iter().cloned());
    lines.push(String::new());

    lines.push("### 2. 所得控除の入力".to_string());
    for entry in result.deductions.iter().filter(|entry| entry.is_reported()) {
        lines.push(format!("- {}: {} 円", entry.label, format_amount(entry.amount)));
    }
    lines.push(format!("**👉 控除の総額: {} 円**", format_amount(result.total_deductions)));
    lines.push(String::new());

    lines.push("### 3. 税額控除・支払済み".to_string());
    lines.push(format!(
        "- 源泉徴収税額: {} 円",
        format_amount(inputs.get(FieldId::TaxPaid))
    ));
    let home_loan = inputs.get(FieldId::TaxHomeLoan);
    if home_loan != 0 {
        lines.push(format!("- 住宅ローン控除: {} 円", format_amount(home_loan)));
    }
    lines.push(String::new());

    lines.push("---".to_string());
    lines.push(DISCLAIMER.to_string());
    lines.join("\n")
}
