//! Turns free-text field values into integers.
//!
//! Malformed input is the only error class the worksheet knows, and it is
//! never surfaced: anything that does not start with an integer reads as zero.

use tracing::trace;

use crate::models::{FieldId, NormalizedInputs, RawInputs};

/// Parses the leading base-10 integer of `text`.
///
/// Leading whitespace is skipped and a single `+` or `-` sign is honoured.
/// Parsing stops at the first non-digit, so `"12abc"` reads as `12` and
/// `"1,000"` as `1`. Text without leading digits reads as `0`. Values that do
/// not fit in `i64` saturate.
///
/// # Examples
///
/// ```
/// use shinkoku_core::calculations::parse_amount;
///
/// assert_eq!(parse_amount("480000"), 480000);
/// assert_eq!(parse_amount("  -250"), -250);
/// assert_eq!(parse_amount("12.9"), 12);
/// assert_eq!(parse_amount("abc"), 0);
/// assert_eq!(parse_amount(""), 0);
/// ```
pub fn parse_amount(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut saw_digit = false;
    for digit in unsigned.bytes().take_while(u8::is_ascii_digit) {
        saw_digit = true;
        let digit = i64::from(digit - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }

    if !saw_digit && !text.is_empty() {
        trace!(input = %text, "non-numeric field value; reading as 0");
    }
    value
}

/// Normalizes every entered field. Missing fields read as zero.
///
/// The derived expense total is left at zero; it is filled in by the expense
/// aggregation step.
pub fn normalize(raw: &RawInputs) -> NormalizedInputs {
    let mut inputs = NormalizedInputs::zeroed();
    for field in FieldId::ALL {
        if let Some(text) = raw.get(field) {
            inputs.set(field, parse_amount(text));
        }
    }
    inputs
}

/// Sums a month-by-month sales sheet using the same parsing rule as the
/// worksheet fields.
///
/// # Examples
///
/// ```
/// use shinkoku_core::calculations::sum_monthly_sales;
///
/// assert_eq!(sum_monthly_sales(&["100000", "", "250000", "n/a"]), 350000);
/// ```
pub fn sum_monthly_sales<S: AsRef<str>>(months: &[S]) -> i64 {
    months
        .iter()
        .fold(0i64, |total, month| total.saturating_add(parse_amount(month.as_ref())))
}
