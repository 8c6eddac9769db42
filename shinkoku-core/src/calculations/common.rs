//! Formatting shared by the report and the line builders.

/// Renders an amount with `,` thousands grouping, e.g. `1234567` → `1,234,567`.
///
/// Negative amounts keep a leading minus sign (`-1,234`).
///
/// # Examples
///
/// ```
/// use shinkoku_core::calculations::common::format_amount;
///
/// assert_eq!(format_amount(0), "0");
/// assert_eq!(format_amount(950000), "950,000");
/// assert_eq!(format_amount(-1234), "-1,234");
/// ```
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        grouped.push('-');
    }
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn format_amount_leaves_short_values_alone() {
        assert_eq!(format_amount(7), "7");
        assert_eq!(format_amount(999), "999");
    }

    #[test]
    fn format_amount_groups_by_thousands() {
        assert_eq!(format_amount(1000), "1,000");
        assert_eq!(format_amount(1320000), "1,320,000");
        assert_eq!(format_amount(12345678), "12,345,678");
    }

    #[test]
    fn format_amount_keeps_sign_outside_grouping() {
        assert_eq!(format_amount(-500), "-500");
        assert_eq!(format_amount(-123456), "-123,456");
    }

    #[test]
    fn format_amount_handles_extremes() {
        assert_eq!(format_amount(i64::MAX), "9,223,372,036,854,775,807");
        assert_eq!(format_amount(i64::MIN), "-9,223,372,036,854,775,808");
    }
}
