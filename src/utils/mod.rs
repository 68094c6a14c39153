//! Utility functions for formatting money and percentages
//!
//! Centralised so that tables, detail views and confirmations all render
//! amounts the same way.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    /// Include "$" prefix
    Usd,
    /// No currency symbol (for table cells, calculations display)
    None,
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Core formatting function with full control over output.
///
/// Formats a Decimal value using US conventions: `,` thousands separator,
/// `.` decimal separator, two decimal places (half away from zero), sign
/// before the currency symbol.
///
/// # Examples
/// ```
/// use investo::utils::{format_currency_with_width, CurrencySymbol};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234.56), 0, CurrencySymbol::Usd),
///     "$1,234.56"
/// );
///
/// assert_eq!(
///     format_currency_with_width(dec!(-1234), 12, CurrencySymbol::None),
///     "   -1,234.00"
/// );
/// ```
pub fn format_currency_with_width(value: Decimal, width: usize, symbol: CurrencySymbol) -> String {
    let rounded = round_cents(value);
    let is_negative = rounded < Decimal::ZERO;

    let formatted = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let digits: Vec<char> = integer_part.chars().collect();
    let mut with_separators = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            with_separators.push(',');
        }
        with_separators.push(*c);
    }

    let sign = if is_negative { "-" } else { "" };
    let prefix = match symbol {
        CurrencySymbol::Usd => "$",
        CurrencySymbol::None => "",
    };

    let result = format!("{}{}{}.{}", sign, prefix, with_separators, decimal_part);

    if width > 0 && result.len() < width {
        format!("{:>width$}", result, width = width)
    } else {
        result
    }
}

/// Format as dollars: "$1,234.56"
///
/// # Examples
/// ```
/// use investo::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1787.2)), "$1,787.20");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::Usd)
}

/// Dollars right-aligned to `width`
pub fn format_currency_aligned(value: Decimal, width: usize) -> String {
    format_currency_with_width(value, width, CurrencySymbol::Usd)
}

/// Dollars with an explicit `+` on gains: "+$200.00", "-$12.50"
pub fn format_signed_currency(value: Decimal) -> String {
    let formatted = format_currency(value);
    if round_cents(value) > Decimal::ZERO {
        format!("+{}", formatted)
    } else {
        formatted
    }
}

/// Percentage with two decimals: "20.00%"
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", round_cents(value))
}

/// Percentage with an explicit `+` on gains: "+20.00%"
pub fn format_signed_percent(value: Decimal) -> String {
    let rounded = round_cents(value);
    if rounded > Decimal::ZERO {
        format!("+{:.2}%", rounded)
    } else {
        format!("{:.2}%", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_basic() {
        assert_eq!(format_currency(dec!(1234.56)), "$1,234.56");
        assert_eq!(format_currency(dec!(0.99)), "$0.99");
        assert_eq!(format_currency(dec!(1000000)), "$1,000,000.00");
    }

    #[test]
    fn test_format_currency_small_values() {
        assert_eq!(format_currency(dec!(0)), "$0.00");
        assert_eq!(format_currency(dec!(0.01)), "$0.01");
        assert_eq!(format_currency(dec!(12)), "$12.00");
        assert_eq!(format_currency(dec!(999.99)), "$999.99");
    }

    #[test]
    fn test_format_currency_large_values() {
        assert_eq!(format_currency(dec!(1000)), "$1,000.00");
        assert_eq!(format_currency(dec!(123456)), "$123,456.00");
        assert_eq!(format_currency(dec!(12345678.90)), "$12,345,678.90");
        assert_eq!(format_currency(dec!(2800000000000)), "$2,800,000,000,000.00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-1234.56)), "-$1,234.56");
        assert_eq!(format_currency(dec!(-0.01)), "-$0.01");
        // Rounds to zero, so no sign
        assert_eq!(format_currency(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(format_currency(dec!(93.3333333)), "$93.33");
        assert_eq!(format_currency(dec!(1.005)), "$1.01");
        assert_eq!(format_currency(dec!(-1.005)), "-$1.01");
    }

    #[test]
    fn test_format_with_width() {
        let result = format_currency_aligned(dec!(100), 12);
        assert_eq!(result, "     $100.00");

        let result = format_currency_aligned(dec!(1000000), 5);
        assert_eq!(result, "$1,000,000.00");
    }

    #[test]
    fn test_signed_formats() {
        assert_eq!(format_signed_currency(dec!(200)), "+$200.00");
        assert_eq!(format_signed_currency(dec!(-12.5)), "-$12.50");
        assert_eq!(format_signed_currency(dec!(0)), "$0.00");
        assert_eq!(format_percent(dec!(20)), "20.00%");
        assert_eq!(format_signed_percent(dec!(20)), "+20.00%");
        assert_eq!(format_signed_percent(dec!(-3.456)), "-3.46%");
    }
}
