use crate::domain::market_data::Price;
use crate::domain::trading::OpenPosition;

/// Formats a P&L amount with an explicit sign: `+1,234.50`, `-20.00`.
///
/// The amount is rounded to cents before the sign is picked, so tiny losses
/// that round to zero print as `+0.00`. Non-finite input degrades to zero.
pub fn format_signed_amount(value: f64) -> String {
    let cents = if value.is_finite() { (value * 100.0).round() } else { 0.0 };
    let sign = if cents >= 0.0 { '+' } else { '-' };
    format!("{sign}{}", group_thousands(cents.abs() / 100.0))
}

/// Formats a price with two decimals and thousands grouping
pub fn format_price(price: Price) -> String {
    let value = price.value();
    if value < 0.0 {
        format!("-{}", group_thousands(-value))
    } else {
        group_thousands(value)
    }
}

/// Formats a quantity without trailing zeros (`2`, `0.015`)
pub fn format_quantity(quantity: f64) -> String {
    let fixed = format!("{:.8}", quantity);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-0" { "0".to_string() } else { trimmed.to_string() }
}

/// Price-line title for a position: side, quantity and signed P&L
pub fn position_label(position: &OpenPosition, latest: Option<Price>) -> String {
    format!(
        "{} {} | P&L {}",
        position.side,
        format_quantity(position.quantity),
        format_signed_amount(position.unrealized_pnl(latest))
    )
}

fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0.0), "0.00");
        assert_eq!(group_thousands(999.994), "999.99");
        assert_eq!(group_thousands(1234.5), "1,234.50");
        assert_eq!(group_thousands(1_234_567.891), "1,234,567.89");
    }

    #[test]
    fn rounding_to_zero_is_not_a_loss() {
        assert_eq!(format_signed_amount(-0.004), "+0.00");
        assert_eq!(format_signed_amount(-0.006), "-0.01");
        assert_eq!(format_signed_amount(f64::NAN), "+0.00");
    }

    #[test]
    fn quantity_trims_zeros() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(0.015), "0.015");
        assert_eq!(format_quantity(0.0), "0");
    }
}
