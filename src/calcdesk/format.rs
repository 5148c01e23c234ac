//! Number formatting for calculator displays.
//!
//! Both engines round to 15 significant digits before showing a value so that
//! binary floating point noise (`0.1 + 0.2`) never reaches the display or gets
//! fed back into a chained calculation.

/// Significant digits kept by every displayed result.
pub const SIGNIFICANT_DIGITS: usize = 15;

/// Round `value` to `digits` significant digits.
///
/// ```rust
/// use calcdesk::format::round_significant;
///
/// assert_eq!(round_significant(0.1 + 0.2, 15), 0.3);
/// ```
pub fn round_significant(value: f64, digits: usize) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let precision = digits.max(1) - 1;
    // round in decimal through the `{:e}` mantissa
    format!("{:.*e}", precision, value)
        .parse::<f64>()
        .unwrap_or(value)
}

/// Format a basic-calculator number.
///
/// Mirrors how a browser prints a number after `toPrecision(15)`: shortest
/// digits, plain notation between `1e-6` and `1e21`, exponent notation
/// outside that range, and no negative zero.
pub fn format_number(value: f64) -> String {
    let rounded = round_significant(value, SIGNIFICANT_DIGITS);
    if rounded == 0.0 {
        return "0".to_string();
    }
    let magnitude = rounded.abs();
    if (1e-6..1e21).contains(&magnitude) {
        format!("{}", rounded)
    } else {
        exponent_form(rounded)
    }
}

/// Format a scientific-calculator result.
///
/// Uses plain notation while the decimal exponent lies in `[-3, 5)` and
/// scientific notation otherwise, so `1024` stays `1024` while `123456`
/// becomes `1.23456e+5`.
pub fn format_result(value: f64) -> String {
    let rounded = round_significant(value, SIGNIFICANT_DIGITS);
    if rounded == 0.0 {
        return "0".to_string();
    }
    let exponent = decimal_exponent(rounded);
    if (-3..5).contains(&exponent) {
        format!("{}", rounded)
    } else {
        exponent_form(rounded)
    }
}

fn decimal_exponent(value: f64) -> i32 {
    let formatted = format!("{:e}", value);
    formatted
        .split_once('e')
        .and_then(|(_, exp)| exp.parse::<i32>().ok())
        .unwrap_or(0)
}

fn exponent_form(value: f64) -> String {
    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exp)) if exp.starts_with('-') => format!("{}e{}", mantissa, exp),
        Some((mantissa, exp)) => format!("{}e+{}", mantissa, exp),
        None => formatted,
    }
}
