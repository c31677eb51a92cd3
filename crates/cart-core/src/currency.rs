//! # ZAR Currency Utilities
//!
//! South African Rand formatting and parsing.
//! Formatting never fails: invalid input renders as the zero string.

/// The formatted zero amount, also the fallback for invalid input
pub const ZERO_ZAR: &str = "R 0.00";

/// Format an amount as South African Rand, e.g. `R 1,234.56`.
///
/// Non-finite input (NaN, infinity) formats as `R 0.00` rather than
/// propagating an error; display code must never crash on bad data.
pub fn format_zar(amount: f64) -> String {
    if !amount.is_finite() {
        return ZERO_ZAR.to_string();
    }

    let cents = (amount * 100.0).round() as i64;
    let negative = cents < 0;
    let cents = cents.abs();

    let rands = cents / 100;
    let fraction = cents % 100;

    let mut grouped = String::new();
    let digits = rands.to_string();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}R {}.{:02}", sign, grouped, fraction)
}

/// Format a numeric string as ZAR; unparseable input yields `R 0.00`
pub fn format_zar_str(amount: &str) -> String {
    format_zar(parse_zar(amount))
}

/// Best-effort inverse of [`format_zar`].
///
/// Strips the rand symbol, spaces and thousands separators before
/// parsing. Returns `0.0` on unparseable input, never errors.
pub fn parse_zar(s: &str) -> f64 {
    let clean: String = s
        .chars()
        .filter(|c| !matches!(c, 'R' | 'r' | ',' | ' ' | '\u{a0}'))
        .collect();
    clean.trim().parse::<f64>().unwrap_or(0.0)
}

/// Convert a rand amount to cents (gateways take amounts in cents)
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Convert cents back to a rand amount
pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Round a rand amount to two decimal places
pub fn round_to_cents(amount: f64) -> f64 {
    from_cents(to_cents(amount))
}
