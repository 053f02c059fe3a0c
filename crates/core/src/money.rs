//! Parsing and formatting of monetary amounts held as whole cents.

use crate::types::Cents;

/// Largest amount accepted from a form, in cents (one million).
pub const MAX_AMOUNT_CENTS: Cents = 100_000_000;

/// Parse a decimal amount such as `"9.99"`, `"12"` or `"0.5"` into cents.
///
/// At most two fractional digits are accepted. Negative values, exponents
/// and thousands separators are rejected.
pub fn parse_amount(raw: &str) -> Result<Cents, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Amount is required".to_string());
    }

    let (whole, frac) = match raw.split_once('.') {
        Some((w, f)) => (w, f),
        None => (raw, ""),
    };

    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !digits_only(whole) || !digits_only(frac) || (whole.is_empty() && frac.is_empty()) {
        return Err(format!("'{raw}' is not a valid amount"));
    }
    if frac.len() > 2 {
        return Err("Amounts have at most two decimal places".to_string());
    }

    let whole: Cents = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| format!("'{raw}' is not a valid amount"))?
    };
    let frac_cents: Cents = match frac.len() {
        0 => 0,
        1 => frac.parse::<Cents>().unwrap_or(0) * 10,
        _ => frac.parse::<Cents>().unwrap_or(0),
    };

    let cents = whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(frac_cents))
        .ok_or_else(|| "Amount is too large".to_string())?;

    if cents > MAX_AMOUNT_CENTS {
        return Err("Amount is too large".to_string());
    }
    Ok(cents)
}

/// Format cents as a plain decimal string, e.g. `1250` -> `"12.50"`.
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}
