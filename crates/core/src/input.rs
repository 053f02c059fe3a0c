//! Parsing of raw HTML form fields.
//!
//! Browsers submit every field as a string. Handlers keep the raw strings in
//! their form structs and convert them here, so a malformed number or date
//! becomes a [`CoreError::Validation`] with a message naming the field.

use chrono::{NaiveDate, NaiveTime};
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::money::parse_amount;
use crate::types::{Cents, DbId};

/// Maximum length of short free-text fields (names, titles, labels).
pub const MAX_TEXT_LENGTH: usize = 200;

/// Maximum length of long free-text fields (recommendation reasons, URLs).
pub const MAX_LONG_TEXT_LENGTH: usize = 1_000;

/// Longest accepted movie runtime in minutes.
pub const MAX_DURATION_MINS: i32 = 1_000;

/// Oldest accepted user age.
pub const MAX_AGE: i32 = 150;

/// Highest possible movie rating.
pub const MAX_RATING: f64 = 10.0;

fn invalid(msg: impl Into<String>) -> CoreError {
    CoreError::Validation(msg.into())
}

/// Parse a positive database id.
pub fn parse_id(field: &str, raw: &str) -> Result<DbId, CoreError> {
    match raw.trim().parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid(format!("{field} must be a positive whole number"))),
    }
}

/// Trim a required text field and enforce a maximum length.
pub fn required_text(field: &str, raw: &str, max_len: usize) -> Result<String, CoreError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(invalid(format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(invalid(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(value.to_string())
}

/// Parse an ISO date (`YYYY-MM-DD`), as produced by `<input type="date">`.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| invalid(format!("{field} must be a date in YYYY-MM-DD format")))
}

/// Parse a time of day as `HH:MM` or `HH:MM:SS`.
pub fn parse_time(field: &str, raw: &str) -> Result<NaiveTime, CoreError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| invalid(format!("{field} must be a time in HH:MM format")))
}

/// Parse a movie rating on the 0-10 scale.
pub fn parse_rating(raw: &str) -> Result<f64, CoreError> {
    match raw.trim().parse::<f64>() {
        Ok(r) if r.is_finite() && (0.0..=MAX_RATING).contains(&r) => Ok(r),
        _ => Err(invalid("Rating must be a number between 0 and 10")),
    }
}

/// Parse a movie runtime in minutes.
pub fn parse_duration(raw: &str) -> Result<i32, CoreError> {
    match raw.trim().parse::<i32>() {
        Ok(d) if d > 0 && d <= MAX_DURATION_MINS => Ok(d),
        _ => Err(invalid(format!(
            "Duration must be between 1 and {MAX_DURATION_MINS} minutes"
        ))),
    }
}

/// Parse an optional age. An empty field means "not given".
pub fn parse_age(raw: &str) -> Result<Option<i32>, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<i32>() {
        Ok(age) if (0..=MAX_AGE).contains(&age) => Ok(Some(age)),
        _ => Err(invalid(format!("Age must be between 0 and {MAX_AGE}"))),
    }
}

/// Parse a strictly positive count such as a showtime capacity.
pub fn parse_positive_int(field: &str, raw: &str) -> Result<i32, CoreError> {
    match raw.trim().parse::<i32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid(format!("{field} must be a positive whole number"))),
    }
}

/// Parse a price or payment amount into cents.
pub fn parse_price(field: &str, raw: &str) -> Result<Cents, CoreError> {
    parse_amount(raw).map_err(|e| invalid(format!("{field}: {e}")))
}

/// Parse an amount actually charged. Unlike a listed price it cannot be zero.
pub fn parse_payment(field: &str, raw: &str) -> Result<Cents, CoreError> {
    match parse_price(field, raw)? {
        cents if cents > 0 => Ok(cents),
        _ => Err(invalid(format!("{field} must be greater than zero"))),
    }
}

/// Validate and normalize an email address (trimmed, lowercased).
pub fn parse_email(raw: &str) -> Result<String, CoreError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(invalid("Email is required"));
    }
    if !email.validate_email() {
        return Err(invalid("Email address is not valid"));
    }
    Ok(email)
}

/// Apply `parse` to a field that may be left blank.
///
/// Edit forms use this: a blank field keeps the stored value.
pub fn optional<T, F>(raw: &str, parse: F) -> Result<Option<T>, CoreError>
where
    F: FnOnce(&str) -> Result<T, CoreError>,
{
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse(raw).map(Some)
    }
}

/// Parse a closed-set value (role, preference, ...) via its `FromStr`.
pub fn parse_choice<T>(raw: &str) -> Result<T, CoreError>
where
    T: std::str::FromStr<Err = String>,
{
    raw.parse::<T>().map_err(invalid)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::preference::Preference;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("movie_id", " 42 ").unwrap(), 42);
        assert_matches!(parse_id("movie_id", "0"), Err(CoreError::Validation(_)));
        assert_matches!(parse_id("movie_id", "abc"), Err(CoreError::Validation(_)));
        assert_matches!(parse_id("movie_id", "1; DROP TABLE"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn required_text_trims_and_limits() {
        assert_eq!(required_text("Title", "  Heat ", 10).unwrap(), "Heat");
        assert_matches!(required_text("Title", "   ", 10), Err(CoreError::Validation(m)) if m == "Title is required");
        assert_matches!(required_text("Title", "abcdefghijk", 10), Err(CoreError::Validation(_)));
    }

    #[test]
    fn dates_and_times() {
        assert_eq!(
            parse_date("Date", "2026-10-19").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        );
        assert!(parse_date("Date", "19/10/2026").is_err());
        assert_eq!(
            parse_time("Time", "19:30").unwrap(),
            NaiveTime::from_hms_opt(19, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time("Time", "07:05:09").unwrap(),
            NaiveTime::from_hms_opt(7, 5, 9).unwrap()
        );
        assert!(parse_time("Time", "25:00").is_err());
    }

    #[test]
    fn rating_bounds() {
        assert_eq!(parse_rating("8.5").unwrap(), 8.5);
        assert_eq!(parse_rating("0").unwrap(), 0.0);
        assert_eq!(parse_rating("10").unwrap(), 10.0);
        assert!(parse_rating("10.1").is_err());
        assert!(parse_rating("-1").is_err());
        assert!(parse_rating("NaN").is_err());
    }

    #[test]
    fn duration_and_age() {
        assert_eq!(parse_duration("120").unwrap(), 120);
        assert!(parse_duration("0").is_err());
        assert_eq!(parse_age("").unwrap(), None);
        assert_eq!(parse_age("30").unwrap(), Some(30));
        assert!(parse_age("200").is_err());
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(parse_email("  Ada@Example.COM ").unwrap(), "ada@example.com");
        assert!(parse_email("not-an-email").is_err());
        assert!(parse_email("").is_err());
    }

    #[test]
    fn prices_carry_the_field_name() {
        assert_eq!(parse_price("Price", "12.50").unwrap(), 1250);
        assert_matches!(parse_price("Price", "x"), Err(CoreError::Validation(m)) if m.starts_with("Price:"));
    }

    #[test]
    fn payments_must_be_positive() {
        assert_eq!(parse_payment("Amount", "9.99").unwrap(), 999);
        assert_matches!(
            parse_payment("Amount", "0"),
            Err(CoreError::Validation(m)) if m == "Amount must be greater than zero"
        );
        assert!(parse_payment("Amount", "0.00").is_err());
    }

    #[test]
    fn optional_skips_blank_fields() {
        assert_eq!(optional("  ", parse_duration).unwrap(), None);
        assert_eq!(optional("95", parse_duration).unwrap(), Some(95));
        assert!(optional("-3", parse_duration).is_err());
    }

    #[test]
    fn choices_use_from_str() {
        assert_eq!(parse_choice::<Preference>("cinema").unwrap(), Preference::Cinema);
        assert!(parse_choice::<Preference>("radio").is_err());
    }
}
