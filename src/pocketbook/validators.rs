//! Field validators.
//!
//! Pure functions over primitive text. They know nothing about records and can
//! be used on their own, e.g. to check input before building a value object.
//!
//! | Field    | Accepted shape                                           |
//! |----------|----------------------------------------------------------|
//! | phone    | optional `+`, then 10-15 digits; spaces, `-`, `(`, `)` ignored |
//! | email    | `local@domain.tld`, tld of 2+ letters                    |
//! | birthday | `YYYY-MM-DD`, not after today                            |

use crate::error::ValidationError;
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const PHONE_MIN_DIGITS: usize = 10;
pub const PHONE_MAX_DIGITS: usize = 15;

static PHONE_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-()]").unwrap());

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^\+?\d{{{},{}}}$",
        PHONE_MIN_DIGITS, PHONE_MAX_DIGITS
    ))
    .unwrap()
});

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Strips the separators people type inside phone numbers.
pub fn normalize_phone(text: &str) -> String {
    PHONE_SEPARATORS.replace_all(text.trim(), "").into_owned()
}

/// Accepts `+380501234567`, `380501234567`, `050 123-45-67`, `(050) 1234567`.
pub fn validate_phone(text: &str) -> bool {
    PHONE_RE.is_match(&normalize_phone(text))
}

pub fn validate_email(text: &str) -> bool {
    EMAIL_RE.is_match(text.trim())
}

/// Parses a birthday and rejects dates after the local current date.
pub fn validate_birthday(text: &str) -> Result<NaiveDate, ValidationError> {
    validate_birthday_on(text, Local::now().date_naive())
}

/// Same as [`validate_birthday`] against an explicit `today`.
pub fn validate_birthday_on(text: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let trimmed = text.trim();
    let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::DateFormat(trimmed.to_string()))?;
    if date > today {
        return Err(ValidationError::FutureDate(trimmed.to_string()));
    }
    Ok(date)
}
