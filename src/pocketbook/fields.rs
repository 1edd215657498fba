//! Value objects.
//!
//! Every field a record carries is wrapped in one of these types. Construction
//! is the only place validation happens, so holding a `Phone` means holding a
//! valid phone number. Deserialization goes through the same constructors
//! (`serde(try_from = "String")`), which keeps hand-edited or stale snapshot
//! files from producing invalid values.

use crate::error::ValidationError;
use crate::validators::{self, DATE_FORMAT};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self(value.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Separators are stripped, so `050 123-45-67` is stored as `0501234567`.
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        if !validators::validate_phone(value) {
            return Err(ValidationError::InvalidPhone(value.trim().to_string()));
        }
        Ok(Self(validators::normalize_phone(value)))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if !validators::validate_email(value) {
            return Err(ValidationError::InvalidEmail(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::EmptyAddress);
        }
        Ok(Self(value.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Birthday(NaiveDate);

impl Birthday {
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        validators::validate_birthday(value).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn value(&self) -> String {
        self.0.format(DATE_FORMAT).to_string()
    }
}

/// A note label. Stored lowercase without the `#` marker, displayed with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    pub const MARKER: char = '#';

    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let normalized = Self::normalize(value);
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidTag(value.trim().to_string()));
        }
        Ok(Self(normalized))
    }

    /// The comparison form of arbitrary tag text: trimmed, unmarked, lowercase.
    pub fn normalize(value: &str) -> String {
        let trimmed = value.trim();
        trimmed
            .strip_prefix(Self::MARKER)
            .unwrap_or(trimmed)
            .trim()
            .to_lowercase()
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, text: &str) -> bool {
        self.0 == Self::normalize(text)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::MARKER, self.0)
    }
}

// serde glue: every value object round-trips through its plain string form.

impl TryFrom<String> for Name {
    type Error = ValidationError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl TryFrom<String> for Phone {
    type Error = ValidationError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl TryFrom<String> for Email {
    type Error = ValidationError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl TryFrom<String> for Address {
    type Error = ValidationError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl TryFrom<String> for Birthday {
    type Error = ValidationError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl TryFrom<String> for Tag {
    type Error = ValidationError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Name> for String {
    fn from(value: Name) -> Self {
        value.0
    }
}

impl From<Phone> for String {
    fn from(value: Phone) -> Self {
        value.0
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

impl From<Birthday> for String {
    fn from(value: Birthday) -> Self {
        value.value()
    }
}

impl From<Tag> for String {
    fn from(value: Tag) -> Self {
        value.0
    }
}
