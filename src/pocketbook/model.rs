//! # Records
//!
//! The two record kinds kept by pocketbook: [`ContactRecord`] and [`NoteRecord`].
//! Both are identified by their [`Name`], which is also their key inside a
//! [`Book`](crate::book::Book).
//!
//! ## Mutation
//!
//! Records are changed only through named operations. Each operation either
//! succeeds and bumps `updated_at`, or fails validation and leaves the record
//! exactly as it was. "Not found" outcomes (removing a phone the contact does
//! not have, editing an email that is not there) are plain return values, not
//! errors.
//!
//! `updated_at` never moves backwards, even if the wall clock does.
//!
//! ## Snapshot Shapes
//!
//! Records are read back from disk through all-optional "shape" structs
//! ([`ContactShape`], [`NoteShape`]). Restoring from a shape copies every
//! field that is present and valid and defaults the rest, reporting whether
//! anything had to be filled in or dropped. This is how snapshots written by
//! older versions (missing fields, different validation rules) keep loading.

use crate::error::ValidationError;
use crate::fields::{Address, Birthday, Email, Name, Phone, Tag};
use crate::validators::normalize_phone;
use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};

/// Outcome of an `edit_*` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Updated,
    NotFound,
}

/// A record rebuilt from a snapshot shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Restored<R> {
    pub record: R,
    /// True when a field was missing or invalid and had to be defaulted.
    pub migrated: bool,
}

/// Behavior shared by everything a [`Book`](crate::book::Book) can hold.
pub trait Record: Clone + Serialize {
    /// The lenient on-disk form used for migration.
    type Shape: DeserializeOwned + HasName;

    /// Human label for the record kind, used in messages and logs.
    const KIND: &'static str;

    fn name(&self) -> &Name;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;

    /// Case-insensitive substring match; `query` must already be lowercase.
    fn matches(&self, query: &str) -> bool;

    fn rename(&mut self, new_name: &str) -> Result<(), ValidationError>;

    /// Rebuild a record stored under `key`. Returns `None` when not even a
    /// name can be recovered.
    fn restore(key: &str, shape: Self::Shape) -> Option<Restored<Self>>;
}

fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous)
}

fn contains_lower(haystack: &str, query: &str) -> bool {
    haystack.to_lowercase().contains(query)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactRecord {
    name: Name,
    phones: Vec<Phone>,
    emails: Vec<Email>,
    address: Option<Address>,
    birthday: Option<Birthday>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ContactRecord {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let now = Utc::now();
        Ok(Self {
            name: Name::new(name)?,
            phones: Vec::new(),
            emails: Vec::new(),
            address: None,
            birthday: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    pub fn emails(&self) -> &[Email] {
        &self.emails
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn birthday(&self) -> Option<&Birthday> {
        self.birthday.as_ref()
    }

    fn touch(&mut self) {
        self.updated_at = next_timestamp(self.updated_at);
    }

    fn phone_position(&self, phone: &str) -> Option<usize> {
        let wanted = normalize_phone(phone);
        self.phones.iter().position(|p| p.value() == wanted)
    }

    fn email_position(&self, email: &str) -> Option<usize> {
        let wanted = email.trim();
        self.emails.iter().position(|e| e.value() == wanted)
    }

    pub fn add_phone(&mut self, phone: &str) -> Result<(), ValidationError> {
        let phone = Phone::new(phone)?;
        if self.phones.contains(&phone) {
            return Err(ValidationError::Duplicate(phone.to_string()));
        }
        self.phones.push(phone);
        self.touch();
        Ok(())
    }

    pub fn remove_phone(&mut self, phone: &str) -> bool {
        match self.phone_position(phone) {
            Some(i) => {
                self.phones.remove(i);
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn edit_phone(&mut self, old: &str, new: &str) -> Result<Edit, ValidationError> {
        let Some(i) = self.phone_position(old) else {
            return Ok(Edit::NotFound);
        };
        let phone = Phone::new(new)?;
        if self
            .phones
            .iter()
            .enumerate()
            .any(|(j, p)| j != i && *p == phone)
        {
            return Err(ValidationError::Duplicate(phone.to_string()));
        }
        self.phones[i] = phone;
        self.touch();
        Ok(Edit::Updated)
    }

    pub fn add_email(&mut self, email: &str) -> Result<(), ValidationError> {
        let email = Email::new(email)?;
        if self.emails.contains(&email) {
            return Err(ValidationError::Duplicate(email.to_string()));
        }
        self.emails.push(email);
        self.touch();
        Ok(())
    }

    pub fn remove_email(&mut self, email: &str) -> bool {
        match self.email_position(email) {
            Some(i) => {
                self.emails.remove(i);
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn edit_email(&mut self, old: &str, new: &str) -> Result<Edit, ValidationError> {
        let Some(i) = self.email_position(old) else {
            return Ok(Edit::NotFound);
        };
        let email = Email::new(new)?;
        if self
            .emails
            .iter()
            .enumerate()
            .any(|(j, e)| j != i && *e == email)
        {
            return Err(ValidationError::Duplicate(email.to_string()));
        }
        self.emails[i] = email;
        self.touch();
        Ok(Edit::Updated)
    }

    pub fn set_address(&mut self, address: &str) -> Result<(), ValidationError> {
        self.address = Some(Address::new(address)?);
        self.touch();
        Ok(())
    }

    /// Returns false if there was no address to clear.
    pub fn clear_address(&mut self) -> bool {
        if self.address.take().is_none() {
            return false;
        }
        self.touch();
        true
    }

    pub fn set_birthday(&mut self, birthday: &str) -> Result<(), ValidationError> {
        self.birthday = Some(Birthday::new(birthday)?);
        self.touch();
        Ok(())
    }

    pub fn clear_birthday(&mut self) -> bool {
        if self.birthday.take().is_none() {
            return false;
        }
        self.touch();
        true
    }

    /// Renames the record itself. Inside a book, use
    /// [`Book::rename`](crate::book::Book::rename) so the key moves too.
    pub fn rename(&mut self, new_name: &str) -> Result<(), ValidationError> {
        self.name = Name::new(new_name)?;
        self.touch();
        Ok(())
    }

    /// Days until the next anniversary of the birthday, 0 when it is today.
    pub fn days_to_birthday(&self) -> Option<i64> {
        self.days_to_birthday_from(Local::now().date_naive())
    }

    pub fn days_to_birthday_from(&self, today: NaiveDate) -> Option<i64> {
        let born = self.birthday?.date();
        let mut next = anniversary(born, today.year())?;
        if next < today {
            next = anniversary(born, today.year() + 1)?;
        }
        Some((next - today).num_days())
    }
}

/// The birthday's month/day in `year`. Feb 29 falls back to Feb 28.
fn anniversary(born: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, born.month(), born.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
}

impl Record for ContactRecord {
    type Shape = ContactShape;
    const KIND: &'static str = "contact";

    fn name(&self) -> &Name {
        &self.name
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn matches(&self, query: &str) -> bool {
        contains_lower(self.name.value(), query)
            || self.phones.iter().any(|p| contains_lower(p.value(), query))
            || self.emails.iter().any(|e| contains_lower(e.value(), query))
            || self
                .address
                .as_ref()
                .is_some_and(|a| contains_lower(a.value(), query))
            || self
                .birthday
                .is_some_and(|b| contains_lower(&b.to_string(), query))
    }

    fn rename(&mut self, new_name: &str) -> Result<(), ValidationError> {
        ContactRecord::rename(self, new_name)
    }

    fn restore(key: &str, shape: ContactShape) -> Option<Restored<Self>> {
        let mut migrated = false;
        let name = restore_name(key, shape.name, &mut migrated)?;
        let phones = restore_list(shape.phones, Phone::new, &mut migrated);
        let emails = restore_list(shape.emails, Email::new, &mut migrated);
        let address = restore_optional(shape.address, Address::new, &mut migrated);
        let birthday = restore_optional(shape.birthday, Birthday::new, &mut migrated);
        let (created_at, updated_at) =
            restore_timestamps(shape.created_at, shape.updated_at, &mut migrated);

        Some(Restored {
            record: Self {
                name,
                phones,
                emails,
                address,
                birthday,
                created_at,
                updated_at,
            },
            migrated,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteRecord {
    name: Name,
    content: String,
    tags: Vec<Tag>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NoteRecord {
    pub fn new(name: &str, content: &str) -> Result<Self, ValidationError> {
        let now = Utc::now();
        Ok(Self {
            name: Name::new(name)?,
            content: content.to_string(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.matches(tag))
    }

    fn touch(&mut self) {
        self.updated_at = next_timestamp(self.updated_at);
    }

    /// Returns `Ok(false)` without touching the note if the tag is already
    /// present (case-insensitively).
    pub fn add_tag(&mut self, tag: &str) -> Result<bool, ValidationError> {
        let tag = Tag::new(tag)?;
        if self.tags.contains(&tag) {
            return Ok(false);
        }
        self.tags.push(tag);
        self.touch();
        Ok(true)
    }

    /// Accepts both `#tag` and `tag`.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|t| t.matches(tag)) {
            Some(i) => {
                self.tags.remove(i);
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Removes every tag, returning how many were dropped.
    pub fn clear_tags(&mut self) -> usize {
        let count = self.tags.len();
        if count > 0 {
            self.tags.clear();
            self.touch();
        }
        count
    }

    pub fn edit_content(&mut self, content: &str) {
        self.content = content.to_string();
        self.touch();
    }

    pub fn rename(&mut self, new_name: &str) -> Result<(), ValidationError> {
        self.name = Name::new(new_name)?;
        self.touch();
        Ok(())
    }
}

impl Record for NoteRecord {
    type Shape = NoteShape;
    const KIND: &'static str = "note";

    fn name(&self) -> &Name {
        &self.name
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn matches(&self, query: &str) -> bool {
        contains_lower(self.name.value(), query) || contains_lower(&self.content, query)
    }

    fn rename(&mut self, new_name: &str) -> Result<(), ValidationError> {
        NoteRecord::rename(self, new_name)
    }

    fn restore(key: &str, shape: NoteShape) -> Option<Restored<Self>> {
        let mut migrated = false;
        let name = restore_name(key, shape.name, &mut migrated)?;
        let content = shape.content.unwrap_or_else(|| {
            migrated = true;
            String::new()
        });
        let tags = restore_list(shape.tags, Tag::new, &mut migrated);
        let (created_at, updated_at) =
            restore_timestamps(shape.created_at, shape.updated_at, &mut migrated);

        Some(Restored {
            record: Self {
                name,
                content,
                tags,
                created_at,
                updated_at,
            },
            migrated,
        })
    }
}

// --- Snapshot shapes ---

/// Every contact field as found on disk, each one possibly absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactShape {
    pub name: Option<String>,
    pub phones: Option<Vec<String>>,
    pub emails: Option<Vec<String>>,
    #[serde(deserialize_with = "present")]
    pub address: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub birthday: Option<Option<String>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NoteShape {
    pub name: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// Distinguishes a missing field (outer None) from an explicit null (Some(None)).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn restore_name(key: &str, stored: Option<String>, migrated: &mut bool) -> Option<Name> {
    if let Some(name) = stored.as_deref().and_then(|n| Name::new(n).ok()) {
        return Some(name);
    }
    *migrated = true;
    Name::new(key).ok()
}

fn restore_list<T: PartialEq>(
    stored: Option<Vec<String>>,
    build: fn(&str) -> Result<T, ValidationError>,
    migrated: &mut bool,
) -> Vec<T> {
    let Some(raw) = stored else {
        *migrated = true;
        return Vec::new();
    };
    let mut values: Vec<T> = Vec::with_capacity(raw.len());
    for item in raw {
        match build(&item) {
            Ok(value) if !values.contains(&value) => values.push(value),
            _ => *migrated = true,
        }
    }
    values
}

fn restore_optional<T>(
    stored: Option<Option<String>>,
    build: fn(&str) -> Result<T, ValidationError>,
    migrated: &mut bool,
) -> Option<T> {
    match stored {
        None => {
            *migrated = true;
            None
        }
        Some(None) => None,
        Some(Some(raw)) => build(&raw).ok().or_else(|| {
            *migrated = true;
            None
        }),
    }
}

fn restore_timestamps(
    created: Option<DateTime<Utc>>,
    updated: Option<DateTime<Utc>>,
    migrated: &mut bool,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let created = created.unwrap_or_else(|| {
        *migrated = true;
        Utc::now()
    });
    let updated = match updated {
        Some(updated) if updated >= created => updated,
        _ => {
            *migrated = true;
            created
        }
    };
    (created, updated)
}

fn deserialize_record<'de, R, D>(deserializer: D) -> Result<R, D::Error>
where
    R: Record,
    D: Deserializer<'de>,
{
    let shape = R::Shape::deserialize(deserializer)?;
    let key = shape
        .stored_name()
        .ok_or_else(|| <D::Error as de::Error>::missing_field("name"))?;
    R::restore(&key, shape)
        .map(|restored| restored.record)
        .ok_or_else(|| {
            <D::Error as de::Error>::custom(format!("{} without a usable name", R::KIND))
        })
}

/// Shapes that may carry their own name.
pub trait HasName {
    fn stored_name(&self) -> Option<String>;
}

impl HasName for ContactShape {
    fn stored_name(&self) -> Option<String> {
        self.name.clone()
    }
}

impl HasName for NoteShape {
    fn stored_name(&self) -> Option<String> {
        self.name.clone()
    }
}

impl<'de> Deserialize<'de> for ContactRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_record(deserializer)
    }
}

impl<'de> Deserialize<'de> for NoteRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_record(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn contact_born(date: &str) -> ContactRecord {
        let mut contact = ContactRecord::new("Alice").unwrap();
        contact.set_birthday(date).unwrap();
        contact
    }

    #[test]
    fn test_new_contact_is_empty() {
        let contact = ContactRecord::new("Alice").unwrap();
        assert_eq!(contact.name().value(), "Alice");
        assert!(contact.phones().is_empty());
        assert!(contact.emails().is_empty());
        assert!(contact.address().is_none());
        assert!(contact.birthday().is_none());
        assert_eq!(contact.created_at(), contact.updated_at());
    }

    #[test]
    fn test_new_contact_rejects_empty_name() {
        assert_eq!(ContactRecord::new(" "), Err(ValidationError::EmptyName));
    }

    #[test]
    fn test_add_phone_and_duplicate_policy() {
        let mut contact = ContactRecord::new("Alice").unwrap();
        contact.add_phone("0501234567").unwrap();
        assert_eq!(contact.phones()[0].value(), "0501234567");

        let before = contact.clone();
        assert_eq!(
            contact.add_phone("050-123-45-67"),
            Err(ValidationError::Duplicate("0501234567".to_string()))
        );
        assert_eq!(contact, before);
    }

    #[test]
    fn test_invalid_phone_leaves_record_unchanged() {
        let mut contact = ContactRecord::new("Alice").unwrap();
        let before = contact.clone();
        assert!(contact.add_phone("123").is_err());
        assert_eq!(contact, before);
    }

    #[test]
    fn test_remove_phone() {
        let mut contact = ContactRecord::new("Alice").unwrap();
        contact.add_phone("0501234567").unwrap();
        assert!(!contact.remove_phone("0999999999"));
        assert!(contact.remove_phone("0501234567"));
        assert!(contact.phones().is_empty());
    }

    #[test]
    fn test_edit_phone() {
        let mut contact = ContactRecord::new("Alice").unwrap();
        contact.add_phone("0501234567").unwrap();
        contact.add_phone("0671234567").unwrap();

        assert_eq!(contact.edit_phone("0000000000", "0931234567"), Ok(Edit::NotFound));
        assert_eq!(contact.edit_phone("0501234567", "0931234567"), Ok(Edit::Updated));
        assert_eq!(contact.phones()[0].value(), "0931234567");
        assert_eq!(contact.phones()[1].value(), "0671234567");
    }

    #[test]
    fn test_edit_phone_failures_leave_record_unchanged() {
        let mut contact = ContactRecord::new("Alice").unwrap();
        contact.add_phone("0501234567").unwrap();
        contact.add_phone("0671234567").unwrap();
        let before = contact.clone();

        assert!(matches!(
            contact.edit_phone("0501234567", "bad"),
            Err(ValidationError::InvalidPhone(_))
        ));
        assert!(matches!(
            contact.edit_phone("0501234567", "0671234567"),
            Err(ValidationError::Duplicate(_))
        ));
        assert_eq!(contact, before);
    }

    #[test]
    fn test_edit_phone_to_same_value() {
        let mut contact = ContactRecord::new("Alice").unwrap();
        contact.add_phone("0501234567").unwrap();
        assert_eq!(contact.edit_phone("0501234567", "0501234567"), Ok(Edit::Updated));
        assert_eq!(contact.phones().len(), 1);
    }

    #[test]
    fn test_emails() {
        let mut contact = ContactRecord::new("Alice").unwrap();
        contact.add_email("alice@example.com").unwrap();
        assert!(matches!(
            contact.add_email("alice@example.com"),
            Err(ValidationError::Duplicate(_))
        ));
        assert!(contact.add_email("nope").is_err());
        assert_eq!(
            contact.edit_email("bob@example.com", "a@b.io"),
            Ok(Edit::NotFound)
        );
        assert_eq!(
            contact.edit_email("alice@example.com", "alice@work.io"),
            Ok(Edit::Updated)
        );
        assert_eq!(contact.emails()[0].value(), "alice@work.io");
        assert!(contact.remove_email("alice@work.io"));
        assert!(!contact.remove_email("alice@work.io"));
    }

    #[test]
    fn test_address_and_birthday_set_clear() {
        let mut contact = ContactRecord::new("Alice").unwrap();
        assert!(!contact.clear_address());
        contact.set_address("Kyiv").unwrap();
        assert_eq!(contact.address().unwrap().value(), "Kyiv");
        assert!(contact.clear_address());
        assert!(contact.address().is_none());

        assert!(!contact.clear_birthday());
        contact.set_birthday("1990-01-01").unwrap();
        assert!(contact.birthday().is_some());
        assert!(contact.set_birthday("1990/01/01").is_err());
        assert_eq!(contact.birthday().unwrap().value(), "1990-01-01");
        assert!(contact.clear_birthday());
    }

    #[test]
    fn test_mutations_advance_updated_at() {
        let mut contact = ContactRecord::new("Alice").unwrap();
        let mut last = contact.updated_at();

        sleep(Duration::from_millis(5));
        contact.add_phone("0501234567").unwrap();
        assert!(contact.updated_at() > last);
        last = contact.updated_at();

        sleep(Duration::from_millis(5));
        contact.rename("Alicia").unwrap();
        assert!(contact.updated_at() > last);
        assert!(contact.updated_at() >= contact.created_at());
        last = contact.updated_at();

        assert!(contact.rename("").is_err());
        assert_eq!(contact.updated_at(), last);
        assert_eq!(contact.name().value(), "Alicia");
    }

    #[test]
    fn test_days_to_birthday_today_is_zero() {
        let today = ymd(2024, 6, 15);
        let contact = contact_born("1990-06-15");
        assert_eq!(contact.days_to_birthday_from(today), Some(0));
    }

    #[test]
    fn test_days_to_birthday_yesterday_wraps_to_next_year() {
        // Next anniversary crosses Feb 29 2024.
        let contact = contact_born("1990-03-14");
        assert_eq!(contact.days_to_birthday_from(ymd(2023, 3, 15)), Some(365));
        // No leap day in between.
        assert_eq!(contact.days_to_birthday_from(ymd(2024, 3, 15)), Some(364));
    }

    #[test]
    fn test_days_to_birthday_later_this_year() {
        let contact = contact_born("1990-06-20");
        assert_eq!(contact.days_to_birthday_from(ymd(2024, 6, 15)), Some(5));
    }

    #[test]
    fn test_days_to_birthday_leap_day() {
        let contact = contact_born("2000-02-29");
        assert_eq!(contact.days_to_birthday_from(ymd(2023, 2, 27)), Some(1));
        assert_eq!(contact.days_to_birthday_from(ymd(2024, 2, 27)), Some(2));
    }

    #[test]
    fn test_days_to_birthday_without_birthday() {
        let contact = ContactRecord::new("Alice").unwrap();
        assert_eq!(contact.days_to_birthday(), None);
    }

    #[test]
    fn test_contact_matches() {
        let mut contact = ContactRecord::new("Alice").unwrap();
        contact.add_phone("0501234567").unwrap();
        contact.add_email("alice@example.com").unwrap();
        contact.set_address("Lviv, Rynok sq.").unwrap();
        contact.set_birthday("1990-02-14").unwrap();

        assert!(contact.matches("ali"));
        assert!(contact.matches("050"));
        assert!(contact.matches("example"));
        assert!(contact.matches("rynok"));
        assert!(contact.matches("02-14"));
        assert!(!contact.matches("bob"));
    }

    #[test]
    fn test_note_tags() {
        let mut note = NoteRecord::new("Shopping", "milk").unwrap();
        assert_eq!(note.add_tag("#Home"), Ok(true));
        let stamp = note.updated_at();
        assert_eq!(note.add_tag("home"), Ok(false));
        assert_eq!(note.updated_at(), stamp);
        assert!(note.add_tag("").is_err());
        assert!(note.has_tag("#HOME"));

        assert!(note.remove_tag("#home"));
        assert!(!note.remove_tag("home"));
        note.add_tag("a").unwrap();
        note.add_tag("b").unwrap();
        assert_eq!(note.clear_tags(), 2);
        assert_eq!(note.clear_tags(), 0);
    }

    #[test]
    fn test_note_content_and_rename() {
        let mut note = NoteRecord::new("Shopping", "milk").unwrap();
        note.edit_content("milk, bread");
        assert_eq!(note.content(), "milk, bread");
        note.rename("Groceries").unwrap();
        assert_eq!(note.name().value(), "Groceries");
        assert!(note.matches("bread"));
        assert!(note.matches("grocer"));
    }

    #[test]
    fn test_contact_serialization_roundtrip() {
        let mut contact = ContactRecord::new("Alice").unwrap();
        contact.add_phone("0501234567").unwrap();
        contact.add_email("alice@example.com").unwrap();
        contact.set_birthday("1990-02-14").unwrap();

        let json = serde_json::to_string(&contact).unwrap();
        let loaded: ContactRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, contact);
    }

    #[test]
    fn test_note_serialization_roundtrip() {
        let mut note = NoteRecord::new("Shopping", "milk").unwrap();
        note.add_tag("home").unwrap();
        let json = serde_json::to_string(&note).unwrap();
        let loaded: NoteRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, note);
    }

    #[test]
    fn test_restore_complete_shape_is_not_migrated() {
        let contact = contact_born("1990-02-14");
        let json = serde_json::to_value(&contact).unwrap();
        let shape: ContactShape = serde_json::from_value(json).unwrap();
        let restored = ContactRecord::restore("Alice", shape).unwrap();
        assert!(!restored.migrated);
        assert_eq!(restored.record, contact);
    }

    #[test]
    fn test_restore_legacy_contact_without_emails_or_timestamps() {
        // Shape written before emails and timestamps existed.
        let json = r#"{ "name": "Bob", "phones": ["0501234567"] }"#;
        let shape: ContactShape = serde_json::from_str(json).unwrap();
        let restored = ContactRecord::restore("Bob", shape).unwrap();

        assert!(restored.migrated);
        let record = restored.record;
        assert_eq!(record.name().value(), "Bob");
        assert_eq!(record.phones().len(), 1);
        assert!(record.emails().is_empty());
        assert!(record.address().is_none());
        assert_eq!(record.created_at(), record.updated_at());
    }

    #[test]
    fn test_restore_drops_invalid_values_and_takes_name_from_key() {
        let json = r#"{
            "phones": ["0501234567", "12", "0501234567"],
            "emails": [],
            "address": null,
            "birthday": "not a date",
            "created_at": "2023-01-01T00:00:00Z",
            "updated_at": "2022-01-01T00:00:00Z"
        }"#;
        let shape: ContactShape = serde_json::from_str(json).unwrap();
        let restored = ContactRecord::restore("Carol", shape).unwrap();

        assert!(restored.migrated);
        let record = restored.record;
        assert_eq!(record.name().value(), "Carol");
        assert_eq!(record.phones().len(), 1);
        assert!(record.birthday().is_none());
        assert_eq!(record.updated_at(), record.created_at());
    }

    #[test]
    fn test_restore_without_any_name_fails() {
        let shape = NoteShape::default();
        assert!(NoteRecord::restore("  ", shape).is_none());
    }

    #[test]
    fn test_restore_legacy_note_without_tags() {
        let json = r#"{
            "name": "Todo",
            "content": "call mom",
            "created_at": "2023-01-01T00:00:00Z",
            "updated_at": "2023-01-02T00:00:00Z"
        }"#;
        let shape: NoteShape = serde_json::from_str(json).unwrap();
        let restored = NoteRecord::restore("Todo", shape).unwrap();
        assert!(restored.migrated);
        assert!(restored.record.tags().is_empty());
        assert_eq!(restored.record.content(), "call mom");
    }

    #[test]
    fn test_deserialize_requires_name() {
        let json = r#"{ "content": "orphan" }"#;
        assert!(serde_json::from_str::<NoteRecord>(json).is_err());
    }
}
