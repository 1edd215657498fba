//! # Collection Store
//!
//! A [`Book`] is the keyed set of every record of one kind: contacts live in
//! an [`AddressBook`], notes in a [`NoteBook`]. The book owns its map
//! privately; callers go through the operations below, which keep two rules:
//!
//! - The key of every entry is the current name of the record it holds.
//!   Renaming goes through [`Book::rename`] (or [`Book::update`], which
//!   re-keys), never through a bare `&mut` to the record.
//! - Every mutating operation writes the whole collection back through the
//!   [`SnapshotStore`]. A failed write is logged and remembered
//!   ([`Book::is_saved`]); it never fails the operation itself.
//!
//! ## Lookup vs Search
//!
//! [`Book::find`] is an exact, case-sensitive key lookup. It is what rename
//! and delete rely on to act on exactly one record. [`Book::search`] is the
//! forgiving one: case-insensitive substring over every field.
//!
//! Iteration order is ascending key order.

use crate::error::{PocketError, Result};
use crate::fields::{Name, Tag};
use crate::model::{ContactRecord, NoteRecord, Record};
use crate::store::{SnapshotStore, StorageBackend};
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;

pub type AddressBook<B> = Book<ContactRecord, B>;
pub type NoteBook<B> = Book<NoteRecord, B>;

pub struct Book<R: Record, B: StorageBackend> {
    records: BTreeMap<String, R>,
    store: SnapshotStore<B>,
    saved: bool,
}

impl<R: Record, B: StorageBackend> Book<R, B> {
    /// Load the collection from `store`.
    ///
    /// A missing or corrupted snapshot yields an empty book. If any entry had
    /// to be migrated, the book is written back once right away.
    pub fn open(store: SnapshotStore<B>) -> Self {
        let loaded = store.load_records::<R>().unwrap_or_default();
        let mut book = Self {
            records: loaded.records,
            store,
            saved: true,
        };
        if loaded.migrated {
            tracing::info!(kind = R::KIND, count = book.len(), "rewriting migrated snapshot");
            book.save();
        }
        book
    }

    /// Write the whole collection. Returns whether it reached the backend.
    pub fn save(&mut self) -> bool {
        self.saved = self.store.save_records(&self.records);
        self.saved
    }

    /// False when the most recent write failed.
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// Insert `record` under its name, replacing any record already there.
    pub fn add(&mut self, record: R) {
        let key = record.name().value().to_string();
        tracing::debug!(kind = R::KIND, name = %key, "add");
        self.records.insert(key, record);
        self.save();
    }

    pub fn find(&self, name: &str) -> Option<&R> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Remove a record. Returns false if there was nothing under `name`.
    pub fn delete(&mut self, name: &str) -> bool {
        if self.records.remove(name).is_none() {
            return false;
        }
        tracing::debug!(kind = R::KIND, name, "delete");
        self.save();
        true
    }

    /// Apply `edit` to the record stored under `name` and persist.
    ///
    /// Returns `Ok(None)` when there is no such record. If `edit` renamed the
    /// record, the entry moves to the new key; renaming onto another existing
    /// record is refused and the edit rolled back.
    pub fn update<T>(&mut self, name: &str, edit: impl FnOnce(&mut R) -> T) -> Result<Option<T>> {
        let Some(record) = self.records.get(name) else {
            return Ok(None);
        };
        let mut edited = record.clone();
        let outcome = edit(&mut edited);

        let new_key = edited.name().value().to_string();
        if new_key != name {
            if self.records.contains_key(&new_key) {
                return Err(PocketError::NameTaken(new_key));
            }
            self.records.remove(name);
        }
        self.records.insert(new_key, edited);
        self.save();
        Ok(Some(outcome))
    }

    /// Rename the record under `old` to `new_name`, moving its entry.
    ///
    /// Returns `Ok(false)` if there is no record under `old`.
    pub fn rename(&mut self, old: &str, new_name: &str) -> Result<bool> {
        if !self.records.contains_key(old) {
            return Ok(false);
        }
        let new_key = Name::new(new_name)?.value().to_string();
        if new_key != old && self.records.contains_key(&new_key) {
            return Err(PocketError::NameTaken(new_key));
        }
        let renamed = self.update(old, |record| record.rename(&new_key))?;
        match renamed {
            Some(result) => result.map(|_| true).map_err(PocketError::from),
            None => Ok(false),
        }
    }

    /// Case-insensitive substring search over every field of every record.
    pub fn search(&self, query: &str) -> Vec<&R> {
        let query = query.trim().to_lowercase();
        self.records
            .values()
            .filter(|record| record.matches(&query))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn store(&self) -> &SnapshotStore<B> {
        &self.store
    }
}

impl<B: StorageBackend> Book<ContactRecord, B> {
    /// Contacts whose birthday comes within `window_days` (inclusive),
    /// soonest first.
    pub fn upcoming_birthdays(&self, window_days: u32) -> Vec<(&ContactRecord, i64)> {
        self.upcoming_birthdays_from(window_days, Local::now().date_naive())
    }

    pub fn upcoming_birthdays_from(
        &self,
        window_days: u32,
        today: NaiveDate,
    ) -> Vec<(&ContactRecord, i64)> {
        let mut upcoming: Vec<(&ContactRecord, i64)> = self
            .records
            .values()
            .filter_map(|contact| {
                contact
                    .days_to_birthday_from(today)
                    .filter(|days| *days <= i64::from(window_days))
                    .map(|days| (contact, days))
            })
            .collect();
        // Stable: ties keep key order.
        upcoming.sort_by_key(|(_, days)| *days);
        upcoming
    }
}

/// Key of a [`NoteBook::group_by_tag`] group.
///
/// Named tags sort alphabetically; `Untagged` sorts after all of them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagGroup {
    Tag(String),
    Untagged,
}

impl fmt::Display for TagGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagGroup::Tag(tag) => write!(f, "{}{}", Tag::MARKER, tag),
            TagGroup::Untagged => f.write_str("untagged"),
        }
    }
}

impl<B: StorageBackend> Book<NoteRecord, B> {
    /// Notes carrying `tag` (with or without the `#` marker).
    pub fn search_by_tag(&self, tag: &str) -> Vec<&NoteRecord> {
        self.records
            .values()
            .filter(|note| note.has_tag(tag))
            .collect()
    }

    /// Every note under each of its tags; tagless notes under
    /// [`TagGroup::Untagged`].
    pub fn group_by_tag(&self) -> BTreeMap<TagGroup, Vec<&NoteRecord>> {
        let mut groups: BTreeMap<TagGroup, Vec<&NoteRecord>> = BTreeMap::new();
        for note in self.records.values() {
            if note.tags().is_empty() {
                groups.entry(TagGroup::Untagged).or_default().push(note);
                continue;
            }
            for tag in note.tags() {
                groups
                    .entry(TagGroup::Tag(tag.value().to_string()))
                    .or_default()
                    .push(note);
            }
        }
        groups
    }
}
