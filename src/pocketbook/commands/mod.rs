//! # Command Layer
//!
//! One function per user-facing operation, split by collection:
//! [`contacts`] and [`notes`]. Each takes the book it works on plus already
//! collected, still unvalidated input (the CLI gathers it with prompts, tests
//! pass it directly) and returns a [`CmdResult`].
//!
//! Nothing here prints or reads from the terminal. Outcomes come back as
//! records to display plus leveled [`CmdMessage`]s; hard failures (a name
//! that is taken, a record that does not exist, an invalid name) come back
//! as `Err`.

use crate::book::{Book, TagGroup};
use crate::error::{PocketError, Result};
use crate::model::{ContactRecord, NoteRecord, Record};
use crate::store::StorageBackend;

pub mod contacts;
pub mod notes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpcomingBirthday {
    pub contact: ContactRecord,
    /// 0 when the birthday is today.
    pub days_left: i64,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub contacts: Vec<ContactRecord>,
    pub notes: Vec<NoteRecord>,
    pub birthdays: Vec<UpcomingBirthday>,
    pub tag_groups: Vec<(TagGroup, Vec<NoteRecord>)>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_contacts(mut self, contacts: Vec<ContactRecord>) -> Self {
        self.contacts = contacts;
        self
    }

    pub fn with_notes(mut self, notes: Vec<NoteRecord>) -> Self {
        self.notes = notes;
        self
    }

    pub fn has_level(&self, level: MessageLevel) -> bool {
        self.messages.iter().any(|m| m.level == level)
    }
}

/// `text` trimmed, or an error naming `what` when nothing is left.
pub(crate) fn required<'a>(text: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PocketError::Api(format!("{} cannot be empty", what)));
    }
    Ok(trimmed)
}

/// Warn when the book's last write did not reach the disk.
pub(crate) fn report_unsaved<R: Record, B: StorageBackend>(
    book: &Book<R, B>,
    result: &mut CmdResult,
) {
    if !book.is_saved() {
        let location = book.store().backend().location();
        result.add_message(CmdMessage::warning(
            PocketError::NotSaved(location).to_string(),
        ));
    }
}

/// Outcome of applying one edit to a copy of a record.
pub(crate) enum Applied {
    Changed(String),
    Unchanged(String),
}

/// Write an edited copy back under `name`, or report why nothing changed.
pub(crate) fn commit_edit<R: Record, B: StorageBackend>(
    book: &mut Book<R, B>,
    name: &str,
    edited: R,
    applied: Applied,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match applied {
        Applied::Unchanged(reason) => {
            result.add_message(CmdMessage::warning(reason));
        }
        Applied::Changed(summary) => {
            book.update(name, move |stored| *stored = edited)?
                .ok_or_else(|| PocketError::NotFound(name.to_string()))?;
            result.add_message(CmdMessage::success(summary));
            report_unsaved(book, &mut result);
        }
    }
    Ok(result)
}
