//! # Command Resolution
//!
//! Turns a line of user text into a logical [`Command`] plus whatever text
//! followed it. Resolution never fails: text that names no command comes back
//! as [`Resolved::Unknown`], and [`CommandResolver::suggest`] can then offer
//! the closest commands.
//!
//! ## Exact Resolution
//!
//! Every command has a canonical English text (`add contact`) and, per
//! language, a display text (`додати контакт`). The input is lowercased and
//! checked against all of them as a prefix, **longest text first**, so
//! `show all notes` wins over `show all` for the input `show all notes`.
//! Ties in length keep catalog order.
//!
//! ## Suggestions
//!
//! When nothing matches, the input is compared against the display texts of
//! the active language with a normalized similarity ratio:
//!
//! ```text
//! ratio = 2 * LCS(a, b) / (len(a) + len(b))
//! ```
//!
//! where `LCS` is the longest common subsequence in characters (the indel
//! edit distance is `len(a) + len(b) - 2 * LCS`). Candidates at or above
//! [`SIMILARITY_THRESHOLD`] are returned best first, at most
//! [`DEFAULT_SUGGESTION_LIMIT`] of them, always as logical commands no matter
//! which language matched.

use crate::i18n::{Language, Localization};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

pub const SIMILARITY_THRESHOLD: f64 = 0.6;
pub const DEFAULT_SUGGESTION_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    AddContact,
    ShowAll,
    SearchContacts,
    EditContact,
    DeleteContact,
    Birthdays,
    AddNote,
    ShowNotes,
    SearchNotes,
    EditNote,
    DeleteNote,
    AddTag,
    SearchByTag,
    SortByTags,
    Help,
    Exit,
    ChangeLanguage,
}

/// Sections of the help screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Contacts,
    Notes,
    Other,
}

impl Command {
    pub const ALL: [Command; 17] = [
        Command::AddContact,
        Command::ShowAll,
        Command::SearchContacts,
        Command::EditContact,
        Command::DeleteContact,
        Command::Birthdays,
        Command::AddNote,
        Command::ShowNotes,
        Command::SearchNotes,
        Command::EditNote,
        Command::DeleteNote,
        Command::AddTag,
        Command::SearchByTag,
        Command::SortByTags,
        Command::Help,
        Command::Exit,
        Command::ChangeLanguage,
    ];

    /// Stable identifier, independent of language.
    pub fn id(self) -> &'static str {
        match self {
            Command::AddContact => "add_contact",
            Command::ShowAll => "show_all",
            Command::SearchContacts => "search_contacts",
            Command::EditContact => "edit_contact",
            Command::DeleteContact => "delete_contact",
            Command::Birthdays => "birthdays",
            Command::AddNote => "add_note",
            Command::ShowNotes => "show_notes",
            Command::SearchNotes => "search_notes",
            Command::EditNote => "edit_note",
            Command::DeleteNote => "delete_note",
            Command::AddTag => "add_tag",
            Command::SearchByTag => "search_by_tag",
            Command::SortByTags => "sort_by_tags",
            Command::Help => "help",
            Command::Exit => "exit",
            Command::ChangeLanguage => "change_language",
        }
    }

    /// The English text users type. Also the localization key.
    pub fn canonical(self) -> &'static str {
        match self {
            Command::AddContact => "add contact",
            Command::ShowAll => "show all",
            Command::SearchContacts => "search contacts",
            Command::EditContact => "edit contact",
            Command::DeleteContact => "delete contact",
            Command::Birthdays => "birthdays",
            Command::AddNote => "add note",
            Command::ShowNotes => "show all notes",
            Command::SearchNotes => "search notes",
            Command::EditNote => "edit note",
            Command::DeleteNote => "delete note",
            Command::AddTag => "add tag",
            Command::SearchByTag => "search by tag",
            Command::SortByTags => "sort by tags",
            Command::Help => "help",
            Command::Exit => "exit",
            Command::ChangeLanguage => "change language",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn description_key(self) -> String {
        format!("desc_{}", self.id())
    }

    pub fn group(self) -> CommandGroup {
        match self {
            Command::AddContact
            | Command::ShowAll
            | Command::SearchContacts
            | Command::EditContact
            | Command::DeleteContact
            | Command::Birthdays => CommandGroup::Contacts,
            Command::AddNote
            | Command::ShowNotes
            | Command::SearchNotes
            | Command::EditNote
            | Command::DeleteNote
            | Command::AddTag
            | Command::SearchByTag
            | Command::SortByTags => CommandGroup::Notes,
            Command::Help | Command::Exit | Command::ChangeLanguage => CommandGroup::Other,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Known(Command),
    /// Nothing matched; carries the lowercased input.
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub command: Resolved,
    /// Text after the matched command, trimmed, in its original case.
    pub remainder: String,
}

impl Resolution {
    pub fn known(&self) -> Option<Command> {
        match self.command {
            Resolved::Known(command) => Some(command),
            Resolved::Unknown(_) => None,
        }
    }
}

pub struct CommandResolver {
    /// Every text that starts a command, longest first.
    prefixes: Vec<(String, Command)>,
    /// Display texts of the active language, used for suggestions.
    localized: Vec<(String, Command)>,
    limit: usize,
}

impl CommandResolver {
    /// Build from the active language's command texts. Canonical English
    /// texts are always recognized in addition to these.
    pub fn new<I, S>(localized: I) -> Self
    where
        I: IntoIterator<Item = (Command, S)>,
        S: AsRef<str>,
    {
        let mut texts: Vec<(String, Command)> = localized
            .into_iter()
            .map(|(command, text)| (text.as_ref().trim().to_lowercase(), command))
            .filter(|(text, _)| !text.is_empty())
            .collect();
        if texts.is_empty() {
            texts = canonical_texts();
        }

        let mut prefixes = canonical_texts();
        for entry in &texts {
            if !prefixes.contains(entry) {
                prefixes.push(entry.clone());
            }
        }
        prefixes.sort_by_key(|(text, _)| std::cmp::Reverse(text.chars().count()));

        Self {
            prefixes,
            localized: texts,
            limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }

    /// Canonical English texts only.
    pub fn english() -> Self {
        Self::new(Command::ALL.into_iter().map(|c| (c, c.canonical())))
    }

    pub fn for_language(localization: &Localization, language: Language) -> Self {
        Self::new(localization.all_command_texts(language))
    }

    /// Cap on the number of suggestions (at least one).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn resolve(&self, raw: &str) -> Resolution {
        let trimmed = raw.trim();
        let lowered = trimmed.to_lowercase();

        for (text, command) in &self.prefixes {
            if lowered.starts_with(text.as_str()) {
                tracing::debug!(input = %trimmed, command = %command, "resolved");
                return Resolution {
                    command: Resolved::Known(*command),
                    remainder: remainder_after(trimmed, text.chars().count()),
                };
            }
        }

        Resolution {
            command: Resolved::Unknown(lowered),
            remainder: String::new(),
        }
    }

    /// The closest commands to `raw`, best first.
    pub fn suggest(&self, raw: &str) -> Vec<Command> {
        let query = raw.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, Command)> = self
            .localized
            .iter()
            .map(|(text, command)| (similarity(&query, text), *command))
            .filter(|(score, _)| *score >= SIMILARITY_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        let mut suggestions = Vec::with_capacity(self.limit);
        for (_, command) in scored {
            if !suggestions.contains(&command) {
                suggestions.push(command);
                if suggestions.len() == self.limit {
                    break;
                }
            }
        }
        suggestions
    }

    /// Display texts of the active language, in catalog order.
    pub fn texts(&self) -> impl Iterator<Item = (Command, &str)> {
        self.localized.iter().map(|(text, c)| (*c, text.as_str()))
    }
}

fn canonical_texts() -> Vec<(String, Command)> {
    Command::ALL
        .into_iter()
        .map(|c| (c.canonical().to_string(), c))
        .collect()
}

/// The part of `original` left after its first `prefix_chars` lowercase chars.
fn remainder_after(original: &str, prefix_chars: usize) -> String {
    let mut consumed = 0;
    for (i, c) in original.char_indices() {
        if consumed >= prefix_chars {
            return original[i..].trim().to_string();
        }
        consumed += c.to_lowercase().count();
    }
    String::new()
}

/// Similarity of two strings in `0.0..=1.0`, `2 * LCS / (len_a + len_b)`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in &a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    let lcs = prev[b.len()];

    (2 * lcs) as f64 / total as f64
}
