//! # API Facade
//!
//! [`AssistantApi`] is the single entry point for every pocketbook operation,
//! whatever the UI. It owns both books, the language preference and the
//! command resolver, and forwards each call to the matching function in
//! [`commands`].
//!
//! The facade does no printing and holds no business rules of its own. It:
//! - **Resolves** free text to a [`Command`] (and suggests near misses)
//! - **Dispatches** to `commands::contacts` / `commands::notes`
//! - **Applies settings** from [`AppConfig`] (birthday window, suggestion count)
//!
//! ## Generic Over StorageBackend
//!
//! - Production: `AssistantApi<FsBackend>`, built by [`AssistantApi::open`]
//! - Testing: `AssistantApi<MemBackend>`
//!
//! Each collection and the language preference get their own backend, so a
//! failing notes file never affects contacts.

use crate::book::{AddressBook, Book, NoteBook};
use crate::commands::contacts::{self, ContactDraft, ContactEdit};
use crate::commands::notes::{self, NoteDraft, NoteEdit};
use crate::commands::CmdResult;
use crate::config::AppConfig;
use crate::error::Result;
use crate::i18n::{self, Language, Localization};
use crate::resolver::{Command, CommandResolver, Resolution};
use crate::store::{
    FsBackend, SnapshotStore, StorageBackend, CONTACTS_FILE, LANGUAGE_FILE, NOTES_FILE,
};
use std::path::Path;

pub use crate::commands::{CmdMessage, MessageLevel, UpcomingBirthday};

pub struct AssistantApi<B: StorageBackend> {
    contacts: AddressBook<B>,
    notes: NoteBook<B>,
    language_store: SnapshotStore<B>,
    localization: Localization,
    resolver: CommandResolver,
    config: AppConfig,
}

impl<B: StorageBackend> AssistantApi<B> {
    /// Load both collections and the saved language.
    pub fn new(
        contacts: SnapshotStore<B>,
        notes: SnapshotStore<B>,
        language_store: SnapshotStore<B>,
        config: AppConfig,
    ) -> Self {
        let language = i18n::load_language(&language_store).unwrap_or_default();
        let localization = Localization::new(language);
        let resolver = build_resolver(&localization, &config);
        tracing::debug!(%language, "assistant ready");
        Self {
            contacts: Book::open(contacts),
            notes: Book::open(notes),
            language_store,
            localization,
            resolver,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn contacts(&self) -> &AddressBook<B> {
        &self.contacts
    }

    pub fn notes(&self) -> &NoteBook<B> {
        &self.notes
    }

    pub fn localization(&self) -> &Localization {
        &self.localization
    }

    pub fn language(&self) -> Language {
        self.localization.language()
    }

    /// Switch language for this session only.
    pub fn use_language(&mut self, language: Language) {
        self.localization.set_language(language);
        self.resolver = build_resolver(&self.localization, &self.config);
    }

    /// Switch language and remember it. Returns whether it was saved.
    pub fn set_language(&mut self, language: Language) -> bool {
        self.use_language(language);
        i18n::save_language(&self.language_store, language)
    }

    pub fn text(&self, key: &str) -> String {
        self.localization.text_for(key)
    }

    pub fn resolve(&self, line: &str) -> Resolution {
        self.resolver.resolve(line)
    }

    pub fn suggest(&self, line: &str) -> Vec<Command> {
        self.resolver.suggest(line)
    }

    // --- contacts ---

    pub fn add_contact(&mut self, draft: ContactDraft) -> Result<CmdResult> {
        contacts::add(&mut self.contacts, draft)
    }

    pub fn list_contacts(&self) -> CmdResult {
        contacts::list(&self.contacts)
    }

    pub fn show_contact(&self, name: &str) -> Result<CmdResult> {
        contacts::show(&self.contacts, name)
    }

    pub fn search_contacts(&self, query: &str) -> Result<CmdResult> {
        contacts::search(&self.contacts, query)
    }

    pub fn edit_contact(&mut self, name: &str, change: ContactEdit) -> Result<CmdResult> {
        contacts::edit(&mut self.contacts, name, change)
    }

    pub fn delete_contact(&mut self, name: &str) -> Result<CmdResult> {
        contacts::delete(&mut self.contacts, name)
    }

    /// Upcoming birthdays; `None` uses the configured window.
    pub fn birthdays(&self, window_days: Option<u32>) -> CmdResult {
        let window = window_days.unwrap_or(self.config.birthday_window_days);
        contacts::birthdays(&self.contacts, window)
    }

    // --- notes ---

    pub fn add_note(&mut self, draft: NoteDraft) -> Result<CmdResult> {
        notes::add(&mut self.notes, draft)
    }

    pub fn list_notes(&self) -> CmdResult {
        notes::list(&self.notes)
    }

    pub fn show_note(&self, title: &str) -> Result<CmdResult> {
        notes::show(&self.notes, title)
    }

    pub fn search_notes(&self, query: &str) -> Result<CmdResult> {
        notes::search(&self.notes, query)
    }

    pub fn edit_note(&mut self, title: &str, change: NoteEdit) -> Result<CmdResult> {
        notes::edit(&mut self.notes, title, change)
    }

    pub fn delete_note(&mut self, title: &str) -> Result<CmdResult> {
        notes::delete(&mut self.notes, title)
    }

    pub fn add_tag(&mut self, title: &str, tag: &str) -> Result<CmdResult> {
        notes::add_tag(&mut self.notes, title, tag)
    }

    pub fn search_by_tag(&self, tag: &str) -> Result<CmdResult> {
        notes::search_by_tag(&self.notes, tag)
    }

    pub fn sort_by_tags(&self) -> CmdResult {
        notes::sort_by_tags(&self.notes)
    }
}

impl AssistantApi<FsBackend> {
    /// Open (or start) the snapshots kept in `data_dir`.
    pub fn open(data_dir: &Path, config: AppConfig) -> Self {
        let pretty = config.pretty_snapshots;
        let store = |file: &str| {
            let store = SnapshotStore::new(FsBackend::in_dir(data_dir, file));
            if pretty {
                store
            } else {
                store.compact()
            }
        };
        tracing::info!(data_dir = %data_dir.display(), "opening data directory");
        Self::new(store(CONTACTS_FILE), store(NOTES_FILE), store(LANGUAGE_FILE), config)
    }
}

#[cfg(any(test, feature = "test_utils"))]
impl AssistantApi<crate::store::MemBackend> {
    /// A fresh assistant with nothing on any backend.
    pub fn in_memory() -> Self {
        use crate::store::MemBackend;
        Self::new(
            SnapshotStore::new(MemBackend::new()),
            SnapshotStore::new(MemBackend::new()),
            SnapshotStore::new(MemBackend::new()),
            AppConfig::default(),
        )
    }
}

fn build_resolver(localization: &Localization, config: &AppConfig) -> CommandResolver {
    CommandResolver::for_language(localization, localization.language())
        .with_limit(config.suggestion_limit)
}
