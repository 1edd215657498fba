//! # Localization
//!
//! Key to string lookup for the interface, in English and Ukrainian.
//!
//! Three kinds of keys live in the tables:
//!
//! - **Command texts**, keyed by the command's canonical English text
//!   (`"add contact"` maps to `"додати контакт"`). These feed the
//!   [`CommandResolver`](crate::resolver::CommandResolver).
//! - **Descriptions**, keyed `desc_<command id>`, shown by `help`.
//! - **Interface strings** (`welcome`, `goodbye`, prompts). A `{}` in the
//!   text is a placeholder filled by [`Localization::text_with`].
//!
//! A key missing from the active language falls back to English, then to the
//! key itself, so lookups never fail.
//!
//! The chosen language is remembered in its own snapshot
//! (`language.json`) through [`load_language`] and [`save_language`].

use crate::resolver::Command;
use crate::store::{SnapshotStore, StorageBackend};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Uk,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Uk];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Uk => "uk",
        }
    }

    /// The language's name for itself.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Uk => "Українська",
        }
    }

    fn table(self) -> &'static HashMap<&'static str, &'static str> {
        match self {
            Language::En => &EN,
            Language::Uk => &UK,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "uk" | "ua" | "ukrainian" | "українська" => Ok(Language::Uk),
            other => Err(format!("unsupported language '{}' (expected en or uk)", other)),
        }
    }
}

static EN: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("add contact", "add contact"),
        ("show all", "show all"),
        ("search contacts", "search contacts"),
        ("edit contact", "edit contact"),
        ("delete contact", "delete contact"),
        ("birthdays", "birthdays"),
        ("add note", "add note"),
        ("show all notes", "show all notes"),
        ("search notes", "search notes"),
        ("edit note", "edit note"),
        ("delete note", "delete note"),
        ("add tag", "add tag"),
        ("search by tag", "search by tag"),
        ("sort by tags", "sort by tags"),
        ("help", "help"),
        ("exit", "exit"),
        ("change language", "change language"),
        ("desc_add_contact", "Add a new contact"),
        ("desc_show_all", "Show all contacts"),
        ("desc_search_contacts", "Search contacts"),
        ("desc_edit_contact", "Edit a contact"),
        ("desc_delete_contact", "Delete a contact"),
        ("desc_birthdays", "Show upcoming birthdays"),
        ("desc_add_note", "Add a new note"),
        ("desc_show_notes", "Show all notes"),
        ("desc_search_notes", "Search notes"),
        ("desc_edit_note", "Edit a note"),
        ("desc_delete_note", "Delete a note"),
        ("desc_add_tag", "Add a tag to a note"),
        ("desc_search_by_tag", "Search notes by tag"),
        ("desc_sort_by_tags", "Sort notes by tags"),
        ("desc_help", "Show available commands"),
        ("desc_exit", "Exit the program"),
        ("desc_change_language", "Change interface language"),
        ("welcome", "Welcome to Personal Assistant!"),
        ("enter_command", "Enter a command: "),
        ("error", "Error: {}"),
        ("command_not_recognized", "Command not recognized. Type 'help' to see available commands."),
        ("available_commands", "Available commands:"),
        ("contact_commands", "Contact management"),
        ("note_commands", "Note management"),
        ("other_commands", "Other commands"),
        ("did_you_mean", "Did you mean '{}'? (y/n): "),
        ("multiple_suggestions", "Did you mean one of these?"),
        ("goodbye", "Goodbye! Have a nice day!"),
        ("language_changed", "Language changed to English."),
        ("select_language", "Select language:"),
        ("enter_number", "Enter number: "),
        ("invalid_choice", "Invalid choice."),
        ("yes", "y"),
    ])
});

static UK: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("add contact", "додати контакт"),
        ("show all", "показати всі"),
        ("search contacts", "пошук контактів"),
        ("edit contact", "редагувати контакт"),
        ("delete contact", "видалити контакт"),
        ("birthdays", "дні народження"),
        ("add note", "додати нотатку"),
        ("show all notes", "показати всі нотатки"),
        ("search notes", "пошук нотаток"),
        ("edit note", "редагувати нотатку"),
        ("delete note", "видалити нотатку"),
        ("add tag", "додати тег"),
        ("search by tag", "пошук за тегом"),
        ("sort by tags", "сортувати за тегами"),
        ("help", "допомога"),
        ("exit", "вихід"),
        ("change language", "змінити мову"),
        ("desc_add_contact", "Додати новий контакт"),
        ("desc_show_all", "Показати всі контакти"),
        ("desc_search_contacts", "Пошук контактів"),
        ("desc_edit_contact", "Редагувати контакт"),
        ("desc_delete_contact", "Видалити контакт"),
        ("desc_birthdays", "Показати найближчі дні народження"),
        ("desc_add_note", "Додати нову нотатку"),
        ("desc_show_notes", "Показати всі нотатки"),
        ("desc_search_notes", "Пошук нотаток"),
        ("desc_edit_note", "Редагувати нотатку"),
        ("desc_delete_note", "Видалити нотатку"),
        ("desc_add_tag", "Додати тег до нотатки"),
        ("desc_search_by_tag", "Пошук нотаток за тегом"),
        ("desc_sort_by_tags", "Сортувати нотатки за тегами"),
        ("desc_help", "Показати доступні команди"),
        ("desc_exit", "Вийти з програми"),
        ("desc_change_language", "Змінити мову інтерфейсу"),
        ("welcome", "Ласкаво просимо до Персонального Помічника!"),
        ("enter_command", "Введіть команду: "),
        ("error", "Помилка: {}"),
        ("command_not_recognized", "Команда не розпізнана. Введіть 'допомога' для перегляду доступних команд."),
        ("available_commands", "Доступні команди:"),
        ("contact_commands", "Керування контактами"),
        ("note_commands", "Керування нотатками"),
        ("other_commands", "Інші команди"),
        ("did_you_mean", "Можливо, ви мали на увазі '{}'? (т/н): "),
        ("multiple_suggestions", "Можливо, ви мали на увазі одну з цих команд?"),
        ("goodbye", "До побачення! Гарного дня!"),
        ("language_changed", "Мову змінено на українську."),
        ("select_language", "Виберіть мову:"),
        ("enter_number", "Введіть номер: "),
        ("invalid_choice", "Невірний вибір."),
        ("yes", "т"),
    ])
});

#[derive(Debug, Clone, Default)]
pub struct Localization {
    language: Language,
}

impl Localization {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Text for `key` in the active language.
    pub fn text_for(&self, key: &str) -> String {
        self.text_in(self.language, key)
    }

    pub fn text_in(&self, language: Language, key: &str) -> String {
        language
            .table()
            .get(key)
            .or_else(|| EN.get(key))
            .map(|text| text.to_string())
            .unwrap_or_else(|| key.to_string())
    }

    /// Text for `key` with its `{}` placeholder replaced by `arg`.
    pub fn text_with(&self, key: &str, arg: &str) -> String {
        self.text_for(key).replacen("{}", arg, 1)
    }

    pub fn command_text(&self, command: Command) -> String {
        self.text_for(command.canonical())
    }

    pub fn description(&self, command: Command) -> String {
        self.text_for(&command.description_key())
    }

    /// Display text of every command in `language`, in catalog order.
    pub fn all_command_texts(&self, language: Language) -> Vec<(Command, String)> {
        Command::ALL
            .into_iter()
            .map(|command| (command, self.text_in(language, command.canonical())))
            .collect()
    }

    /// True when `answer` is "yes" in either language.
    pub fn is_yes(&self, answer: &str) -> bool {
        let answer = answer.trim().to_lowercase();
        if answer.is_empty() {
            return false;
        }
        ["y", "yes", "т", "так"].contains(&answer.as_str())
            || answer == self.text_for("yes").to_lowercase()
    }
}

/// The remembered language, if one was saved and is still supported.
pub fn load_language<B: StorageBackend>(store: &SnapshotStore<B>) -> Option<Language> {
    store.load::<Language>()
}

pub fn save_language<B: StorageBackend>(store: &SnapshotStore<B>, language: Language) -> bool {
    store.save(&language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemBackend;

    #[test]
    fn test_text_lookup_and_fallbacks() {
        let en = Localization::new(Language::En);
        assert_eq!(en.text_for("goodbye"), "Goodbye! Have a nice day!");
        assert_eq!(en.text_for("no_such_key"), "no_such_key");

        let uk = Localization::new(Language::Uk);
        assert_eq!(uk.text_for("goodbye"), "До побачення! Гарного дня!");
        assert_eq!(uk.text_for("no_such_key"), "no_such_key");
    }

    #[test]
    fn test_text_with_placeholder() {
        let en = Localization::new(Language::En);
        assert_eq!(en.text_with("error", "boom"), "Error: boom");
        assert_eq!(
            en.text_with("did_you_mean", "add contact"),
            "Did you mean 'add contact'? (y/n): "
        );
    }

    #[test]
    fn test_every_command_has_texts_in_every_language() {
        let loc = Localization::default();
        for language in Language::ALL {
            let texts = loc.all_command_texts(language);
            assert_eq!(texts.len(), Command::ALL.len());
            for (command, text) in texts {
                assert!(language.table().contains_key(command.canonical()), "{}", command);
                assert!(
                    language.table().contains_key(command.description_key().as_str()),
                    "{}",
                    command
                );
                assert!(!text.is_empty());
            }
        }
    }

    #[test]
    fn test_english_texts_are_canonical() {
        let loc = Localization::default();
        for (command, text) in loc.all_command_texts(Language::En) {
            assert_eq!(text, command.canonical());
        }
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("en".parse::<Language>(), Ok(Language::En));
        assert_eq!(" UK ".parse::<Language>(), Ok(Language::Uk));
        assert_eq!("українська".parse::<Language>(), Ok(Language::Uk));
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_is_yes() {
        let uk = Localization::new(Language::Uk);
        assert!(uk.is_yes("т"));
        assert!(uk.is_yes("Y"));
        assert!(!uk.is_yes("н"));
        assert!(!uk.is_yes(""));
    }

    #[test]
    fn test_language_preference_roundtrip() {
        let store = SnapshotStore::new(MemBackend::new());
        assert_eq!(load_language(&store), None);
        assert!(save_language(&store, Language::Uk));
        assert_eq!(load_language(&store), Some(Language::Uk));
    }

    #[test]
    fn test_unknown_saved_language_is_ignored() {
        let store = SnapshotStore::new(MemBackend::with_contents("\"fr\""));
        assert_eq!(load_language(&store), None);
    }
}
