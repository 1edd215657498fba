use super::print::{
    print_birthdays, print_contacts, print_error, print_header, print_help, print_info,
    print_messages, print_note, print_notes, print_tag_groups,
};
use colored::Colorize;
use pocketbook::api::AssistantApi;
use pocketbook::commands::contacts::{ContactDraft, ContactEdit};
use pocketbook::commands::notes::{NoteDraft, NoteEdit};
use pocketbook::commands::CmdResult;
use pocketbook::error::{PocketError, Result};
use pocketbook::i18n::Language;
use pocketbook::resolver::{Command, Resolved};
use pocketbook::store::StorageBackend;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The interactive loop: reads command lines, asks for whatever a command
/// needs, prints the outcome.
///
/// Every answer comes from `input`, one line each. End of input reads as an
/// empty answer, and ends the loop when it is waiting for a command.
pub struct Shell<B: StorageBackend, R: BufRead> {
    api: AssistantApi<B>,
    input: R,
}

impl<B: StorageBackend, R: BufRead> Shell<B, R> {
    pub fn new(api: AssistantApi<B>, input: R) -> Self {
        Self { api, input }
    }

    #[cfg(test)]
    pub fn api(&self) -> &AssistantApi<B> {
        &self.api
    }

    pub fn run(&mut self) -> Result<()> {
        print_header(&self.api.text("welcome"));
        print_help(self.api.localization(), None);

        loop {
            println!();
            let Some(line) = self.prompt(&self.api.text("enter_command"))? else {
                break;
            };
            if self.execute(&line) == Flow::Exit {
                break;
            }
        }

        print_info(&self.api.text("goodbye"));
        Ok(())
    }

    /// Run one command line. Errors are printed, never returned.
    pub fn execute(&mut self, line: &str) -> Flow {
        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue;
        }

        let resolution = self.api.resolve(line);
        match resolution.command {
            Resolved::Known(command) => self.dispatch(command, &resolution.remainder),
            Resolved::Unknown(_) => self.unknown(line),
        }
    }

    fn dispatch(&mut self, command: Command, arg: &str) -> Flow {
        tracing::debug!(%command, arg, "dispatch");
        let outcome = match command {
            Command::Exit => return Flow::Exit,
            Command::Help => {
                let filter = (!arg.is_empty()).then_some(arg);
                print_help(self.api.localization(), filter);
                Ok(())
            }
            Command::ChangeLanguage => self.change_language(arg),
            Command::AddContact => self.add_contact(arg),
            Command::ShowAll => {
                show(self.api.list_contacts());
                Ok(())
            }
            Command::SearchContacts => self
                .argument(arg, "Enter search query: ")
                .and_then(|query| self.api.search_contacts(&query))
                .map(show),
            Command::EditContact => self.edit_contact(arg),
            Command::DeleteContact => self.delete_contact(arg),
            Command::Birthdays => self.birthdays(arg),
            Command::AddNote => self.add_note(arg),
            Command::ShowNotes => {
                show(self.api.list_notes());
                Ok(())
            }
            Command::SearchNotes => self
                .argument(arg, "Enter search query: ")
                .and_then(|query| self.api.search_notes(&query))
                .map(show),
            Command::EditNote => self.edit_note(arg),
            Command::DeleteNote => self.delete_note(arg),
            Command::AddTag => self.add_tag(arg),
            Command::SearchByTag => self
                .argument(arg, "Enter tag to search for (with or without #): ")
                .and_then(|tag| self.api.search_by_tag(&tag))
                .map(show),
            Command::SortByTags => {
                show(self.api.sort_by_tags());
                Ok(())
            }
        };

        if let Err(e) = outcome {
            print_error(&self.api.localization().text_with("error", &e.to_string()));
        }
        Flow::Continue
    }

    fn unknown(&mut self, line: &str) -> Flow {
        let suggestions = self.api.suggest(line);
        match suggestions.as_slice() {
            [only] => {
                let text = self.api.localization().command_text(*only);
                let question = self.api.localization().text_with("did_you_mean", &text);
                if self.confirm(&question) {
                    return self.dispatch(*only, "");
                }
            }
            [] => {}
            several => {
                println!("{}", self.api.text("multiple_suggestions").yellow());
                let texts: Vec<String> = several
                    .iter()
                    .map(|c| self.api.localization().command_text(*c))
                    .collect();
                let options: Vec<&str> = texts.iter().map(String::as_str).collect();
                if let Ok(Some(i)) = self.choose(&options) {
                    return self.dispatch(several[i], "");
                }
            }
        }
        print_error(&self.api.text("command_not_recognized"));
        print_help(self.api.localization(), Some(line));
        Flow::Continue
    }

    // --- input ---

    /// Show `label` and read one line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        print!("{}", label);
        io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// Like `prompt`, but end of input reads as an empty answer.
    fn ask(&mut self, label: &str) -> Result<String> {
        Ok(self.prompt(label)?.unwrap_or_default().trim().to_string())
    }

    fn ask_optional(&mut self, label: &str) -> Result<Option<String>> {
        let answer = self.ask(label)?;
        Ok((!answer.is_empty()).then_some(answer))
    }

    fn confirm(&mut self, label: &str) -> bool {
        match self.ask(label) {
            Ok(answer) => self.api.localization().is_yes(&answer),
            Err(_) => false,
        }
    }

    /// `arg` when the command line carried it, otherwise ask for it.
    fn argument(&mut self, arg: &str, label: &str) -> Result<String> {
        if !arg.is_empty() {
            return Ok(arg.to_string());
        }
        self.ask(label)
    }

    fn choose(&mut self, options: &[&str]) -> Result<Option<usize>> {
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {}", (i + 1).to_string().cyan(), option);
        }
        let answer = self.ask(&format!("Choose an option (1-{}): ", options.len()))?;
        match answer.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => Ok(Some(n - 1)),
            _ => {
                print_error(&self.api.text("invalid_choice"));
                Ok(None)
            }
        }
    }

    // --- contacts ---

    fn add_contact(&mut self, arg: &str) -> Result<()> {
        let name = self.argument(arg, "Enter name: ")?;
        if self.api.contacts().contains(name.trim()) {
            return Err(PocketError::NameTaken(name.trim().to_string()));
        }

        let mut draft = ContactDraft::named(name);
        while let Some(phone) = self.ask_optional("Enter phone number (leave empty to skip): ")? {
            draft.phones.push(phone);
        }
        if let Some(email) = self.ask_optional("Enter email (leave empty to skip): ")? {
            draft.emails.push(email);
        }
        draft.birthday = self.ask_optional("Enter birthday (YYYY-MM-DD, leave empty to skip): ")?;
        draft.address = self.ask_optional("Enter address (leave empty to skip): ")?;

        show(self.api.add_contact(draft)?);
        Ok(())
    }

    fn edit_contact(&mut self, arg: &str) -> Result<()> {
        let name = self.argument(arg, "Enter contact name to edit: ")?;
        let current = self.api.show_contact(&name)?;
        print_contacts(&current.contacts);

        let options = [
            "Rename",
            "Add a phone number",
            "Replace a phone number",
            "Remove a phone number",
            "Add an email",
            "Replace an email",
            "Remove an email",
            "Set address",
            "Remove address",
            "Set birthday",
            "Remove birthday",
        ];
        let Some(choice) = self.choose(&options)? else {
            return Ok(());
        };

        let change = match choice {
            0 => ContactEdit::Rename(self.ask("Enter new name: ")?),
            1 => ContactEdit::AddPhone(self.ask("Enter new phone number: ")?),
            2 => ContactEdit::EditPhone {
                old: self.ask("Phone number to replace: ")?,
                new: self.ask("Enter new phone number: ")?,
            },
            3 => ContactEdit::RemovePhone(self.ask("Phone number to remove: ")?),
            4 => ContactEdit::AddEmail(self.ask("Enter new email: ")?),
            5 => ContactEdit::EditEmail {
                old: self.ask("Email to replace: ")?,
                new: self.ask("Enter new email: ")?,
            },
            6 => ContactEdit::RemoveEmail(self.ask("Email to remove: ")?),
            7 => ContactEdit::SetAddress(self.ask("Enter new address: ")?),
            8 => ContactEdit::ClearAddress,
            9 => ContactEdit::SetBirthday(self.ask("Enter new birthday (YYYY-MM-DD): ")?),
            _ => ContactEdit::ClearBirthday,
        };

        show(self.api.edit_contact(&name, change)?);
        Ok(())
    }

    fn delete_contact(&mut self, arg: &str) -> Result<()> {
        let name = self.argument(arg, "Enter contact name to delete: ")?;
        let current = self.api.show_contact(&name)?;
        print_contacts(&current.contacts);

        if self.confirm(&format!("Delete contact '{}'? (y/n): ", name.trim())) {
            show(self.api.delete_contact(&name)?);
        } else {
            print_info("Deletion cancelled.");
        }
        Ok(())
    }

    fn birthdays(&mut self, arg: &str) -> Result<()> {
        let default = self.api.config().birthday_window_days;
        let answer = self.argument(arg, &format!("Enter number of days to check [{}]: ", default))?;
        let window = if answer.is_empty() {
            None
        } else {
            let days = answer
                .parse::<u32>()
                .map_err(|_| PocketError::Api(format!("'{}' is not a number of days", answer)))?;
            Some(days)
        };
        show(self.api.birthdays(window));
        Ok(())
    }

    // --- notes ---

    fn add_note(&mut self, arg: &str) -> Result<()> {
        let title = self.argument(arg, "Enter note title: ")?;
        if self.api.notes().contains(title.trim()) {
            return Err(PocketError::NameTaken(title.trim().to_string()));
        }
        let content = self.ask("Enter note content: ")?;
        let tags = self.ask("Enter tags separated by spaces (leave empty to skip): ")?;

        let draft = NoteDraft {
            title,
            content,
            tags: tags.split_whitespace().map(str::to_string).collect(),
        };
        show(self.api.add_note(draft)?);
        Ok(())
    }

    fn edit_note(&mut self, arg: &str) -> Result<()> {
        let title = self.argument(arg, "Enter note title to edit: ")?;
        let current = self.api.show_note(&title)?;
        for note in &current.notes {
            print_note(note);
        }

        let options = [
            "Rename",
            "Replace content",
            "Add a tag",
            "Remove a tag",
            "Remove all tags",
        ];
        let Some(choice) = self.choose(&options)? else {
            return Ok(());
        };

        let change = match choice {
            0 => NoteEdit::Rename(self.ask("Enter new title: ")?),
            1 => NoteEdit::SetContent(self.ask("Enter new content: ")?),
            2 => NoteEdit::AddTag(self.ask("Enter tag: ")?),
            3 => NoteEdit::RemoveTag(self.ask("Tag to remove: ")?),
            _ => NoteEdit::ClearTags,
        };

        show(self.api.edit_note(&title, change)?);
        Ok(())
    }

    fn delete_note(&mut self, arg: &str) -> Result<()> {
        let title = self.argument(arg, "Enter note title to delete: ")?;
        let current = self.api.show_note(&title)?;
        print_notes(&current.notes);

        if self.confirm(&format!("Delete note '{}'? (y/n): ", title.trim())) {
            show(self.api.delete_note(&title)?);
        } else {
            print_info("Deletion cancelled.");
        }
        Ok(())
    }

    fn add_tag(&mut self, arg: &str) -> Result<()> {
        let title = self.argument(arg, "Enter note title: ")?;
        self.api.show_note(&title)?;
        let tag = self.ask("Enter tag (with or without #): ")?;
        show(self.api.add_tag(&title, &tag)?);
        Ok(())
    }

    // --- settings ---

    fn change_language(&mut self, arg: &str) -> Result<()> {
        let language = if arg.is_empty() {
            println!("{}", self.api.text("select_language"));
            let names: Vec<&str> = Language::ALL.iter().map(|l| l.native_name()).collect();
            match self.choose(&names)? {
                Some(i) => Language::ALL[i],
                None => return Ok(()),
            }
        } else {
            arg.parse::<Language>().map_err(PocketError::Api)?
        };

        if !self.api.set_language(language) {
            tracing::warn!(%language, "language preference not saved");
        }
        println!("{}", self.api.text("language_changed").green());
        Ok(())
    }
}

fn show(result: CmdResult) {
    print_contacts(&result.contacts);
    print_birthdays(&result.birthdays);
    if result.notes.len() == 1 && result.tag_groups.is_empty() {
        print_note(&result.notes[0]);
    } else {
        print_notes(&result.notes);
    }
    print_tag_groups(&result.tag_groups);
    print_messages(&result.messages);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pocketbook::config::AppConfig;
    use pocketbook::store::{MemBackend, SnapshotStore};
    use std::io::Cursor;

    fn shell(input: &str) -> Shell<MemBackend, Cursor<Vec<u8>>> {
        let api = AssistantApi::new(
            SnapshotStore::new(MemBackend::new()),
            SnapshotStore::new(MemBackend::new()),
            SnapshotStore::new(MemBackend::new()),
            AppConfig::default(),
        );
        Shell::new(api, Cursor::new(input.as_bytes().to_vec()))
    }

    #[test]
    fn test_add_contact_with_prompts() {
        let mut sh = shell("0501234567\n\nalice@example.com\n1990-02-14\nKyiv\n");
        assert_eq!(sh.execute("add contact Alice"), Flow::Continue);

        let alice = sh.api().contacts().find("Alice").unwrap();
        assert_eq!(alice.phones().len(), 1);
        assert_eq!(alice.emails().len(), 1);
        assert!(alice.birthday().is_some());
        assert_eq!(alice.address().unwrap().value(), "Kyiv");
    }

    #[test]
    fn test_prompts_at_end_of_input_are_skipped() {
        let mut sh = shell("");
        sh.execute("add contact Bob");
        let bob = sh.api().contacts().find("Bob").unwrap();
        assert!(bob.phones().is_empty());
        assert!(bob.address().is_none());
    }

    #[test]
    fn test_name_asked_when_not_on_command_line() {
        let mut sh = shell("Carol\n\n\n\n\n");
        sh.execute("add contact");
        assert!(sh.api().contacts().contains("Carol"));
    }

    #[test]
    fn test_add_note_and_tag() {
        let mut sh = shell("milk, bread\nhome urgent\nlater\n");
        sh.execute("add note Shopping");
        sh.execute("add tag Shopping");

        let note = sh.api().notes().find("Shopping").unwrap();
        let tags: Vec<&str> = note.tags().iter().map(|t| t.value()).collect();
        assert_eq!(tags, vec!["home", "urgent", "later"]);
    }

    #[test]
    fn test_edit_contact_menu() {
        let mut sh = shell("\n\n\n\n1\nAlicia\n");
        sh.execute("add contact Alice");
        sh.execute("edit contact Alice");
        assert!(sh.api().contacts().contains("Alicia"));
        assert!(!sh.api().contacts().contains("Alice"));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut sh = shell("\n\n\n\nn\ny\n");
        sh.execute("add contact Alice");
        sh.execute("delete contact Alice");
        assert!(sh.api().contacts().contains("Alice"));
        sh.execute("delete contact Alice");
        assert!(!sh.api().contacts().contains("Alice"));
    }

    #[test]
    fn test_single_suggestion_runs_when_confirmed() {
        let mut sh = shell("y\n");
        assert_eq!(sh.execute("exitt"), Flow::Exit);
    }

    #[test]
    fn test_picking_one_of_several_suggestions_runs_it() {
        let mut sh = shell("2\nPlans\nbuy milk\n\n");
        assert_eq!(sh.api().suggest("add con"), vec![Command::AddContact, Command::AddNote]);
        assert_eq!(sh.execute("add con"), Flow::Continue);
        assert!(sh.api().notes().contains("Plans"));
        assert!(sh.api().contacts().is_empty());
    }

    #[test]
    fn test_no_pick_among_suggestions_runs_nothing() {
        let mut sh = shell("9\nexit\n");
        assert_eq!(sh.execute("add con"), Flow::Continue);
        assert!(sh.api().notes().is_empty());
        assert!(sh.api().contacts().is_empty());
        // The invalid pick consumed only its own line.
        assert_eq!(sh.prompt("").unwrap().as_deref(), Some("exit"));
    }

    #[test]
    fn test_unknown_command_continues() {
        let mut sh = shell("");
        assert_eq!(sh.execute("xyz"), Flow::Continue);
        assert_eq!(sh.execute("   "), Flow::Continue);
    }

    #[test]
    fn test_exit() {
        let mut sh = shell("");
        assert_eq!(sh.execute("exit"), Flow::Exit);
    }

    #[test]
    fn test_change_language_by_argument() {
        let mut sh = shell("");
        sh.execute("change language uk");
        assert_eq!(sh.api().language(), Language::Uk);
        assert_eq!(sh.execute("вихід"), Flow::Exit);
    }

    #[test]
    fn test_change_language_by_menu() {
        let mut sh = shell("2\n");
        sh.execute("change language");
        assert_eq!(sh.api().language(), Language::Uk);
    }

    #[test]
    fn test_run_stops_at_end_of_input() {
        let mut sh = shell("add note Plans\n\n\n");
        sh.run().unwrap();
        assert!(sh.api().notes().contains("Plans"));
    }
}
