use chrono::{DateTime, Utc};
use colored::Colorize;
use pocketbook::api::{CmdMessage, MessageLevel, UpcomingBirthday};
use pocketbook::book::TagGroup;
use pocketbook::i18n::Localization;
use pocketbook::model::{ContactRecord, NoteRecord, Record};
use pocketbook::resolver::{Command, CommandGroup};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const CELL_WIDTH: usize = 32;
const PREVIEW_WIDTH: usize = 40;
const COLUMN_GAP: &str = "  ";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_error(text: &str) {
    println!("{}", text.red());
}

pub(super) fn print_info(text: &str) {
    println!("{}", text.dimmed());
}

pub(super) fn print_header(text: &str) {
    println!("{}", text.bold());
}

pub(super) fn print_contacts(contacts: &[ContactRecord]) {
    if contacts.is_empty() {
        return;
    }
    let rows: Vec<Vec<String>> = contacts
        .iter()
        .map(|c| {
            vec![
                c.name().to_string(),
                join(c.phones().iter().map(|p| p.to_string())),
                join(c.emails().iter().map(|e| e.to_string())),
                c.birthday().map(|b| b.value()).unwrap_or_default(),
                c.address().map(|a| a.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["Name", "Phones", "Emails", "Birthday", "Address"], &rows);
}

pub(super) fn print_notes(notes: &[NoteRecord]) {
    if notes.is_empty() {
        return;
    }
    let rows: Vec<Vec<String>> = notes
        .iter()
        .map(|n| {
            vec![
                n.name().to_string(),
                join(n.tags().iter().map(|t| t.to_string())),
                preview(n.content()),
                format_time_ago(n.updated_at()),
            ]
        })
        .collect();
    print_table(&["Title", "Tags", "Content", "Updated"], &rows);
}

/// One note in full, content included.
pub(super) fn print_note(note: &NoteRecord) {
    println!("{}", note.name().value().bold());
    if !note.tags().is_empty() {
        println!("{}", join(note.tags().iter().map(|t| t.to_string())).cyan());
    }
    println!("--------------------------------");
    println!("{}", note.content());
}

pub(super) fn print_birthdays(birthdays: &[UpcomingBirthday]) {
    if birthdays.is_empty() {
        return;
    }
    let rows: Vec<Vec<String>> = birthdays
        .iter()
        .map(|b| {
            let when = match b.days_left {
                0 => "today!".to_string(),
                1 => "in 1 day".to_string(),
                n => format!("in {} days", n),
            };
            let date = b.contact.birthday().map(|d| d.value()).unwrap_or_default();
            vec![b.contact.name().to_string(), date, when]
        })
        .collect();
    print_table(&["Name", "Birthday", "When"], &rows);
}

pub(super) fn print_tag_groups(groups: &[(TagGroup, Vec<NoteRecord>)]) {
    for (group, notes) in groups {
        let label = match group {
            TagGroup::Tag(_) => group.to_string().cyan().bold(),
            TagGroup::Untagged => group.to_string().dimmed(),
        };
        println!("{} ({})", label, notes.len());
        for note in notes {
            println!("    {}  {}", note.name(), preview(note.content()).dimmed());
        }
    }
}

/// The command list, grouped. With `filter`, only commands whose text
/// contains it, or every command when none does.
pub(super) fn print_help(localization: &Localization, filter: Option<&str>) {
    let contains = |command: &Command, f: &str| {
        localization.command_text(*command).to_lowercase().contains(f)
    };
    let filter = filter
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty() && Command::ALL.iter().any(|c| contains(c, f)));
    let matching = |command: &Command| match &filter {
        Some(f) => contains(command, f),
        None => true,
    };

    print_header(&localization.text_for("available_commands"));
    let sections = [
        (CommandGroup::Contacts, "contact_commands"),
        (CommandGroup::Notes, "note_commands"),
        (CommandGroup::Other, "other_commands"),
    ];
    let width = Command::ALL
        .iter()
        .map(|c| localization.command_text(*c).width())
        .max()
        .unwrap_or(0);

    for (group, title_key) in sections {
        let commands: Vec<Command> = Command::ALL
            .into_iter()
            .filter(|c| c.group() == group && matching(c))
            .collect();
        if commands.is_empty() {
            continue;
        }
        println!();
        println!("{}", localization.text_for(title_key).underline());
        for command in commands {
            let text = localization.command_text(command);
            let padding = width.saturating_sub(text.width());
            println!(
                "  {}{}{}{}",
                text.cyan(),
                " ".repeat(padding),
                COLUMN_GAP,
                localization.description(command)
            );
        }
    }
}

fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|c| truncate_to_width(c, CELL_WIDTH)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect();
    println!("{}", header_line.join(COLUMN_GAP).trim_end().bold());

    for row in &cells {
        let line: Vec<String> = row.iter().zip(&widths).map(|(c, w)| pad(c, *w)).collect();
        println!("{}", line.join(COLUMN_GAP).trim_end());
    }
}

fn pad(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}

fn preview(content: &str) -> String {
    let flat: String = content
        .chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    truncate_to_width(&flat, PREVIEW_WIDTH)
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_to_width("Alice", 10), "Alice");
    }

    #[test]
    fn test_truncate_long_text() {
        let truncated = truncate_to_width("abcdefghij", 5);
        assert_eq!(truncated, "abcd…");
        assert_eq!(truncated.width(), 5);
    }

    #[test]
    fn test_truncate_wide_chars() {
        let truncated = truncate_to_width("日本語テキスト", 6);
        assert!(truncated.width() <= 6);
        assert!(truncated.ends_with('…'));
    }

    #[test]
    fn test_preview_flattens_newlines() {
        assert_eq!(preview("milk\nbread"), "milk bread");
    }

    #[test]
    fn test_pad_uses_display_width() {
        assert_eq!(pad("Олена", 7), "Олена  ");
    }
}
