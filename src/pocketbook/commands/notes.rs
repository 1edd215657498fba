use super::{commit_edit, report_unsaved, required, Applied, CmdMessage, CmdResult};
use crate::book::NoteBook;
use crate::error::{PocketError, Result};
use crate::fields::Tag;
use crate::model::{NoteRecord, Record};
use crate::store::StorageBackend;

#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEdit {
    Rename(String),
    SetContent(String),
    AddTag(String),
    RemoveTag(String),
    ClearTags,
}

/// Create a note. Invalid or repeated tags are reported and left out.
pub fn add<B: StorageBackend>(book: &mut NoteBook<B>, draft: NoteDraft) -> Result<CmdResult> {
    let mut note = NoteRecord::new(&draft.title, &draft.content)?;
    let title = note.name().value().to_string();
    if book.contains(&title) {
        return Err(PocketError::NameTaken(title));
    }

    let mut result = CmdResult::default();
    for tag in draft.tags.iter().filter(|t| !t.trim().is_empty()) {
        match note.add_tag(tag) {
            Ok(true) => {}
            Ok(false) => result.add_message(CmdMessage::info(format!(
                "Tag {}{} given twice.",
                Tag::MARKER,
                Tag::normalize(tag)
            ))),
            Err(e) => result.add_message(CmdMessage::warning(format!("Tag skipped: {}", e))),
        }
    }

    book.add(note.clone());
    result.add_message(CmdMessage::success(format!("Note '{}' added.", title)));
    report_unsaved(book, &mut result);
    result.notes.push(note);
    Ok(result)
}

pub fn list<B: StorageBackend>(book: &NoteBook<B>) -> CmdResult {
    let mut result = CmdResult::default().with_notes(book.iter().cloned().collect());
    if result.notes.is_empty() {
        result.add_message(CmdMessage::info("No notes yet."));
    }
    result
}

pub fn show<B: StorageBackend>(book: &NoteBook<B>, title: &str) -> Result<CmdResult> {
    let title = required(title, "Note title")?;
    let note = book
        .find(title)
        .cloned()
        .ok_or_else(|| PocketError::NotFound(title.to_string()))?;
    Ok(CmdResult::default().with_notes(vec![note]))
}

/// Notes whose title or content contains `query`.
pub fn search<B: StorageBackend>(book: &NoteBook<B>, query: &str) -> Result<CmdResult> {
    let query = required(query, "Search query")?;
    let found: Vec<NoteRecord> = book.search(query).into_iter().cloned().collect();

    let mut result = CmdResult::default();
    if found.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "No notes found for query '{}'.",
            query
        )));
    } else {
        result.add_message(CmdMessage::info(format!("Found {} note(s).", found.len())));
    }
    Ok(result.with_notes(found))
}

pub fn edit<B: StorageBackend>(
    book: &mut NoteBook<B>,
    title: &str,
    change: NoteEdit,
) -> Result<CmdResult> {
    let title = required(title, "Note title")?;
    let mut note = book
        .find(title)
        .cloned()
        .ok_or_else(|| PocketError::NotFound(title.to_string()))?;

    let applied = apply(&mut note, title, change)?;
    let new_title = note.name().value().to_string();
    let mut result = commit_edit(book, title, note, applied)?;
    if let Some(updated) = book.find(&new_title) {
        result.notes.push(updated.clone());
    }
    Ok(result)
}

fn apply(note: &mut NoteRecord, title: &str, change: NoteEdit) -> Result<Applied> {
    let applied = match change {
        NoteEdit::Rename(new_title) => {
            note.rename(&new_title)?;
            let renamed = note.name().value();
            if renamed == title {
                Applied::Unchanged(format!("Note is already titled '{}'.", title))
            } else {
                Applied::Changed(format!("Note renamed from '{}' to '{}'.", title, renamed))
            }
        }
        NoteEdit::SetContent(content) => {
            if note.content() == content {
                Applied::Unchanged("Content is unchanged.".to_string())
            } else {
                note.edit_content(&content);
                Applied::Changed("Content updated.".to_string())
            }
        }
        NoteEdit::AddTag(tag) => {
            let shown = format!("{}{}", Tag::MARKER, Tag::normalize(&tag));
            if note.add_tag(&tag)? {
                Applied::Changed(format!("Tag {} added.", shown))
            } else {
                Applied::Unchanged(format!("Tag {} already exists for this note.", shown))
            }
        }
        NoteEdit::RemoveTag(tag) => {
            let shown = format!("{}{}", Tag::MARKER, Tag::normalize(&tag));
            if note.remove_tag(&tag) {
                Applied::Changed(format!("Tag {} removed.", shown))
            } else {
                Applied::Unchanged(format!("'{}' has no tag {}.", title, shown))
            }
        }
        NoteEdit::ClearTags => match note.clear_tags() {
            0 => Applied::Unchanged(format!("'{}' has no tags.", title)),
            n => Applied::Changed(format!("{} tag(s) removed.", n)),
        },
    };
    Ok(applied)
}

pub fn add_tag<B: StorageBackend>(
    book: &mut NoteBook<B>,
    title: &str,
    tag: &str,
) -> Result<CmdResult> {
    edit(book, title, NoteEdit::AddTag(tag.to_string()))
}

pub fn delete<B: StorageBackend>(book: &mut NoteBook<B>, title: &str) -> Result<CmdResult> {
    let title = required(title, "Note title")?;
    if !book.delete(title) {
        return Err(PocketError::NotFound(title.to_string()));
    }
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Note '{}' deleted.", title)));
    report_unsaved(book, &mut result);
    Ok(result)
}

pub fn search_by_tag<B: StorageBackend>(book: &NoteBook<B>, tag: &str) -> Result<CmdResult> {
    let tag = required(tag, "Tag")?;
    let shown = format!("{}{}", Tag::MARKER, Tag::normalize(tag));
    let found: Vec<NoteRecord> = book.search_by_tag(tag).into_iter().cloned().collect();

    let mut result = CmdResult::default();
    if found.is_empty() {
        result.add_message(CmdMessage::warning(format!("No notes found with tag {}.", shown)));
    } else {
        result.add_message(CmdMessage::info(format!(
            "Found {} note(s) with tag {}.",
            found.len(),
            shown
        )));
    }
    Ok(result.with_notes(found))
}

/// Every note grouped under each of its tags, untagged notes last.
pub fn sort_by_tags<B: StorageBackend>(book: &NoteBook<B>) -> CmdResult {
    let mut result = CmdResult::default();
    result.tag_groups = book
        .group_by_tag()
        .into_iter()
        .map(|(group, notes)| (group, notes.into_iter().cloned().collect()))
        .collect();
    if result.tag_groups.is_empty() {
        result.add_message(CmdMessage::info("No notes yet."));
    }
    result
}
