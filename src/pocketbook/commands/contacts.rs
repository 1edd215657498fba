use super::{commit_edit, report_unsaved, required, Applied, CmdMessage, CmdResult, UpcomingBirthday};
use crate::book::AddressBook;
use crate::error::{PocketError, Result};
use crate::model::{ContactRecord, Edit, Record};
use crate::store::StorageBackend;

/// Everything the user typed for a new contact. Only the name is required;
/// blank optional fields are skipped.
#[derive(Debug, Clone, Default)]
pub struct ContactDraft {
    pub name: String,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
    pub address: Option<String>,
    pub birthday: Option<String>,
}

impl ContactDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactEdit {
    Rename(String),
    AddPhone(String),
    EditPhone { old: String, new: String },
    RemovePhone(String),
    AddEmail(String),
    EditEmail { old: String, new: String },
    RemoveEmail(String),
    SetAddress(String),
    ClearAddress,
    SetBirthday(String),
    ClearBirthday,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Create a contact. An invalid phone, email, address or birthday is
/// reported and left out; the contact is still added.
pub fn add<B: StorageBackend>(book: &mut AddressBook<B>, draft: ContactDraft) -> Result<CmdResult> {
    let mut contact = ContactRecord::new(&draft.name)?;
    let name = contact.name().value().to_string();
    if book.contains(&name) {
        return Err(PocketError::NameTaken(name));
    }

    let mut result = CmdResult::default();
    for phone in draft.phones.iter().filter(|p| !p.trim().is_empty()) {
        if let Err(e) = contact.add_phone(phone) {
            result.add_message(CmdMessage::warning(format!("Phone skipped: {}", e)));
        }
    }
    for email in draft.emails.iter().filter(|e| !e.trim().is_empty()) {
        if let Err(e) = contact.add_email(email) {
            result.add_message(CmdMessage::warning(format!("Email skipped: {}", e)));
        }
    }
    if let Some(address) = non_blank(&draft.address) {
        if let Err(e) = contact.set_address(address) {
            result.add_message(CmdMessage::warning(format!("Address skipped: {}", e)));
        }
    }
    if let Some(birthday) = non_blank(&draft.birthday) {
        if let Err(e) = contact.set_birthday(birthday) {
            result.add_message(CmdMessage::warning(format!("Birthday skipped: {}", e)));
        }
    }

    book.add(contact.clone());
    result.add_message(CmdMessage::success(format!("Contact '{}' added.", name)));
    report_unsaved(book, &mut result);
    result.contacts.push(contact);
    Ok(result)
}

pub fn list<B: StorageBackend>(book: &AddressBook<B>) -> CmdResult {
    let mut result = CmdResult::default().with_contacts(book.iter().cloned().collect());
    if result.contacts.is_empty() {
        result.add_message(CmdMessage::info("Address book is empty."));
    }
    result
}

/// The contact stored under exactly `name`.
pub fn show<B: StorageBackend>(book: &AddressBook<B>, name: &str) -> Result<CmdResult> {
    let name = required(name, "Contact name")?;
    let contact = book
        .find(name)
        .cloned()
        .ok_or_else(|| PocketError::NotFound(name.to_string()))?;
    Ok(CmdResult::default().with_contacts(vec![contact]))
}

pub fn search<B: StorageBackend>(book: &AddressBook<B>, query: &str) -> Result<CmdResult> {
    let query = required(query, "Search query")?;
    let found: Vec<ContactRecord> = book.search(query).into_iter().cloned().collect();

    let mut result = CmdResult::default();
    if found.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "No contacts found for query '{}'.",
            query
        )));
    } else {
        result.add_message(CmdMessage::info(format!("Found {} contact(s).", found.len())));
    }
    Ok(result.with_contacts(found))
}

pub fn edit<B: StorageBackend>(
    book: &mut AddressBook<B>,
    name: &str,
    change: ContactEdit,
) -> Result<CmdResult> {
    let name = required(name, "Contact name")?;
    let mut contact = book
        .find(name)
        .cloned()
        .ok_or_else(|| PocketError::NotFound(name.to_string()))?;

    let applied = apply(&mut contact, name, change)?;
    let new_name = contact.name().value().to_string();
    let mut result = commit_edit(book, name, contact, applied)?;
    if let Some(updated) = book.find(&new_name) {
        result.contacts.push(updated.clone());
    }
    Ok(result)
}

fn apply(contact: &mut ContactRecord, name: &str, change: ContactEdit) -> Result<Applied> {
    let applied = match change {
        ContactEdit::Rename(new_name) => {
            contact.rename(&new_name)?;
            let renamed = contact.name().value();
            if renamed == name {
                Applied::Unchanged(format!("Contact is already named '{}'.", name))
            } else {
                Applied::Changed(format!("Contact renamed from '{}' to '{}'.", name, renamed))
            }
        }
        ContactEdit::AddPhone(phone) => {
            contact.add_phone(&phone)?;
            Applied::Changed(format!("Phone {} added.", phone.trim()))
        }
        ContactEdit::EditPhone { old, new } => match contact.edit_phone(&old, &new)? {
            Edit::Updated => Applied::Changed(format!("Phone {} replaced with {}.", old, new)),
            Edit::NotFound => Applied::Unchanged(format!("'{}' has no phone {}.", name, old)),
        },
        ContactEdit::RemovePhone(phone) => {
            if contact.remove_phone(&phone) {
                Applied::Changed(format!("Phone {} removed.", phone))
            } else {
                Applied::Unchanged(format!("'{}' has no phone {}.", name, phone))
            }
        }
        ContactEdit::AddEmail(email) => {
            contact.add_email(&email)?;
            Applied::Changed(format!("Email {} added.", email.trim()))
        }
        ContactEdit::EditEmail { old, new } => match contact.edit_email(&old, &new)? {
            Edit::Updated => Applied::Changed(format!("Email {} replaced with {}.", old, new)),
            Edit::NotFound => Applied::Unchanged(format!("'{}' has no email {}.", name, old)),
        },
        ContactEdit::RemoveEmail(email) => {
            if contact.remove_email(&email) {
                Applied::Changed(format!("Email {} removed.", email))
            } else {
                Applied::Unchanged(format!("'{}' has no email {}.", name, email))
            }
        }
        ContactEdit::SetAddress(address) => {
            contact.set_address(&address)?;
            Applied::Changed(format!("Address set to {}.", address.trim()))
        }
        ContactEdit::ClearAddress => {
            if contact.clear_address() {
                Applied::Changed("Address removed.".to_string())
            } else {
                Applied::Unchanged(format!("'{}' has no address.", name))
            }
        }
        ContactEdit::SetBirthday(birthday) => {
            contact.set_birthday(&birthday)?;
            Applied::Changed(format!("Birthday set to {}.", birthday.trim()))
        }
        ContactEdit::ClearBirthday => {
            if contact.clear_birthday() {
                Applied::Changed("Birthday removed.".to_string())
            } else {
                Applied::Unchanged(format!("'{}' has no birthday.", name))
            }
        }
    };
    Ok(applied)
}

pub fn delete<B: StorageBackend>(book: &mut AddressBook<B>, name: &str) -> Result<CmdResult> {
    let name = required(name, "Contact name")?;
    if !book.delete(name) {
        return Err(PocketError::NotFound(name.to_string()));
    }
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Contact '{}' deleted.", name)));
    report_unsaved(book, &mut result);
    Ok(result)
}

/// Contacts with a birthday in the next `window_days` days, soonest first.
pub fn birthdays<B: StorageBackend>(book: &AddressBook<B>, window_days: u32) -> CmdResult {
    let mut result = CmdResult::default();
    result.birthdays = book
        .upcoming_birthdays(window_days)
        .into_iter()
        .map(|(contact, days_left)| UpcomingBirthday {
            contact: contact.clone(),
            days_left,
        })
        .collect();
    if result.birthdays.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No birthdays in the next {} days.",
            window_days
        )));
    }
    result
}
