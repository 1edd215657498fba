use pocketbook::api::AssistantApi;
use pocketbook::commands::contacts::{ContactDraft, ContactEdit};
use pocketbook::config::AppConfig;
use pocketbook::model::Record;
use std::fs;

#[test]
fn test_roundtrip_preserves_records_and_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let saved = {
        let mut api = AssistantApi::open(dir.path(), AppConfig::default());
        api.add_contact(ContactDraft {
            name: "Alice".into(),
            phones: vec!["0501234567".into(), "+380671112233".into()],
            emails: vec!["alice@example.com".into()],
            address: Some("Kyiv, Khreshchatyk 1".into()),
            birthday: Some("1990-02-14".into()),
        })
        .unwrap();
        api.edit_contact("Alice", ContactEdit::RemovePhone("0501234567".into()))
            .unwrap();
        api.contacts().find("Alice").unwrap().clone()
    };

    let api = AssistantApi::open(dir.path(), AppConfig::default());
    let loaded = api.contacts().find("Alice").unwrap();
    assert_eq!(loaded, &saved);
    assert_eq!(loaded.created_at(), saved.created_at());
    assert_eq!(loaded.updated_at(), saved.updated_at());
    assert!(loaded.updated_at() >= loaded.created_at());
}

#[test]
fn test_legacy_snapshot_is_migrated_and_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    let legacy = r#"{
        "Alice": {
            "name": "Alice",
            "phones": ["0501234567", "not a phone"],
            "email": "ignored-field@example.com"
        }
    }"#;
    fs::write(dir.path().join("contacts.json"), legacy).unwrap();

    let api = AssistantApi::open(dir.path(), AppConfig::default());
    let alice = api.contacts().find("Alice").unwrap();
    assert_eq!(alice.phones().len(), 1);
    assert!(alice.emails().is_empty());
    assert!(alice.address().is_none());

    let rewritten = fs::read_to_string(dir.path().join("contacts.json")).unwrap();
    assert!(rewritten.contains("\"version\": 1"));
    assert!(rewritten.contains("\"emails\": []"));
    assert!(!rewritten.contains("not a phone"));
}

#[test]
fn test_compact_snapshots_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        pretty_snapshots: false,
        ..AppConfig::default()
    };
    let mut api = AssistantApi::open(dir.path(), config);
    api.add_contact(ContactDraft::named("Bob")).unwrap();

    let snapshot = fs::read_to_string(dir.path().join("contacts.json")).unwrap();
    assert!(!snapshot.contains('\n'));
    assert!(snapshot.starts_with("{\"version\":1"));
}

#[test]
fn test_unwritable_directory_keeps_working_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "a file, not a directory").unwrap();

    let mut api = AssistantApi::open(&blocker, AppConfig::default());
    let result = api.add_contact(ContactDraft::named("Carol")).unwrap();
    assert!(api.contacts().find("Carol").is_some());
    assert!(!api.contacts().is_saved());
    assert!(result
        .messages
        .iter()
        .any(|m| m.content.contains("could not be saved")));
}
