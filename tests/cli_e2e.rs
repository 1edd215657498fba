use assert_cmd::Command;
use chrono::Local;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn pocketbook(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pocketbook").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("POCKETBOOK_LOG")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    pocketbook(dir.path())
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available commands:"))
        .stdout(predicate::str::contains("add contact"))
        .stdout(predicate::str::contains("sort by tags"));
}

#[test]
fn test_add_then_search_contact() {
    let dir = tempfile::tempdir().unwrap();

    pocketbook(dir.path())
        .args(["add", "contact", "Alice"])
        .write_stdin("050 123 45 67\n\nalice@example.com\n1990-02-14\nKyiv\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Contact 'Alice' added."));

    let snapshot = fs::read_to_string(dir.path().join("contacts.json")).unwrap();
    assert!(snapshot.contains("\"version\": 1"));
    assert!(snapshot.contains("0501234567"));

    pocketbook(dir.path())
        .args(["search", "contacts", "050"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice"))
        .stdout(predicate::str::contains("alice@example.com"));
}

#[test]
fn test_duplicate_contact_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    for _ in 0..2 {
        pocketbook(dir.path())
            .args(["add", "contact", "Bob"])
            .write_stdin("\n\n\n\n")
            .assert()
            .success();
    }
    pocketbook(dir.path())
        .args(["add", "contact", "Bob"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("'Bob' already exists"));
}

#[test]
fn test_unknown_command() {
    let dir = tempfile::tempdir().unwrap();
    pocketbook(dir.path())
        .arg("xyz")
        .assert()
        .success()
        .stdout(predicate::str::contains("Command not recognized"));
}

#[test]
fn test_typo_offers_suggestions() {
    let dir = tempfile::tempdir().unwrap();
    pocketbook(dir.path())
        .args(["ad", "contac"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Did you mean one of these?"))
        .stdout(predicate::str::contains("add contact"));
}

#[test]
fn test_typo_runs_the_picked_suggestion() {
    let dir = tempfile::tempdir().unwrap();
    pocketbook(dir.path())
        .args(["ad", "contac"])
        .write_stdin("1\nDana\n\n\n\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Contact 'Dana' added."))
        .stdout(predicate::str::contains("Command not recognized").not());
}

#[test]
fn test_unpicked_typo_shows_filtered_help() {
    let dir = tempfile::tempdir().unwrap();
    pocketbook(dir.path())
        .args(["search", "notez"])
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Command not recognized"))
        .stdout(predicate::str::contains("Available commands:"));
}

#[test]
fn test_corrupted_snapshot_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("contacts.json"), "{ this is not json").unwrap();

    pocketbook(dir.path())
        .args(["show", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Address book is empty."));
}

#[test]
fn test_notes_grouped_by_tag() {
    let dir = tempfile::tempdir().unwrap();
    pocketbook(dir.path())
        .args(["add", "note", "Shopping"])
        .write_stdin("milk, bread\n#home urgent\n")
        .assert()
        .success();
    pocketbook(dir.path())
        .args(["add", "note", "Ideas"])
        .write_stdin("\n\n")
        .assert()
        .success();

    pocketbook(dir.path())
        .args(["sort", "by", "tags"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#home"))
        .stdout(predicate::str::contains("#urgent"))
        .stdout(predicate::str::contains("untagged"));

    pocketbook(dir.path())
        .args(["show", "all", "notes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shopping"))
        .stdout(predicate::str::contains("Ideas"));
}

#[test]
fn test_birthday_today() {
    let dir = tempfile::tempdir().unwrap();
    let birthday = format!("2000-{}", Local::now().format("%m-%d"));
    pocketbook(dir.path())
        .args(["add", "contact", "Dana"])
        .write_stdin(format!("\n\n{}\n\n", birthday))
        .assert()
        .success();

    pocketbook(dir.path())
        .args(["birthdays", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dana"))
        .stdout(predicate::str::contains("today!"));
}

#[test]
fn test_session_language_flag() {
    let dir = tempfile::tempdir().unwrap();
    pocketbook(dir.path())
        .args(["--lang", "uk", "допомога"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Доступні команди:"));
    assert!(!dir.path().join("language.json").exists());
}

#[test]
fn test_changed_language_is_remembered() {
    let dir = tempfile::tempdir().unwrap();
    pocketbook(dir.path())
        .args(["change", "language", "uk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Мову змінено на українську."));

    pocketbook(dir.path())
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("додати контакт"));
}

#[test]
fn test_invalid_language_flag_fails() {
    let dir = tempfile::tempdir().unwrap();
    pocketbook(dir.path())
        .args(["--lang", "fr", "help"])
        .assert()
        .failure();
}

#[test]
fn test_interactive_session_until_exit() {
    let dir = tempfile::tempdir().unwrap();
    pocketbook(dir.path())
        .write_stdin("add note Plans\nsomeday\n\nshow all notes\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to Personal Assistant!"))
        .stdout(predicate::str::contains("Note 'Plans' added."))
        .stdout(predicate::str::contains("Goodbye!"));
}
