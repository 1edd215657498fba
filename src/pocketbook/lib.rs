//! # Pocketbook Architecture
//!
//! Pocketbook keeps two collections for one person, **contacts** and
//! **notes**, and lets them be managed by typing plain commands
//! (`add contact`, `search notes`, `birthdays`) in English or Ukrainian.
//! Mistyped commands are matched to the closest known ones.
//!
//! The crate is a library first; the `pocketbook` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (cli/, wired by main.rs)                               │
//! │  - Arguments, the interactive shell, prompts, printing      │
//! │  - The ONLY place that touches stdin/stdout/exit codes      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs) + Resolver (resolver.rs) + i18n (i18n.rs)     │
//! │  - Text → Command, suggestions, language                    │
//! │  - Thin facade over the command layer                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs)                                   │
//! │  - One function per operation, returns CmdResult            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Book (book.rs) over Records (model.rs, fields.rs)          │
//! │  - Keyed collections, validated values                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/)                                           │
//! │  - Whole-collection JSON snapshots, migration on load       │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust values and returns Rust values. It
//! never prints, never exits, and never reads the terminal. Diagnostics go
//! through `tracing`; the binary decides where they end up.
//!
//! ## Testing Strategy
//!
//! 1. **Values and records** (`validators`, `fields`, `model`): validation
//!    rules and mutation invariants.
//! 2. **Book and store**: persistence round-trips, corrupted and legacy
//!    snapshots, failing writes, all against `MemBackend`.
//! 3. **Commands and API**: operation outcomes and dispatch.
//! 4. **CLI**: argument parsing and scripted shell sessions; end-to-end runs
//!    of the binary live in `tests/`.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`commands`]: One function per user operation
//! - [`resolver`]: Command catalog, exact and fuzzy resolution
//! - [`i18n`]: Interface strings and command texts per language
//! - [`book`]: Keyed collections of records
//! - [`model`]: `ContactRecord`, `NoteRecord`, snapshot migration
//! - [`fields`]: Validated value types
//! - [`validators`]: Phone, email and date rules
//! - [`store`]: Snapshot persistence
//! - [`config`]: Settings and data directory
//! - [`error`]: Error types
//! - `cli`: Argument parsing, the shell and printing for the binary (not part of the lib API)

pub mod api;
pub mod book;
pub mod commands;
pub mod config;
pub mod error;
pub mod fields;
pub mod i18n;
pub mod model;
pub mod resolver;
pub mod store;
pub mod validators;
