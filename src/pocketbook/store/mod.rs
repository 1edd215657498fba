//! # Storage Layer
//!
//! Everything pocketbook keeps on disk goes through this module. A collection
//! is persisted as a single snapshot file that is rewritten whole on every
//! change; there is no incremental update.
//!
//! ## Layers
//!
//! - [`backend::StorageBackend`]: raw text in, raw text out, for one file.
//!   - [`fs_backend::FsBackend`]: production backend (atomic temp-file + rename)
//!   - [`mem_backend::MemBackend`]: in-memory backend for tests, with failure
//!     injection
//! - [`snapshot::SnapshotStore`]: serialization and the failure policy on top
//!   of a backend.
//!
//! ## Failure Policy
//!
//! The gateway never lets a persistence failure escape:
//! - `save` returns `false` and logs a warning. A full or read-only disk costs
//!   durability for that one operation, nothing more.
//! - `load` returns `None` for a missing file, and also for a file that exists
//!   but cannot be read or parsed. Callers start from an empty collection.
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── contacts.json   # {"version": 1, "records": {"Alice": {...}, ...}}
//! ├── notes.json      # same envelope, note records
//! ├── language.json   # "en" | "uk"
//! └── config.json     # optional settings
//! ```
//!
//! Snapshots without the envelope (a bare `{name: record}` map) and records
//! missing fields are migrated on load, see [`snapshot::SnapshotStore::load_records`].

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod snapshot;

pub use backend::StorageBackend;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
pub use snapshot::{Loaded, SnapshotStore, SNAPSHOT_VERSION};

pub const CONTACTS_FILE: &str = "contacts.json";
pub const NOTES_FILE: &str = "notes.json";
pub const LANGUAGE_FILE: &str = "language.json";
