use crate::error::PersistenceError;

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Raw access to one snapshot location.
///
/// Backends move text and report I/O failures; deciding what a failure means
/// for the program is left to [`SnapshotStore`](super::SnapshotStore).
pub trait StorageBackend {
    /// The stored text, or `None` if nothing was ever written.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the stored text.
    fn write(&self, contents: &str) -> Result<()>;

    /// Where the data lives, for log messages.
    fn location(&self) -> String;
}
