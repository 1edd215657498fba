use super::backend::{Result, StorageBackend};
use crate::error::PersistenceError;
use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Slot {
    contents: RefCell<Option<String>>,
    writes: Cell<usize>,
    fail_writes: Cell<bool>,
}

/// In-memory backend for testing.
///
/// Clones share the same slot, so a test can hand one clone to a book and keep
/// another to inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct MemBackend {
    slot: Rc<Slot>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that already holds `contents`, as if written by an earlier run.
    pub fn with_contents(contents: &str) -> Self {
        let backend = Self::new();
        *backend.slot.contents.borrow_mut() = Some(contents.to_string());
        backend
    }

    /// Make every subsequent write fail like a full disk.
    pub fn fail_writes(&self, fail: bool) {
        self.slot.fail_writes.set(fail);
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.contents.borrow().clone()
    }

    pub fn writes(&self) -> usize {
        self.slot.writes.get()
    }
}

impl StorageBackend for MemBackend {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.slot.contents.borrow().clone())
    }

    fn write(&self, contents: &str) -> Result<()> {
        if self.slot.fail_writes.get() {
            return Err(PersistenceError::Io(io::Error::new(
                io::ErrorKind::Other,
                "no space left on device",
            )));
        }
        *self.slot.contents.borrow_mut() = Some(contents.to_string());
        self.slot.writes.set(self.slot.writes.get() + 1);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
