use super::backend::{Result, StorageBackend};
use crate::error::PersistenceError;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Snapshot file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsBackend {
    path: PathBuf,
}

impl FsBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `file_name` inside `dir`.
    pub fn in_dir(dir: &Path, file_name: &str) -> Self {
        Self::new(dir.join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(PersistenceError::Io)?;
            }
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("snapshot");
        self.path
            .with_file_name(format!(".{}-{}.tmp", stem, Uuid::new_v4()))
    }
}

impl StorageBackend for FsBackend {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Io(e)),
        }
    }

    fn write(&self, contents: &str) -> Result<()> {
        self.ensure_parent()?;

        // Atomic write: the snapshot is either the old one or the new one.
        let tmp = self.tmp_path();
        let written = (|| -> std::io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()
        })();

        if let Err(e) = written.and_then(|_| fs::rename(&tmp, &self.path)) {
            let _ = fs::remove_file(&tmp);
            return Err(PersistenceError::Io(e));
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
