use super::backend::StorageBackend;
use crate::error::PersistenceError;
use crate::model::Record;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Version written into every collection snapshot.
///
/// - 0: bare `{name: record}` map, no envelope
/// - 1: `{"version": 1, "records": {name: record}}`
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a, R: Serialize> {
    version: u32,
    records: &'a BTreeMap<String, R>,
}

/// A collection read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<R> {
    pub records: BTreeMap<String, R>,
    /// Some entry was in an older shape, was re-keyed, or was dropped.
    /// The caller should write the collection back once.
    pub migrated: bool,
}

impl<R> Default for Loaded<R> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            migrated: false,
        }
    }
}

/// Serialization and failure policy on top of a [`StorageBackend`].
pub struct SnapshotStore<B: StorageBackend> {
    backend: B,
    pretty: bool,
}

impl<B: StorageBackend> SnapshotStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            pretty: true,
        }
    }

    /// Write compact JSON instead of indented JSON.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Serialize `value` and replace the snapshot. Returns whether it worked;
    /// the reason for a failure is logged, never propagated.
    pub fn save<T: Serialize + ?Sized>(&self, value: &T) -> bool {
        match self.try_save(value) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(location = %self.backend.location(), error = %e, "failed to save snapshot");
                false
            }
        }
    }

    fn try_save<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), PersistenceError> {
        let content = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        self.backend.write(&content)
    }

    /// The stored value, or `None` when the snapshot is missing, unreadable,
    /// or not valid for `T`.
    pub fn load<T: DeserializeOwned>(&self) -> Option<T> {
        let value = self.load_value()?;
        match serde_json::from_value(value) {
            Ok(loaded) => Some(loaded),
            Err(e) => {
                tracing::warn!(location = %self.backend.location(), error = %e, "ignoring incompatible snapshot");
                None
            }
        }
    }

    fn load_value(&self) -> Option<Value> {
        let content = match self.backend.read() {
            Ok(Some(content)) => content,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(location = %self.backend.location(), error = %e, "failed to read snapshot");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(location = %self.backend.location(), error = %e, "ignoring corrupted snapshot");
                None
            }
        }
    }

    /// Write a whole collection inside the versioned envelope.
    pub fn save_records<R: Record>(&self, records: &BTreeMap<String, R>) -> bool {
        self.save(&Envelope {
            version: SNAPSHOT_VERSION,
            records,
        })
    }

    /// Read a whole collection, migrating older shapes.
    ///
    /// Accepts the current envelope, older envelope versions, and bare
    /// `{name: record}` maps. Every entry is rebuilt through `R::restore`, so
    /// missing fields get defaults and invalid values are dropped. Entries
    /// whose stored name differs from their key are re-keyed by name.
    ///
    /// Returns `None` if there is no snapshot or it is not a JSON object at
    /// all; the caller starts empty.
    pub fn load_records<R: Record>(&self) -> Option<Loaded<R>> {
        let value = self.load_value()?;
        let Value::Object(mut top) = value else {
            tracing::warn!(location = %self.backend.location(), "ignoring snapshot that is not an object");
            return None;
        };

        let mut loaded = Loaded::default();
        let entries = match (top.remove("version"), top.remove("records")) {
            (Some(Value::Number(version)), Some(Value::Object(records))) => {
                let version = version.as_u64().unwrap_or(0);
                if version != u64::from(SNAPSHOT_VERSION) {
                    tracing::debug!(version, "snapshot written by another version");
                    loaded.migrated = version < u64::from(SNAPSHOT_VERSION);
                }
                records
            }
            (version, records) => {
                // Version 0: the whole object is the record map.
                if let Some(version) = version {
                    top.insert("version".to_string(), version);
                }
                if let Some(records) = records {
                    top.insert("records".to_string(), records);
                }
                loaded.migrated = true;
                top
            }
        };

        for (key, entry) in entries {
            let restored = serde_json::from_value::<R::Shape>(entry)
                .ok()
                .and_then(|shape| R::restore(&key, shape));
            let Some(restored) = restored else {
                tracing::warn!(kind = R::KIND, key = %key, "dropping unreadable entry");
                loaded.migrated = true;
                continue;
            };

            let name = restored.record.name().value().to_string();
            if restored.migrated || name != key {
                loaded.migrated = true;
            }
            if loaded.records.contains_key(&name) {
                tracing::warn!(kind = R::KIND, name = %name, "dropping duplicate entry");
                loaded.migrated = true;
                continue;
            }
            loaded.records.insert(name, restored.record);
        }

        if loaded.migrated {
            tracing::debug!(kind = R::KIND, count = loaded.records.len(), "migrated snapshot");
        }
        Some(loaded)
    }
}
