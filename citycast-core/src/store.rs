//! Persistence sink: a synchronous string key-value store.
//!
//! The trait is minimal on purpose — it covers exactly the operations the
//! recency store needs, not a generic database. The file-backed
//! implementation keeps the whole map in memory and rewrites the file on
//! every mutation; an unreadable or unparseable file loads as empty rather
//! than failing.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};
use tracing::warn;

/// Abstraction over the persistent key-value store.
///
/// Writes are best-effort at the trait surface: the in-memory copy stays
/// authoritative for the session even if a disk write fails.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) {
        (**self).set(key, value);
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key);
    }
}

/// On-disk JSON container format.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    entries: HashMap<String, String>,
}

/// Whole-file JSON store, one file per instance.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: StoreData,
}

impl JsonFileStore {
    /// Open the store at `path`, loading any existing content.
    ///
    /// Missing or malformed files degrade to an empty store.
    pub fn open(path: PathBuf) -> Self {
        let data = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(data) => data,
                Err(err) => {
                    warn!(path = %path.display(), %err, "discarding malformed store file");
                    StoreData::default()
                }
            },
            Err(_) => StoreData::default(),
        };

        Self { path, data }
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), %err, "failed to create store directory");
                return;
            }
        }

        match serde_json::to_string_pretty(&self.data) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    warn!(path = %self.path.display(), %err, "failed to write store file");
                }
            }
            Err(err) => warn!(%err, "failed to serialize store"),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.data.entries.insert(key.to_string(), value);
        self.persist();
    }

    fn remove(&mut self, key: &str) {
        if self.data.entries.remove(key).is_some() {
            self.persist();
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
