use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::RwLock;

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session store I/O failure: {0}")]
    Io(#[from] io::Error),
}

/// Key/value seam between session state and wherever it lives.
///
/// Calls are synchronous and run to completion before the caller continues,
/// which is what lets the stack manager treat a read-modify-write cycle as a
/// single step within one process.
pub trait SessionStore {
    /// Raw value stored under `key`, if any. An unreadable value is reported
    /// the same way as an absent one.
    fn get(&self, key: &str) -> Option<String>;

    /// Replace the value under `key`. Readers observe either the previous
    /// value or the new one, never a partial write.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is a no-op, not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// File-backed session store: one JSON document per key inside a session
/// directory, named `<key>.json`.
///
/// The directory is created lazily on first write, so constructing a store
/// over a path that does not exist yet is fine.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                debug!(key = key, error = %e, "Session store read failed, treating key as absent");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.key_path(key);

        // Stage the write under a name no other writer can collide with,
        // then rename it into place, so a reader racing this write sees
        // either the old document or the new one.
        let tmp = self
            .dir
            .join(format!("{key}.json.{}.tmp", Uuid::new_v4().simple()));
        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Io(e));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

/// In-process store with the same contract as [`FileStore`], for embedders
/// that want session state scoped to one process and for tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().unwrap().remove(key);
        Ok(())
    }
}
