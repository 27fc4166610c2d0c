//! Key/value persistence for whole records.
//!
//! Records are stored as JSON under a fixed key per type and are always
//! loaded and saved wholesale. The file-backed store locks files and writes
//! through a temp file so a reader never sees a half-written record.

use crate::{Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

/// Storage key for the user record
pub const USER_KEY: &str = "user";
/// Storage key for aggregate progress
pub const PROGRESS_KEY: &str = "progress";

/// Repository of JSON-serializable records
pub trait Store {
    /// Load the record under `key`
    ///
    /// Returns `None` if nothing usable is stored there.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>;

    /// Replace the record under `key`
    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()>;
}

fn validate_key(key: &str) -> Result<()> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(Error::Store(format!("invalid key '{}'", key)))
    }
}

/// One JSON file per key inside a directory
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read the file under a shared lock; `None` on any read problem
    fn read_locked(path: &Path) -> Option<String> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open {:?}: {}. Using defaults.", path, e);
                return None;
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock {:?}: {}. Using defaults.", path, e);
            return None;
        }

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        let _ = file.unlock();

        match read {
            Ok(_) => Some(contents),
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}. Using defaults.", path, e);
                None
            }
        }
    }
}

impl Store for JsonFileStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        validate_key(key)?;
        let path = self.path_for(key);
        if !path.exists() {
            tracing::info!("No stored '{}' record, using defaults", key);
            return Ok(None);
        }

        let Some(contents) = Self::read_locked(&path) else {
            return Ok(None);
        };

        match serde_json::from_str::<T>(&contents) {
            Ok(value) => {
                tracing::debug!("Loaded '{}' from {:?}", key, path);
                Ok(Some(value))
            }
            Err(e) => {
                tracing::warn!("Failed to parse {:?}: {}. Using defaults.", path, e);
                Ok(None)
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        validate_key(key)?;
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);

        // Temp file in the same directory so the rename stays atomic
        let temp = NamedTempFile::new_in(&self.dir)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(value)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved '{}' to {:?}", key, path);
        Ok(())
    }
}

/// In-memory store for unit tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    records: RefCell<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON stored under `key`
    pub fn raw(&self, key: &str) -> Option<String> {
        self.records.borrow().get(key).cloned()
    }

    pub fn insert_raw(&self, key: &str, json: &str) {
        self.records.borrow_mut().insert(key.into(), json.into());
    }
}

#[cfg(test)]
impl Store for MemoryStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        validate_key(key)?;
        let records = self.records.borrow();
        let Some(json) = records.get(key) else {
            return Ok(None);
        };
        match serde_json::from_str(json) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Failed to parse stored '{}': {}. Using defaults.", key, e);
                Ok(None)
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        validate_key(key)?;
        let json = serde_json::to_string(value)?;
        self.records.borrow_mut().insert(key.into(), json);
        Ok(())
    }
}
