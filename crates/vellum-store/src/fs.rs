//! Filesystem store implementation.
//!
//! Provides [`FsStore`], which persists each key as one JSON file in a data
//! directory. Writes go through a temp file and rename so a crashed write
//! never leaves a half-written collection behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::store::{KvStore, StoreError};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem store.
///
/// Stores one `<key>.json` file per storage key in a flat data directory.
/// The directory is created on first write.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use vellum_store::{FsStore, KvStore, keys};
///
/// let store = FsStore::new(PathBuf::from(".vellum/data"));
/// store.set_raw(keys::SETTINGS, "{}")?;
/// ```
#[derive(Debug)]
pub struct FsStore {
    /// Data directory holding one file per key.
    data_dir: PathBuf,
}

impl FsStore {
    /// Create a new filesystem store rooted at `data_dir`.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Data directory this store writes into.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn file_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl KvStore for FsStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.file_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(e, Some(path))
                .with_key(key)
                .with_backend(BACKEND)),
        }
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| {
            StoreError::io(e, Some(self.data_dir.clone())).with_backend(BACKEND)
        })?;

        let path = self.file_for(key);
        let tmp = self.data_dir.join(format!(".{key}.json.tmp"));

        fs::write(&tmp, value).map_err(|e| {
            StoreError::io(e, Some(tmp.clone()))
                .with_key(key)
                .with_backend(BACKEND)
        })?;
        fs::rename(&tmp, &path).map_err(|e| {
            StoreError::io(e, Some(path))
                .with_key(key)
                .with_backend(BACKEND)
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.file_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(e, Some(path))
                .with_key(key)
                .with_backend(BACKEND)),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(
                    StoreError::io(e, Some(self.data_dir.clone())).with_backend(BACKEND)
                );
            }
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                StoreError::io(e, Some(self.data_dir.clone())).with_backend(BACKEND)
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && !stem.starts_with('.')
            {
                keys.push(stem.to_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }
}
