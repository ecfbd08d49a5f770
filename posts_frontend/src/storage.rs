use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode client storage: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable string key-value store backed by one JSON file.
#[derive(Debug)]
pub struct ClientStorage {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl ClientStorage {
    /// `<config dir>/posts_frontend/storage.json`, or a dot directory in the
    /// working directory when the platform has no config dir.
    pub fn default_path() -> PathBuf {
        let base = dirs::config_dir()
            .map(|dir| dir.join("posts_frontend"))
            .unwrap_or_else(|| PathBuf::from(".posts_frontend"));
        base.join("storage.json")
    }

    /// Opens the store. A missing or unreadable file starts empty; the next
    /// write replaces it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!("ignoring corrupt client storage {}: {err}", path.display());
                BTreeMap::new()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                warn!("failed to read client storage {}: {err}", path.display());
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn flush(&self) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let encoded = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, encoded).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut storage = ClientStorage::open(&path);
        assert_eq!(storage.get("key"), None);
        storage.set("key", "value").unwrap();

        let reopened = ClientStorage::open(&path);
        assert_eq!(reopened.get("key"), Some("value"));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        let mut storage = ClientStorage::open(&path);
        assert_eq!(storage.get("key"), None);
        storage.set("key", "v").unwrap();
        assert_eq!(ClientStorage::open(&path).get("key"), Some("v"));
    }
}
