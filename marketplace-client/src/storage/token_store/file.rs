use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::storage::errors::StorageError;

use super::types::TokenStore;

/// Store backed by a single JSON document on disk, giving the token pair
/// the reload-surviving durability the web client gets from local storage.
///
/// Every mutation rewrites the document via a temporary file and rename,
/// so a crash mid-write leaves the previous document intact rather than a
/// truncated one.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    entry: HashMap<String, String>,
}

impl FileTokenStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entry = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StorageError::Serde(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };
        tracing::debug!(path = %path.display(), "Opened file token store");
        Ok(Self { path, entry })
    }

    fn persist(&self) -> Result<(), StorageError> {
        let serialized = serde_json::to_string_pretty(&self.entry)
            .map_err(|e| StorageError::Serde(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serialized).map_err(|e| StorageError::Io(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entry.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entry.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entry.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}
