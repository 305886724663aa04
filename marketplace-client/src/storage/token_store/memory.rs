use std::collections::HashMap;

use crate::storage::errors::StorageError;

use super::types::TokenStore;

/// Process-local store. Sessions do not survive a restart; used as the
/// default and throughout the test suite.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    entry: HashMap<String, String>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        tracing::debug!("Creating new in-memory token store");
        Self {
            entry: HashMap::new(),
        }
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entry.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entry.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entry.remove(key);
        Ok(())
    }
}
