use crate::storage::errors::StorageError;

/// Durable string-keyed storage for the token pair, modeled on the
/// browser's origin-scoped local storage: synchronous reads and writes,
/// values surviving process restarts (for the file-backed variant).
///
/// The trait is deliberately synchronous so that `logout()` can clear the
/// session without awaiting anything.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}
