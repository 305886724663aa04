use std::env;

use crate::storage::errors::StorageError;

use super::file::FileTokenStore;
use super::memory::InMemoryTokenStore;
use super::types::TokenStore;

/// Build the token store selected by `MARKETPLACE_TOKEN_STORE`.
///
/// Accepted values: `memory` (default) or `file:<path>`.
pub fn token_store_from_env() -> Result<Box<dyn TokenStore>, StorageError> {
    let spec = env::var("MARKETPLACE_TOKEN_STORE").unwrap_or("memory".to_string());
    token_store_from_spec(&spec)
}

fn token_store_from_spec(spec: &str) -> Result<Box<dyn TokenStore>, StorageError> {
    match spec {
        "memory" => Ok(Box::new(InMemoryTokenStore::new())),
        other => match other.strip_prefix("file:") {
            Some(path) if !path.is_empty() => Ok(Box::new(FileTokenStore::open(path)?)),
            Some(_) => Err(StorageError::InvalidSpec(
                "file token store requires a path, e.g. file:/var/lib/marketplace/tokens.json"
                    .to_string(),
            )),
            None => Err(StorageError::InvalidSpec(format!(
                "unsupported token store: {other}"
            ))),
        },
    }
}
