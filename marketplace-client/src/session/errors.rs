use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error, Clone)]
pub enum AuthError {
    /// No session present: no access token in the store.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Refresh was attempted and failed, or the refreshed identity is
    /// invalid or blocked. The session has been torn down.
    #[error("Session expired")]
    SessionExpired,

    /// Login rejected by the backend; carries the backend-supplied message.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Transport-level failure or backend 5xx. Not distinguished further
    /// at this layer; callers decide whether to prompt a manual retry.
    #[error("Network error: {0}")]
    Network(String),

    /// Error from the durable token store.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
