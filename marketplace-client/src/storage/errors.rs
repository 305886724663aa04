use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Storage serialization error: {0}")]
    Serde(String),

    #[error("Invalid token store specification: {0}")]
    InvalidSpec(String),
}
