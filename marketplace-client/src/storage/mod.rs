mod errors;
mod token_store;

pub use errors::StorageError;
pub use token_store::{FileTokenStore, InMemoryTokenStore, TokenStore, token_store_from_env};
