mod config;
mod file;
mod memory;
mod types;

pub use config::token_store_from_env;
pub use file::FileTokenStore;
pub use memory::InMemoryTokenStore;
pub use types::TokenStore;
