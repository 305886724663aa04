mod config;
mod errors;
mod main;
mod types;

pub use errors::AuthError;
pub use main::SessionManager;
pub use types::{LoginCredentials, User, UserRole};

pub(crate) use main::extract_backend_message;
