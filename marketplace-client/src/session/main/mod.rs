mod expiry;
mod manager;

pub use manager::SessionManager;

pub(crate) use manager::extract_backend_message;
