use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated identity as reported by `GET /auth/me/`.
///
/// This is a denormalized snapshot for display and routing decisions only;
/// the backend re-validates authorization on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: UserRole,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_customer(&self) -> bool {
        self.role == UserRole::Customer
    }

    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Admin,
}

/// Body of `POST /auth/login/`. The backend accepts the account's username
/// or email in the `username` field.
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Response of `POST /auth/login/`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenPairResponse {
    pub(crate) access: String,
    pub(crate) refresh: String,
}

/// Response of `POST /auth/token/refresh/`. The backend rotates the refresh
/// token when configured to; `refresh` is present only in that case.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RefreshResponse {
    pub(crate) access: String,
    #[serde(default)]
    pub(crate) refresh: Option<String>,
}
