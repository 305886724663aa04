use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::errors::{ApiError, expect_success, extract_list, into_json};
use crate::session::{SessionManager, User};

/// Account and profile endpoints, plus the admin user-moderation surface.
/// Everything except registration and password reset goes through the
/// session manager's authenticated-request contract.
pub struct UserApi<'a> {
    session: &'a SessionManager,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Partial profile update for `PATCH /auth/me/`; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminStats {
    pub total_users: u64,
    pub total_products: u64,
    pub total_orders: u64,
    pub today_users: u64,
    pub today_products: u64,
    pub today_orders: u64,
    pub blocked_users: u64,
    #[serde(default)]
    pub orders_by_status: HashMap<String, u64>,
    #[serde(default)]
    pub products_by_status: HashMap<String, u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: String,
}

impl<'a> UserApi<'a> {
    pub fn new(session: &'a SessionManager) -> Self {
        Self { session }
    }

    /// `POST /auth/register/`. Anonymous; the new account still has to log
    /// in (and verify email) afterwards.
    pub async fn register(&self, request: &RegisterRequest) -> Result<String, ApiError> {
        let response = self
            .session
            .http()
            .post(self.session.endpoint("/auth/register/"))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let body: MessageResponse = into_json(response).await?;
        Ok(body.message)
    }

    /// `GET /auth/me/` straight from the backend, bypassing the session
    /// manager's cached snapshot.
    pub async fn fetch_me(&self) -> Result<User, ApiError> {
        let request = self.session.http().get(self.session.endpoint("/auth/me/"));
        let response = self.session.send_authorized(request).await?;
        into_json(response).await
    }

    /// `PATCH /auth/me/`.
    pub async fn update_me(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let request = self
            .session
            .http()
            .patch(self.session.endpoint("/auth/me/"))
            .json(update);
        let response = self.session.send_authorized(request).await?;
        into_json(response).await
    }

    /// `POST /auth/change-password/`.
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<String, ApiError> {
        let builder = self
            .session
            .http()
            .post(self.session.endpoint("/auth/change-password/"))
            .json(request);
        let response = self.session.send_authorized(builder).await?;
        let body: MessageResponse = into_json(response).await?;
        Ok(body.message)
    }

    /// `POST /auth/password-reset/`. Anonymous by nature.
    pub async fn request_password_reset(&self, email: &str) -> Result<String, ApiError> {
        let response = self
            .session
            .http()
            .post(self.session.endpoint("/auth/password-reset/"))
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let body: MessageResponse = into_json(response).await?;
        Ok(body.message)
    }

    /// `POST /auth/password-reset/confirm/{uidb64}/{token}/`.
    pub async fn confirm_password_reset(
        &self,
        uidb64: &str,
        token: &str,
        new_password: &str,
    ) -> Result<String, ApiError> {
        let path = format!("/auth/password-reset/confirm/{uidb64}/{token}/");
        let response = self
            .session
            .http()
            .post(self.session.endpoint(&path))
            .json(&serde_json::json!({
                "new_password": new_password,
                "confirm_password": new_password,
            }))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let body: MessageResponse = into_json(response).await?;
        Ok(body.message)
    }

    /// `GET /admin/stats/`.
    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        let request = self.session.http().get(self.session.endpoint("/admin/stats/"));
        let response = self.session.send_authorized(request).await?;
        into_json(response).await
    }

    /// `GET /admin/users/`.
    pub async fn admin_users(&self) -> Result<Vec<User>, ApiError> {
        let request = self.session.http().get(self.session.endpoint("/admin/users/"));
        let response = self.session.send_authorized(request).await?;
        extract_list(response).await
    }

    /// `PATCH /admin/users/{id}/`.
    pub async fn admin_update_user(
        &self,
        user_id: i64,
        update: &serde_json::Value,
    ) -> Result<User, ApiError> {
        let request = self
            .session
            .http()
            .patch(self.session.endpoint(&format!("/admin/users/{user_id}/")))
            .json(update);
        let response = self.session.send_authorized(request).await?;
        into_json(response).await
    }

    /// `POST /admin/users/{id}/block/`. Toggles the blocked flag.
    pub async fn admin_toggle_block(&self, user_id: i64) -> Result<String, ApiError> {
        let request = self
            .session
            .http()
            .post(self.session.endpoint(&format!("/admin/users/{user_id}/block/")));
        let response = self.session.send_authorized(request).await?;
        let body: MessageResponse = into_json(response).await?;
        Ok(body.message)
    }

    /// `DELETE /admin/users/{id}/`.
    pub async fn admin_delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        let request = self
            .session
            .http()
            .delete(self.session.endpoint(&format!("/admin/users/{user_id}/")));
        let response = self.session.send_authorized(request).await?;
        expect_success(response).await
    }
}
