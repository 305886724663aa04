use serde::Serialize;

use crate::api::errors::{ApiError, expect_success, into_json};
use crate::api::types::{Cart, CartItem};
use crate::session::SessionManager;

/// The caller's shopping cart. Every endpoint is bearer-authenticated.
pub struct CartApi<'a> {
    session: &'a SessionManager,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddToCartRequest {
    pub product_id: String,
    pub quantity: u32,
}

impl<'a> CartApi<'a> {
    pub fn new(session: &'a SessionManager) -> Self {
        Self { session }
    }

    /// `GET /cart/`.
    pub async fn get(&self) -> Result<Cart, ApiError> {
        let request = self.session.http().get(self.session.endpoint("/cart/"));
        let response = self.session.send_authorized(request).await?;
        into_json(response).await
    }

    /// `POST /cart/add/`.
    pub async fn add(&self, product_id: &str, quantity: u32) -> Result<(), ApiError> {
        let body = AddToCartRequest {
            product_id: product_id.to_string(),
            quantity,
        };
        let request = self
            .session
            .http()
            .post(self.session.endpoint("/cart/add/"))
            .json(&body);
        let response = self.session.send_authorized(request).await?;
        expect_success(response).await
    }

    /// `PATCH /cart/items/{id}/`.
    pub async fn update_item(&self, item_id: i64, quantity: u32) -> Result<CartItem, ApiError> {
        let request = self
            .session
            .http()
            .patch(self.session.endpoint(&format!("/cart/items/{item_id}/")))
            .json(&serde_json::json!({ "quantity": quantity }));
        let response = self.session.send_authorized(request).await?;
        into_json(response).await
    }

    /// `DELETE /cart/items/{id}/delete/`.
    pub async fn remove_item(&self, item_id: i64) -> Result<(), ApiError> {
        let request = self
            .session
            .http()
            .delete(self.session.endpoint(&format!("/cart/items/{item_id}/delete/")));
        let response = self.session.send_authorized(request).await?;
        expect_success(response).await
    }

    /// `DELETE /cart/clear/`.
    pub async fn clear(&self) -> Result<(), ApiError> {
        let request = self.session.http().delete(self.session.endpoint("/cart/clear/"));
        let response = self.session.send_authorized(request).await?;
        expect_success(response).await
    }
}
