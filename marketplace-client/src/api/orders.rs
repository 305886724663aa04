use serde::Serialize;

use crate::api::errors::{ApiError, expect_success, extract_list, into_json};
use crate::api::types::{Order, Payment};
use crate::session::SessionManager;

/// Orders and mobile-money payments. The payment gateway itself is opaque
/// to this client; initiation just forwards to the backend and the user
/// completes the flow on their phone.
pub struct OrdersApi<'a> {
    session: &'a SessionManager,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitiatePaymentRequest {
    pub order_id: String,
    pub phone_number: String,
    pub amount: String,
}

impl<'a> OrdersApi<'a> {
    pub fn new(session: &'a SessionManager) -> Self {
        Self { session }
    }

    /// `GET /orders/`.
    pub async fn list(&self) -> Result<Vec<Order>, ApiError> {
        let request = self.session.http().get(self.session.endpoint("/orders/"));
        let response = self.session.send_authorized(request).await?;
        extract_list(response).await
    }

    /// `GET /orders/{id}/`.
    pub async fn get(&self, order_id: &str) -> Result<Order, ApiError> {
        let request = self
            .session
            .http()
            .get(self.session.endpoint(&format!("/orders/{order_id}/")));
        let response = self.session.send_authorized(request).await?;
        into_json(response).await
    }

    /// `POST /orders/checkout/`. Creates an order from the current cart.
    pub async fn checkout(&self, phone_number: &str) -> Result<Order, ApiError> {
        let body = CheckoutRequest {
            phone_number: phone_number.to_string(),
        };
        let request = self
            .session
            .http()
            .post(self.session.endpoint("/orders/checkout/"))
            .json(&body);
        let response = self.session.send_authorized(request).await?;
        // The backend wraps the order in {message, order}.
        let value: serde_json::Value = into_json(response).await?;
        let order = value.get("order").cloned().unwrap_or(value);
        serde_json::from_value(order).map_err(|e| ApiError::Serde(e.to_string()))
    }

    /// `POST /orders/{id}/cancel/`.
    pub async fn cancel(&self, order_id: &str) -> Result<(), ApiError> {
        let request = self
            .session
            .http()
            .post(self.session.endpoint(&format!("/orders/{order_id}/cancel/")));
        let response = self.session.send_authorized(request).await?;
        expect_success(response).await
    }

    /// `POST /payments/initiate/`. STK push to the given phone number.
    pub async fn initiate_payment(
        &self,
        request_body: &InitiatePaymentRequest,
    ) -> Result<serde_json::Value, ApiError> {
        let request = self
            .session
            .http()
            .post(self.session.endpoint("/payments/initiate/"))
            .json(request_body);
        let response = self.session.send_authorized(request).await?;
        into_json(response).await
    }

    /// `GET /payments/`.
    pub async fn payments(&self) -> Result<Vec<Payment>, ApiError> {
        let request = self.session.http().get(self.session.endpoint("/payments/"));
        let response = self.session.send_authorized(request).await?;
        extract_list(response).await
    }

    /// `GET /payments/{id}/`.
    pub async fn payment(&self, payment_id: &str) -> Result<Payment, ApiError> {
        let request = self
            .session
            .http()
            .get(self.session.endpoint(&format!("/payments/{payment_id}/")));
        let response = self.session.send_authorized(request).await?;
        into_json(response).await
    }
}
