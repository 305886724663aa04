use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::session::{AuthError, extract_backend_message};

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    /// Failure in the session layer before the request was sent.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Backend rejected the request; carries the extracted `detail` or
    /// `message` field when the body provides one.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serde error: {0}")]
    Serde(String),
}

/// Turn a backend response into `T`, mapping non-2xx statuses into
/// [`ApiError::Api`] with the backend's own message.
pub(crate) async fn into_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let message = extract_backend_message(response).await;
        tracing::debug!(status = %status, "Request rejected: {message}");
        return Err(ApiError::Api {
            status: status.as_u16(),
            message,
        });
    }
    response
        .json()
        .await
        .map_err(|e| ApiError::Serde(e.to_string()))
}

/// For endpoints whose success body is just a confirmation message.
pub(crate) async fn expect_success(response: reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        let message = extract_backend_message(response).await;
        tracing::debug!(status = %status, "Request rejected: {message}");
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// List endpoints answer either a bare JSON array or a paginated object
/// with a `results` field. Normalize both into a `Vec<T>`.
pub(crate) async fn extract_list<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Vec<T>, ApiError> {
    let value: serde_json::Value = into_json(response).await?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("results") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                return Err(ApiError::Serde(
                    "expected a list or a paginated object with results".to_string(),
                ));
            }
        },
        _ => {
            return Err(ApiError::Serde(
                "expected a list or a paginated object with results".to_string(),
            ));
        }
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| ApiError::Serde(e.to_string())))
        .collect()
}
