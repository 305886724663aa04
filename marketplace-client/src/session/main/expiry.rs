use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

/// Claims we read from the access token. Only `exp` matters here.
#[derive(Debug, Deserialize)]
struct AccessClaims {
    exp: i64,
}

/// Decode the access token's `exp` claim without verifying the signature.
///
/// This judgement is for refresh scheduling only and must never be treated
/// as an authorization decision: the backend verifies the signature on
/// every request and remains the sole authority. Returns `None` when the
/// token cannot be parsed or carries no usable `exp`.
pub(crate) fn decode_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let decoded = jsonwebtoken::decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(&[]),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("Failed to decode access token claims: {e}");
        e
    })
    .ok()?;

    DateTime::from_timestamp(decoded.claims.exp, 0)
}
