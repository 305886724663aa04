use std::env;
use std::sync::LazyLock;
use std::time::Duration;

/// Base URL of the marketplace REST API, without a trailing slash.
pub static MARKETPLACE_API_BASE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("MARKETPLACE_API_BASE_URL")
        .ok()
        .map(|s| s.trim_end_matches('/').to_string())
        .unwrap_or("http://localhost:8000/api".to_string())
});

/// Remaining validity below which an access token is treated as stale,
/// so a request issued on the fast path does not carry a token that dies
/// in flight.
pub static TOKEN_REFRESH_LEEWAY: LazyLock<i64> =
    LazyLock::new(|| parse_refresh_leeway(env::var("MARKETPLACE_TOKEN_REFRESH_LEEWAY").ok()));

/// Invalid or out-of-range values (negative, or beyond a day) fall back to
/// the default rather than poisoning later duration arithmetic.
fn parse_refresh_leeway(raw: Option<String>) -> i64 {
    raw.and_then(|s| s.parse().ok())
        .filter(|secs| (0..=86_400).contains(secs))
        .unwrap_or(30) // seconds
}

/// Runtime configuration for a [`crate::SessionManager`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub refresh_leeway_secs: i64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            refresh_leeway_secs: *TOKEN_REFRESH_LEEWAY,
        }
    }

    /// Configuration from `MARKETPLACE_*` environment variables, honoring
    /// a `.env` file when one is present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            base_url: MARKETPLACE_API_BASE_URL.clone(),
            refresh_leeway_secs: *TOKEN_REFRESH_LEEWAY,
        }
    }
}

pub(crate) fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(32)
        .build()
        .expect("Failed to create reqwest client")
}
