//! Axum mock of the marketplace backend's auth surface (plus a couple of
//! bearer-protected endpoints), bound to an ephemeral port per test so
//! tests stay independent of each other.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

pub const TEST_USERNAME: &str = "wanjiku";
pub const TEST_PASSWORD: &str = "correct-horse";
const SIGNING_KEY: &[u8] = b"mock-backend-signing-key";

/// Shared, test-adjustable backend state.
#[derive(Clone, Default)]
pub struct MockState {
    pub login_calls: Arc<AtomicUsize>,
    pub refresh_calls: Arc<AtomicUsize>,
    pub me_calls: Arc<AtomicUsize>,
    /// Refresh endpoint answers 401 when set.
    pub reject_refresh: Arc<AtomicBool>,
    /// `/auth/me/` reports the account blocked when set.
    pub user_blocked: Arc<AtomicBool>,
    /// Lifetime of minted access tokens, seconds. Negative mints tokens
    /// that are already expired.
    pub access_ttl_secs: Arc<AtomicI64>,
    /// Artificial delay before the refresh endpoint responds, millis.
    pub refresh_delay_ms: Arc<AtomicI64>,
    /// Artificial delay before `/auth/me/` responds, millis.
    pub me_delay_ms: Arc<AtomicI64>,
}

pub struct MockBackend {
    /// Base URL including the `/api` prefix, ready for `ClientConfig::new`.
    pub base_url: String,
    pub state: MockState,
    handle: tokio::task::JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        init_tracing();
        let state = MockState {
            access_ttl_secs: Arc::new(AtomicI64::new(3600)),
            ..MockState::default()
        };

        let app = Router::new()
            .route("/api/auth/login/", post(login))
            .route("/api/auth/token/refresh/", post(refresh))
            .route("/api/auth/me/", get(me))
            .route("/api/products/", get(products))
            .route("/api/categories/", get(categories))
            .route("/api/cart/", get(cart))
            .route("/api/orders/checkout/", post(checkout))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend serve");
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
            handle,
        }
    }

    pub fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn me_calls(&self) -> usize {
        self.state.me_calls.load(Ordering::SeqCst)
    }

    /// Mint tokens that are already expired from now on.
    pub fn issue_expired_access_tokens(&self) {
        self.state.access_ttl_secs.store(-600, Ordering::SeqCst);
    }

    pub fn issue_fresh_access_tokens(&self) {
        self.state.access_ttl_secs.store(3600, Ordering::SeqCst);
    }

    pub fn set_reject_refresh(&self, reject: bool) {
        self.state.reject_refresh.store(reject, Ordering::SeqCst);
    }

    pub fn set_user_blocked(&self, blocked: bool) {
        self.state.user_blocked.store(blocked, Ordering::SeqCst);
    }

    pub fn set_refresh_delay(&self, delay: Duration) {
        self.state
            .refresh_delay_ms
            .store(delay.as_millis() as i64, Ordering::SeqCst);
    }

    pub fn set_me_delay(&self, delay: Duration) {
        self.state
            .me_delay_ms
            .store(delay.as_millis() as i64, Ordering::SeqCst);
    }

    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn mint_access_token(state: &MockState) -> String {
    let ttl = state.access_ttl_secs.load(Ordering::SeqCst);
    let exp = Utc::now().timestamp() + ttl;
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &json!({"token_type": "access", "user_id": 42, "exp": exp}),
        &EncodingKey::from_secret(SIGNING_KEY),
    )
    .expect("token encoding")
}

fn user_body(state: &MockState) -> Value {
    json!({
        "id": 42,
        "username": TEST_USERNAME,
        "email": "wanjiku@example.com",
        "first_name": "Grace",
        "last_name": "Wanjiku",
        "role": "customer",
        "is_blocked": state.user_blocked.load(Ordering::SeqCst),
        "phone_number": "254700000001",
        "created_at": "2025-04-01T09:30:00Z"
    })
}

async fn login(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.login_calls.fetch_add(1, Ordering::SeqCst);

    let username = body.get("username").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);
    if username != Some(TEST_USERNAME) || password != Some(TEST_PASSWORD) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "access": mint_access_token(&state),
            "refresh": "mock-refresh-token",
        })),
    )
}

async fn refresh(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    let delay = state.refresh_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay as u64)).await;
    }

    if state.reject_refresh.load(Ordering::SeqCst)
        || body.get("refresh").and_then(Value::as_str) != Some("mock-refresh-token")
    {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired"})),
        );
    }

    // A just-minted refresh result is always fresh regardless of the TTL
    // knob, so refresh tests can distinguish the old token from the new.
    let exp = Utc::now().timestamp() + 3600;
    let access = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &json!({"token_type": "access", "user_id": 42, "exp": exp}),
        &EncodingKey::from_secret(SIGNING_KEY),
    )
    .expect("token encoding");

    (StatusCode::OK, Json(json!({ "access": access })))
}

fn bearer_present(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("Bearer "))
        .unwrap_or(false)
}

async fn me(State(state): State<MockState>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    state.me_calls.fetch_add(1, Ordering::SeqCst);

    let delay = state.me_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay as u64)).await;
    }

    if !bearer_present(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Authentication credentials were not provided."})),
        );
    }
    (StatusCode::OK, Json(user_body(&state)))
}

/// Paginated listing, exercising the client's `results` normalization.
async fn products() -> Json<Value> {
    Json(json!({
        "count": 1,
        "next": null,
        "previous": null,
        "results": [{
            "id": "0b2f4a66-91a1-4a8e-8a39-50d2ff5c2a5f",
            "name": "Solar lantern",
            "price": "1499.00",
            "category": 3,
            "category_name": "Electronics",
            "images": ["lanterns/front.jpg"],
            "videos": [],
            "status": "approved",
            "date_posted": "2025-05-10T12:00:00Z",
            "owner_name": "Grace Wanjiku"
        }]
    }))
}

/// Unpaginated listing, the bare-array form of the same normalization.
async fn categories() -> Json<Value> {
    Json(json!([
        {"id": 3, "name": "Electronics", "description": "Gadgets and appliances", "products_count": 12},
        {"id": 4, "name": "Clothing", "products_count": 7}
    ]))
}

/// The mock cart is always empty, so checkout always answers the backend's
/// 400 with a `message` body.
async fn checkout(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !bearer_present(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Authentication credentials were not provided."})),
        );
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"message": "Cart is empty"})),
    )
}

async fn cart(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !bearer_present(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Authentication credentials were not provided."})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "id": 9,
            "user": 42,
            "items": [],
            "total": "0.00",
            "items_count": 0
        })),
    )
}
