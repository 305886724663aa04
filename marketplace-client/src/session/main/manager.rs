use std::sync::Mutex as StdMutex;
use std::sync::MutexGuard;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Duration, Utc};
use tokio::sync::Mutex as AsyncMutex;

use crate::config::{ClientConfig, build_http_client};
use crate::session::config::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::session::errors::AuthError;
use crate::session::main::expiry::decode_expiry;
use crate::session::types::{LoginCredentials, RefreshResponse, TokenPairResponse, User};
use crate::storage::TokenStore;

/// Local judgement of the stored access token, made without a network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenState {
    Missing,
    Fresh,
    Stale,
}

/// Owns the access/refresh token pair and the cached identity.
///
/// Exactly one instance should exist per client context; construct it at
/// application start and hand it by reference to every API-calling
/// component. All token and cached-user mutation happens here, dependents
/// only ever read.
pub struct SessionManager {
    client: reqwest::Client,
    base_url: String,
    refresh_leeway: Duration,
    store: StdMutex<Box<dyn TokenStore>>,
    user: StdMutex<Option<User>>,
    /// Bumped on every login and logout. A refresh finishing under an older
    /// generation discards its result instead of writing it back, so an
    /// explicit logout can never be resurrected by an in-flight refresh.
    generation: AtomicU64,
    /// Gate ensuring at most one refresh request is in flight. Callers that
    /// find the token stale queue here and re-check freshness once they hold
    /// the gate, so N concurrent stale observers coalesce onto one refresh.
    refresh_gate: AsyncMutex<()>,
}

impl SessionManager {
    pub fn new(config: ClientConfig, store: Box<dyn TokenStore>) -> Self {
        Self {
            client: build_http_client(),
            base_url: config.base_url,
            refresh_leeway: Duration::try_seconds(config.refresh_leeway_secs)
                .unwrap_or_else(|| Duration::seconds(30)),
            store: StdMutex::new(store),
            user: StdMutex::new(None),
            generation: AtomicU64::new(0),
            refresh_gate: AsyncMutex::new(()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The shared HTTP client. API modules build their requests on this and
    /// hand them to [`Self::send_authorized`].
    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange credentials for a token pair, then fetch and cache the
    /// identity. Credential rejection is not retried.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, AuthError> {
        let response = self
            .client
            .post(self.endpoint("/auth/login/"))
            .json(credentials)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            let message = extract_backend_message(response).await;
            tracing::debug!("Login rejected: {message}");
            return Err(AuthError::InvalidCredentials(message));
        }
        if !status.is_success() {
            return Err(AuthError::Network(format!("login failed with status {status}")));
        }

        let tokens: TokenPairResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        // A fresh generation: any refresh still in flight for the previous
        // session must not write over this one.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut store = self.lock_store();
            store.put(ACCESS_TOKEN_KEY, &tokens.access)?;
            store.put(REFRESH_TOKEN_KEY, &tokens.refresh)?;
        }

        let user = match self.fetch_identity(&tokens.access).await {
            Ok(user) => user,
            Err(e) => {
                self.teardown(generation);
                return Err(e);
            }
        };
        if self.generation.load(Ordering::SeqCst) != generation {
            // Logged out (or re-logged-in) while the identity fetch was in
            // flight. The tokens are already gone; do not cache the user.
            tracing::debug!("Discarding login result from a superseded session");
            return Err(AuthError::NotAuthenticated);
        }
        if user.is_blocked {
            tracing::warn!(username = %user.username, "Login succeeded but account is blocked");
            self.teardown(generation);
            return Err(AuthError::InvalidCredentials("Account is blocked".to_string()));
        }

        *self.lock_user() = Some(user.clone());
        tracing::debug!(username = %user.username, "Session established");
        Ok(user)
    }

    /// Clear both tokens and the cached user. Idempotent, never fails, and
    /// never waits on network I/O: a hung refresh cannot delay logout.
    pub fn logout(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut store = self.lock_store();
        if let Err(e) = store.remove(ACCESS_TOKEN_KEY) {
            tracing::warn!("Failed to remove access token on logout: {e}");
        }
        if let Err(e) = store.remove(REFRESH_TOKEN_KEY) {
            tracing::warn!("Failed to remove refresh token on logout: {e}");
        }
        drop(store);
        *self.lock_user() = None;
        tracing::debug!("Session cleared");
    }

    /// Pure read of the cached identity. No network access, no side effects.
    pub fn current_user(&self) -> Option<User> {
        self.lock_user().clone()
    }

    /// The contract every authenticated call must go through before
    /// attaching a bearer credential.
    ///
    /// Fast path: the stored token's `exp` claim (decoded locally, one
    /// parse) is comfortably in the future and the call returns with no
    /// side effect. Absent token fails with [`AuthError::NotAuthenticated`].
    /// A stale token triggers a single coalesced refresh; refresh failure
    /// tears the session down and fails with [`AuthError::SessionExpired`].
    pub async fn ensure_fresh_access_token(&self) -> Result<(), AuthError> {
        match self.access_token_state()? {
            TokenState::Missing => Err(AuthError::NotAuthenticated),
            TokenState::Fresh => Ok(()),
            TokenState::Stale => {
                let generation = self.generation.load(Ordering::SeqCst);
                let _gate = self.refresh_gate.lock().await;
                // Whoever held the gate before us may already have refreshed.
                match self.access_token_state()? {
                    TokenState::Missing => Err(AuthError::NotAuthenticated),
                    TokenState::Fresh => Ok(()),
                    TokenState::Stale => self.refresh_holding_gate(generation).await,
                }
            }
        }
    }

    /// Perform an authenticated request: ensure freshness, attach the bearer
    /// token, forward. On freshness failure the request is never sent.
    pub async fn send_authorized(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, AuthError> {
        self.ensure_fresh_access_token().await?;
        let access = self
            .lock_store()
            .get(ACCESS_TOKEN_KEY)?
            .ok_or(AuthError::NotAuthenticated)?;
        request
            .bearer_auth(access)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))
    }

    /// Promote a persisted token pair into a live session at process start.
    ///
    /// Returns `Ok(None)` when no token is stored (stay logged out). A
    /// stored but stale token goes through the refresh path; failure of
    /// either path leaves the session torn down.
    pub async fn restore(&self) -> Result<Option<User>, AuthError> {
        match self.ensure_fresh_access_token().await {
            Err(AuthError::NotAuthenticated) => return Ok(None),
            Err(e) => return Err(e),
            Ok(()) => {}
        }

        // The refresh path caches the user itself; the fast path has not
        // confirmed the identity yet.
        if let Some(user) = self.current_user() {
            return Ok(Some(user));
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let access = self
            .lock_store()
            .get(ACCESS_TOKEN_KEY)?
            .ok_or(AuthError::NotAuthenticated)?;
        match self.fetch_identity(&access).await {
            Ok(user) if !user.is_blocked => {
                if self.generation.load(Ordering::SeqCst) != generation {
                    return Err(AuthError::NotAuthenticated);
                }
                *self.lock_user() = Some(user.clone());
                Ok(Some(user))
            }
            Ok(user) => {
                tracing::warn!(username = %user.username, "Stored session belongs to a blocked account");
                self.teardown(generation);
                Err(AuthError::SessionExpired)
            }
            Err(e) => {
                tracing::debug!("Identity fetch during restore failed: {e}");
                self.teardown(generation);
                Err(AuthError::SessionExpired)
            }
        }
    }

    /// Refresh the access token and re-confirm the identity. Caller must
    /// hold the refresh gate. Never retried: a rejected refresh token must
    /// not be presented again.
    async fn refresh_holding_gate(&self, generation: u64) -> Result<(), AuthError> {
        let Some(refresh_token) = self.lock_store().get(REFRESH_TOKEN_KEY)? else {
            // Half a session is not a session.
            self.teardown(generation);
            return Err(AuthError::SessionExpired);
        };

        tracing::debug!("Access token stale, refreshing");
        let result = self
            .client
            .post(self.endpoint("/auth/token/refresh/"))
            .json(&serde_json::json!({ "refresh": refresh_token }))
            .send()
            .await;

        let refreshed: RefreshResponse = match result {
            Ok(response) if response.status().is_success() => {
                match response.json().await {
                    Ok(body) => body,
                    Err(e) => {
                        tracing::debug!("Malformed refresh response: {e}");
                        self.teardown(generation);
                        return Err(AuthError::SessionExpired);
                    }
                }
            }
            Ok(response) => {
                tracing::debug!(status = %response.status(), "Refresh token rejected");
                self.teardown(generation);
                return Err(AuthError::SessionExpired);
            }
            Err(e) => {
                tracing::debug!("Refresh transport failure: {e}");
                self.teardown(generation);
                return Err(AuthError::SessionExpired);
            }
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            // Logged out (or re-logged-in) while the exchange was in
            // flight. Discard the minted token.
            tracing::debug!("Discarding refresh result from a superseded session");
            return Err(AuthError::NotAuthenticated);
        }

        {
            let mut store = self.lock_store();
            store.put(ACCESS_TOKEN_KEY, &refreshed.access)?;
            if let Some(rotated) = &refreshed.refresh {
                store.put(REFRESH_TOKEN_KEY, rotated)?;
            }
        }

        // The token exchange succeeding is not enough: the account may have
        // been blocked or deleted since. Confirm before declaring victory.
        match self.fetch_identity(&refreshed.access).await {
            Ok(user) if !user.is_blocked => {
                if self.generation.load(Ordering::SeqCst) != generation {
                    return Err(AuthError::NotAuthenticated);
                }
                *self.lock_user() = Some(user);
                Ok(())
            }
            Ok(user) => {
                tracing::warn!(username = %user.username, "Account blocked, tearing down session");
                self.teardown(generation);
                Err(AuthError::SessionExpired)
            }
            Err(e) => {
                tracing::debug!("Identity fetch after refresh failed: {e}");
                self.teardown(generation);
                Err(AuthError::SessionExpired)
            }
        }
    }

    async fn fetch_identity(&self, access_token: &str) -> Result<User, AuthError> {
        let response = self
            .client
            .get(self.endpoint("/auth/me/"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Network(format!(
                "identity fetch failed with status {status}"
            )));
        }
        response
            .json()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))
    }

    fn access_token_state(&self) -> Result<TokenState, AuthError> {
        let Some(token) = self.lock_store().get(ACCESS_TOKEN_KEY)? else {
            return Ok(TokenState::Missing);
        };
        match decode_expiry(&token) {
            // An undecodable token cannot be judged fresh; send it down the
            // refresh path rather than attaching it to requests.
            None => Ok(TokenState::Stale),
            Some(expires_at) if expires_at - self.refresh_leeway <= Utc::now() => {
                Ok(TokenState::Stale)
            }
            Some(_) => Ok(TokenState::Fresh),
        }
    }

    /// Clear tokens and user, but only if `generation` is still the live
    /// one. A teardown racing a newer login must not wipe the new session.
    fn teardown(&self, generation: u64) {
        if self
            .generation
            .compare_exchange(generation, generation + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }
        let mut store = self.lock_store();
        if let Err(e) = store.remove(ACCESS_TOKEN_KEY) {
            tracing::warn!("Failed to remove access token on teardown: {e}");
        }
        if let Err(e) = store.remove(REFRESH_TOKEN_KEY) {
            tracing::warn!("Failed to remove refresh token on teardown: {e}");
        }
        drop(store);
        *self.lock_user() = None;
    }

    fn lock_store(&self) -> MutexGuard<'_, Box<dyn TokenStore>> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_user(&self) -> MutexGuard<'_, Option<User>> {
        self.user.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Pull the human-readable message out of a backend error body. The backend
/// uses `detail` for auth failures and `message` elsewhere.
pub(crate) async fn extract_backend_message(response: reqwest::Response) -> String {
    let fallback = format!("Request failed with status {}", response.status());
    let Ok(body) = response.json::<serde_json::Value>().await else {
        return fallback;
    };
    body.get("detail")
        .or_else(|| body.get("message"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or(fallback)
}
