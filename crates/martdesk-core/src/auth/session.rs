use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, AuthFailureHook};
use crate::models::{Role, UserProfile};

/// Message shown when the server gives no reason for a failed login
const LOGIN_FAILED: &str = "Login failed";

/// Who is logged in, as seen by every consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Session {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    pub is_authenticated: bool,
}

/// Where the session is in its verification lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum AuthPhase {
    /// Nothing checked yet (process start)
    #[default]
    Unknown,
    /// `check_auth` in flight
    Checking,
    Authenticated,
    Unauthenticated,
}

/// Result of `SessionStore::login`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success(UserProfile),
    Failed(String),
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoginOutcome::Success(_) => None,
            LoginOutcome::Failed(message) => Some(message),
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    session: Session,
    phase: AuthPhase,
}

impl SessionState {
    fn clear(&mut self) {
        self.session = Session::default();
        self.phase = AuthPhase::Unauthenticated;
    }
}

/// Single source of truth for "who is logged in".
///
/// Cloning shares the same state. Reads and writes are synchronous; the lock
/// is never held across a network call, so concurrent operations resolve
/// last-write-wins.
#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
    state: Arc<RwLock<SessionState>>,
}

impl SessionStore {
    /// Create an empty session bound to `api`. The store registers itself
    /// with the gateway so a rejected token clears the in-memory session.
    pub fn new(api: ApiClient) -> Self {
        let store = Self {
            api,
            state: Arc::new(RwLock::new(SessionState::default())),
        };
        store.api.on_auth_failure(store.auth_failure_hook());
        store
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn read_state<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.read_state(|s| s.session.clone())
    }

    pub fn phase(&self) -> AuthPhase {
        self.read_state(|s| s.phase)
    }

    /// True until the first verification has resolved, and while one is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self.phase(), AuthPhase::Unknown | AuthPhase::Checking)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_state(|s| s.session.is_authenticated)
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read_state(|s| s.session.user.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.read_state(|s| s.session.user.as_ref().map(|u| u.role))
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role() == Some(role)
    }

    /// Hook that drops the in-memory session. Registered with the gateway
    /// by `new`; exposed for gateways built separately.
    ///
    /// A session already holding a different token (a login that landed
    /// after the rejected request went out) is left alone.
    pub fn auth_failure_hook(&self) -> AuthFailureHook {
        let state = Arc::clone(&self.state);
        Arc::new(move |rejected: &str| {
            let mut state = state.write().unwrap_or_else(PoisonError::into_inner);
            match state.session.token.as_deref() {
                Some(current) if current != rejected => {
                    debug!("Rejected token already replaced, keeping session");
                }
                _ => {
                    state.clear();
                    info!("Session cleared after authentication failure");
                }
            }
        })
    }

    /// Authenticate with email and password.
    ///
    /// On success the token is persisted before the session flips to
    /// authenticated. On failure the session is left untouched and the
    /// server's message (or a generic one) is returned.
    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        let response = match self.api.login(email, password).await {
            Ok(response) => response,
            Err(e) => {
                warn!(email, error = %e, "Login rejected");
                self.with_state(|s| {
                    if !s.session.is_authenticated {
                        s.phase = AuthPhase::Unauthenticated;
                    }
                });
                return LoginOutcome::Failed(e.user_message(LOGIN_FAILED));
            }
        };

        if response.token.is_empty() {
            warn!(email, "Login response carried an empty token");
            return LoginOutcome::Failed(LOGIN_FAILED.to_string());
        }

        if let Err(e) = self.api.tokens().set(&response.token) {
            warn!(error = %e, "Failed to persist session token");
            return LoginOutcome::Failed("Could not save session".to_string());
        }

        let user = response.user;
        self.with_state(|s| {
            s.session = Session {
                user: Some(user.clone()),
                token: Some(response.token),
                is_authenticated: true,
            };
            s.phase = AuthPhase::Authenticated;
        });
        info!(user_id = %user.id, role = user.role.as_str(), "Logged in");
        LoginOutcome::Success(user)
    }

    /// Clear the session and the persisted token. No network call; safe to
    /// call repeatedly.
    pub fn logout(&self) {
        self.with_state(SessionState::clear);
        if let Err(e) = self.api.tokens().remove() {
            warn!(error = %e, "Failed to remove persisted token");
        }
        info!("Logged out");
    }

    /// Replace the cached profile without a round trip. `None` marks the
    /// session unauthenticated; the token is left as is.
    pub fn set_user(&self, user: Option<UserProfile>) {
        self.with_state(|s| {
            s.session.is_authenticated = user.is_some();
            s.phase = if user.is_some() {
                AuthPhase::Authenticated
            } else {
                AuthPhase::Unauthenticated
            };
            s.session.user = user;
        });
    }

    /// Verify the persisted token against `/auth/me`.
    ///
    /// No token means no request. Any failure, including a network error,
    /// clears the session and the persisted token.
    pub async fn check_auth(&self) -> bool {
        self.with_state(|s| s.phase = AuthPhase::Checking);

        let token = match self.api.tokens().get() {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => {
                debug!("No persisted token");
                self.with_state(SessionState::clear);
                return false;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token");
                self.fail_closed();
                return false;
            }
        };

        match self.api.fetch_me().await {
            Ok(user) => {
                debug!(user_id = %user.id, "Session verified");
                self.with_state(|s| {
                    s.session = Session {
                        user: Some(user),
                        token: Some(token),
                        is_authenticated: true,
                    };
                    s.phase = AuthPhase::Authenticated;
                });
                true
            }
            Err(e) => {
                warn!(error = %e, "Session verification failed");
                self.fail_closed();
                false
            }
        }
    }

    fn fail_closed(&self) {
        self.with_state(SessionState::clear);
        if let Err(e) = self.api.tokens().remove() {
            warn!(error = %e, "Failed to remove persisted token");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryTokenStore, TokenStore};

    fn offline_store() -> SessionStore {
        // Nothing listens on port 9; only used by tests that never hit the network
        let api = ApiClient::new("http://127.0.0.1:9", Arc::new(MemoryTokenStore::new())).unwrap();
        SessionStore::new(api)
    }

    fn profile(role: Role) -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            email: "ana@shop.test".to_string(),
            role,
        }
    }

    #[test]
    fn test_new_store_is_empty_and_loading() {
        let store = offline_store();
        assert_eq!(store.session(), Session::default());
        assert_eq!(store.phase(), AuthPhase::Unknown);
        assert!(store.is_loading());
    }

    #[test]
    fn test_set_user_follows_argument() {
        let store = offline_store();
        store.set_user(Some(profile(Role::Admin)));
        assert!(store.is_authenticated());
        assert!(store.has_role(Role::Admin));
        assert!(!store.is_loading());

        store.set_user(None);
        assert!(!store.is_authenticated());
        assert_eq!(store.user(), None);
        assert_eq!(store.phase(), AuthPhase::Unauthenticated);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let store = offline_store();
        store.api().tokens().set("tok").unwrap();
        store.set_user(Some(profile(Role::Employee)));

        store.logout();
        store.logout();
        assert_eq!(store.session(), Session::default());
        assert_eq!(store.api().tokens().get().unwrap(), None);
    }

    #[test]
    fn test_auth_failure_hook_clears_state() {
        let store = offline_store();
        store.set_user(Some(profile(Role::Employee)));
        (store.auth_failure_hook())("old");
        assert!(!store.is_authenticated());
        assert_eq!(store.phase(), AuthPhase::Unauthenticated);
    }

    #[test]
    fn test_auth_failure_hook_spares_newer_session() {
        let store = offline_store();
        store.with_state(|s| {
            s.session = Session {
                user: Some(profile(Role::Admin)),
                token: Some("fresh".to_string()),
                is_authenticated: true,
            };
            s.phase = AuthPhase::Authenticated;
        });

        (store.auth_failure_hook())("stale");
        assert!(store.is_authenticated());
        assert_eq!(store.session().token.as_deref(), Some("fresh"));

        (store.auth_failure_hook())("fresh");
        assert!(!store.is_authenticated());
        assert_eq!(store.session(), Session::default());
    }

    #[tokio::test]
    async fn test_check_auth_without_token() {
        let store = offline_store();
        assert!(!store.check_auth().await);
        assert_eq!(store.phase(), AuthPhase::Unauthenticated);
    }

    #[tokio::test]
    async fn test_check_auth_network_error_fails_closed() {
        let store = offline_store();
        store.api().tokens().set("tok").unwrap();
        assert!(!store.check_auth().await);
        assert_eq!(store.api().tokens().get().unwrap(), None);
    }

    #[test]
    fn test_login_outcome_accessors() {
        let ok = LoginOutcome::Success(profile(Role::Admin));
        assert!(ok.is_success());
        assert_eq!(ok.error(), None);
        let failed = LoginOutcome::Failed("Invalid credentials".to_string());
        assert_eq!(failed.error(), Some("Invalid credentials"));
    }
}
