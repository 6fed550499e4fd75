//! Authentication module for managing the staff session.
//!
//! This module provides:
//! - `SessionStore`: login/logout/check-auth and the shared `Session`
//! - `TokenStore`: where the bearer token is persisted (`MemoryTokenStore`,
//!   `FileTokenStore`, `KeyringTokenStore`)
//! - `RouteGuard`: gate that redirects unauthenticated or under-privileged users

pub mod credentials;
pub mod guard;
pub mod session;
pub mod token_store;

pub use credentials::KeyringTokenStore;
pub use guard::{GuardDecision, RouteGuard};
pub use session::{AuthPhase, LoginOutcome, Session, SessionStore};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
