//! martdesk-core: client library for the supermarket back-office API.
//!
//! The pieces every console view builds on:
//!
//! - [`api::ApiClient`]: the gateway all requests pass through. It stamps
//!   the persisted bearer token on each request and reports rejected tokens
//!   to registered observers.
//! - [`auth::SessionStore`]: who is logged in (`login`, `logout`,
//!   `check_auth`, `set_user`).
//! - [`auth::RouteGuard`]: decides whether a protected view renders or
//!   redirects.
//! - [`validation`]: form checks that run before anything is sent.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod nav;
pub mod utils;
pub mod validation;

pub use api::{ApiClient, ApiError};
pub use auth::{GuardDecision, LoginOutcome, RouteGuard, Session, SessionStore, TokenStore};
pub use config::Config;
