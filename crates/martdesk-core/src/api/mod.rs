//! REST API gateway for the supermarket back-office service.
//!
//! This module provides the `ApiClient`, the single egress point for every
//! API call. It attaches the persisted bearer token to outgoing requests and
//! notifies registered observers when the server rejects that token.

pub mod client;
pub mod error;

pub use client::{ApiClient, AuthFailureHook, DEFAULT_API_ORIGIN, REQUEST_TIMEOUT_SECS};
pub use error::{ApiError, ErrorDetail};
