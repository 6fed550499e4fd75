use std::fmt;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(ErrorDetail),

    #[error("Access denied: {0}")]
    AccessDenied(ErrorDetail),

    #[error("Resource not found: {0}")]
    NotFound(ErrorDetail),

    #[error("Request rejected: {0}")]
    Rejected(ErrorDetail),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(ErrorDetail),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error body shape used by every mutation endpoint: `{"error": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// What a rejected response carried.
///
/// `message` is the server's `error` field and is the only part ever shown to
/// users. `body` is the truncated raw response, kept for logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDetail {
    pub message: Option<String>,
    pub body: String,
}

impl ErrorDetail {
    pub fn from_body(body: &str) -> Self {
        Self {
            message: ApiError::extract_message(body),
            body: ApiError::truncate_body(body),
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => f.write_str(message),
            None => f.write_str(&self.body),
        }
    }
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Pull the server's `error` message out of a JSON body, if there is one.
    fn extract_message(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = ErrorDetail::from_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized(detail),
            403 => ApiError::AccessDenied(detail),
            404 => ApiError::NotFound(detail),
            429 => ApiError::RateLimited,
            400..=499 => ApiError::Rejected(detail),
            500..=599 => ApiError::ServerError(detail),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, detail)),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// The server's own `error` message, when the response had one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized(d)
            | ApiError::AccessDenied(d)
            | ApiError::NotFound(d)
            | ApiError::Rejected(d)
            | ApiError::ServerError(d) => d.message.as_deref(),
            _ => None,
        }
    }

    /// Message suitable for a transient notification: the server's `error`
    /// field, or `fallback`. Raw bodies never reach the user.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_uses_server_error_field() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"error":"Invalid credentials"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.server_message(), Some("Invalid credentials"));
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
    }

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(ApiError::from_status(StatusCode::FORBIDDEN, ""), ApiError::AccessDenied(_)));
        assert!(matches!(ApiError::from_status(StatusCode::NOT_FOUND, ""), ApiError::NotFound(_)));
        assert!(matches!(ApiError::from_status(StatusCode::CONFLICT, ""), ApiError::Rejected(_)));
        assert!(matches!(ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""), ApiError::RateLimited));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream down"),
            ApiError::ServerError(ref d) if d.body == "upstream down" && d.message.is_none()
        ));
    }

    #[test]
    fn test_user_message_fallback() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "");
        assert_eq!(err.user_message("Failed to save employee"), "Failed to save employee");
        assert_eq!(ApiError::RateLimited.user_message("Try later"), "Try later");
    }

    #[test]
    fn test_raw_body_stays_out_of_user_message() {
        let html = "<html><body><h1>502 Bad Gateway</h1></body></html>";
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, html);
        assert_eq!(err.user_message("Login failed"), "Login failed");
        assert!(err.to_string().contains("502 Bad Gateway"));

        let other_json = r#"{"message":"Bad creds","code":17}"#;
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, other_json);
        assert_eq!(err.server_message(), None);
        assert_eq!(err.user_message("Login failed"), "Login failed");
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.contains("truncated, 520 total bytes"));
    }
}
