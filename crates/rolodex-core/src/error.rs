//! Error types for the rolodex client libraries.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, API, storage, and input validation errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for rolodex operations.
///
/// This error type covers all possible failure modes in the library,
/// with explicit variants to allow callers to handle specific cases.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (missing tokens, rejected refresh, expired session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-auth HTTP errors reported by the backend.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Credential store errors (I/O, serialization).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation errors (invalid backend URL, unserializable body).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Check if this error is terminal for the session (the caller should
    /// redirect to a login surface).
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth(_))
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// DNS resolution failed.
    #[error("DNS resolution failed: {host}")]
    Dns { host: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
///
/// Every variant implies the session has already been logged out as a side
/// effect by the time the error reaches the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// A refresh was attempted with no refresh token present.
    #[error("no refresh token")]
    MissingRefreshToken,

    /// The backend rejected the refresh exchange.
    #[error("refresh rejected by backend")]
    RefreshRejected,

    /// The retried request still failed authorization after a successful
    /// refresh.
    #[error("session expired")]
    SessionExpired,

    /// Invalid login credentials.
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// A non-auth HTTP error response from the backend.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Machine-readable error code (if present).
    pub error: Option<String>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }
}

/// Credential store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[error("storage I/O failed: {message}")]
    Io { message: String },

    /// Persisted credentials could not be serialized or deserialized.
    #[error("invalid persisted credentials: {message}")]
    Serialization { message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid backend URL format.
    #[error("invalid backend URL '{value}': {reason}")]
    BackendUrl { value: String, reason: String },

    /// A request body that could not be serialized to JSON. Raised before
    /// any network traffic.
    #[error("request body could not be serialized: {message}")]
    RequestBody { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_status_and_message() {
        let err = ApiError::new(404, Some("NotFound".into()), Some("no such contact".into()));
        let rendered = err.to_string();
        assert!(rendered.contains("404"));
        assert!(rendered.contains("NotFound"));
        assert!(rendered.contains("no such contact"));
    }

    #[test]
    fn api_error_display_bare_status() {
        let err = ApiError::new(500, None, None);
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[test]
    fn auth_errors_are_terminal() {
        let err = Error::Auth(AuthError::SessionExpired);
        assert!(err.is_auth_error());

        let err = Error::Transport(TransportError::Timeout);
        assert!(!err.is_auth_error());
    }
}
