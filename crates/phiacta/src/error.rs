//! Error types for the Phiacta client.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::time::Duration;

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Rate limited by the API (429 response)
    #[error("Too many requests. Please wait a moment and try again.")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// The stored token was rejected (401 on an authenticated call)
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// An authenticated call was attempted without a stored token
    #[error("Not signed in. Run `phiacta login` first.")]
    NotAuthenticated,

    /// Resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from API
        message: String,
    },

    /// The API explained the failure in its `detail` field
    #[error("{detail}")]
    Api {
        /// HTTP status code
        status: u16,
        /// `detail` string from the JSON error body
        detail: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("API error: {status} {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// Reading or writing the token file failed
    #[error("Token store error: {0}")]
    TokenStore(#[from] std::io::Error),
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Create an error carrying the API's `detail` message.
    #[must_use]
    pub fn api(status: u16, detail: impl Into<String>) -> Self {
        Self::Api { status, detail: detail.into() }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Server { .. })
    }

    /// Get the retry-after duration if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }

    /// Whether the user has to sign in (again) to proceed.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::NotAuthenticated)
    }

    /// Whether the API refused the request itself (a 4xx other than 429).
    ///
    /// Outages, rate limits and transport failures are not refusals.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s) && s != 429)
    }

    /// HTTP status behind this error, when there is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::RateLimited { .. } => Some(429),
            Self::SessionExpired => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::BadRequest { .. } => Some(400),
            Self::Api { status, .. }
            | Self::Server { status, .. }
            | Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from command execution.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Error from the API client
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    /// Input validation failed
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local I/O failure (reading input files, stdin)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal logic error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Convert to a user-friendly error message for terminal output.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Client(ClientError::RateLimited { retry_after }) => {
                format!(
                    "Too many requests. Please wait {:?} before trying again.",
                    retry_after
                )
            }
            Self::Client(ClientError::NotFound { resource }) => {
                format!("Not found: {resource}. Please check the ID is correct.")
            }
            Self::Client(
                err @ (ClientError::SessionExpired
                | ClientError::NotAuthenticated
                | ClientError::Api { .. }),
            ) => err.to_string(),
            Self::Validation { field, message } => {
                format!("Invalid input for '{field}': {message}")
            }
            _ => self.to_string(),
        }
    }
}

/// A string did not name any variant of an enumeration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    #[must_use]
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self { kind, value: value.into() }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for command operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_retryable() {
        assert!(ClientError::rate_limited(60).is_retryable());
        assert!(ClientError::server(500, "Internal error").is_retryable());

        assert!(!ClientError::not_found("claim123").is_retryable());
        assert!(!ClientError::bad_request("invalid query").is_retryable());
        assert!(!ClientError::SessionExpired.is_retryable());
    }

    #[test]
    fn test_client_error_retry_after() {
        let err = ClientError::rate_limited(60);
        assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));

        let err = ClientError::not_found("claim");
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn test_api_error_shows_detail_only() {
        let err = ClientError::api(422, "Namespace does not exist");
        assert_eq!(err.to_string(), "Namespace does not exist");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_only_client_errors_are_rejections() {
        assert!(ClientError::api(403, "Forbidden").is_rejection());
        assert!(ClientError::not_found("agent").is_rejection());
        assert!(!ClientError::server(503, "down").is_rejection());
        assert!(!ClientError::rate_limited(5).is_rejection());
        assert!(!ClientError::TokenStore(std::io::ErrorKind::Other.into()).is_rejection());
    }

    #[test]
    fn test_session_errors_require_login() {
        assert!(ClientError::SessionExpired.requires_login());
        assert!(ClientError::NotAuthenticated.requires_login());
        assert!(!ClientError::rate_limited(1).requires_login());
    }

    #[test]
    fn test_app_error_user_message() {
        let err = AppError::validation("content", "cannot be empty");
        assert!(err.to_user_message().contains("content"));
        assert!(err.to_user_message().contains("cannot be empty"));

        let err = AppError::from(ClientError::SessionExpired);
        assert_eq!(err.to_user_message(), "Session expired. Please log in again.");
    }
}
