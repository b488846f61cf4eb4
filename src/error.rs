//! Error types for the Meridian SDK
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Errors fall into three kinds: validation errors raised before any
//! network call, transport errors wrapping HTTP/connection failures, and
//! task-failure errors for server-side jobs that completed with ERROR.

use thiserror::Error;

/// The main error type for the Meridian SDK
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Validation Errors (raised before any network call)
    // ============================================================================
    #[error("Validation error: {message}")]
    Validation { message: String },

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Session token refresh failed: {message}")]
    TokenRefresh { message: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Task Errors (server-side asynchronous jobs)
    // ============================================================================
    #[error("{operation} failed with errors: {messages:?}")]
    TaskFailed {
        operation: String,
        messages: Vec<String>,
    },

    #[error("Polling {uri} did not complete within {timeout_ms}ms")]
    PollTimeout { uri: String, timeout_ms: u64 },

    // ============================================================================
    // Not-Found Errors (typed, distinguishable from generic failures)
    // ============================================================================
    #[error("Project {uri} not found")]
    ProjectNotFound { uri: String },

    #[error("Role {uri} not found")]
    RoleNotFound { uri: String },

    #[error("User {account_id} is not in the project")]
    UserNotInProject { account_id: String },

    #[error("Integration for connector '{connector}' not found")]
    IntegrationNotFound { connector: String },

    #[error("Metadata object not found: {what}")]
    ObjectNotFound { what: String },

    #[error("Account {id} not found")]
    AccountNotFound { id: String },

    #[error("Expected a single {category} object, found {count}")]
    NonUniqueObject { category: String, count: usize },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a task failure error carrying the server's reported messages
    pub fn task_failed(operation: impl Into<String>, messages: Vec<String>) -> Self {
        Self::TaskFailed {
            operation: operation.into(),
            messages,
        }
    }

    /// True if the server responded with the given HTTP status
    pub fn is_status(&self, status: u16) -> bool {
        matches!(self, Error::HttpStatus { status: s, .. } if *s == status)
    }

    /// True if the server responded 404 Not Found
    pub fn is_not_found_status(&self) -> bool {
        self.is_status(404)
    }

    /// Check if this error is retryable at the transport level
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the Meridian SDK
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
