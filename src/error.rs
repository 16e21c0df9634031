//! Error types and handling for the route engine.
//!
//! Errors are split between registration time (a pattern that cannot be
//! compiled, a handler registry that fails to enumerate) and resolution time
//! (a route string that is structurally invalid). A route that simply matches
//! nothing is **not** an error: resolution returns `Ok(None)` for that case.
//!
//! # Design
//!
//! This module uses an opaque `Error` struct paired with an `ErrorKind` enum,
//! following the `std::io::Error` pattern. Internal error sources can change
//! without breaking consumers.
//!
//! # Example
//!
//! ```rust
//! use route_conf::{Error, ErrorKind};
//!
//! let error = Error::malformed_pattern("duplicate parameter `id`");
//!
//! match error.kind() {
//!     ErrorKind::MalformedPattern => println!("Bad pattern: {}", error),
//!     ErrorKind::InvalidRoute => println!("Bad route: {}", error),
//!     _ => println!("Other error: {}", error),
//! }
//!
//! use axum::http::StatusCode;
//! assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The kind of error that occurred.
///
/// This enum is marked `#[non_exhaustive]`, so new variants may be added
/// without breaking existing code. Always include a wildcard arm when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A route pattern could not be compiled (empty, duplicate or invalid
    /// parameter name, empty segment, stray angle bracket).
    #[error("malformed pattern")]
    MalformedPattern,

    /// A route string handed to the resolver is structurally invalid.
    #[error("invalid route")]
    InvalidRoute,

    /// A handler registry failed while enumerating handlers or actions.
    #[error("handler registry error")]
    Registry,

    /// Configuration error (invalid TOML, missing values).
    #[error("configuration error")]
    Configuration,

    /// I/O error (configuration file reads).
    #[error("I/O error")]
    Io,

    /// Internal/unexpected error.
    #[error("internal error")]
    Internal,
}

/// An error that can occur in the route-conf library.
///
/// Use [`Error::kind()`] to determine the category of error for matching,
/// and the `Display` implementation to get a human-readable message.
///
/// ```rust
/// use route_conf::Error;
///
/// let err = Error::invalid_route("route contains control characters");
/// let err = Error::config("default_handler must not be empty");
/// ```
pub struct Error {
    kind: ErrorKind,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl Error {
    /// Creates a new error with the given kind and source.
    ///
    /// ```rust
    /// use route_conf::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::Internal, "something went wrong");
    /// assert_eq!(err.kind(), ErrorKind::Internal);
    /// ```
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            kind,
            source: error.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Stable code rendered as `error_code` in JSON responses.
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ErrorKind::MalformedPattern => "MALFORMED_PATTERN",
            ErrorKind::InvalidRoute => "INVALID_ROUTE",
            ErrorKind::Registry => "REGISTRY_ERROR",
            ErrorKind::Configuration => "CONFIG_ERROR",
            ErrorKind::Io => "IO_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Status used when the error is answered over HTTP. Only malformed
    /// routes are the client's fault.
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::InvalidRoute => StatusCode::BAD_REQUEST,
            ErrorKind::MalformedPattern
            | ErrorKind::Registry
            | ErrorKind::Configuration
            | ErrorKind::Io
            | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into a structured error response.
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_code(), self.to_string())
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Error {
    /// Creates a malformed pattern error.
    pub fn malformed_pattern(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedPattern, msg.into())
    }

    /// Creates an invalid route error.
    pub fn invalid_route(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRoute, msg.into())
    }

    /// Creates a handler registry error.
    pub fn registry(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Registry, msg.into())
    }

    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, msg.into())
    }

    /// Creates an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, msg.into())
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = self.to_error_response();

        if status.is_client_error() {
            tracing::warn!(
                error_code = %error_response.error_code,
                message = %error_response.message,
                status = %status.as_u16(),
                "Request rejected"
            );
        } else {
            tracing::error!(
                error_code = %error_response.error_code,
                message = %error_response.message,
                status = %status.as_u16(),
                "Error occurred"
            );
        }

        (status, Json(error_response)).into_response()
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Self::new(ErrorKind::MalformedPattern, err)
    }
}

// ============================================================================
// ErrorResponse
// ============================================================================

/// JSON body of error and not-found responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// One of the stable codes, e.g. `INVALID_ROUTE` or `NOT_FOUND`.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Extra context, such as the route that failed to resolve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Adds details to the error response.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
