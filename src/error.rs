//! Error types for Chatroll
//!
//! This module defines the error types used throughout the crate, using
//! `thiserror` for ergonomic error handling. Failures of the remote chat
//! backend are classified once, at the service boundary, into
//! [`ServiceError`]; everything else is a [`ChatrollError`].

use thiserror::Error;

/// Failure of a call to the remote chat backend
///
/// The variant is decided where the HTTP response (or the lack of one) is
/// observed, so callers match on the variant instead of inspecting messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// No response was received (connect failure, timeout, API token not loadable)
    #[error("Network error: {0}")]
    Network(String),

    /// A response was received but was not usable: a non-success status or
    /// a success body that does not decode
    #[error("Server error: status={status}, {body}")]
    Server {
        /// HTTP status code returned by the backend
        status: u16,
        /// Response body or decode failure, possibly empty
        body: String,
    },

    /// Caller-supplied data was rejected by the backend
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Discriminant of a [`ServiceError`], used for metrics labels and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// See [`ServiceError::Network`]
    Network,
    /// See [`ServiceError::Server`]
    Server,
    /// See [`ServiceError::Validation`]
    Validation,
}

impl ServiceError {
    /// Return the kind of this error
    ///
    /// # Examples
    ///
    /// ```
    /// use chatroll::error::{ServiceError, ServiceErrorKind};
    ///
    /// let err = ServiceError::Server { status: 503, body: String::new() };
    /// assert_eq!(err.kind(), ServiceErrorKind::Server);
    /// ```
    pub fn kind(&self) -> ServiceErrorKind {
        match self {
            ServiceError::Network(_) => ServiceErrorKind::Network,
            ServiceError::Server { .. } => ServiceErrorKind::Server,
            ServiceError::Validation(_) => ServiceErrorKind::Validation,
        }
    }
}

impl ServiceErrorKind {
    /// Stable lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceErrorKind::Network => "network",
            ServiceErrorKind::Server => "server",
            ServiceErrorKind::Validation => "validation",
        }
    }
}

/// Main error type for Chatroll operations
#[derive(Error, Debug)]
pub enum ChatrollError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local input validation errors (e.g. an invalid chat title)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication token errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Remote chat backend errors
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Result type alias for Chatroll operations
///
/// Uses `anyhow::Error` so that context can be attached while propagating.
/// The chat service contract keeps the typed [`ServiceError`] instead.
pub type Result<T> = anyhow::Result<T>;
