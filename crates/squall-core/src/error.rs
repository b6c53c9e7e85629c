//! Error types for squall-core

use thiserror::Error;

/// Result type alias for squall operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the squall HTTP router
#[derive(Debug, Error)]
pub enum Error {
    /// The same method + composed pattern was registered twice
    #[error("duplicate route: {method} {pattern}")]
    DuplicateRoute { method: String, pattern: String },

    /// Pattern rejected at registration time
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Invalid HTTP method
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Listen address could not be resolved
    #[error("invalid listen address: {0}")]
    InvalidAddress(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Hyper error at the serving boundary
    #[error("HTTP error: {0}")]
    Hyper(String),
}
