//! Error types for HTTP operations.

use thiserror::Error;

/// Error type for HTTP operations.
///
/// Describes what went wrong at the transport level. Callers decide
/// whether the failure moves them to the next endpoint or is reported.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// TLS failures and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server did not respond within the request timeout.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be built (typically a malformed URL).
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
