//! Error types for webhook dispatch.

use thiserror::Error;

use crate::transport::HttpError;

/// A notification could not be delivered.
///
/// Always recoverable: the check logs it, leaves alert counters untouched
/// and carries on. Dispatch is never retried within a check.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Transport-level failure (connection, timeout, bad URL).
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// The endpoint answered with a status outside the accepted set.
    #[error("HTTP {status}{}", body.as_ref().map(|b| format!(": {b}")).unwrap_or_default())]
    NonSuccessStatus {
        /// The response status.
        status: http::StatusCode,
        /// Response body (if valid UTF-8).
        body: Option<String>,
    },

    /// The payload could not be encoded as JSON.
    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// The message template failed to render.
    #[error("Message template error: {0}")]
    Template(String),
}
