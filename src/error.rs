//! Error types for selfie generation.

use std::time::Duration;

/// Message surfaced when the service answers without an image part.
pub const NO_IMAGE_MESSAGE: &str = "No image was generated. Please try again.";

/// Errors that can occur while generating or saving a selfie.
#[derive(Debug, thiserror::Error)]
pub enum SelfieError {
    /// API key missing or rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Server hint from the `Retry-After` header.
        retry_after: Option<Duration>,
    },

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Failure reported by the service with its own message, shown verbatim.
    #[error("{0}")]
    Service(String),

    /// The service responded but offered no inline image.
    #[error("No image was generated. Please try again.")]
    NoImageProduced,

    /// Unknown scenario identifier.
    #[error("unknown scenario '{0}' (expected one of: city, christmas, cny)")]
    UnsupportedScenario(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g., reading the upload or saving the result).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for selfie operations.
pub type Result<T> = std::result::Result<T, SelfieError>;

/// Longest error body kept in [`SelfieError::Api`] messages.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Strips anything that looks like an API key and truncates long bodies.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let mut cleaned: String = text
        .split_whitespace()
        .map(|word| {
            let bare = word.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '-' && c != '_');
            if bare.starts_with("AIza") && bare.len() >= 30 {
                word.replace(bare, "[REDACTED]")
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.chars().count() > MAX_ERROR_MESSAGE_LEN {
        cleaned = cleaned.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        cleaned.push_str("...");
    }
    cleaned
}

/// Parses a `Retry-After` header given in whole seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
