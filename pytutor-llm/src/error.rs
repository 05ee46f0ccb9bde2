//! Generation and retry error types.

use thiserror::Error;

/// Errors that can occur during a single generation call.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed before a response arrived.
    #[error("generation request failed: {0}")]
    RequestFailed(String),

    /// The provider answered with a non-success status.
    #[error("generation API returned HTTP {status}: {body}")]
    Http {
        /// Status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The response body was not in the provider's expected shape.
    #[error("failed to decode generation response: {0}")]
    Decode(String),

    /// The provider answered but produced no text.
    #[error("generation API returned no text")]
    EmptyResponse,

    /// Request timed out.
    #[error("generation request timed out")]
    Timeout,

    /// Provider is unavailable.
    #[error("generation provider unavailable: {0}")]
    Unavailable(String),

    /// Configuration error.
    #[error("generation configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_connect() {
            LlmError::Unavailable(err.to_string())
        } else if err.is_decode() {
            LlmError::Decode(err.to_string())
        } else {
            LlmError::RequestFailed(err.to_string())
        }
    }
}

/// Terminal outcome of a retried operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RetryError {
    /// Every attempt failed.
    #[error("all {attempts} attempts failed: {last_error}")]
    Exhausted {
        /// Total invocations, including the first.
        attempts: u32,
        /// Display form of the final failure.
        last_error: String,
    },

    /// The owning scope was cancelled before an attempt succeeded.
    #[error("cancelled after {attempts} attempts")]
    Cancelled {
        /// Invocations started before cancellation.
        attempts: u32,
    },
}

impl RetryError {
    /// Invocations made before giving up.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } | Self::Cancelled { attempts } => *attempts,
        }
    }
}
