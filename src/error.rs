//! Error types for this crate.
//!
//! All fallible operations return [`Result<T>`] which uses [`SentimentError`] as the error type.

use thiserror::Error;

/// A [`Result`](std::result::Result) alias using [`SentimentError`] as the error type.
pub type Result<T> = std::result::Result<T, SentimentError>;

/// The unified error type for all crate errors.
///
/// # Example
///
/// ```rust,no_run
/// use review_sentiment::error::SentimentError;
///
/// fn handle_error(e: SentimentError) {
///     match &e {
///         SentimentError::EmptyInput => {
///             // Ask the user to type a review
///         }
///         SentimentError::ArtifactLoad { .. } | SentimentError::ArtifactUnavailable(_) => {
///             // Refuse to serve predictions until the artifacts are fixed
///         }
///         _ => {
///             eprintln!("Internal error: {e}");
///         }
///     }
/// }
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SentimentError {
    /// An artifact is missing, corrupt or has an incompatible version. Fatal at startup.
    #[error("failed to load artifact '{artifact}': {reason}")]
    ArtifactLoad {
        /// Logical artifact name (e.g. `vectorizer`).
        artifact: String,
        /// Why loading failed.
        reason: String,
    },

    /// The store definitely does not have this file. Not retried.
    #[error("'{name}' not found in {location}")]
    ArtifactMissing {
        /// File name inside the store.
        name: String,
        /// Store location.
        location: String,
    },

    /// The service started without its artifacts; every call is refused.
    #[error("artifacts unavailable: {0}")]
    ArtifactUnavailable(String),

    /// Review text is blank after trimming. Prompt for input.
    #[error("review text is empty")]
    EmptyInput,

    /// Network or download failure. Retry may help.
    #[error("{0}")]
    Download(String),

    /// Review dataset could not be read.
    #[error("{0}")]
    Dataset(String),

    /// Internal error. Report if seen.
    #[error("{0}")]
    Unexpected(String),
}

impl SentimentError {
    pub(crate) fn artifact(artifact: &str, reason: impl std::fmt::Display) -> Self {
        SentimentError::ArtifactLoad {
            artifact: artifact.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether a fetch that produced this error is worth repeating.
    pub fn is_transient(&self) -> bool {
        matches!(self, SentimentError::Download(_))
    }
}

impl From<hf_hub::api::sync::ApiError> for SentimentError {
    fn from(value: hf_hub::api::sync::ApiError) -> Self {
        SentimentError::Download(format!("HuggingFace API error: {}", value))
    }
}

impl From<candle_core::Error> for SentimentError {
    fn from(value: candle_core::Error) -> Self {
        SentimentError::Unexpected(value.to_string())
    }
}

impl From<std::io::Error> for SentimentError {
    fn from(value: std::io::Error) -> Self {
        match value.kind() {
            std::io::ErrorKind::Interrupted
            | std::io::ErrorKind::TimedOut
            | std::io::ErrorKind::WouldBlock => SentimentError::Download(value.to_string()),
            _ => SentimentError::Unexpected(value.to_string()),
        }
    }
}

impl From<serde_json::Error> for SentimentError {
    fn from(value: serde_json::Error) -> Self {
        SentimentError::Unexpected(value.to_string())
    }
}

impl From<regex::Error> for SentimentError {
    fn from(value: regex::Error) -> Self {
        SentimentError::Unexpected(value.to_string())
    }
}
