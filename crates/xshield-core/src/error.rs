//! Error types for the Xshield provider
//!
//! This module defines all error types used throughout the crate.
//!
//! The variants follow the lifecycle of a single API call:
//! construction (URL template, body serialization), credential resolution,
//! transport, and finally the HTTP status classification.

use thiserror::Error;

/// Result type alias for Xshield operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the Xshield provider
#[derive(Error, Debug)]
pub enum Error {
    /// The URL template is malformed
    #[error("error generating URL: invalid template '{template}': {reason}")]
    UrlTemplate {
        /// The offending template
        template: String,
        /// What is wrong with it
        reason: String,
    },

    /// A path placeholder has no value on the request
    #[error("error generating URL: missing path parameter '{0}'")]
    MissingPathParam(String),

    /// The request envelope could not be assembled
    #[error("error creating request: {0}")]
    Construction(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Connection-level failure before any response status was received
    #[error("error sending request: {message}")]
    Transport {
        /// Transport error description
        message: String,
    },

    /// The API answered with a status code >= 400
    #[error("unexpected response from API. Got an unexpected response code {status}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body, drained for diagnostics (may be empty)
        body: String,
    },

    /// Credential resolution failed
    #[error("security resolution failed: {0}")]
    Security(String),

    /// The call's context was cancelled
    #[error("context cancelled")]
    Cancelled,

    /// The call's deadline passed
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a URL template error
    pub fn url_template(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UrlTemplate {
            template: template.into(),
            reason: reason.into(),
        }
    }

    /// Create a request construction error
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
        }
    }

    /// Create an unexpected status error
    pub fn unexpected_status(status: u16, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a security resolution error
    pub fn security(msg: impl Into<String>) -> Self {
        Self::Security(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this is a connection-level failure (candidate for retry)
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Whether this error came from the call's context rather than the API
    pub fn is_context_error(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    /// The HTTP status code carried by this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
