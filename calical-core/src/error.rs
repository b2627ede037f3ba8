//! Error types for the calical codec.

use thiserror::Error;

/// Errors that can occur while converting between events and ICS text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// An event's instant string does not match `yyyy-MM-ddTHH:mm:ss.SSSZ`.
    #[error("Malformed timestamp '{value}': {reason}")]
    MalformedTimestamp { value: String, reason: String },

    /// The ICS text is not a calendar document.
    #[error("Malformed ICS document: {0}")]
    MalformedDocument(String),

    /// A single VEVENT carries a property the decoder cannot read.
    #[error("Malformed {name} property: {value}")]
    MalformedProperty { name: String, value: String },

    /// The request could not be understood at all.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CodecError {
    pub(crate) fn malformed_timestamp(value: &str, reason: impl Into<String>) -> Self {
        CodecError::MalformedTimestamp {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_property(name: &str, value: &str) -> Self {
        CodecError::MalformedProperty {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// Short machine-readable name, used as the `error` field of failure replies.
    pub fn kind(&self) -> &'static str {
        match self {
            CodecError::MalformedTimestamp { .. } => "MalformedTimestamp",
            CodecError::MalformedDocument(_) => "MalformedDocument",
            CodecError::MalformedProperty { .. } => "MalformedProperty",
            CodecError::InvalidRequest(_) => "InvalidRequest",
            CodecError::Config(_) => "Config",
        }
    }

    /// Status code carried by failure replies.
    pub fn status(&self) -> u16 {
        match self {
            CodecError::Config(_) => 500,
            _ => 400,
        }
    }
}

impl From<::config::ConfigError> for CodecError {
    fn from(e: ::config::ConfigError) -> Self {
        CodecError::Config(e.to_string())
    }
}

/// Result type alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
