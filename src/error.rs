use thiserror::Error;

use crate::attributes::AttributeListError;

/// Main error type for playlist parsing and URI resolution
///
/// Every parse failure carries the 0-based index of the offending line
/// together with its text.
#[derive(Error, Debug)]
pub enum PlaylistError {
    /// A value expected to be numeric is not
    #[error("Invalid numeric field at line {line}: {text}")]
    InvalidNumericField { line: usize, text: String },

    /// A mandatory attribute is absent from an attribute-list tag
    #[error("Missing required attribute {attribute} at line {line}: {text}")]
    MissingRequiredAttribute {
        line: usize,
        text: String,
        attribute: &'static str,
    },

    /// A value-prefix tag never received its URI line
    #[error("Tag at line {line} is not followed by a URI: {text}")]
    UnterminatedTag { line: usize, text: String },

    /// A `KEY=VALUE` list could not be split
    #[error("Malformed attribute list at line {line}: {text}")]
    MalformedAttributeList {
        line: usize,
        text: String,
        #[source]
        source: AttributeListError,
    },

    /// EXT-X-PROGRAM-DATE-TIME is not an ISO 8601 date-time
    #[error("Invalid date-time at line {line}: {text}")]
    InvalidDateTime { line: usize, text: String },

    /// A relative URI was resolved without a base URI
    #[error("Cannot resolve relative URI {0} without a base URI")]
    MissingBaseUri(String),

    /// The base URI or the joined URI does not parse
    #[error("Invalid URI {uri}: {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON report serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlaylistError {
    /// 0-based line index for parse errors
    pub fn line(&self) -> Option<usize> {
        match self {
            PlaylistError::InvalidNumericField { line, .. }
            | PlaylistError::MissingRequiredAttribute { line, .. }
            | PlaylistError::UnterminatedTag { line, .. }
            | PlaylistError::MalformedAttributeList { line, .. }
            | PlaylistError::InvalidDateTime { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PlaylistError>;
