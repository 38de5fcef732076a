//! Error types for docweave.

use std::io;
use thiserror::Error;

use crate::data::ResolutionError;

/// Result type alias for docweave operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading templates or assembling documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading template or data files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Template or data file is not valid JSON for its expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A placeholder names a namespace that is not registered.
    #[error("Unknown data source '{source_name}' in {token}")]
    UnknownSource {
        /// The namespace that was looked up
        source_name: String,
        /// The full token text, braces included
        token: String,
    },

    /// A placeholder path could not be walked inside a known namespace.
    #[error("Cannot resolve {token}: {error}")]
    PathResolution {
        /// The full token text, braces included
        token: String,
        /// What went wrong and where
        error: ResolutionError,
    },

    /// Unbalanced braces or invalid token grammar in template text.
    #[error("Malformed placeholder at byte {offset}: {reason}")]
    MalformedToken {
        /// Byte offset of the offending brace within its text run
        offset: usize,
        /// Human-readable description
        reason: String,
    },

    /// A placeholder resolved to a mapping or sequence where a scalar was needed.
    #[error("Placeholder {token} resolved to a {kind}, expected a scalar")]
    NonScalarResolution {
        /// The full token text, braces included
        token: String,
        /// Kind of the structured value found
        kind: &'static str,
    },

    /// The template structure itself cannot be assembled.
    #[error("Assembly aborted at {location}: {reason}")]
    AssemblyAbort {
        /// Location of the offending node in the template tree
        location: String,
        /// Human-readable description
        reason: String,
    },

    /// The `document` base style does not define every attribute.
    #[error("Base style '{style}' is missing required attribute '{attribute}'")]
    IncompleteBaseStyle {
        /// Name of the base style
        style: String,
        /// First missing attribute
        attribute: &'static str,
    },

    /// Structural problem found while loading a template.
    #[error("Template error: {0}")]
    Template(String),

    /// Error while producing an output preview.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error is a data problem that the inline policy recovers from.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::UnknownSource { .. }
                | Error::PathResolution { .. }
                | Error::NonScalarResolution { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ResolutionFailure;

    #[test]
    fn test_error_display() {
        let err = Error::MalformedToken {
            offset: 4,
            reason: "unclosed '{'".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed placeholder at byte 4: unclosed '{'");

        let err = Error::UnknownSource {
            source_name: "crf".to_string(),
            token: "{crf.name}".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown data source 'crf' in {crf.name}");
    }

    #[test]
    fn test_path_resolution_display() {
        let err = Error::PathResolution {
            token: "{user_input.letter_details.date}".to_string(),
            error: ResolutionError {
                reason: ResolutionFailure::MissingKey("letter_details".to_string()),
                path_so_far: String::new(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Cannot resolve {user_input.letter_details.date}: key 'letter_details' not found at <root>"
        );
    }

    #[test]
    fn test_recoverable_classification() {
        let err = Error::NonScalarResolution {
            token: "{cfr.recipient}".to_string(),
            kind: "mapping",
        };
        assert!(err.is_recoverable());

        let err = Error::AssemblyAbort {
            location: "sections[0]".to_string(),
            reason: "bad".to_string(),
        };
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
