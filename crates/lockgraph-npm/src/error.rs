//! Errors specific to npm lockfile and manifest handling.
//!
//! Only structural failures are modeled: a top-level document that is not
//! JSON at all. Malformed sub-records, unresolved requirement names and
//! empty names or versions are dropped during parsing, never raised.

use thiserror::Error;

/// Errors specific to npm lockfile and manifest handling.
#[derive(Error, Debug)]
pub enum NpmError {
    /// Top-level document content is not parseable JSON
    #[error("Failed to parse {file_type}: {source}")]
    JsonParse {
        file_type: String,
        #[source]
        source: serde_json::Error,
    },

    /// Document parsed but its top-level shape is unusable
    #[error("Invalid {file_type} structure: {message}")]
    InvalidStructure { file_type: String, message: String },

    /// Error from the core layer
    #[error(transparent)]
    Core(#[from] lockgraph_core::CoreError),
}

/// Result type alias for npm operations.
pub type Result<T> = std::result::Result<T, NpmError>;

impl NpmError {
    /// Create a parse error for a lockfile or manifest document.
    pub fn json_parse(file_type: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonParse {
            file_type: file_type.into(),
            source,
        }
    }

    /// Create an invalid structure error.
    pub fn invalid_structure(file_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            file_type: file_type.into(),
            message: message.into(),
        }
    }
}

/// Convert to lockgraph_core::CoreError for interoperability
impl From<NpmError> for lockgraph_core::CoreError {
    fn from(err: NpmError) -> Self {
        match err {
            NpmError::JsonParse { file_type, source } => lockgraph_core::CoreError::ParseError {
                file_type,
                source: Box::new(source),
            },
            NpmError::InvalidStructure { file_type, message } => {
                lockgraph_core::CoreError::ParseError {
                    file_type,
                    source: Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        message,
                    )),
                }
            }
            NpmError::Core(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_parse_display() {
        let source = serde_json::from_str::<serde_json::Value>("{{{").unwrap_err();
        let err = NpmError::json_parse("package-lock.json", source);
        assert!(err.to_string().contains("Failed to parse package-lock.json"));
    }

    #[test]
    fn test_invalid_structure_display() {
        let err = NpmError::invalid_structure("package.json", "not an object");
        assert_eq!(
            err.to_string(),
            "Invalid package.json structure: not an object"
        );
    }

    #[test]
    fn test_conversion_to_core_error() {
        let source = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err: lockgraph_core::CoreError = NpmError::json_parse("package-lock.json", source).into();
        assert!(matches!(err, lockgraph_core::CoreError::ParseError { .. }));
    }
}
