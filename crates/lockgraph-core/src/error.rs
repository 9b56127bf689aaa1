use thiserror::Error;

/// Core error types for lockgraph.
///
/// The detection pipeline degrades rather than fails: malformed sub-records,
/// unresolved requirement names and absent companion manifests all reduce a
/// unit's yield toward zero components without surfacing an error. The only
/// failures modeled here are structural: document content that cannot be
/// read as JSON at all, reported per file without aborting sibling units.
///
/// # Examples
///
/// ```
/// use lockgraph_core::error::{CoreError, Result};
///
/// fn parse_document(content: &str, file_type: &str) -> Result<()> {
///     if content.is_empty() {
///         return Err(CoreError::ParseError {
///             file_type: file_type.into(),
///             source: Box::new(std::io::Error::new(
///                 std::io::ErrorKind::InvalidData,
///                 "empty content",
///             )),
///         });
///     }
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("failed to parse {file_type}: {source}")]
    ParseError {
        file_type: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("invalid component: {0}")]
    InvalidComponent(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scan cancelled")]
    Cancelled,
}

/// Convenience type alias for `Result<T, CoreError>`.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_component_display() {
        let error = CoreError::InvalidComponent("empty name".into());
        assert_eq!(error.to_string(), "invalid component: empty name");
    }

    #[test]
    fn test_parse_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad data");
        let error = CoreError::ParseError {
            file_type: "package-lock.json".into(),
            source: Box::new(io_err),
        };
        assert!(error.to_string().contains("failed to parse package-lock.json"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: CoreError = io_err.into();
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{{").unwrap_err();
        let error: CoreError = json_err.into();
        assert!(error.to_string().contains("JSON error"));
    }
}
