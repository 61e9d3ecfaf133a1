//! Error types for block rendering

use crate::ui::dom::NodeId;
use thiserror::Error;

/// Failures raised while building or rendering blocks
#[derive(Debug, Error)]
pub enum Error {
    /// A rich text field held state that is not valid content-state JSON
    #[error("rich text state for `{field}` is not valid JSON: {source}")]
    RichText {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// A custom form template did not declare a mount point for a child
    #[error("form template has no mount point for child block `{0}`")]
    MissingMountPoint(String),

    /// Attempted to replace a node that is not attached to a parent
    #[error("node {0:?} is not attached to the document")]
    Detached(NodeId),

    /// Two children of the same struct share a name
    #[error("struct block `{block}` declares child `{field}` more than once")]
    DuplicateField { block: String, field: String },

    /// Sanitized markup could not be written out
    #[error("failed to serialize markup: {0}")]
    Markup(#[from] std::io::Error),

    /// A block definition could not be decoded
    #[error("invalid block definition: {0}")]
    Schema(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_mount_point_message() {
        let err = Error::MissingMountPoint("title".to_string());
        assert_eq!(
            err.to_string(),
            "form template has no mount point for child block `title`"
        );
    }

    #[test]
    fn test_rich_text_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::RichText {
            field: "body".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("rich text state for `body`"));
    }

    #[test]
    fn test_schema_from_serde_error() {
        let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err: Error = source.into();
        assert!(matches!(err, Error::Schema(_)));
    }
}
