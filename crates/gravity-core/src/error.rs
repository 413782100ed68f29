//! Error taxonomy for the decode / resolve / validate pipeline.
//!
//! None of these are transient; callers report them and abort the pass.

use gravity_model::{EventKind, ShapeError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Raw input is not a well-formed envelope array.
    #[error("malformed feed{}: {reason}", at_element(.index))]
    MalformedFeed { index: Option<usize>, reason: String },

    /// A registered discriminator's payload does not fit its shape.
    #[error("payload of {discriminator} does not match its shape at field `{field}`: {message}")]
    PayloadShapeMismatch {
        discriminator: String,
        field: String,
        message: String,
    },

    /// A checklist discriminator selected an envelope of a different shape.
    #[error(
        "variant mismatch for {discriminator}: envelope {envelope_id} decoded as {actual}, expected {}",
        expected_name(.expected)
    )]
    VariantMismatch {
        discriminator: String,
        envelope_id: String,
        expected: Option<EventKind>,
        actual: EventKind,
    },
}

impl CoreError {
    pub fn malformed(index: Option<usize>, reason: impl Into<String>) -> Self {
        CoreError::MalformedFeed {
            index,
            reason: reason.into(),
        }
    }

    pub fn shape_mismatch(discriminator: &str, err: ShapeError) -> Self {
        let field = err.field().to_string();
        let message = match err {
            ShapeError::MissingField { .. } => "missing required field".to_string(),
            ShapeError::InvalidField { message, .. } => message,
        };
        CoreError::PayloadShapeMismatch {
            discriminator: discriminator.to_string(),
            field,
            message,
        }
    }

    /// Discriminator the error is attached to, if any.
    pub fn discriminator(&self) -> Option<&str> {
        match self {
            CoreError::MalformedFeed { .. } => None,
            CoreError::PayloadShapeMismatch { discriminator, .. }
            | CoreError::VariantMismatch { discriminator, .. } => Some(discriminator),
        }
    }
}

fn at_element(index: &Option<usize>) -> String {
    index.map(|i| format!(" at element {i}")).unwrap_or_default()
}

fn expected_name(expected: &Option<EventKind>) -> &'static str {
    expected.map(|k| k.name()).unwrap_or("no registered shape")
}

/// Result type for core pipeline operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = CoreError::malformed(Some(3), "element is not an object");
        assert_eq!(
            err.to_string(),
            "malformed feed at element 3: element is not an object"
        );

        let err = CoreError::malformed(None, "top-level document is not an array");
        assert_eq!(
            err.to_string(),
            "malformed feed: top-level document is not an array"
        );
        assert!(err.discriminator().is_none());
    }

    #[test]
    fn test_shape_mismatch_from_shape_error() {
        let err = CoreError::shape_mismatch("ForkEvent", ShapeError::missing("forkee"));
        match &err {
            CoreError::PayloadShapeMismatch {
                discriminator,
                field,
                ..
            } => {
                assert_eq!(discriminator, "ForkEvent");
                assert_eq!(field, "forkee");
            }
            other => panic!("Expected PayloadShapeMismatch, got {:?}", other),
        }
        assert_eq!(err.discriminator(), Some("ForkEvent"));
        assert!(err.to_string().contains("`forkee`"));
    }

    #[test]
    fn test_variant_mismatch_display() {
        let err = CoreError::VariantMismatch {
            discriminator: "WatchEvent".to_string(),
            envelope_id: "42".to_string(),
            expected: Some(EventKind::Watch),
            actual: EventKind::IssueComment,
        };
        let msg = err.to_string();
        assert!(msg.contains("WatchEvent"));
        assert!(msg.contains("IssueCommentEvent"));
        assert!(msg.contains("envelope 42"));

        let err = CoreError::VariantMismatch {
            discriminator: "StarEvent".to_string(),
            envelope_id: "7".to_string(),
            expected: None,
            actual: EventKind::Unknown,
        };
        assert!(err.to_string().contains("no registered shape"));
    }
}
