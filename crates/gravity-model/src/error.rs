//! Error types for payload shape decoding

use thiserror::Error;

/// A payload field did not satisfy the shape of its variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("field `{field}` has the wrong shape: {message}")]
    InvalidField { field: String, message: String },
}

impl ShapeError {
    pub fn missing(field: &str) -> Self {
        ShapeError::MissingField {
            field: field.to_string(),
        }
    }

    pub fn invalid(field: &str, err: serde_json::Error) -> Self {
        ShapeError::InvalidField {
            field: field.to_string(),
            message: err.to_string(),
        }
    }

    /// Name of the top-level payload field that failed.
    pub fn field(&self) -> &str {
        match self {
            ShapeError::MissingField { field } | ShapeError::InvalidField { field, .. } => field,
        }
    }
}

/// Result type for payload shape decoding
pub type Result<T> = std::result::Result<T, ShapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = ShapeError::missing("forkee");
        assert_eq!(err.field(), "forkee");
        assert!(err.to_string().contains("missing required field `forkee`"));
    }

    #[test]
    fn test_invalid_field_keeps_serde_message() {
        let serde_err = serde_json::from_str::<String>("42").unwrap_err();
        let err = ShapeError::invalid("action", serde_err);
        assert_eq!(err.field(), "action");
        assert!(err.to_string().contains("invalid type"));
    }
}
