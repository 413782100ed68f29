//! Error types for gravity-ingress

use gravity_core::CoreError;
use thiserror::Error;

/// Errors raised while fetching feeds or accepting webhook deliveries
#[derive(Error, Debug)]
pub enum IngressError {
    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Events API answered with a non-success status
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid feed target or client configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A secret is configured but the delivery carries no signature
    #[error("webhook delivery is not signed")]
    MissingSignature,

    /// The delivery signature does not match the body
    #[error("webhook signature mismatch")]
    SignatureMismatch,

    /// Webhook body is not a JSON object
    #[error("invalid webhook payload: {0}")]
    InvalidPayload(String),

    /// Decode / resolve / validate failure
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<reqwest::Error> for IngressError {
    fn from(err: reqwest::Error) -> Self {
        IngressError::Http(err.to_string())
    }
}

/// Result type for ingress operations
pub type Result<T> = std::result::Result<T, IngressError>;
