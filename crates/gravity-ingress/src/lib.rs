//! Gravity Ingress - where feed bytes come from
//!
//! - [`FeedClient`]: one GET against the GitHub events API
//! - [`FileSource`]: a feed dumped to disk, for offline runs
//! - [`webhook`]: signature checks and delivery decoding for pushed events
//! - [`server`]: the `POST /webhooks` endpoint in front of the receiver
//!
//! Everything hands off to `gravity_core` for decoding and validation.

pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod source;
pub mod webhook;

pub use client::FeedClient;
pub use config::{FeedConfig, FeedTarget, DEFAULT_API_BASE, GITHUB_V3_ACCEPT};
pub use error::{IngressError, Result};
pub use server::{build_router, serve, ServerError, ServerState, WEBHOOK_PATH};
pub use source::{fetch_and_validate, FeedSource, FileSource};
pub use webhook::{
    compute_signature, decode_delivery, discriminator_for, format_signature_header,
    parse_signature_header, verify_signature, WebhookDelivery, WebhookReceiver, WebhookVerifier,
    EVENT_HEADER, SIGNATURE_HEADER,
};
