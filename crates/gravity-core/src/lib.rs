//! Gravity Core - decode, resolve and validate GitHub activity feeds
//!
//! One synchronous pass over a raw feed document:
//! 1. [`decoder`] turns bytes into ordered envelopes with raw payloads
//! 2. [`registry`] resolves each payload to its registered shape, or keeps it
//!    verbatim as `UnknownEvent`
//! 3. [`validator`] checks every checklist discriminator selects only
//!    envelopes of its promised shape
//!
//! [`pipeline`] wires the three together. All failures abort the pass.

pub mod decoder;
pub mod error;
pub mod metrics;
pub mod obs;
pub mod pipeline;
pub mod registry;
pub mod telemetry;
pub mod validator;

pub use decoder::{decode_envelopes, RawEnvelope};
pub use error::{CoreError, Result};
pub use metrics::METRICS;
pub use pipeline::{decode_and_validate, decode_feed, FeedDecoder, VerifiedFeed};
pub use registry::{DecodeFn, Registry, RegistryBuilder, RegistryEntry};
pub use telemetry::init_tracing;
pub use validator::{validate, VerifiedSubset};

pub use gravity_model::{Envelope, Event, EventKind, UnknownEvent};

/// Gravity core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
