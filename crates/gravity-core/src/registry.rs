//! Variant Resolver - discriminator registry and polymorphic payload decode.
//!
//! A [`Registry`] is a fixed lookup table from discriminator string to decode
//! function. It is built once and never mutated; [`Registry::standard`] holds
//! the seven known feed shapes. Any discriminator without an entry resolves to
//! [`UnknownEvent`], which cannot fail.

use std::sync::OnceLock;

use gravity_model::payload::decode_variant;
use gravity_model::{
    Event, ForkEvent, IssueCommentEvent, IssuesEvent, PullRequestEvent,
    PullRequestReviewCommentEvent, PullRequestReviewEvent, ShapeError, UnknownEvent, Variant,
    WatchEvent,
};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Decodes a raw payload object into one concrete shape.
pub type DecodeFn = fn(&Map<String, Value>) -> std::result::Result<Event, ShapeError>;

/// One registry row.
#[derive(Clone, Copy)]
pub struct RegistryEntry {
    pub discriminator: &'static str,
    pub decode: DecodeFn,
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("discriminator", &self.discriminator)
            .finish_non_exhaustive()
    }
}

/// Discriminator → decoder table.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// The process-wide registry of known feed shapes.
    pub fn standard() -> &'static Registry {
        static STANDARD: OnceLock<Registry> = OnceLock::new();
        STANDARD.get_or_init(|| {
            RegistryBuilder::default()
                .variant::<ForkEvent>()
                .variant::<IssueCommentEvent>()
                .variant::<IssuesEvent>()
                .variant::<PullRequestEvent>()
                .variant::<PullRequestReviewEvent>()
                .variant::<PullRequestReviewCommentEvent>()
                .variant::<WatchEvent>()
                .build()
        })
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn contains(&self, discriminator: &str) -> bool {
        self.lookup(discriminator).is_some()
    }

    /// Registered discriminators, in registration order.
    pub fn discriminators(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.discriminator)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, discriminator: &str) -> Option<&RegistryEntry> {
        self.entries
            .iter()
            .find(|e| e.discriminator == discriminator)
    }

    /// Resolve a raw payload to its concrete shape.
    ///
    /// Pure function of `(discriminator, payload)`. Registered discriminators
    /// are decoded strictly and never fall back to `UnknownEvent`.
    ///
    /// # Errors
    ///
    /// `CoreError::PayloadShapeMismatch` when a registered discriminator's
    /// payload violates its shape.
    pub fn resolve(&self, discriminator: &str, payload: Map<String, Value>) -> Result<Event> {
        match self.lookup(discriminator) {
            Some(entry) => {
                (entry.decode)(&payload).map_err(|e| CoreError::shape_mismatch(discriminator, e))
            }
            None => {
                tracing::trace!(discriminator, "no registered shape, keeping payload verbatim");
                Ok(Event::Unknown(UnknownEvent::new(payload)))
            }
        }
    }
}

/// Builds a [`Registry`]. Later registrations of the same discriminator
/// replace earlier ones.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<RegistryEntry>,
}

impl RegistryBuilder {
    /// Register `V` under its own discriminator.
    pub fn variant<V: Variant>(self) -> Self {
        match V::KIND.discriminator() {
            Some(discriminator) => self.register(discriminator, decode_variant::<V>),
            None => self,
        }
    }

    /// Register an arbitrary decoder under `discriminator`.
    pub fn register(mut self, discriminator: &'static str, decode: DecodeFn) -> Self {
        self.entries.retain(|e| e.discriminator != discriminator);
        self.entries.push(RegistryEntry {
            discriminator,
            decode,
        });
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            entries: self.entries,
        }
    }
}
