//! Gravity Model - GitHub activity feed data shapes
//!
//! Defines the records that travel through the feed:
//! - Envelope: one feed record (id, `type` discriminator, metadata, payload)
//! - Event: closed sum type over the known payload variants plus a fallback
//! - UnknownEvent: open mapping that preserves payloads of unrecognized tags
//! - Nested records (users, repositories, issues, pull requests, ...)
//!
//! Payload variants are decoded field by field through [`PayloadFields`], so a
//! shape violation always names the offending top-level field.

pub mod envelope;
pub mod error;
pub mod event;
pub mod models;
pub mod payload;
pub mod serde_util;

pub use envelope::{Actor, Envelope, OrganizationLite, RepositoryLite};
pub use error::{Result, ShapeError};
pub use event::{
    Event, EventKind, ForkEvent, IssueCommentEvent, IssuesEvent, PullRequestEvent,
    PullRequestReviewCommentEvent, PullRequestReviewEvent, UnknownEvent, WatchEvent,
};
pub use models::{
    ChangedFrom, Issue, IssueComment, Label, License, Milestone, PullRequest, PullRequestComment,
    PullRequestRef, PullRequestReview, Repository, TextChanges, User,
};
pub use payload::{PayloadFields, Variant};

/// Gravity model version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
