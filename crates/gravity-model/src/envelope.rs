//! Feed envelope - the outer record wrapping one event payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Account that triggered the event (`actor`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub display_login: Option<String>,
    #[serde(default)]
    pub gravatar_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Organization the event belongs to (`org`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationLite {
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub gravatar_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Repository the event happened in (`repo`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryLite {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// One decoded feed record.
///
/// The payload arm is fixed by `discriminator` at decode time and the envelope
/// is never mutated afterwards. Serializes back to the feed's wire layout;
/// absent metadata is omitted rather than written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub id: String,

    #[serde(rename = "type")]
    pub discriminator: String,

    /// Kept as the raw feed string; see [`Envelope::created_at_utc`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<Actor>,

    #[serde(rename = "org", skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrganizationLite>,

    #[serde(rename = "repo", skip_serializing_if = "Option::is_none")]
    pub repository: Option<RepositoryLite>,

    pub payload: Event,
}

impl Envelope {
    /// Parsed `created_at`, if present and valid RFC 3339.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc))
    }

    /// `owner/name` of the repository, when present.
    pub fn repo_name(&self) -> Option<&str> {
        self.repository.as_ref().map(|r| r.name.as_str())
    }
}
