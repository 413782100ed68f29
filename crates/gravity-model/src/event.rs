//! Event payload variants.
//!
//! `Event` is a closed sum over the seven payload shapes the feed is known to
//! carry, plus [`UnknownEvent`] for every other tag. The concrete arm is picked
//! by the envelope's discriminator, never by inspecting the payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::models::{
    Issue, IssueComment, Label, PullRequest, PullRequestComment, PullRequestReview, Repository,
    TextChanges, User,
};
use crate::payload::{PayloadFields, Variant};

// ============================================================================
// EVENT KIND
// ============================================================================

/// Identity of a payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Fork,
    IssueComment,
    Issues,
    PullRequest,
    PullRequestReview,
    PullRequestReviewComment,
    Watch,
    Unknown,
}

impl EventKind {
    /// Every known shape, in registry order.
    pub const KNOWN: [EventKind; 7] = [
        EventKind::Fork,
        EventKind::IssueComment,
        EventKind::Issues,
        EventKind::PullRequest,
        EventKind::PullRequestReview,
        EventKind::PullRequestReviewComment,
        EventKind::Watch,
    ];

    /// Feed discriminator (`type`) of this shape. `None` for the fallback.
    pub fn discriminator(&self) -> Option<&'static str> {
        match self {
            EventKind::Fork => Some("ForkEvent"),
            EventKind::IssueComment => Some("IssueCommentEvent"),
            EventKind::Issues => Some("IssuesEvent"),
            EventKind::PullRequest => Some("PullRequestEvent"),
            EventKind::PullRequestReview => Some("PullRequestReviewEvent"),
            EventKind::PullRequestReviewComment => Some("PullRequestReviewCommentEvent"),
            EventKind::Watch => Some("WatchEvent"),
            EventKind::Unknown => None,
        }
    }

    /// Known shape for a feed discriminator (exact, case-sensitive match).
    pub fn from_discriminator(discriminator: &str) -> Option<EventKind> {
        Self::KNOWN
            .into_iter()
            .find(|kind| kind.discriminator() == Some(discriminator))
    }

    /// Name GitHub uses for this shape in the `X-GitHub-Event` webhook header.
    pub fn webhook_name(&self) -> Option<&'static str> {
        match self {
            EventKind::Fork => Some("fork"),
            EventKind::IssueComment => Some("issue_comment"),
            EventKind::Issues => Some("issues"),
            EventKind::PullRequest => Some("pull_request"),
            EventKind::PullRequestReview => Some("pull_request_review"),
            EventKind::PullRequestReviewComment => Some("pull_request_review_comment"),
            EventKind::Watch => Some("watch"),
            EventKind::Unknown => None,
        }
    }

    pub fn from_webhook_name(name: &str) -> Option<EventKind> {
        Self::KNOWN
            .into_iter()
            .find(|kind| kind.webhook_name() == Some(name))
    }

    /// Shape name as shown in logs and errors.
    pub fn name(&self) -> &'static str {
        self.discriminator().unwrap_or("UnknownEvent")
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// EVENT
// ============================================================================

/// A decoded payload. Serializes as the bare payload object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Event {
    Fork(Box<ForkEvent>),
    IssueComment(Box<IssueCommentEvent>),
    Issues(Box<IssuesEvent>),
    PullRequest(Box<PullRequestEvent>),
    PullRequestReview(Box<PullRequestReviewEvent>),
    PullRequestReviewComment(Box<PullRequestReviewCommentEvent>),
    Watch(WatchEvent),
    Unknown(UnknownEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Fork(_) => EventKind::Fork,
            Event::IssueComment(_) => EventKind::IssueComment,
            Event::Issues(_) => EventKind::Issues,
            Event::PullRequest(_) => EventKind::PullRequest,
            Event::PullRequestReview(_) => EventKind::PullRequestReview,
            Event::PullRequestReviewComment(_) => EventKind::PullRequestReviewComment,
            Event::Watch(_) => EventKind::Watch,
            Event::Unknown(_) => EventKind::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Event::Unknown(_))
    }

    pub fn as_unknown(&self) -> Option<&UnknownEvent> {
        match self {
            Event::Unknown(u) => Some(u),
            _ => None,
        }
    }

    /// `action` of the payload, when the shape has one.
    pub fn action(&self) -> Option<&str> {
        match self {
            Event::Fork(_) => None,
            Event::IssueComment(e) => Some(&e.action),
            Event::Issues(e) => Some(&e.action),
            Event::PullRequest(e) => Some(&e.action),
            Event::PullRequestReview(e) => Some(&e.action),
            Event::PullRequestReviewComment(e) => Some(&e.action),
            Event::Watch(e) => Some(&e.action),
            Event::Unknown(u) => u.get("action").and_then(Value::as_str),
        }
    }
}

// ============================================================================
// KNOWN VARIANTS
// ============================================================================

/// A repository was forked. `forkee` is the newly created fork.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForkEvent {
    pub forkee: Repository,
}

impl Variant for ForkEvent {
    const KIND: EventKind = EventKind::Fork;

    fn decode(fields: &PayloadFields<'_>) -> Result<Self> {
        Ok(ForkEvent {
            forkee: fields.required("forkee")?,
        })
    }

    fn into_event(self) -> Event {
        Event::Fork(Box::new(self))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueCommentEvent {
    pub action: String,
    pub changes: Option<TextChanges>,
    pub issue: Issue,
    pub comment: IssueComment,
}

impl Variant for IssueCommentEvent {
    const KIND: EventKind = EventKind::IssueComment;

    fn decode(fields: &PayloadFields<'_>) -> Result<Self> {
        Ok(IssueCommentEvent {
            action: fields.required("action")?,
            changes: fields.optional("changes")?,
            issue: fields.required("issue")?,
            comment: fields.required("comment")?,
        })
    }

    fn into_event(self) -> Event {
        Event::IssueComment(Box::new(self))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuesEvent {
    pub action: String,
    pub changes: Option<TextChanges>,
    pub issue: Issue,
    /// Set for `assigned` / `unassigned`
    pub assignee: Option<User>,
    /// Set for `labeled` / `unlabeled`
    pub label: Option<Label>,
}

impl Variant for IssuesEvent {
    const KIND: EventKind = EventKind::Issues;

    fn decode(fields: &PayloadFields<'_>) -> Result<Self> {
        Ok(IssuesEvent {
            action: fields.required("action")?,
            changes: fields.optional("changes")?,
            issue: fields.required("issue")?,
            assignee: fields.optional("assignee")?,
            label: fields.optional("label")?,
        })
    }

    fn into_event(self) -> Event {
        Event::Issues(Box::new(self))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub number: i64,
    pub changes: Option<TextChanges>,
    pub pull_request: PullRequest,
}

impl Variant for PullRequestEvent {
    const KIND: EventKind = EventKind::PullRequest;

    fn decode(fields: &PayloadFields<'_>) -> Result<Self> {
        Ok(PullRequestEvent {
            action: fields.required("action")?,
            number: fields.required("number")?,
            changes: fields.optional("changes")?,
            pull_request: fields.required("pull_request")?,
        })
    }

    fn into_event(self) -> Event {
        Event::PullRequest(Box::new(self))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestReviewEvent {
    pub action: String,
    pub pull_request: PullRequest,
    pub review: PullRequestReview,
    pub changes: Option<TextChanges>,
}

impl Variant for PullRequestReviewEvent {
    const KIND: EventKind = EventKind::PullRequestReview;

    fn decode(fields: &PayloadFields<'_>) -> Result<Self> {
        Ok(PullRequestReviewEvent {
            action: fields.required("action")?,
            pull_request: fields.required("pull_request")?,
            review: fields.required("review")?,
            changes: fields.optional("changes")?,
        })
    }

    fn into_event(self) -> Event {
        Event::PullRequestReview(Box::new(self))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestReviewCommentEvent {
    pub action: String,
    pub pull_request: PullRequest,
    pub comment: PullRequestComment,
    pub changes: Option<TextChanges>,
}

impl Variant for PullRequestReviewCommentEvent {
    const KIND: EventKind = EventKind::PullRequestReviewComment;

    fn decode(fields: &PayloadFields<'_>) -> Result<Self> {
        Ok(PullRequestReviewCommentEvent {
            action: fields.required("action")?,
            pull_request: fields.required("pull_request")?,
            comment: fields.required("comment")?,
            changes: fields.optional("changes")?,
        })
    }

    fn into_event(self) -> Event {
        Event::PullRequestReviewComment(Box::new(self))
    }
}

/// A repository was starred. The feed only ever reports `started`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEvent {
    pub action: String,
}

impl Variant for WatchEvent {
    const KIND: EventKind = EventKind::Watch;

    fn decode(fields: &PayloadFields<'_>) -> Result<Self> {
        Ok(WatchEvent {
            action: fields.required("action")?,
        })
    }

    fn into_event(self) -> Event {
        Event::Watch(self)
    }
}

// ============================================================================
// FALLBACK
// ============================================================================

/// Payload of a tag with no registered shape, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnknownEvent {
    fields: Map<String, Value>,
}

impl UnknownEvent {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
