//! Events API configuration and feed targets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IngressError;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const GITHUB_V3_ACCEPT: &str = "application/vnd.github.v3+json";

/// Events API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// API base URL, without a trailing slash
    pub api_base: String,
    /// Bearer token (optional for public feeds)
    pub token: Option<String>,
    pub user_agent: String,
    pub accept: String,
}

impl FeedConfig {
    /// Config for `api_base` with no token. The process environment is read
    /// by the CLI layer only.
    pub fn new(api_base: &str) -> Self {
        FeedConfig {
            api_base: api_base.trim_end_matches('/').to_string(),
            token: None,
            user_agent: format!("gravity-ingress/{}", env!("CARGO_PKG_VERSION")),
            accept: GITHUB_V3_ACCEPT.to_string(),
        }
    }

    /// Set authentication token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Full events URL for `target`.
    pub fn events_url(&self, target: &FeedTarget) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), target.path())
    }
}

/// Which activity feed to read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedTarget {
    Repo { owner: String, name: String },
    Org { org: String },
    User { user: String },
    Public,
}

impl FeedTarget {
    pub fn repo(owner: &str, name: &str) -> Self {
        FeedTarget::Repo {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    /// Endpoint path relative to the API base.
    pub fn path(&self) -> String {
        match self {
            FeedTarget::Repo { owner, name } => format!("/repos/{owner}/{name}/events"),
            FeedTarget::Org { org } => format!("/orgs/{org}/events"),
            FeedTarget::User { user } => format!("/users/{user}/events"),
            FeedTarget::Public => "/events".to_string(),
        }
    }
}

impl Default for FeedTarget {
    fn default() -> Self {
        FeedTarget::repo("pingcap", "tidb")
    }
}

impl fmt::Display for FeedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedTarget::Repo { owner, name } => write!(f, "{owner}/{name}"),
            FeedTarget::Org { org } => write!(f, "org:{org}"),
            FeedTarget::User { user } => write!(f, "user:{user}"),
            FeedTarget::Public => f.write_str("public"),
        }
    }
}

/// Parses `owner/name`, `org:<org>`, `user:<login>` or `public`.
impl FromStr for FeedTarget {
    type Err = IngressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "public" {
            return Ok(FeedTarget::Public);
        }
        if let Some(org) = s.strip_prefix("org:") {
            return single_segment(org).map(|org| FeedTarget::Org { org });
        }
        if let Some(user) = s.strip_prefix("user:") {
            return single_segment(user).map(|user| FeedTarget::User { user });
        }

        match s.split_once('/') {
            Some((owner, name)) => Ok(FeedTarget::Repo {
                owner: single_segment(owner)?,
                name: single_segment(name)?,
            }),
            None => Err(IngressError::Config(format!(
                "feed target {s:?} is not of the form owner/name, org:<org>, user:<login> or public"
            ))),
        }
    }
}

fn single_segment(segment: &str) -> Result<String, IngressError> {
    if segment.is_empty() || segment.contains('/') || segment.contains(char::is_whitespace) {
        return Err(IngressError::Config(format!(
            "invalid path segment {segment:?} in feed target"
        )));
    }
    Ok(segment.to_string())
}
