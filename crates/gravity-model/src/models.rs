//! Nested GitHub records carried inside event payloads.
//!
//! These are inert data shapes. Identity fields are required; everything the
//! feed routinely trims or nulls out is optional or defaulted. Unrecognized
//! fields are ignored on input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// USERS & LABELS
// ============================================================================

/// A GitHub account (user, bot or organization owner)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub gravatar_id: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// "User", "Bot" or "Organization"
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "default", default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: i64,
    pub number: i64,
    pub title: String,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub creator: Option<User>,
    #[serde(default)]
    pub open_issues: i64,
    #[serde(default)]
    pub closed_issues: i64,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub due_on: Option<DateTime<Utc>>,
}

// ============================================================================
// REPOSITORIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub spdx_id: Option<String>,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Full repository record (fork targets, pull request heads and bases)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(rename = "private", default)]
    pub is_private: bool,
    #[serde(default)]
    pub owner: Option<User>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub stargazers_count: i64,
    #[serde(default)]
    pub watchers_count: i64,
    #[serde(default)]
    pub forks_count: i64,
    #[serde(default)]
    pub open_issues_count: i64,
    #[serde(default)]
    pub license: Option<License>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub has_issues: bool,
    #[serde(default)]
    pub has_projects: bool,
    #[serde(default)]
    pub has_downloads: bool,
    #[serde(default)]
    pub has_wiki: bool,
    #[serde(default)]
    pub has_pages: bool,
    #[serde(default)]
    pub mirror_url: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub allow_forking: Option<bool>,
    #[serde(default)]
    pub is_template: Option<bool>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub pushed_at: Option<DateTime<Utc>>,
}

// ============================================================================
// ISSUES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,
    pub number: i64,
    pub title: String,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub milestone: Option<Milestone>,
    #[serde(default)]
    pub comments: i64,
    #[serde(default)]
    pub author_association: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueComment {
    pub id: i64,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub issue_url: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub author_association: Option<String>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub updated_at: Option<DateTime<Utc>>,
}

// ============================================================================
// PULL REQUESTS
// ============================================================================

/// Head or base of a pull request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(rename = "repo", default)]
    pub repository: Option<Repository>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: i64,
    pub number: i64,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub diff_url: Option<String>,
    #[serde(default)]
    pub patch_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub requested_reviewers: Vec<User>,
    #[serde(default)]
    pub milestone: Option<Milestone>,
    #[serde(default)]
    pub draft: Option<bool>,
    #[serde(default)]
    pub merged: Option<bool>,
    #[serde(default)]
    pub mergeable: Option<bool>,
    #[serde(default)]
    pub mergeable_state: Option<String>,
    #[serde(default)]
    pub merged_by: Option<User>,
    #[serde(default)]
    pub merge_commit_sha: Option<String>,
    #[serde(default)]
    pub comments: Option<i64>,
    #[serde(default)]
    pub review_comments: Option<i64>,
    #[serde(default)]
    pub commits: Option<i64>,
    #[serde(default)]
    pub additions: Option<i64>,
    #[serde(default)]
    pub deletions: Option<i64>,
    #[serde(default)]
    pub changed_files: Option<i64>,
    #[serde(default)]
    pub head: Option<PullRequestRef>,
    #[serde(default)]
    pub base: Option<PullRequestRef>,
    #[serde(default)]
    pub maintainer_can_modify: Option<bool>,
    #[serde(default)]
    pub author_association: Option<String>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestReview {
    pub id: i64,
    pub state: String,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub author_association: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub commit_id: Option<String>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Review comment attached to a diff line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestComment {
    pub id: i64,
    pub path: String,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub pull_request_review_id: Option<i64>,
    #[serde(default)]
    pub diff_hunk: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub original_position: Option<i64>,
    #[serde(default)]
    pub commit_id: Option<String>,
    #[serde(default)]
    pub original_commit_id: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub author_association: Option<String>,
    #[serde(default)]
    pub start_line: Option<i64>,
    #[serde(default)]
    pub original_start_line: Option<i64>,
    #[serde(default)]
    pub start_side: Option<String>,
    #[serde(default)]
    pub line: Option<i64>,
    #[serde(default)]
    pub original_line: Option<i64>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub in_reply_to_id: Option<i64>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::serde_util::gh_time")]
    pub updated_at: Option<DateTime<Utc>>,
}

// ============================================================================
// CHANGE DELTAS
// ============================================================================

/// Previous value of an edited text field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFrom {
    pub from: String,
}

/// `changes` object of an `edited` action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChanges {
    #[serde(default)]
    pub title: Option<ChangedFrom>,
    #[serde(default)]
    pub body: Option<ChangedFrom>,
}
