//! GitHub API data transfer objects
//!
//! These types represent the data returned from the GitHub API.
//! They are intentionally separate from the janitor's domain models
//! to keep this crate pure and reusable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,

    /// Number of the following page, `None` on the last page
    pub next_page: Option<u32>,
}

/// A repository owned by the organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository name without the owner (e.g., "dotmesh")
    pub name: String,

    /// Owner login (user or organization)
    pub owner: String,

    /// Archived repositories are read-only and skipped by the janitor
    pub archived: bool,
}

/// Open/closed state of an issue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
}

/// An issue (or pull request) from the GitHub API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Global numeric ID, used as `content_id` when creating project cards
    pub id: u64,

    /// Issue number within its repository
    pub number: u64,

    /// Issue title
    pub title: String,

    /// Issue body (Markdown)
    pub body: Option<String>,

    /// Names of the labels attached to the issue
    pub labels: Vec<String>,

    /// Current state
    pub state: IssueState,

    /// When the issue was closed, if it was
    pub closed_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// An issue counts as open only if it is in the open state and was never closed
    pub fn is_open(&self) -> bool {
        self.state == IssueState::Open && self.closed_at.is_none()
    }

    /// Whether any of the issue's labels is in `names`
    pub fn has_any_label<'a>(&self, mut names: impl Iterator<Item = &'a String>) -> bool {
        names.any(|name| self.labels.contains(name))
    }
}

/// A repository label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name
    pub name: String,

    /// Hex color without the leading `#` (e.g., "f03838")
    pub color: String,
}

impl Label {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// A column of a (classic) project board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectColumn {
    /// Column ID
    pub id: u64,

    /// Column name (e.g., "Backlog")
    pub name: String,
}

/// A card on a project column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCard {
    /// Card ID
    pub id: u64,

    /// API URL of the issue behind the card, absent for note cards
    ///
    /// Looks like `https://api.github.com/repos/{org}/{repo}/issues/{number}`
    pub content_url: Option<String>,
}

/// Quota of a single rate-limit bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// Requests allowed per window
    pub limit: u64,

    /// Requests left in the current window
    pub remaining: u64,

    /// When the window resets
    pub reset: DateTime<Utc>,
}

/// Rate-limit buckets relevant to the janitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    /// REST API quota
    pub core: Rate,

    /// Search API quota (much smaller window)
    pub search: Rate,
}

/// Which rate-limit bucket a request draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateBucket {
    Core,
    Search,
}

impl RateLimit {
    /// Pick the quota for a bucket
    pub fn bucket(&self, bucket: RateBucket) -> &Rate {
        match bucket {
            RateBucket::Core => &self.core,
            RateBucket::Search => &self.search,
        }
    }
}
