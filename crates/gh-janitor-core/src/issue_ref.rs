//! Issue reference model
//!
//! Identifies an issue within the organization as `repo#number`.

use crate::error::IssueRefError;
use std::fmt;
use std::str::FromStr;

/// Canonical `repository#number` identifier for an issue
///
/// Two refs are the same issue exactly when their rendered strings match.
/// Ordering is by repository, then numerically by issue number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IssueRef {
    repo: String,
    number: u64,
}

impl IssueRef {
    pub fn new(repo: impl Into<String>, number: u64) -> Self {
        Self {
            repo: repo.into(),
            number,
        }
    }

    /// Repository name (without the organization)
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Issue number within the repository
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Parse the API URL behind a project card
    ///
    /// `https://api.github.com/repos/dotmesh-io/dotmesh/issues/386` becomes
    /// `dotmesh#386`: the repository is the third segment from the end and
    /// the number the last one.
    pub fn from_content_url(url: &str) -> Result<Self, IssueRefError> {
        let parts: Vec<&str> = url.trim_end_matches('/').split('/').collect();
        if parts.len() < 3 {
            return Err(IssueRefError::Malformed(url.to_string()));
        }

        let repo = parts[parts.len() - 3];
        let number = parts[parts.len() - 1];
        if repo.is_empty() {
            return Err(IssueRefError::Malformed(url.to_string()));
        }

        let number = number.parse().map_err(|_| IssueRefError::InvalidNumber {
            input: url.to_string(),
            number: number.to_string(),
        })?;
        Ok(Self::new(repo, number))
    }
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repo, self.number)
    }
}

impl FromStr for IssueRef {
    type Err = IssueRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (repo, number) = s
            .rsplit_once('#')
            .filter(|(repo, _)| !repo.is_empty())
            .ok_or_else(|| IssueRefError::Malformed(s.to_string()))?;

        let number = number.parse().map_err(|_| IssueRefError::InvalidNumber {
            input: s.to_string(),
            number: number.to_string(),
        })?;
        Ok(Self::new(repo, number))
    }
}
