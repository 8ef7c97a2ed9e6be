//! Project membership index
//!
//! The set of issues already attached to a card in one of the tracked columns.

use crate::issue_ref::IssueRef;
use gh_janitor_client::ProjectCard;
use std::collections::HashSet;

/// Issues already on the project board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMembershipIndex {
    issues: HashSet<IssueRef>,
}

impl ProjectMembershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, issue: IssueRef) {
        self.issues.insert(issue);
    }

    /// Record the issue behind a card
    ///
    /// Note cards have no content and are ignored. A content URL without a
    /// numeric issue number is logged and skipped. Returns whether an issue
    /// was recorded.
    pub fn record_card(&mut self, card: &ProjectCard) -> bool {
        let Some(url) = card.content_url.as_deref() else {
            return false;
        };

        match IssueRef::from_content_url(url) {
            Ok(issue) => {
                log::debug!("Found issue {} in project", issue);
                self.issues.insert(issue);
                true
            }
            Err(e) => {
                log::warn!("Skipping card {}: {}", card.id, e);
                false
            }
        }
    }

    pub fn contains(&self, issue: &IssueRef) -> bool {
        self.issues.contains(issue)
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: u64, url: Option<&str>) -> ProjectCard {
        ProjectCard {
            id,
            content_url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_record_issue_card() {
        let mut index = ProjectMembershipIndex::new();

        let recorded = index.record_card(&card(
            1,
            Some("https://api.github.com/repos/dotmesh-io/dotmesh/issues/117"),
        ));

        assert!(recorded);
        assert!(index.contains(&IssueRef::new("dotmesh", 117)));
    }

    #[test]
    fn test_note_card_is_ignored() {
        let mut index = ProjectMembershipIndex::new();
        assert!(!index.record_card(&card(1, None)));
        assert!(index.is_empty());
    }

    #[test]
    fn test_unparseable_card_is_skipped() {
        let mut index = ProjectMembershipIndex::new();

        let recorded = index.record_card(&card(
            1,
            Some("https://api.github.com/repos/org/repo/issues/not-a-number"),
        ));

        assert!(!recorded);
        assert_eq!(index.len(), 0);
    }
}
