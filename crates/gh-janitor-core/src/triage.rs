//! Triage selection
//!
//! Decides which open issues are lost: not on the project board and not
//! mentioned by any epic. Pure; all data comes from an [`OrgSnapshot`].
//!
//! [`OrgSnapshot`]: crate::scanner::OrgSnapshot

use crate::epic_index::EpicReferenceIndex;
use crate::issue_ref::IssueRef;
use crate::membership::ProjectMembershipIndex;
use std::collections::HashSet;

/// An open issue seen during the scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenIssue {
    pub issue_ref: IssueRef,

    /// Global ID, used as the card's content id
    pub id: u64,

    pub title: String,
}

/// Open issues that belong in the triage column, in scan order
///
/// An issue is selected when it is neither in `membership` nor mentioned in
/// `epics`. Each issue is selected at most once.
pub fn select_triage_candidates(
    open_issues: &[OpenIssue],
    membership: &ProjectMembershipIndex,
    epics: &EpicReferenceIndex,
) -> Vec<OpenIssue> {
    let mut seen = HashSet::new();
    open_issues
        .iter()
        .filter(|issue| !membership.contains(&issue.issue_ref))
        .filter(|issue| match epics.epic_for(&issue.issue_ref) {
            Some(epic) => {
                log::debug!("{} is mentioned in {}", issue.issue_ref, epic);
                false
            }
            None => true,
        })
        .filter(|issue| seen.insert(issue.issue_ref.clone()))
        .cloned()
        .collect()
}
