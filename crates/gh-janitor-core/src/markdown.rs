//! Markdown checklist rendering for project columns

use crate::epic_index::EpicReferenceIndex;
use crate::error::ColumnUrlError;
use crate::issue_ref::IssueRef;
use gh_janitor_client::Issue;

/// Column id from a "Copy column link" URL
///
/// The id is everything after the last `-`, as in
/// `https://github.com/orgs/ORG/projects/8#column-4716294`.
pub fn parse_column_url(url: &str) -> Result<u64, ColumnUrlError> {
    let (_, id) = url
        .rsplit_once('-')
        .ok_or_else(|| ColumnUrlError::MissingId(url.to_string()))?;

    id.parse().map_err(|_| ColumnUrlError::InvalidId {
        url: url.to_string(),
        id: id.to_string(),
    })
}

/// Renders checklist lines linking to issues of one organization
#[derive(Debug, Clone)]
pub struct ChecklistRenderer<'a> {
    host: &'a str,
    org: &'a str,
    epics: &'a EpicReferenceIndex,
}

impl<'a> ChecklistRenderer<'a> {
    pub fn new(host: &'a str, org: &'a str, epics: &'a EpicReferenceIndex) -> Self {
        Self { host, org, epics }
    }

    /// Checklist line for `issue`, or `None` when it is closed or already
    /// mentioned by an epic
    pub fn render(&self, issue_ref: &IssueRef, issue: &Issue) -> Option<String> {
        if let Some(epic) = self.epics.epic_for(issue_ref) {
            log::debug!("{} is mentioned in {}", issue_ref, epic);
            return None;
        }
        if !issue.is_open() {
            log::debug!("{} is closed", issue_ref);
            return None;
        }

        Some(format!(
            "- [ ] [{issue_ref}](https://{host}/{org}/{repo}/issues/{number}): {title} ({labels})",
            host = self.host,
            org = self.org,
            repo = issue_ref.repo(),
            number = issue_ref.number(),
            title = issue.title,
            labels = issue.labels.join(" "),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_janitor_client::fake::{closed_issue, open_issue};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_column_url() {
        assert_eq!(
            parse_column_url("https://github.com/orgs/dotmesh-io/projects/8#column-4716294"),
            Ok(4716294)
        );
    }

    #[test]
    fn test_parse_column_url_without_dash() {
        assert_eq!(
            parse_column_url("4716294"),
            Err(ColumnUrlError::MissingId("4716294".to_string()))
        );
    }

    #[test]
    fn test_parse_column_url_bad_id() {
        assert_eq!(
            parse_column_url("https://github.com/orgs/x/projects/8#column-abc"),
            Err(ColumnUrlError::InvalidId {
                url: "https://github.com/orgs/x/projects/8#column-abc".to_string(),
                id: "abc".to_string(),
            })
        );
        assert!(parse_column_url("column-").is_err());
    }

    #[test]
    fn test_render_open_issue() {
        let epics = EpicReferenceIndex::new();
        let renderer = ChecklistRenderer::new("github.com", "dotmesh-io", &epics);
        let issue = open_issue(386, "Fix the thing", &["bug", "help wanted"], None);

        let line = renderer.render(&IssueRef::new("dotmesh", 386), &issue);

        assert_eq!(
            line.as_deref(),
            Some(
                "- [ ] [dotmesh#386](https://github.com/dotmesh-io/dotmesh/issues/386): Fix the thing (bug help wanted)"
            )
        );
    }

    #[test]
    fn test_render_without_labels() {
        let epics = EpicReferenceIndex::new();
        let renderer = ChecklistRenderer::new("github.com", "org", &epics);

        let line = renderer.render(&IssueRef::new("app", 1), &open_issue(1, "t", &[], None));

        assert_eq!(
            line.as_deref(),
            Some("- [ ] [app#1](https://github.com/org/app/issues/1): t ()")
        );
    }

    #[test]
    fn test_closed_issue_is_omitted() {
        let epics = EpicReferenceIndex::new();
        let renderer = ChecklistRenderer::new("github.com", "org", &epics);

        let line = renderer.render(&IssueRef::new("app", 2), &closed_issue(2, "done", &["bug"]));

        assert_eq!(line, None);
    }

    #[test]
    fn test_epic_mentioned_issue_is_omitted() {
        let mut epics = EpicReferenceIndex::new();
        epics.record(IssueRef::new("app", 3), IssueRef::new("app", 1));
        let renderer = ChecklistRenderer::new("github.com", "org", &epics);

        let line = renderer.render(&IssueRef::new("app", 3), &open_issue(3, "t", &[], None));

        assert_eq!(line, None);
    }
}
