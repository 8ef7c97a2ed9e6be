//! Epic reference index
//!
//! Records which issues are mentioned in the body of an epic or theme issue,
//! so they are not treated as lost even when they are not on the board.

use crate::issue_ref::IssueRef;
use crate::links::LinkExtractor;
use gh_janitor_client::Issue;
use gh_janitor_config::JanitorConfig;
use std::collections::{BTreeSet, HashMap};

/// Mentioned issue -> the epic that mentions it
///
/// When several epics mention the same issue, the last one recorded wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpicReferenceIndex {
    mentions: HashMap<IssueRef, IssueRef>,
}

impl EpicReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `epic` mentions `mentioned`, replacing any earlier epic
    pub fn record(&mut self, mentioned: IssueRef, epic: IssueRef) {
        self.mentions.insert(mentioned, epic);
    }

    /// Whether any epic mentions the issue
    pub fn contains(&self, issue: &IssueRef) -> bool {
        self.mentions.contains_key(issue)
    }

    /// The epic that last mentioned the issue
    pub fn epic_for(&self, issue: &IssueRef) -> Option<&IssueRef> {
        self.mentions.get(issue)
    }

    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }
}

/// Builds an [`EpicReferenceIndex`] one repository at a time
#[derive(Debug, Clone)]
pub struct EpicIndexBuilder {
    epic_labels: BTreeSet<String>,
    ignored_labels: BTreeSet<String>,
    extractor: LinkExtractor,
}

impl EpicIndexBuilder {
    pub fn new(
        epic_labels: BTreeSet<String>,
        ignored_labels: BTreeSet<String>,
        extractor: LinkExtractor,
    ) -> Self {
        Self {
            epic_labels,
            ignored_labels,
            extractor,
        }
    }

    /// Builder for the configured organization, host and labels
    pub fn from_config(config: &JanitorConfig) -> Result<Self, regex::Error> {
        Ok(Self::new(
            config.epic_labels.clone(),
            config.ignored_labels.clone(),
            LinkExtractor::new(&config.host, &config.org)?,
        ))
    }

    /// Whether the issue carries an ignored label
    pub fn is_ignored(&self, issue: &Issue) -> bool {
        issue.has_any_label(self.ignored_labels.iter())
    }

    /// Whether the issue is an epic (and not ignored)
    pub fn is_epic(&self, issue: &Issue) -> bool {
        !self.is_ignored(issue) && issue.has_any_label(self.epic_labels.iter())
    }

    /// Record the mentions of every epic in `issues` from repository `repo`
    ///
    /// Returns the number of epics found.
    pub fn scan_repository(
        &self,
        index: &mut EpicReferenceIndex,
        repo: &str,
        issues: &[Issue],
    ) -> usize {
        let mut epics = 0;
        for issue in issues.iter().filter(|issue| self.is_epic(issue)) {
            let epic = IssueRef::new(repo, issue.number);
            let body = issue.body.as_deref().unwrap_or_default();
            let mentions = self.extractor.extract(body, repo);
            log::debug!("Epic {} mentions {} issues", epic, mentions.len());

            for mentioned in mentions {
                index.record(mentioned, epic.clone());
            }
            epics += 1;
        }
        epics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_janitor_client::fake::open_issue;

    fn builder() -> EpicIndexBuilder {
        let config = JanitorConfig {
            org: "org".to_string(),
            ..JanitorConfig::default()
        };
        EpicIndexBuilder::from_config(&config).unwrap()
    }

    #[test]
    fn test_records_mentions_of_epics_only() {
        let issues = vec![
            open_issue(1, "epic", &["epic"], Some("#2 and #3")),
            open_issue(4, "plain", &["bug"], Some("#5")),
        ];
        let mut index = EpicReferenceIndex::new();

        let epics = builder().scan_repository(&mut index, "app", &issues);

        assert_eq!(epics, 1);
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.epic_for(&IssueRef::new("app", 2)),
            Some(&IssueRef::new("app", 1))
        );
        assert!(index.contains(&IssueRef::new("app", 3)));
        assert!(!index.contains(&IssueRef::new("app", 5)));
    }

    #[test]
    fn test_theme_label_counts_as_epic() {
        let issues = vec![open_issue(
            1,
            "theme",
            &["theme"],
            Some("https://github.com/org/lib/issues/9"),
        )];
        let mut index = EpicReferenceIndex::new();

        builder().scan_repository(&mut index, "app", &issues);

        assert!(index.contains(&IssueRef::new("lib", 9)));
    }

    #[test]
    fn test_ignored_label_wins_over_epic_label() {
        let issues = vec![open_issue(1, "both", &["epic", "hypothesis"], Some("#2"))];
        let mut index = EpicReferenceIndex::new();

        let epics = builder().scan_repository(&mut index, "app", &issues);

        assert_eq!(epics, 0);
        assert!(index.is_empty());
    }

    #[test]
    fn test_epic_without_body() {
        let issues = vec![open_issue(1, "empty epic", &["epic"], None)];
        let mut index = EpicReferenceIndex::new();

        assert_eq!(builder().scan_repository(&mut index, "app", &issues), 1);
        assert!(index.is_empty());
    }

    #[test]
    fn test_last_epic_wins() {
        let builder = builder();
        let mut index = EpicReferenceIndex::new();

        let body = Some("https://github.com/org/c/issues/7");

        builder.scan_repository(&mut index, "a", &[open_issue(1, "first", &["epic"], body)]);
        builder.scan_repository(&mut index, "b", &[open_issue(2, "second", &["epic"], body)]);

        assert_eq!(
            index.epic_for(&IssueRef::new("c", 7)),
            Some(&IssueRef::new("b", 2))
        );
    }
}
