//! Organization scan
//!
//! The I/O half of a janitor run. [`OrgScanner::scan`] walks the project
//! board and every repository of the organization once and returns an
//! [`OrgSnapshot`]; deciding what to do with it is left to pure code.
//!
//! Per repository, in order: reconcile labels (when enabled), then search
//! the open issues, feeding epics into the [`EpicReferenceIndex`] and, when
//! collecting, the rest into the list of open issues.

use crate::epic_index::{EpicIndexBuilder, EpicReferenceIndex};
use crate::issue_ref::IssueRef;
use crate::labels::{LabelAction, LabelReconciler};
use crate::membership::ProjectMembershipIndex;
use crate::pages::collect_pages;
use crate::triage::OpenIssue;
use anyhow::Context;
use gh_janitor_client::{Issue, Repository, TrackerClient};
use gh_janitor_config::{JanitorConfig, MembershipSource};

/// What a scan collects besides the epic index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Reconcile each repository's labels while scanning
    pub sync_labels: bool,

    /// Keep the open issues for triage selection
    pub collect_open_issues: bool,

    /// How board membership is determined
    pub membership: MembershipSource,
}

impl ScanOptions {
    /// Options for a full janitor run
    pub fn for_janitor(config: &JanitorConfig) -> Self {
        Self {
            sync_labels: config.sync_labels,
            collect_open_issues: config.file_triage,
            membership: config.membership,
        }
    }

    /// Only build the epic index
    pub fn epics_only() -> Self {
        Self {
            sync_labels: false,
            collect_open_issues: false,
            membership: MembershipSource::Unchecked,
        }
    }
}

/// Everything the decision phase needs, gathered in one pass
#[derive(Debug, Clone, Default)]
pub struct OrgSnapshot {
    /// Open, non-ignored issues in scan order; with search-based membership
    /// these already exclude issues on the board
    pub open_issues: Vec<OpenIssue>,
    pub epics: EpicReferenceIndex,
    pub epic_count: usize,
    pub membership: ProjectMembershipIndex,
    /// Label actions per repository, in the order they were taken
    pub label_actions: Vec<(String, LabelAction)>,
    pub scanned_repos: Vec<String>,
    pub skipped_repos: Vec<String>,
}

/// Scans an organization through a [`TrackerClient`]
pub struct OrgScanner<'a> {
    client: &'a dyn TrackerClient,
    config: &'a JanitorConfig,
    options: ScanOptions,
    epic_builder: EpicIndexBuilder,
}

impl<'a> OrgScanner<'a> {
    pub fn new(
        client: &'a dyn TrackerClient,
        config: &'a JanitorConfig,
        options: ScanOptions,
    ) -> anyhow::Result<Self> {
        let epic_builder = EpicIndexBuilder::from_config(config)
            .with_context(|| format!("Can't build issue link pattern for {}", config.org))?;
        Ok(Self {
            client,
            config,
            options,
            epic_builder,
        })
    }

    pub async fn scan(&self) -> anyhow::Result<OrgSnapshot> {
        let mut snapshot = OrgSnapshot::default();

        if self.options.collect_open_issues && self.options.membership == MembershipSource::Columns
        {
            self.scan_columns(&mut snapshot.membership).await?;
        }

        log::info!("#### FINDING ISSUES IN REPOSITORIES");
        let repos = self.list_repositories().await?;
        let total = repos.len();

        for (idx, repo) in repos.iter().enumerate() {
            log::info!("{} ({}/{})", repo.name, idx + 1, total);

            if self.config.is_ignored_repo(&repo.name) {
                log::info!("Ignoring {}", repo.name);
                snapshot.skipped_repos.push(repo.name.clone());
                continue;
            }
            if repo.archived {
                log::info!("Skipping archived {}", repo.name);
                snapshot.skipped_repos.push(repo.name.clone());
                continue;
            }

            self.scan_repository(repo, &mut snapshot).await?;
            snapshot.scanned_repos.push(repo.name.clone());
        }

        log::info!(
            "Scanned {} repositories: {} epics mention {} issues, {} issues on the board",
            snapshot.scanned_repos.len(),
            snapshot.epic_count,
            snapshot.epics.len(),
            snapshot.membership.len()
        );
        Ok(snapshot)
    }

    async fn scan_columns(&self, membership: &mut ProjectMembershipIndex) -> anyhow::Result<()> {
        log::info!("#### FINDING ISSUES ALREADY IN PROJECT");
        for &column in &self.config.tracked_columns {
            let cards = collect_pages(|page| self.client.list_column_cards(column, page))
                .await
                .with_context(|| format!("Error fetching cards of column {}", column))?;
            let recorded = cards.iter().filter(|card| membership.record_card(card)).count();
            log::debug!("Column {}: {} issues", column, recorded);
        }
        Ok(())
    }

    async fn list_repositories(&self) -> anyhow::Result<Vec<Repository>> {
        let org = self.config.org.as_str();
        collect_pages(|page| self.client.list_org_repositories(org, page))
            .await
            .with_context(|| format!("Error fetching repository list of {}", org))
    }

    async fn scan_repository(
        &self,
        repo: &Repository,
        snapshot: &mut OrgSnapshot,
    ) -> anyhow::Result<()> {
        if self.options.sync_labels {
            let actions = LabelReconciler::new(&self.config.labels)
                .reconcile(self.client, &repo.owner, &repo.name)
                .await?;
            snapshot
                .label_actions
                .extend(actions.into_iter().map(|a| (repo.name.clone(), a)));
        }

        let issues = self.search(&self.open_issues_query(&repo.name, false)).await?;
        snapshot.epic_count += self
            .epic_builder
            .scan_repository(&mut snapshot.epics, &repo.name, &issues);

        if !self.options.collect_open_issues {
            return Ok(());
        }

        let candidates = match self.options.membership {
            MembershipSource::Search => {
                self.search(&self.open_issues_query(&repo.name, true)).await?
            }
            MembershipSource::Columns | MembershipSource::Unchecked => issues,
        };

        for issue in candidates {
            let issue_ref = IssueRef::new(repo.name.as_str(), issue.number);
            if self.epic_builder.is_ignored(&issue) {
                log::debug!("Ignoring issue {} due to its labels", issue_ref);
                continue;
            }
            if !issue.is_open() {
                continue;
            }
            snapshot.open_issues.push(OpenIssue {
                issue_ref,
                id: issue.id,
                title: issue.title,
            });
        }
        Ok(())
    }

    fn open_issues_query(&self, repo: &str, off_board: bool) -> String {
        let mut query = format!("is:open is:issue repo:{}/{}", self.config.org, repo);
        if off_board {
            query.push_str(" no:project");
        }
        query
    }

    async fn search(&self, query: &str) -> anyhow::Result<Vec<Issue>> {
        log::debug!("Searching {:?}", query);
        collect_pages(|page| self.client.search_issues(query, page))
            .await
            .with_context(|| format!("Error fetching issue list for {:?}", query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_janitor_client::fake::{closed_issue, open_issue, FakeTracker, Mutation};
    use gh_janitor_client::Label;
    use pretty_assertions::assert_eq;

    fn config(membership: MembershipSource) -> JanitorConfig {
        JanitorConfig {
            org: "org".to_string(),
            tracked_columns: vec![10, 11],
            triage_column: Some(10),
            membership,
            sync_labels: false,
            ..JanitorConfig::default()
        }
    }

    fn refs(snapshot: &OrgSnapshot) -> Vec<String> {
        snapshot
            .open_issues
            .iter()
            .map(|i| i.issue_ref.to_string())
            .collect()
    }

    fn org() -> FakeTracker {
        let fake = FakeTracker::new("org")
            .with_repository("app", false)
            .with_repository("roadmap", false)
            .with_repository("old", true)
            .with_issue("app", open_issue(1, "on board", &[], None))
            .with_issue("app", open_issue(2, "lost", &["bug"], None))
            .with_issue("app", closed_issue(3, "closed", &[]))
            .with_issue("app", open_issue(4, "hypothesis", &["hypothesis"], None))
            .with_issue("app", open_issue(5, "epic", &["epic"], Some("#2")))
            .with_issue("roadmap", open_issue(1, "ignored repo", &[], None))
            .with_issue("old", open_issue(1, "archived", &[], None));
        let card = fake.issue_card(100, "app", 1);
        fake.with_column(10, "Backlog", vec![card])
            .with_column(11, "Done", vec![])
    }

    #[tokio::test]
    async fn test_scan_with_columns() {
        let fake = org();
        let config = config(MembershipSource::Columns);

        let snapshot = OrgScanner::new(&fake, &config, ScanOptions::for_janitor(&config))
            .unwrap()
            .scan()
            .await
            .unwrap();

        assert_eq!(snapshot.scanned_repos, vec!["app"]);
        assert_eq!(snapshot.skipped_repos, vec!["roadmap", "old"]);
        assert!(snapshot.membership.contains(&IssueRef::new("app", 1)));
        assert_eq!(snapshot.epic_count, 1);
        assert!(snapshot.epics.contains(&IssueRef::new("app", 2)));
        assert_eq!(refs(&snapshot), vec!["app#1", "app#2", "app#5"]);
    }

    #[tokio::test]
    async fn test_scan_with_search_membership() {
        let fake = org();
        let config = config(MembershipSource::Search);

        let snapshot = OrgScanner::new(&fake, &config, ScanOptions::for_janitor(&config))
            .unwrap()
            .scan()
            .await
            .unwrap();

        assert!(snapshot.membership.is_empty());
        assert_eq!(refs(&snapshot), vec!["app#2", "app#5"]);
    }

    #[tokio::test]
    async fn test_epics_only_scan() {
        let fake = org();
        let config = config(MembershipSource::Columns);

        let snapshot = OrgScanner::new(&fake, &config, ScanOptions::epics_only())
            .unwrap()
            .scan()
            .await
            .unwrap();

        assert!(snapshot.open_issues.is_empty());
        assert!(snapshot.membership.is_empty());
        assert!(snapshot.epics.contains(&IssueRef::new("app", 2)));
    }

    #[tokio::test]
    async fn test_scan_syncs_labels_of_scanned_repos_only() {
        let fake = org().with_labels("app", vec![Label::new("bug", "000000")]);
        let config = JanitorConfig {
            sync_labels: true,
            ..config(MembershipSource::Columns)
        };

        let snapshot = OrgScanner::new(&fake, &config, ScanOptions::for_janitor(&config))
            .unwrap()
            .scan()
            .await
            .unwrap();

        assert!(!snapshot.label_actions.is_empty());
        assert!(snapshot.label_actions.iter().all(|(repo, _)| repo == "app"));
        assert!(fake.mutations().iter().all(|m| match m {
            Mutation::CreateLabel { repo, .. }
            | Mutation::UpdateLabel { repo, .. }
            | Mutation::DeleteLabel { repo, .. } => repo == "app",
            Mutation::CreateCard { .. } => false,
        }));
    }

    #[tokio::test]
    async fn test_repositories_are_paginated() {
        let fake = FakeTracker::new("org")
            .with_page_size(1)
            .with_repository("a", false)
            .with_repository("b", false)
            .with_repository("c", false);
        let config = config(MembershipSource::Unchecked);

        let snapshot = OrgScanner::new(&fake, &config, ScanOptions::epics_only())
            .unwrap()
            .scan()
            .await
            .unwrap();

        assert_eq!(snapshot.scanned_repos, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_missing_column_aborts() {
        let fake = FakeTracker::new("org");
        let config = config(MembershipSource::Columns);

        let result = OrgScanner::new(&fake, &config, ScanOptions::for_janitor(&config))
            .unwrap()
            .scan()
            .await;

        let err = result.unwrap_err();
        assert_eq!(format!("{}", err), "Error fetching cards of column 10");
    }
}
