//! The janitor job
//!
//! Scans the organization, then files every lost issue into the triage
//! column. Filing only starts after the whole organization is scanned.

use crate::scanner::{OrgScanner, OrgSnapshot, ScanOptions};
use crate::triage::{select_triage_candidates, OpenIssue};
use anyhow::Context;
use gh_janitor_client::TrackerClient;
use gh_janitor_config::JanitorConfig;
use std::fmt;

/// Summary of a janitor run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub scanned_repos: usize,
    pub skipped_repos: usize,
    pub label_actions: usize,
    pub epics: usize,
    pub mentioned_issues: usize,
    pub open_issues: usize,
    /// Issues filed into the triage column (or that would have been)
    pub filed: Vec<OpenIssue>,
}

impl RunReport {
    fn new(snapshot: &OrgSnapshot, filed: Vec<OpenIssue>) -> Self {
        Self {
            scanned_repos: snapshot.scanned_repos.len(),
            skipped_repos: snapshot.skipped_repos.len(),
            label_actions: snapshot.label_actions.len(),
            epics: snapshot.epic_count,
            mentioned_issues: snapshot.epics.len(),
            open_issues: snapshot.open_issues.len(),
            filed,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} repositories scanned, {} skipped; {} label changes; \
             {} epics mentioning {} issues; {} open issues, {} filed for triage",
            self.scanned_repos,
            self.skipped_repos,
            self.label_actions,
            self.epics,
            self.mentioned_issues,
            self.open_issues,
            self.filed.len()
        )
    }
}

/// Label sync and triage filing for one organization
pub struct Janitor<'a> {
    client: &'a dyn TrackerClient,
    config: &'a JanitorConfig,
}

impl<'a> Janitor<'a> {
    pub fn new(client: &'a dyn TrackerClient, config: &'a JanitorConfig) -> Self {
        Self { client, config }
    }

    pub async fn run(&self) -> anyhow::Result<RunReport> {
        let scanner =
            OrgScanner::new(self.client, self.config, ScanOptions::for_janitor(self.config))?;
        let snapshot = scanner.scan().await?;

        if !self.config.file_triage {
            return Ok(RunReport::new(&snapshot, Vec::new()));
        }

        let column = self
            .config
            .triage_column
            .context("No triage column configured")?;
        let candidates =
            select_triage_candidates(&snapshot.open_issues, &snapshot.membership, &snapshot.epics);

        log::info!("#### FILING {} ISSUES INTO COLUMN {}", candidates.len(), column);
        for issue in &candidates {
            log::info!("Issue not in project: {}: {}", issue.issue_ref, issue.title);
            self.client
                .create_issue_card(column, issue.id)
                .await
                .with_context(|| {
                    format!("Error filing {} into column {}", issue.issue_ref, column)
                })?;
        }

        Ok(RunReport::new(&snapshot, candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_janitor_client::fake::{open_issue, FakeTracker, Mutation};
    use gh_janitor_client::{DryRunClient, Issue, MutationMode};
    use gh_janitor_config::MembershipSource;
    use pretty_assertions::assert_eq;

    fn config() -> JanitorConfig {
        JanitorConfig {
            org: "org".to_string(),
            triage_column: Some(10),
            tracked_columns: vec![10, 20],
            sync_labels: false,
            ..JanitorConfig::default()
        }
    }

    fn lib_issue(issue: Issue) -> Issue {
        Issue {
            id: 2000 + issue.number,
            ..issue
        }
    }

    fn org() -> FakeTracker {
        let fake = FakeTracker::new("org")
            .with_repository("app", false)
            .with_repository("lib", false)
            .with_issue("app", open_issue(1, "on board", &[], None))
            .with_issue("app", open_issue(2, "lost", &[], None))
            .with_issue("app", open_issue(3, "short link", &[], None))
            .with_issue("lib", lib_issue(open_issue(1, "long link", &[], None)))
            .with_issue(
                "lib",
                lib_issue(open_issue(
                    2,
                    "epic",
                    &["epic"],
                    Some("- [ ] #1\n- [ ] https://github.com/org/app/issues/3"),
                )),
            );
        let card = fake.issue_card(100, "app", 1);
        fake.with_column(10, "Backlog", vec![])
            .with_column(20, "In Progress", vec![card])
    }

    #[tokio::test]
    async fn test_files_lost_issues() {
        let fake = org();
        let config = config();

        let report = Janitor::new(&fake, &config).run().await.unwrap();

        // lib#2 is the epic itself and is on no board
        assert_eq!(
            fake.mutations(),
            vec![
                Mutation::CreateCard {
                    column_id: 10,
                    issue_id: 1002
                },
                Mutation::CreateCard {
                    column_id: 10,
                    issue_id: 2002
                },
            ]
        );
        let filed: Vec<String> = report.filed.iter().map(|i| i.issue_ref.to_string()).collect();
        assert_eq!(filed, vec!["app#2", "lib#2"]);
        assert_eq!(report.scanned_repos, 2);
        assert_eq!(report.epics, 1);
        assert_eq!(report.mentioned_issues, 2);
    }

    #[tokio::test]
    async fn test_second_run_files_nothing() {
        let fake = org();
        let config = config();

        Janitor::new(&fake, &config).run().await.unwrap();
        fake.clear_mutations();
        let report = Janitor::new(&fake, &config).run().await.unwrap();

        assert!(report.filed.is_empty());
        assert!(fake.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_files_nothing() {
        let client = DryRunClient::new(org(), MutationMode::DryRun);
        let config = JanitorConfig {
            sync_labels: true,
            ..config()
        };

        let report = Janitor::new(&client, &config).run().await.unwrap();

        assert_eq!(report.filed.len(), 2);
        assert!(report.label_actions > 0);
        assert!(client.inner().mutations().is_empty());
        assert!(client.inner().cards(10).is_empty());
    }

    #[tokio::test]
    async fn test_triage_disabled() {
        let fake = org();
        let config = JanitorConfig {
            file_triage: false,
            ..config()
        };

        let report = Janitor::new(&fake, &config).run().await.unwrap();

        assert!(report.filed.is_empty());
        assert!(fake.cards(10).is_empty());
    }

    #[tokio::test]
    async fn test_unchecked_membership_files_board_issues_too() {
        let fake = org();
        let config = JanitorConfig {
            membership: MembershipSource::Unchecked,
            ..config()
        };

        let report = Janitor::new(&fake, &config).run().await.unwrap();

        let filed: Vec<String> = report.filed.iter().map(|i| i.issue_ref.to_string()).collect();
        assert_eq!(filed, vec!["app#1", "app#2", "lib#2"]);
    }

    #[test]
    fn test_report_display() {
        let report = RunReport {
            scanned_repos: 3,
            skipped_repos: 1,
            label_actions: 4,
            epics: 2,
            mentioned_issues: 5,
            open_issues: 9,
            filed: Vec::new(),
        };
        assert_eq!(
            report.to_string(),
            "3 repositories scanned, 1 skipped; 4 label changes; \
             2 epics mentioning 5 issues; 9 open issues, 0 filed for triage"
        );
    }
}
