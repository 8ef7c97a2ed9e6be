//! Dry-run GitHub client (decorator pattern)
//!
//! Wraps any `TrackerClient` and gates every mutating call. Reads always go
//! through to the inner client. When dry-run is enabled, mutations are only
//! logged, so the reconciliation logic stays observable without side effects.

use crate::client::TrackerClient;
use crate::types::{Issue, Label, Page, ProjectCard, ProjectColumn, RateLimit, Repository};
use async_trait::async_trait;
use log::info;

/// Whether mutating calls reach the API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MutationMode {
    /// Forward mutations to the inner client
    #[default]
    Apply,

    /// Log mutations and skip them
    DryRun,
}

impl MutationMode {
    /// Build from a `dry_run` flag
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            MutationMode::DryRun
        } else {
            MutationMode::Apply
        }
    }

    /// Should mutating calls be forwarded?
    pub fn should_apply(&self) -> bool {
        matches!(self, MutationMode::Apply)
    }
}

/// Dry-run client using the decorator pattern
///
/// # Example
///
/// ```rust,ignore
/// use gh_janitor_client::{DryRunClient, MutationMode, OctocrabClient};
///
/// let client = DryRunClient::new(OctocrabClient::new(octocrab), MutationMode::DryRun);
/// // logs "[dry-run] would create label ..." and returns Ok(())
/// client.create_label("org", "repo", &label).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DryRunClient<C: TrackerClient> {
    inner: C,
    mode: MutationMode,
}

impl<C: TrackerClient> DryRunClient<C> {
    /// Create a new dry-run gate around `inner`
    pub fn new(inner: C, mode: MutationMode) -> Self {
        Self { inner, mode }
    }

    /// Get a reference to the inner client
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: TrackerClient> TrackerClient for DryRunClient<C> {
    async fn list_org_repositories(&self, org: &str, page: u32) -> anyhow::Result<Page<Repository>> {
        self.inner.list_org_repositories(org, page).await
    }

    async fn search_issues(&self, query: &str, page: u32) -> anyhow::Result<Page<Issue>> {
        self.inner.search_issues(query, page).await
    }

    async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> anyhow::Result<Issue> {
        self.inner.get_issue(owner, repo, number).await
    }

    async fn list_labels(&self, owner: &str, repo: &str, page: u32) -> anyhow::Result<Page<Label>> {
        self.inner.list_labels(owner, repo, page).await
    }

    async fn create_label(&self, owner: &str, repo: &str, label: &Label) -> anyhow::Result<()> {
        if !self.mode.should_apply() {
            info!(
                "[dry-run] would create label {:?} #{} in {}/{}",
                label.name, label.color, owner, repo
            );
            return Ok(());
        }
        self.inner.create_label(owner, repo, label).await
    }

    async fn update_label(
        &self,
        owner: &str,
        repo: &str,
        current_name: &str,
        label: &Label,
    ) -> anyhow::Result<()> {
        if !self.mode.should_apply() {
            info!(
                "[dry-run] would update label {:?} in {}/{} to {:?} #{}",
                current_name, owner, repo, label.name, label.color
            );
            return Ok(());
        }
        self.inner
            .update_label(owner, repo, current_name, label)
            .await
    }

    async fn delete_label(&self, owner: &str, repo: &str, name: &str) -> anyhow::Result<()> {
        if !self.mode.should_apply() {
            info!("[dry-run] would delete label {:?} in {}/{}", name, owner, repo);
            return Ok(());
        }
        self.inner.delete_label(owner, repo, name).await
    }

    async fn get_project_column(&self, column_id: u64) -> anyhow::Result<ProjectColumn> {
        self.inner.get_project_column(column_id).await
    }

    async fn list_column_cards(
        &self,
        column_id: u64,
        page: u32,
    ) -> anyhow::Result<Page<ProjectCard>> {
        self.inner.list_column_cards(column_id, page).await
    }

    async fn create_issue_card(&self, column_id: u64, issue_id: u64) -> anyhow::Result<()> {
        if !self.mode.should_apply() {
            info!(
                "[dry-run] would add issue id {} to column {}",
                issue_id, column_id
            );
            return Ok(());
        }
        self.inner.create_issue_card(column_id, issue_id).await
    }

    async fn rate_limit(&self) -> anyhow::Result<RateLimit> {
        self.inner.rate_limit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeTracker, Mutation};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mutation_mode_default() {
        assert_eq!(MutationMode::default(), MutationMode::Apply);
    }

    #[test]
    fn test_mutation_mode_from_dry_run() {
        assert!(!MutationMode::from_dry_run(true).should_apply());
        assert!(MutationMode::from_dry_run(false).should_apply());
    }

    #[tokio::test]
    async fn test_dry_run_skips_every_mutation() {
        let client = DryRunClient::new(FakeTracker::new("org"), MutationMode::DryRun);
        let label = Label::new("bug", "f03838");

        client.create_label("org", "app", &label).await.unwrap();
        client.update_label("org", "app", "bug", &label).await.unwrap();
        client.delete_label("org", "app", "bug").await.unwrap();
        client.create_issue_card(1, 2).await.unwrap();

        assert!(client.inner().mutations().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_still_reads() {
        let fake = FakeTracker::new("org").with_labels("app", vec![Label::new("bug", "000000")]);
        let client = DryRunClient::new(fake, MutationMode::DryRun);

        let page = client.list_labels("org", "app", 1).await.unwrap();

        assert_eq!(page.items, vec![Label::new("bug", "000000")]);
    }

    #[tokio::test]
    async fn test_apply_forwards_mutations() {
        let client = DryRunClient::new(FakeTracker::new("org"), MutationMode::Apply);

        client.delete_label("org", "app", "wontfix").await.unwrap();

        assert_eq!(
            client.inner().mutations(),
            vec![Mutation::DeleteLabel {
                repo: "app".to_string(),
                name: "wontfix".to_string(),
            }]
        );
    }
}
