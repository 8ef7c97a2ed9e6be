//! Rate-limit pacing client (decorator pattern)
//!
//! Wraps any `TrackerClient` and, after every read call, checks the quota of
//! the bucket that call drew from. When the remaining quota falls below the
//! threshold, it pauses until the reported reset time before returning.
//!
//! The pause itself goes through the `Pacer` trait so tests can observe
//! exhausted quotas without real delays.

use crate::client::TrackerClient;
use crate::types::{
    Issue, Label, Page, ProjectCard, ProjectColumn, RateBucket, RateLimit, Repository,
};
use async_trait::async_trait;
use chrono::Utc;
use log::info;
use std::time::Duration;

/// Default remaining-quota threshold below which the client pauses
pub const DEFAULT_THRESHOLD: u64 = 10;

/// Blocking pause capability
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Suspend the caller for `delay`
    async fn pause(&self, delay: Duration);
}

/// Pacer backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Rate-limit pacing decorator
///
/// # Example
///
/// ```rust,ignore
/// use gh_janitor_client::{OctocrabClient, PacedClient, TokioPacer};
///
/// let client = PacedClient::new(OctocrabClient::new(octocrab), TokioPacer, 10);
/// ```
#[derive(Debug, Clone)]
pub struct PacedClient<C: TrackerClient, P: Pacer> {
    inner: C,
    pacer: P,
    threshold: u64,
}

impl<C: TrackerClient, P: Pacer> PacedClient<C, P> {
    /// Create a new pacing client
    ///
    /// # Arguments
    ///
    /// * `inner` - The inner client to delegate API calls to
    /// * `pacer` - How to pause
    /// * `threshold` - Pause when fewer than this many requests remain
    pub fn new(inner: C, pacer: P, threshold: u64) -> Self {
        Self {
            inner,
            pacer,
            threshold,
        }
    }

    /// Get a reference to the inner client
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Get a reference to the pacer
    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Pause until the bucket resets if its quota is nearly exhausted
    async fn throttle(&self, bucket: RateBucket) -> anyhow::Result<()> {
        let limits = self.inner.rate_limit().await?;
        let rate = limits.bucket(bucket);

        if rate.remaining >= self.threshold {
            return Ok(());
        }

        // A reset time already in the past needs no pause
        if let Ok(delay) = (rate.reset - Utc::now()).to_std() {
            info!(
                "[rl] {} requests left, pausing {:?} until {}",
                rate.remaining, delay, rate.reset
            );
            self.pacer.pause(delay).await;
        }
        Ok(())
    }
}

#[async_trait]
impl<C: TrackerClient, P: Pacer> TrackerClient for PacedClient<C, P> {
    async fn list_org_repositories(&self, org: &str, page: u32) -> anyhow::Result<Page<Repository>> {
        let result = self.inner.list_org_repositories(org, page).await?;
        self.throttle(RateBucket::Core).await?;
        Ok(result)
    }

    async fn search_issues(&self, query: &str, page: u32) -> anyhow::Result<Page<Issue>> {
        let result = self.inner.search_issues(query, page).await?;
        self.throttle(RateBucket::Search).await?;
        Ok(result)
    }

    async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> anyhow::Result<Issue> {
        let result = self.inner.get_issue(owner, repo, number).await?;
        self.throttle(RateBucket::Core).await?;
        Ok(result)
    }

    async fn list_labels(&self, owner: &str, repo: &str, page: u32) -> anyhow::Result<Page<Label>> {
        let result = self.inner.list_labels(owner, repo, page).await?;
        self.throttle(RateBucket::Core).await?;
        Ok(result)
    }

    async fn create_label(&self, owner: &str, repo: &str, label: &Label) -> anyhow::Result<()> {
        self.inner.create_label(owner, repo, label).await
    }

    async fn update_label(
        &self,
        owner: &str,
        repo: &str,
        current_name: &str,
        label: &Label,
    ) -> anyhow::Result<()> {
        self.inner.update_label(owner, repo, current_name, label).await
    }

    async fn delete_label(&self, owner: &str, repo: &str, name: &str) -> anyhow::Result<()> {
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
        let result = self.inner.list_column_cards(column_id, page).await?;
        self.throttle(RateBucket::Core).await?;
        Ok(result)
    }

    async fn create_issue_card(&self, column_id: u64, issue_id: u64) -> anyhow::Result<()> {
        self.inner.create_issue_card(column_id, issue_id).await
    }

    async fn rate_limit(&self) -> anyhow::Result<RateLimit> {
        self.inner.rate_limit().await
    }
}
