//! Issue tracker client trait
//!
//! This module defines the core `TrackerClient` trait that all client
//! implementations must satisfy. Decorators (dry-run, rate-limit pacing)
//! wrap another `TrackerClient` and implement the same trait.

use crate::types::{Issue, Label, Page, ProjectCard, ProjectColumn, RateLimit, Repository};
use async_trait::async_trait;

/// Page size used for every paginated listing
pub const PER_PAGE: u8 = 100;

/// GitHub issue tracker client trait
///
/// Covers exactly the API surface the janitor needs: repository listing,
/// issue search, label CRUD, classic project cards and rate-limit metadata.
/// Paginated calls take a 1-based page number and report the next one.
///
/// # Example
///
/// ```rust,ignore
/// use gh_janitor_client::TrackerClient;
///
/// async fn count_labels(client: &dyn TrackerClient) -> anyhow::Result<usize> {
///     let page = client.list_labels("dotmesh-io", "dotmesh", 1).await?;
///     Ok(page.items.len())
/// }
/// ```
#[async_trait]
pub trait TrackerClient: Send + Sync {
    // === Repositories ===

    /// List one page of the organization's repositories (all types, archived included)
    async fn list_org_repositories(&self, org: &str, page: u32) -> anyhow::Result<Page<Repository>>;

    // === Issues ===

    /// Search issues with a GitHub search query
    ///
    /// # Arguments
    ///
    /// * `query` - Search query, e.g. `is:open is:issue repo:org/repo`
    /// * `page` - 1-based page number
    async fn search_issues(&self, query: &str, page: u32) -> anyhow::Result<Page<Issue>>;

    /// Fetch a single issue by number
    async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> anyhow::Result<Issue>;

    // === Labels ===

    /// List one page of a repository's labels
    async fn list_labels(&self, owner: &str, repo: &str, page: u32) -> anyhow::Result<Page<Label>>;

    /// Create a label
    async fn create_label(&self, owner: &str, repo: &str, label: &Label) -> anyhow::Result<()>;

    /// Edit an existing label
    ///
    /// # Arguments
    ///
    /// * `current_name` - Name the label has now
    /// * `label` - New name and color (the name may equal `current_name`)
    async fn update_label(
        &self,
        owner: &str,
        repo: &str,
        current_name: &str,
        label: &Label,
    ) -> anyhow::Result<()>;

    /// Delete a label by name
    async fn delete_label(&self, owner: &str, repo: &str, name: &str) -> anyhow::Result<()>;

    // === Projects ===

    /// Fetch a project column
    async fn get_project_column(&self, column_id: u64) -> anyhow::Result<ProjectColumn>;

    /// List one page of the cards in a project column
    async fn list_column_cards(&self, column_id: u64, page: u32)
        -> anyhow::Result<Page<ProjectCard>>;

    /// Add an issue to a project column as a new card
    ///
    /// # Arguments
    ///
    /// * `column_id` - Target column
    /// * `issue_id` - Global issue ID (not the per-repository number)
    async fn create_issue_card(&self, column_id: u64, issue_id: u64) -> anyhow::Result<()>;

    // === Rate limit ===

    /// Current rate-limit metadata
    async fn rate_limit(&self) -> anyhow::Result<RateLimit>;
}
