//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `TrackerClient` trait using the octocrab library.
//! This client makes real API calls without any pacing or dry-run gating.

use crate::client::{TrackerClient, PER_PAGE};
use crate::types::{
    Issue, IssueState, Label, Page, ProjectCard, ProjectColumn, Rate, RateLimit, Repository,
};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Direct GitHub API client using octocrab
///
/// This is the base implementation that makes actual API calls.
/// It can be wrapped by `PacedClient` and `DryRunClient`.
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

/// Query parameters for raw paginated routes
#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

/// Classic project column as returned by `/projects/columns/{id}`
#[derive(Deserialize)]
struct ColumnDto {
    id: u64,
    name: String,
}

/// Classic project card as returned by `/projects/columns/{id}/cards`
#[derive(Deserialize)]
struct CardDto {
    id: u64,
    content_url: Option<String>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }
}

#[async_trait]
impl TrackerClient for OctocrabClient {
    async fn list_org_repositories(&self, org: &str, page: u32) -> anyhow::Result<Page<Repository>> {
        debug!("Listing repositories of {} (page {})", org, page);

        let result = self
            .octocrab
            .orgs(org)
            .list_repos()
            .repo_type(octocrab::params::repos::Type::All)
            .per_page(PER_PAGE)
            .page(page)
            .send()
            .await
            .with_context(|| format!("Failed to list repositories of {}", org))?;

        let next_page = next_page(page, result.next.is_some());
        let items = result
            .items
            .into_iter()
            .map(|repo| Repository {
                owner: repo
                    .owner
                    .map(|o| o.login)
                    .unwrap_or_else(|| org.to_string()),
                name: repo.name,
                archived: repo.archived.unwrap_or(false),
            })
            .collect();

        Ok(Page { items, next_page })
    }

    async fn search_issues(&self, query: &str, page: u32) -> anyhow::Result<Page<Issue>> {
        debug!("Searching issues {:?} (page {})", query, page);

        let result = self
            .octocrab
            .search()
            .issues_and_pull_requests(query)
            .per_page(PER_PAGE)
            .page(page)
            .send()
            .await
            .with_context(|| format!("Failed to search issues with {:?}", query))?;

        let next_page = next_page(page, result.next.is_some());
        let items = result.items.iter().map(convert_issue).collect();
        Ok(Page { items, next_page })
    }

    async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> anyhow::Result<Issue> {
        debug!("Fetching issue {}/{}#{}", owner, repo, number);

        let issue = self
            .octocrab
            .issues(owner, repo)
            .get(number)
            .await
            .with_context(|| format!("Failed to fetch issue {}#{}", repo, number))?;

        Ok(convert_issue(&issue))
    }

    async fn list_labels(&self, owner: &str, repo: &str, page: u32) -> anyhow::Result<Page<Label>> {
        debug!("Listing labels of {}/{} (page {})", owner, repo, page);

        let result = self
            .octocrab
            .issues(owner, repo)
            .list_labels_for_repo()
            .per_page(PER_PAGE)
            .page(page)
            .send()
            .await
            .with_context(|| format!("Failed to list labels of {}/{}", owner, repo))?;

        let next_page = next_page(page, result.next.is_some());
        let items = result
            .items
            .into_iter()
            .map(|l| Label::new(l.name, l.color))
            .collect();
        Ok(Page { items, next_page })
    }

    async fn create_label(&self, owner: &str, repo: &str, label: &Label) -> anyhow::Result<()> {
        debug!("Creating label {:?} in {}/{}", label.name, owner, repo);

        self.octocrab
            .issues(owner, repo)
            .create_label(&label.name, &label.color, "")
            .await
            .with_context(|| format!("Failed to create label {:?} in {}", label.name, repo))?;
        Ok(())
    }

    async fn update_label(
        &self,
        owner: &str,
        repo: &str,
        current_name: &str,
        label: &Label,
    ) -> anyhow::Result<()> {
        debug!(
            "Updating label {:?} in {}/{} to {:?} #{}",
            current_name, owner, repo, label.name, label.color
        );

        // octocrab has no typed label edit, so use the raw route
        let route = format!(
            "/repos/{}/{}/labels/{}",
            owner,
            repo,
            urlencoding::encode(current_name)
        );
        let body = serde_json::json!({
            "new_name": label.name,
            "color": label.color,
        });
        let _: octocrab::models::Label = self
            .octocrab
            .patch(route, Some(&body))
            .await
            .with_context(|| format!("Failed to update label {:?} in {}", current_name, repo))?;
        Ok(())
    }

    async fn delete_label(&self, owner: &str, repo: &str, name: &str) -> anyhow::Result<()> {
        debug!("Deleting label {:?} in {}/{}", name, owner, repo);

        self.octocrab
            .issues(owner, repo)
            .delete_label(urlencoding::encode(name))
            .await
            .with_context(|| format!("Failed to delete label {:?} in {}", name, repo))?;
        Ok(())
    }

    async fn get_project_column(&self, column_id: u64) -> anyhow::Result<ProjectColumn> {
        debug!("Fetching project column {}", column_id);

        let route = format!("/projects/columns/{}", column_id);
        let column: ColumnDto = self
            .octocrab
            .get(route, None::<&()>)
            .await
            .with_context(|| format!("Failed to fetch project column {}", column_id))?;

        Ok(ProjectColumn {
            id: column.id,
            name: column.name,
        })
    }

    async fn list_column_cards(
        &self,
        column_id: u64,
        page: u32,
    ) -> anyhow::Result<Page<ProjectCard>> {
        debug!("Listing cards of column {} (page {})", column_id, page);

        let route = format!("/projects/columns/{}/cards", column_id);
        let params = PageParams {
            per_page: PER_PAGE,
            page,
        };
        let result: octocrab::Page<CardDto> = self
            .octocrab
            .get(route, Some(&params))
            .await
            .with_context(|| format!("Failed to list cards of column {}", column_id))?;

        let next_page = next_page(page, result.next.is_some());
        let items = result
            .items
            .into_iter()
            .map(|card| ProjectCard {
                id: card.id,
                content_url: card.content_url,
            })
            .collect();
        Ok(Page { items, next_page })
    }

    async fn create_issue_card(&self, column_id: u64, issue_id: u64) -> anyhow::Result<()> {
        debug!("Creating card for issue id {} in column {}", issue_id, column_id);

        let route = format!("/projects/columns/{}/cards", column_id);
        let body = serde_json::json!({
            "content_type": "Issue",
            "content_id": issue_id,
        });
        let _: serde_json::Value = self
            .octocrab
            .post(route, Some(&body))
            .await
            .with_context(|| {
                format!("Failed to add issue id {} to column {}", issue_id, column_id)
            })?;
        Ok(())
    }

    async fn rate_limit(&self) -> anyhow::Result<RateLimit> {
        let limits = self
            .octocrab
            .ratelimit()
            .get()
            .await
            .context("Failed to fetch rate limit")?;

        Ok(RateLimit {
            core: convert_rate(&limits.resources.core),
            search: convert_rate(&limits.resources.search),
        })
    }
}

/// Next page number if the response carried a `next` link
fn next_page(current: u32, has_next: bool) -> Option<u32> {
    has_next.then_some(current + 1)
}

/// Convert octocrab Issue to our Issue type
fn convert_issue(issue: &octocrab::models::issues::Issue) -> Issue {
    let state = match issue.state {
        octocrab::models::IssueState::Closed => IssueState::Closed,
        _ => IssueState::Open,
    };

    Issue {
        id: issue.id.0,
        number: issue.number,
        title: issue.title.clone(),
        body: issue.body.clone(),
        labels: issue.labels.iter().map(|l| l.name.clone()).collect(),
        state,
        closed_at: issue.closed_at,
    }
}

/// Convert octocrab Rate (epoch seconds reset) to our Rate
fn convert_rate(rate: &octocrab::models::Rate) -> Rate {
    Rate {
        limit: rate.limit as u64,
        remaining: rate.remaining as u64,
        reset: epoch_to_utc(rate.reset),
    }
}

fn epoch_to_utc(seconds: u64) -> DateTime<Utc> {
    i64::try_from(seconds)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .unwrap_or_else(Utc::now)
}
