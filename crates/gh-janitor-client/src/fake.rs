//! In-memory tracker for tests
//!
//! `FakeTracker` keeps repositories, issues, labels and project columns in
//! memory, applies mutations to that state and records every mutating call.
//! Search understands the `repo:`, `is:open` and `no:project` qualifiers.

use crate::client::TrackerClient;
use crate::paced_client::Pacer;
use crate::types::{
    Issue, IssueState, Label, Page, ProjectCard, ProjectColumn, Rate, RateLimit, Repository,
};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

/// A mutating call received by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateLabel { repo: String, label: Label },
    UpdateLabel { repo: String, from: String, label: Label },
    DeleteLabel { repo: String, name: String },
    CreateCard { column_id: u64, issue_id: u64 },
}

#[derive(Debug, Default)]
struct State {
    repositories: Vec<Repository>,
    issues: Vec<(String, Issue)>,
    labels: BTreeMap<String, Vec<Label>>,
    columns: BTreeMap<u64, (ProjectColumn, Vec<ProjectCard>)>,
    mutations: Vec<Mutation>,
    next_card_id: u64,
}

/// In-memory `TrackerClient`
#[derive(Debug)]
pub struct FakeTracker {
    org: String,
    page_size: usize,
    state: Mutex<State>,
    rate: Mutex<RateLimit>,
}

impl FakeTracker {
    /// Empty organization with a healthy rate limit
    pub fn new(org: &str) -> Self {
        let reset = Utc::now() + chrono::Duration::hours(1);
        Self {
            org: org.to_string(),
            page_size: 100,
            state: Mutex::new(State {
                next_card_id: 1,
                ..State::default()
            }),
            rate: Mutex::new(RateLimit {
                core: Rate {
                    limit: 5000,
                    remaining: 5000,
                    reset,
                },
                search: Rate {
                    limit: 30,
                    remaining: 30,
                    reset,
                },
            }),
        }
    }

    /// Serve listings in pages of `size` items
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    pub fn with_repository(self, name: &str, archived: bool) -> Self {
        self.lock().repositories.push(Repository {
            name: name.to_string(),
            owner: self.org.clone(),
            archived,
        });
        self
    }

    pub fn with_issue(self, repo: &str, issue: Issue) -> Self {
        self.lock().issues.push((repo.to_string(), issue));
        self
    }

    pub fn with_labels(self, repo: &str, labels: Vec<Label>) -> Self {
        self.lock().labels.insert(repo.to_string(), labels);
        self
    }

    pub fn with_column(self, id: u64, name: &str, cards: Vec<ProjectCard>) -> Self {
        let column = ProjectColumn {
            id,
            name: name.to_string(),
        };
        self.lock().columns.insert(id, (column, cards));
        self
    }

    /// Card pointing at `repo#number` in this organization
    pub fn issue_card(&self, card_id: u64, repo: &str, number: u64) -> ProjectCard {
        ProjectCard {
            id: card_id,
            content_url: Some(self.content_url(repo, number)),
        }
    }

    pub fn set_core_remaining(&self, remaining: u64, reset: DateTime<Utc>) {
        let mut rate = self.rate.lock().unwrap();
        rate.core.remaining = remaining;
        rate.core.reset = reset;
    }

    pub fn set_search_remaining(&self, remaining: u64, reset: DateTime<Utc>) {
        let mut rate = self.rate.lock().unwrap();
        rate.search.remaining = remaining;
        rate.search.reset = reset;
    }

    /// Every mutating call received so far, in order
    pub fn mutations(&self) -> Vec<Mutation> {
        self.lock().mutations.clone()
    }

    pub fn clear_mutations(&self) {
        self.lock().mutations.clear();
    }

    /// Current labels of a repository
    pub fn labels(&self, repo: &str) -> Vec<Label> {
        self.lock().labels.get(repo).cloned().unwrap_or_default()
    }

    /// Current cards of a column
    pub fn cards(&self, column_id: u64) -> Vec<ProjectCard> {
        self.lock()
            .columns
            .get(&column_id)
            .map(|(_, cards)| cards.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn content_url(&self, repo: &str, number: u64) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/issues/{}",
            self.org, repo, number
        )
    }

    fn paginate<T: Clone>(&self, items: &[T], page: u32) -> Page<T> {
        let start = (page.max(1) as usize - 1) * self.page_size;
        let end = (start + self.page_size).min(items.len());
        let slice = items.get(start..end).unwrap_or_default().to_vec();
        let next_page = (end < items.len()).then_some(page + 1);
        Page {
            items: slice,
            next_page,
        }
    }

    fn on_project(state: &State, url: &str) -> bool {
        state
            .columns
            .values()
            .flat_map(|(_, cards)| cards.iter())
            .any(|card| card.content_url.as_deref() == Some(url))
    }
}

#[async_trait]
impl TrackerClient for FakeTracker {
    async fn list_org_repositories(&self, org: &str, page: u32) -> anyhow::Result<Page<Repository>> {
        if org != self.org {
            return Err(anyhow!("unknown organization {}", org));
        }
        let repositories = self.lock().repositories.clone();
        Ok(self.paginate(&repositories, page))
    }

    async fn search_issues(&self, query: &str, page: u32) -> anyhow::Result<Page<Issue>> {
        let state = self.lock();
        let mut repo_filter = None;
        let mut open_only = false;
        let mut no_project = false;
        for term in query.split_whitespace() {
            match term {
                "is:open" => open_only = true,
                "no:project" => no_project = true,
                _ => {
                    if let Some(full_name) = term.strip_prefix("repo:") {
                        repo_filter = full_name.split('/').nth(1).map(str::to_string);
                    }
                }
            }
        }

        let matching: Vec<Issue> = state
            .issues
            .iter()
            .filter(|(repo, _)| repo_filter.as_deref().is_none_or(|r| r == repo.as_str()))
            .filter(|(_, issue)| !open_only || issue.state == IssueState::Open)
            .filter(|(repo, issue)| {
                !no_project || !Self::on_project(&state, &self.content_url(repo, issue.number))
            })
            .map(|(_, issue)| issue.clone())
            .collect();
        drop(state);

        Ok(self.paginate(&matching, page))
    }

    async fn get_issue(&self, _owner: &str, repo: &str, number: u64) -> anyhow::Result<Issue> {
        self.lock()
            .issues
            .iter()
            .find(|(r, issue)| r == repo && issue.number == number)
            .map(|(_, issue)| issue.clone())
            .ok_or_else(|| anyhow!("issue {}#{} not found", repo, number))
    }

    async fn list_labels(&self, _owner: &str, repo: &str, page: u32) -> anyhow::Result<Page<Label>> {
        let labels = self.labels(repo);
        Ok(self.paginate(&labels, page))
    }

    async fn create_label(&self, _owner: &str, repo: &str, label: &Label) -> anyhow::Result<()> {
        let mut state = self.lock();
        state
            .labels
            .entry(repo.to_string())
            .or_default()
            .push(label.clone());
        state.mutations.push(Mutation::CreateLabel {
            repo: repo.to_string(),
            label: label.clone(),
        });
        Ok(())
    }

    async fn update_label(
        &self,
        _owner: &str,
        repo: &str,
        current_name: &str,
        label: &Label,
    ) -> anyhow::Result<()> {
        let mut state = self.lock();
        let existing = state
            .labels
            .get_mut(repo)
            .and_then(|labels| labels.iter_mut().find(|l| l.name == current_name))
            .ok_or_else(|| anyhow!("label {:?} not found in {}", current_name, repo))?;
        *existing = label.clone();
        state.mutations.push(Mutation::UpdateLabel {
            repo: repo.to_string(),
            from: current_name.to_string(),
            label: label.clone(),
        });
        Ok(())
    }

    async fn delete_label(&self, _owner: &str, repo: &str, name: &str) -> anyhow::Result<()> {
        let mut state = self.lock();
        if let Some(labels) = state.labels.get_mut(repo) {
            labels.retain(|l| l.name != name);
        }
        state.mutations.push(Mutation::DeleteLabel {
            repo: repo.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    async fn get_project_column(&self, column_id: u64) -> anyhow::Result<ProjectColumn> {
        self.lock()
            .columns
            .get(&column_id)
            .map(|(column, _)| column.clone())
            .ok_or_else(|| anyhow!("column {} not found", column_id))
    }

    async fn list_column_cards(
        &self,
        column_id: u64,
        page: u32,
    ) -> anyhow::Result<Page<ProjectCard>> {
        let cards = self
            .lock()
            .columns
            .get(&column_id)
            .map(|(_, cards)| cards.clone())
            .ok_or_else(|| anyhow!("column {} not found", column_id))?;
        Ok(self.paginate(&cards, page))
    }

    async fn create_issue_card(&self, column_id: u64, issue_id: u64) -> anyhow::Result<()> {
        let mut state = self.lock();
        let (repo, number) = state
            .issues
            .iter()
            .find(|(_, issue)| issue.id == issue_id)
            .map(|(repo, issue)| (repo.clone(), issue.number))
            .ok_or_else(|| anyhow!("issue id {} not found", issue_id))?;
        let card = ProjectCard {
            id: state.next_card_id,
            content_url: Some(self.content_url(&repo, number)),
        };
        state.next_card_id += 1;
        state
            .columns
            .get_mut(&column_id)
            .ok_or_else(|| anyhow!("column {} not found", column_id))?
            .1
            .push(card);
        state.mutations.push(Mutation::CreateCard {
            column_id,
            issue_id,
        });
        Ok(())
    }

    async fn rate_limit(&self) -> anyhow::Result<RateLimit> {
        Ok(*self.rate.lock().unwrap())
    }
}

/// Pacer that records requested pauses instead of sleeping
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, delay: Duration) {
        self.pauses.lock().unwrap().push(delay);
    }
}

/// Open issue with the given labels and body, id derived from the number
pub fn open_issue(number: u64, title: &str, labels: &[&str], body: Option<&str>) -> Issue {
    Issue {
        id: 1000 + number,
        number,
        title: title.to_string(),
        body: body.map(str::to_string),
        labels: labels.iter().map(|l| l.to_string()).collect(),
        state: IssueState::Open,
        closed_at: None,
    }
}

/// Closed variant of [`open_issue`]
pub fn closed_issue(number: u64, title: &str, labels: &[&str]) -> Issue {
    Issue {
        state: IssueState::Closed,
        closed_at: Some(Utc::now()),
        ..open_issue(number, title, labels, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_qualifiers() {
        let fake = FakeTracker::new("org")
            .with_issue("app", open_issue(1, "open", &[], None))
            .with_issue("app", closed_issue(2, "closed", &[]))
            .with_issue("lib", open_issue(3, "other repo", &[], None));

        let page = fake.search_issues("is:open repo:org/app", 1).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].number, 1);
    }

    #[tokio::test]
    async fn test_no_project_qualifier() {
        let fake = FakeTracker::new("org")
            .with_issue("app", open_issue(1, "carded", &[], None))
            .with_issue("app", open_issue(2, "loose", &[], None));
        let card = fake.issue_card(9, "app", 1);
        let fake = fake.with_column(5, "Backlog", vec![card]);

        let page = fake
            .search_issues("is:open no:project repo:org/app", 1)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].number, 2);
    }

    #[tokio::test]
    async fn test_pagination() {
        let fake = FakeTracker::new("org")
            .with_page_size(2)
            .with_repository("a", false)
            .with_repository("b", false)
            .with_repository("c", false);

        let first = fake.list_org_repositories("org", 1).await.unwrap();
        let second = fake.list_org_repositories("org", 2).await.unwrap();

        assert_eq!(first.items.len(), 2);
        assert_eq!(first.next_page, Some(2));
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.next_page, None);
    }
}
