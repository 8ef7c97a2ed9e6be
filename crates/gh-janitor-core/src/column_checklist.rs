//! Column-to-Markdown job
//!
//! Lists the open issues of one project column that no epic mentions yet, as
//! a Markdown checklist ready to paste into an epic or theme description.

use crate::issue_ref::IssueRef;
use crate::markdown::ChecklistRenderer;
use crate::pages::collect_pages;
use crate::scanner::{OrgScanner, ScanOptions};
use anyhow::Context;
use gh_janitor_client::{ProjectColumn, TrackerClient};
use gh_janitor_config::JanitorConfig;

/// Rendered checklist of one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChecklist {
    pub column: ProjectColumn,

    /// One `- [ ] ...` line per listed issue, in card order
    pub lines: Vec<String>,
}

impl ColumnChecklist {
    /// Heading printed before the lines
    pub fn header(&self) -> String {
        format!("### EXAMINING COLUMN {}: {}...", self.column.id, self.column.name)
    }
}

/// Build the checklist for `column_id`
///
/// Scans every repository for epics first. Note cards are skipped; a card
/// whose content URL can't be parsed aborts the run.
pub async fn render_column(
    client: &dyn TrackerClient,
    config: &JanitorConfig,
    column_id: u64,
) -> anyhow::Result<ColumnChecklist> {
    let snapshot = OrgScanner::new(client, config, ScanOptions::epics_only())?
        .scan()
        .await?;

    let column = client
        .get_project_column(column_id)
        .await
        .with_context(|| format!("Error fetching column {}", column_id))?;

    let cards = collect_pages(|page| client.list_column_cards(column_id, page))
        .await
        .with_context(|| format!("Error fetching contents of column {}", column_id))?;

    let renderer = ChecklistRenderer::new(&config.host, &config.org, &snapshot.epics);
    let mut lines = Vec::new();
    for card in &cards {
        let Some(url) = card.content_url.as_deref() else {
            continue;
        };

        let issue_ref = IssueRef::from_content_url(url)
            .with_context(|| format!("Error parsing issue URL of card {}", card.id))?;
        let issue = client
            .get_issue(&config.org, issue_ref.repo(), issue_ref.number())
            .await
            .with_context(|| format!("Error fetching issue {}", issue_ref))?;

        lines.extend(renderer.render(&issue_ref, &issue));
    }

    Ok(ColumnChecklist { column, lines })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_janitor_client::fake::{closed_issue, open_issue, FakeTracker};
    use gh_janitor_client::ProjectCard;
    use pretty_assertions::assert_eq;

    fn config() -> JanitorConfig {
        JanitorConfig {
            org: "org".to_string(),
            ..JanitorConfig::default()
        }
    }

    fn org() -> FakeTracker {
        FakeTracker::new("org")
            .with_repository("app", false)
            .with_issue("app", open_issue(1, "First", &["bug"], None))
            .with_issue("app", closed_issue(2, "Closed", &[]))
            .with_issue("app", open_issue(3, "In epic", &[], None))
            .with_issue("app", open_issue(4, "Epic", &["epic"], Some("#3")))
    }

    #[tokio::test]
    async fn test_render_column() {
        let fake = org();
        let cards = vec![
            fake.issue_card(1, "app", 1),
            fake.issue_card(2, "app", 2),
            ProjectCard {
                id: 3,
                content_url: None,
            },
            fake.issue_card(4, "app", 3),
        ];
        let fake = fake.with_column(4716294, "Backlog", cards);

        let checklist = render_column(&fake, &config(), 4716294).await.unwrap();

        assert_eq!(checklist.header(), "### EXAMINING COLUMN 4716294: Backlog...");
        assert_eq!(
            checklist.lines,
            vec!["- [ ] [app#1](https://github.com/org/app/issues/1): First (bug)"]
        );
    }

    #[tokio::test]
    async fn test_cards_are_paginated() {
        let fake = org().with_page_size(1);
        let cards = vec![fake.issue_card(1, "app", 1), fake.issue_card(2, "app", 4)];
        let fake = fake.with_column(7, "Ready", cards);

        let checklist = render_column(&fake, &config(), 7).await.unwrap();

        assert_eq!(checklist.lines.len(), 2);
    }

    #[tokio::test]
    async fn test_unparseable_card_aborts() {
        let fake = org().with_column(
            7,
            "Ready",
            vec![ProjectCard {
                id: 9,
                content_url: Some("https://api.github.com/repos/org/app/issues/x".to_string()),
            }],
        );

        let err = render_column(&fake, &config(), 7).await.unwrap_err();

        assert_eq!(err.to_string(), "Error parsing issue URL of card 9");
    }

    #[tokio::test]
    async fn test_unknown_column() {
        let err = render_column(&org(), &config(), 99).await.unwrap_err();
        assert_eq!(err.to_string(), "Error fetching column 99");
    }
}
