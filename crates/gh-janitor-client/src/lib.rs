//! GitHub issue tracker client with dry-run and pacing support
//!
//! This crate provides a trait-based client for the parts of the GitHub API
//! the issue janitor touches. The design follows the decorator pattern, so
//! dry-run gating and rate-limit pacing compose with the base client.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              TrackerClient trait                 │
//! │  - list_org_repositories() / search_issues()     │
//! │  - list/create/update/delete labels              │
//! │  - list_column_cards() / create_issue_card()     │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┼───────────────┐
//!        ▼               ▼               ▼
//! ┌──────────────┐ ┌──────────────┐ ┌──────────────┐
//! │OctocrabClient│ │ PacedClient  │ │ DryRunClient │
//! │ (direct API) │◄│ (decorator)  │◄│ (decorator)  │
//! └──────────────┘ └──────────────┘ └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_janitor_client::{
//!     build_octocrab, DryRunClient, MutationMode, OctocrabClient, PacedClient, TokioPacer,
//!     TrackerClient,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let octocrab = build_octocrab("github.com", "token")?;
//! let client = DryRunClient::new(
//!     PacedClient::new(OctocrabClient::new(octocrab), TokioPacer, 10),
//!     MutationMode::DryRun,
//! );
//!
//! let repos = client.list_org_repositories("dotmesh-io", 1).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod client_builder;
pub mod dry_run;
pub mod octocrab_client;
pub mod paced_client;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

pub use client::{TrackerClient, PER_PAGE};
pub use client_builder::{api_base_url, build_octocrab, TokenResolver};
pub use dry_run::{DryRunClient, MutationMode};
pub use octocrab_client::OctocrabClient;
pub use paced_client::{PacedClient, Pacer, TokioPacer, DEFAULT_THRESHOLD};
pub use types::{
    Issue, IssueState, Label, Page, ProjectCard, ProjectColumn, Rate, RateBucket, RateLimit,
    Repository,
};
