//! Issue hygiene for a GitHub organization
//!
//! Two jobs are built from the pieces in this crate:
//!
//! - [`Janitor`] syncs the label taxonomy of every repository and files
//!   issues that are neither on the project board nor mentioned by an epic
//!   into a triage column.
//! - [`render_column`] lists the open, epic-less issues of one column as a
//!   Markdown checklist.
//!
//! Both scan the organization first ([`OrgScanner`]) and then decide with
//! pure functions ([`select_triage_candidates`], [`plan_label_actions`],
//! [`ChecklistRenderer`]).

pub mod column_checklist;
pub mod epic_index;
pub mod error;
pub mod issue_ref;
pub mod janitor;
pub mod labels;
pub mod links;
pub mod markdown;
pub mod membership;
pub mod pages;
pub mod scanner;
pub mod triage;

pub use column_checklist::{render_column, ColumnChecklist};
pub use epic_index::{EpicIndexBuilder, EpicReferenceIndex};
pub use error::{ColumnUrlError, IssueRefError};
pub use issue_ref::IssueRef;
pub use janitor::{Janitor, RunReport};
pub use labels::{fetch_labels, plan_label_actions, LabelAction, LabelReconciler};
pub use links::{extract_issue_links, LinkExtractor};
pub use markdown::{parse_column_url, ChecklistRenderer};
pub use membership::ProjectMembershipIndex;
pub use scanner::{OrgScanner, OrgSnapshot, ScanOptions};
pub use triage::{select_triage_candidates, OpenIssue};
