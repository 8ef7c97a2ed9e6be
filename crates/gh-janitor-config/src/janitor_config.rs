//! Janitor configuration
//!
//! Configuration loaded from `.gh-issue-janitor.toml`. Every field has a
//! default, so a partial file only overrides what it names.

use crate::config_file::load_config_file;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// How issues already on the project board are detected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipSource {
    /// Enumerate the cards of every tracked column
    #[default]
    Columns,

    /// Let the issue search exclude carded issues with `no:project`
    Search,

    /// Treat every open issue as unattached
    #[serde(rename = "none")]
    Unchecked,
}

/// Canonical label taxonomy enforced across repositories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPolicy {
    /// Desired label name -> hex color (no leading `#`)
    #[serde(default = "default_desired_labels")]
    pub desired: BTreeMap<String, String>,

    /// Labels renamed in place: old name -> new name
    #[serde(default)]
    pub renames: BTreeMap<String, String>,

    /// Labels deleted wherever found
    #[serde(default)]
    pub undesired: BTreeSet<String>,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            desired: default_desired_labels(),
            renames: BTreeMap::new(),
            undesired: BTreeSet::new(),
        }
    }
}

/// Janitor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// GitHub host (github.com or an enterprise host)
    #[serde(default = "default_host")]
    pub host: String,

    /// Organization whose repositories are scanned
    #[serde(default = "default_org")]
    pub org: String,

    /// Column that receives orphaned issues
    #[serde(default = "default_triage_column")]
    pub triage_column: Option<u64>,

    /// Columns whose cards count as "already on the board"
    #[serde(default = "default_tracked_columns")]
    pub tracked_columns: Vec<u64>,

    /// How board membership is determined
    #[serde(default)]
    pub membership: MembershipSource,

    /// Repositories never scanned
    #[serde(default = "default_ignored_repos")]
    pub ignored_repos: BTreeSet<String>,

    /// Issues with any of these labels are ignored entirely
    #[serde(default = "default_ignored_labels")]
    pub ignored_labels: BTreeSet<String>,

    /// Labels that make an issue count as an epic
    #[serde(default = "default_epic_labels")]
    pub epic_labels: BTreeSet<String>,

    /// Log mutations instead of performing them
    #[serde(default)]
    pub dry_run: bool,

    /// Reconcile repository labels with `labels`
    #[serde(default = "default_true")]
    pub sync_labels: bool,

    /// File orphaned issues into `triage_column`
    #[serde(default = "default_true")]
    pub file_triage: bool,

    /// Pause when fewer requests than this remain
    #[serde(default = "default_rate_limit_threshold")]
    pub rate_limit_threshold: u64,

    /// Label taxonomy
    #[serde(default)]
    pub labels: LabelPolicy,
}

fn default_host() -> String {
    "github.com".to_string()
}

fn default_org() -> String {
    "dotmesh-io".to_string()
}

fn default_triage_column() -> Option<u64> {
    Some(1527643) // Backlog
}

fn default_tracked_columns() -> Vec<u64> {
    vec![
        1527643, // Backlog
        2044199, // Ready
        2620854, // Epics
        2620949, // Sprint
        2159385, // Sprint
        1527644, // In Progress
        2330460, // Blocked
        2591940, // Done
    ]
}

fn default_ignored_repos() -> BTreeSet<String> {
    ["roadmap", "moby-counter-issues"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_ignored_labels() -> BTreeSet<String> {
    BTreeSet::from(["hypothesis".to_string()])
}

fn default_epic_labels() -> BTreeSet<String> {
    ["epic", "theme"].into_iter().map(String::from).collect()
}

fn default_true() -> bool {
    true
}

fn default_rate_limit_threshold() -> u64 {
    10
}

fn default_desired_labels() -> BTreeMap<String, String> {
    [
        ("bug", "d73a4a"),
        ("documentation", "0075ca"),
        ("enhancement", "a2eeef"),
        ("epic", "3e4b9e"),
        ("good first issue", "7057ff"),
        ("help wanted", "008672"),
        ("hypothesis", "fbca04"),
        ("question", "d876e3"),
        // same colour as epics, different name
        ("theme", "3e4b9e"),
    ]
    .into_iter()
    .map(|(name, color)| (name.to_string(), color.to_string()))
    .collect()
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            org: default_org(),
            triage_column: default_triage_column(),
            tracked_columns: default_tracked_columns(),
            membership: MembershipSource::default(),
            ignored_repos: default_ignored_repos(),
            ignored_labels: default_ignored_labels(),
            epic_labels: default_epic_labels(),
            dry_run: false,
            sync_labels: true,
            file_triage: true,
            rate_limit_threshold: default_rate_limit_threshold(),
            labels: LabelPolicy::default(),
        }
    }
}

impl JanitorConfig {
    /// Load config from the first file found, or use defaults
    ///
    /// A file that exists but fails to parse or validate is an error.
    pub fn load() -> Result<Self, ConfigError> {
        match load_config_file()? {
            Some(source) => {
                let config = Self::from_toml(&source.content, &source.path)?;
                log::info!("Loaded config from {}", source.path.display());
                Ok(config)
            }
            None => {
                log::debug!("Using default config");
                Ok(Self::default())
            }
        }
    }

    /// Parse and validate TOML content; `path` is only used in errors
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.org.trim().is_empty() {
            return Err(ConfigError::Invalid("`org` must not be empty".to_string()));
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("`host` must not be empty".to_string()));
        }
        if self.file_triage && self.triage_column.is_none() {
            return Err(ConfigError::Invalid(
                "`triage_column` is required when `file_triage` is enabled".to_string(),
            ));
        }
        if self.membership == MembershipSource::Columns && self.tracked_columns.is_empty() {
            return Err(ConfigError::Invalid(
                "`tracked_columns` must not be empty with membership = \"columns\"".to_string(),
            ));
        }
        for (name, color) in &self.labels.desired {
            if !is_hex_color(color) {
                return Err(ConfigError::Invalid(format!(
                    "label {:?} has invalid color {:?} (expected 6 hex digits)",
                    name, color
                )));
            }
        }
        Ok(())
    }

    /// Whether a repository is excluded by name
    pub fn is_ignored_repo(&self, name: &str) -> bool {
        self.ignored_repos.contains(name)
    }
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit())
}
