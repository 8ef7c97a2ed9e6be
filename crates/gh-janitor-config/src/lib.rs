//! Configuration for gh-issue-janitor
//!
//! This crate provides:
//! - Config file lookup (explicit path, working directory, home, XDG config dir)
//! - The janitor configuration (`JanitorConfig`) with per-field defaults
//! - Validation of cross-field invariants

pub mod config_file;
pub mod error;
pub mod janitor_config;
pub mod paths;

pub use config_file::{load_config_file, load_config_file_from, ConfigSource};
pub use error::ConfigError;
pub use janitor_config::{JanitorConfig, LabelPolicy, MembershipSource};
pub use paths::{config_dir, global_config_path, CONFIG_ENV_VAR, LOCAL_CONFIG_FILE};
