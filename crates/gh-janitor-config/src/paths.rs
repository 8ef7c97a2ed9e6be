//! Configuration file locations
//!
//! Uses XDG directories via `dirs` crate with fallbacks.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/gh-issue-janitor/config.toml`
//! - macOS: `~/Library/Application Support/gh-issue-janitor/config.toml`
//! - Windows: `%APPDATA%\gh-issue-janitor\config.toml`

use std::path::PathBuf;

pub(crate) const APP_NAME: &str = "gh-issue-janitor";

/// Config file name looked up in the working and home directories
pub const LOCAL_CONFIG_FILE: &str = ".gh-issue-janitor.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "GH_ISSUE_JANITOR_CONFIG";

/// Get the application config directory (not created)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_NAME))
}

/// Get path to the global config file
pub fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get path to the config file in the home directory
pub fn home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(LOCAL_CONFIG_FILE))
}

/// Candidate config files in lookup order (explicit override excluded)
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    candidates.extend(home_config_path());
    candidates.extend(global_config_path());
    candidates
}
