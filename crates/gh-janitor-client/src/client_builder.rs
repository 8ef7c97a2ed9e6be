//! Token resolution and client construction
//!
//! Builds the octocrab instance for github.com or a GitHub Enterprise host,
//! authenticated with a personal token from the environment.

use crate::DEFAULT_HOST;
use anyhow::{Context, Result};
use log::{debug, info};
use octocrab::Octocrab;
use std::sync::Arc;

/// Environment variables searched for a token, in order
pub const TOKEN_ENV_VARS: [&str; 3] = ["GITHUB_AUTH_TOKEN", "GITHUB_TOKEN", "GH_TOKEN"];

/// Resolves the GitHub token from the environment
///
/// Tries `GITHUB_AUTH_TOKEN`, then `GITHUB_TOKEN`, then `GH_TOKEN`.
/// Empty values are treated as unset.
#[derive(Debug, Clone, Default)]
pub struct TokenResolver {
    token: Option<String>,
}

impl TokenResolver {
    /// Resolve from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve with a custom variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let token = TOKEN_ENV_VARS.iter().find_map(|key| {
            let value = lookup(key).filter(|v| !v.trim().is_empty())?;
            debug!("Using token from env var {}", key);
            Some(value.trim().to_string())
        });
        Self { token }
    }

    /// The resolved token
    pub fn token(&self) -> Result<&str> {
        self.token.as_deref().with_context(|| {
            format!(
                "No GitHub token found. Set {} to a personal access token",
                TOKEN_ENV_VARS[0]
            )
        })
    }
}

/// REST base URL for a host
///
/// github.com uses `https://api.github.com`, enterprise hosts use
/// `https://{host}/api/v3`.
pub fn api_base_url(host: &str) -> String {
    if host == DEFAULT_HOST {
        "https://api.github.com".to_string()
    } else {
        format!("https://{}/api/v3", host)
    }
}

/// Build an authenticated octocrab instance for `host`
pub fn build_octocrab(host: &str, token: &str) -> Result<Arc<Octocrab>> {
    info!("Creating GitHub client for host: {}", host);

    let mut builder = Octocrab::builder().personal_token(token.to_string());
    if host != DEFAULT_HOST {
        builder = builder
            .base_uri(api_base_url(host))
            .context("Failed to set base URI")?;
    }

    let octocrab = builder.build().context("Failed to build Octocrab client")?;
    Ok(Arc::new(octocrab))
}
