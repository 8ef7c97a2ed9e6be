//! Shared setup for the gh-issue-janitor binaries
//!
//! Argument checks, logging, configuration and the layered tracker client.

use anyhow::Context;
use gh_janitor_client::{
    build_octocrab, DryRunClient, MutationMode, OctocrabClient, PacedClient, TokenResolver,
    TokioPacer,
};
use gh_janitor_config::JanitorConfig;
use gh_janitor_core::{parse_column_url, ColumnUrlError};
use std::process::ExitCode;
use thiserror::Error;
use tokio::runtime::Runtime;

/// The client both binaries talk to GitHub through
pub type JanitorClient = DryRunClient<PacedClient<OctocrabClient, TokioPacer>>;

/// Wrong command line, reported before any API call
#[derive(Debug, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("USAGE: {program}")]
    NoArguments { program: String },

    #[error(
        "USAGE: {program} column-URL\n\
         Get the column URL from the GitHub web UI by clicking the menu button for a column \
         and selecting \"Copy column link\", eg https://github.com/orgs/dotmesh-io/projects/8#column-4716294"
    )]
    ColumnUrl { program: String },

    #[error(transparent)]
    InvalidColumn(#[from] ColumnUrlError),
}

/// Check that `gh-issue-janitor` got no arguments
///
/// `args` is the full argument list including the program name.
pub fn check_janitor_args(args: &[String]) -> Result<(), UsageError> {
    if args.len() > 1 {
        return Err(UsageError::NoArguments {
            program: program_name(args, "gh-issue-janitor"),
        });
    }
    Ok(())
}

/// Column id from the single argument of `column-to-markdown`
pub fn parse_column_args(args: &[String]) -> Result<u64, UsageError> {
    match args {
        [_, url] => Ok(parse_column_url(url)?),
        _ => Err(UsageError::ColumnUrl {
            program: program_name(args, "column-to-markdown"),
        }),
    }
}

fn program_name(args: &[String], fallback: &str) -> String {
    args.first().cloned().unwrap_or_else(|| fallback.to_string())
}

/// Log to stdout at `info` unless `RUST_LOG` says otherwise
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Load `.env`, then the config file
pub fn load_config() -> anyhow::Result<JanitorConfig> {
    match dotenvy::dotenv() {
        Ok(path) => log::debug!("Loaded .env file from: {:?}", path),
        Err(_) => log::debug!(".env file not found, will rely on environment variables"),
    }

    let config = JanitorConfig::load().context("Error loading configuration")?;
    if config.dry_run {
        log::info!("Dry run: no changes will be made");
    }
    Ok(config)
}

/// Authenticated, paced client honouring `dry_run`
pub fn build_client(config: &JanitorConfig) -> anyhow::Result<JanitorClient> {
    let resolver = TokenResolver::from_env();
    let octocrab = build_octocrab(&config.host, resolver.token()?)?;

    Ok(DryRunClient::new(
        PacedClient::new(
            OctocrabClient::new(octocrab),
            TokioPacer,
            config.rate_limit_threshold,
        ),
        MutationMode::from_dry_run(config.dry_run),
    ))
}

/// Single-threaded runtime; every call is awaited in turn
pub fn runtime() -> anyhow::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")
}

/// Print a failed run's error chain and map the outcome to an exit code
pub fn exit_code(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
