//! gh-issue-janitor
//!
//! Syncs the label taxonomy of every repository in the organization and
//! files issues that are on no board and in no epic into the triage column.

use gh_issue_janitor::{
    build_client, check_janitor_args, exit_code, init_logging, load_config, runtime,
};
use gh_janitor_core::Janitor;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if let Err(usage) = check_janitor_args(&args) {
        println!("{}", usage);
        return ExitCode::FAILURE;
    }

    init_logging();
    exit_code(run())
}

fn run() -> anyhow::Result<()> {
    let config = load_config()?;
    let client = build_client(&config)?;

    let report = runtime()?.block_on(Janitor::new(&client, &config).run())?;

    println!("{}", report);
    Ok(())
}
