//! column-to-markdown
//!
//! Finds the issues in a project column that aren't in an epic or theme and
//! prints them as a Markdown checklist, ready to paste into an epic.

use gh_issue_janitor::{
    build_client, exit_code, init_logging, load_config, parse_column_args, runtime,
};
use gh_janitor_core::render_column;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let column_id = match parse_column_args(&args) {
        Ok(id) => id,
        Err(usage) => {
            println!("{}", usage);
            return ExitCode::FAILURE;
        }
    };

    init_logging();
    exit_code(run(column_id))
}

fn run(column_id: u64) -> anyhow::Result<()> {
    let config = load_config()?;
    let client = build_client(&config)?;

    let checklist = runtime()?.block_on(render_column(&client, &config, column_id))?;

    println!("{}", checklist.header());
    for line in &checklist.lines {
        println!("{}", line);
    }
    println!("Done.");
    Ok(())
}
