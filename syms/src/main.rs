// syms/src/main.rs
use std::process;

use clap::Parser;
use colored::Colorize;
use syms_common::config::Config;
use syms_common::error::{Result as SymsResult, SymsError};
use syms_common::RefreshOutcome;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{CliArgs, Context};

pub(crate) fn report_outcome(what: &str, outcome: &RefreshOutcome) {
    let status = if outcome.is_usable() {
        outcome.to_string().green()
    } else if matches!(outcome, RefreshOutcome::Skipped(_)) {
        outcome.to_string().yellow()
    } else {
        outcome.to_string().red()
    };
    println!("{}{}: {}", "==> ".bold().blue(), what.bold(), status);
}

fn init_tracing(verbose: u8) {
    let level_filter = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("SYMS_LOG")
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .without_time()
        .try_init();
}

fn main() -> SymsResult<()> {
    let cli_args = CliArgs::parse();
    init_tracing(cli_args.verbose);

    let config = Config::load()
        .map_err(|e| SymsError::Config(format!("Could not load config: {e}")))?;

    let ctx = match Context::build(&config) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Setup failed: {:#}", e);
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            process::exit(1);
        }
    };

    if let Err(e) = cli_args.command.run(&config, &ctx) {
        error!("Command failed: {:#}", e);
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }

    debug!("Command completed successfully.");
    Ok(())
}
