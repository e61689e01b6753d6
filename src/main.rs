//! # Stamp CLI Entry Point
//!
//! Command-line access to GitHub commit statuses: list a ref's history, show
//! the combined status, or report a new status on a commit.

use std::env;

use clap::Parser;
use tracing::{Level, debug};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;
mod output;

/// Environment variable overriding the `-v` count (0..=3)
const ENV_VERBOSITY: &str = "STAMP_VERBOSITY";

fn level_for(verbose: u8) -> Level {
  let verbosity = env::var(ENV_VERBOSITY)
    .ok()
    .and_then(|v| v.parse::<u8>().ok())
    .filter(|level| *level <= 3)
    .unwrap_or(verbose);

  match verbosity {
    0 => Level::WARN,  // Default: warnings and errors
    1 => Level::INFO,  // -v: info, warnings, and errors
    2 => Level::DEBUG, // -vv: debug, info, warnings, and errors
    _ => Level::TRACE, // -vvv or more: trace and everything else
  }
}

fn main() {
  let cmd = cli::Cli::parse();
  let level = level_for(cmd.verbose);

  // Logs go to stderr so `--json` output stays machine readable
  tracing_subscriber::registry()
    .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
    .with(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  debug!("Tracing initialized with level: {}", level);

  if let Err(err) = cli::handle_cli(cmd) {
    output::print_error(&format!("{err:#}"));
    std::process::exit(1);
  }
}
