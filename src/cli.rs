//! # Command Definitions
//!
//! Clap definitions and handlers for the `stamp` subcommands.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use directories::BaseDirs;
use stamp_gh::auth::create_runtime_and_client;
use stamp_gh::{CommitState, ListOptions, NewCommitStatus};
use tracing::info;

use crate::output::{print_combined, print_json, print_status_line, print_success};

/// Read and write GitHub commit statuses
#[derive(Parser, Debug)]
#[command(name = "stamp")]
#[command(about = "Read and write GitHub commit statuses")]
#[command(
  long_about = "Read and write GitHub commit statuses.\n\n\
                Credentials are read from ~/.netrc (machine github.com, login = username,\n\
                password = token). Set STAMP_GITHUB_API_URL to talk to GitHub Enterprise."
)]
#[command(version, disable_help_subcommand = true)]
pub struct Cli {
  /// Increase logging verbosity (-v, -vv, -vvv)
  #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
  pub verbose: u8,

  /// Print results as JSON
  #[arg(long, global = true)]
  pub json: bool,

  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List every status reported for a ref, newest first
  #[command(alias = "ls")]
  List {
    /// Repository owner
    owner: String,
    /// Repository name
    repo: String,
    /// Commit SHA, branch or tag
    #[arg(value_name = "REF")]
    reference: String,
    /// Page size (1-100)
    #[arg(long)]
    per_page: Option<u32>,
    /// Fetch only this page
    #[arg(long)]
    page: Option<u32>,
  },

  /// Show the combined status of a ref
  #[command(alias = "st")]
  Combined {
    /// Repository owner
    owner: String,
    /// Repository name
    repo: String,
    /// Commit SHA, branch or tag
    #[arg(value_name = "REF")]
    reference: String,
  },

  /// Report a new status on a commit
  Create {
    /// Repository owner
    owner: String,
    /// Repository name
    repo: String,
    /// Full commit SHA
    sha: String,
    /// One of error, failure, pending, success
    #[arg(long, short = 's')]
    state: CommitState,
    /// Link shown next to the status
    #[arg(long)]
    target_url: Option<String>,
    /// Short human readable description
    #[arg(long, short = 'd')]
    description: Option<String>,
    /// Status track name; GitHub uses "default" when omitted
    #[arg(long, short = 'c')]
    context: Option<String>,
  },
}

/// Run a parsed command line
pub fn handle_cli(cli: Cli) -> Result<()> {
  let base_dirs = BaseDirs::new().context("Could not determine home directory")?;
  let (rt, client) = create_runtime_and_client(base_dirs.home_dir())?;

  match cli.command {
    Commands::List {
      owner,
      repo,
      reference,
      per_page,
      page,
    } => {
      let options = ListOptions {
        per_page,
        page,
        max_pages: None,
      };
      let statuses = rt.block_on(client.get_all_with_options(&owner, &repo, &reference, options))?;

      if cli.json {
        return print_json(&statuses);
      }
      if statuses.is_empty() {
        println!("No statuses reported for {owner}/{repo}@{reference}");
      }
      for status in &statuses {
        print_status_line(status);
      }
      Ok(())
    }
    Commands::Combined { owner, repo, reference } => {
      let combined = rt.block_on(client.get_combined(&owner, &repo, &reference))?;

      if cli.json {
        return print_json(&combined);
      }
      print_combined(&combined);
      Ok(())
    }
    Commands::Create {
      owner,
      repo,
      sha,
      state,
      target_url,
      description,
      context,
    } => {
      let new_status = NewCommitStatus {
        state,
        target_url,
        description,
        context,
      };
      let status = rt.block_on(client.create(&owner, &repo, &sha, &new_status))?;
      info!(id = status.id, "Reported commit status");

      if cli.json {
        return print_json(&status);
      }
      print_success(&format!(
        "Reported {} on {owner}/{repo}@{} under context '{}'",
        status.state,
        short_sha(&sha),
        status.context
      ));
      Ok(())
    }
  }
}

/// Abbreviate a SHA for display
pub(crate) fn short_sha(sha: &str) -> &str {
  sha.get(..7).unwrap_or(sha)
}
