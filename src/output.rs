//! # Output Formatting
//!
//! Colored terminal rendering of commit statuses and the JSON fallback used
//! by `--json`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;
use stamp_gh::{CombinedCommitStatus, CommitState, CommitStatus};

use crate::cli::short_sha;

/// Print a success message
pub fn print_success(message: &str) {
  println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
  eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
  println!("{json}");
  Ok(())
}

/// Format a commit state with its conventional color
pub fn format_state(state: CommitState) -> String {
  paint_state(state, state.as_str())
}

/// Color `text` the way `state` is colored
fn paint_state(state: CommitState, text: &str) -> String {
  match state {
    CommitState::Success => text.green().to_string(),
    CommitState::Pending => text.yellow().to_string(),
    CommitState::Failure | CommitState::Error => text.red().to_string(),
  }
}

/// Format a timestamp
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
  timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_black().to_string()
}

/// Render one status as a single line: state, context, description
pub fn format_status_line(status: &CommitStatus) -> String {
  // Pad before coloring so escape codes do not count towards the width
  let mut line = format!(
    "{} {} {}",
    paint_state(status.state, &format!("{:<7}", status.state.as_str())),
    status.context.bold(),
    format_timestamp(&status.created_at)
  );
  if let Some(description) = status.description.as_deref().filter(|d| !d.is_empty()) {
    line.push_str(&format!(" {description}"));
  }
  if let Some(target_url) = status.target_url.as_deref() {
    line.push_str(&format!(" {}", target_url.blue()));
  }
  line
}

pub fn print_status_line(status: &CommitStatus) {
  println!("{}", format_status_line(status));
}

/// Print the overall state followed by the latest status of each context
pub fn print_combined(combined: &CombinedCommitStatus) {
  println!(
    "{} {} ({} {})",
    format_state(combined.state).bold(),
    short_sha(&combined.sha).purple(),
    combined.total_count,
    if combined.total_count == 1 { "context" } else { "contexts" }
  );
  if combined.statuses.is_empty() {
    println!("  No statuses reported yet");
  }
  for status in &combined.statuses {
    println!("  {}", format_status_line(status));
  }
}
