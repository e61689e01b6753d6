//! Authentication and configuration helpers for the commit status client.
//!
//! Credentials come from the user's `.netrc` (machine `github.com`); the API
//! root comes from `STAMP_GITHUB_API_URL` when set. The CLI and tests share
//! this discovery logic.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tracing::debug;
use url::Url;

use crate::client::CommitStatusClient;
use crate::consts::{API_BASE_URL, ENV_API_URL, GITHUB_MACHINE};
use crate::models::GitHubAuth;
use crate::netrc::{Credentials, get_netrc_path, read_netrc_credentials};

/// Check if GitHub credentials are available for the current user.
pub fn check_github_credentials(home: &Path) -> Result<bool> {
  let creds = read_netrc_credentials(&get_netrc_path(home), GITHUB_MACHINE)?;
  Ok(creds.is_some())
}

/// Load GitHub credentials from the user's `.netrc`.
pub fn get_github_credentials(home: &Path) -> Result<Credentials> {
  let netrc_path = get_netrc_path(home);
  match read_netrc_credentials(&netrc_path, GITHUB_MACHINE)? {
    Some(creds) => Ok(creds),
    None => Err(anyhow::anyhow!(
      "GitHub credentials not found in {}. Please add credentials for machine '{GITHUB_MACHINE}'.",
      netrc_path.display()
    )),
  }
}

/// Ensure an API root has a scheme and no trailing slash.
///
/// Hosts without a scheme are assumed to be `https://`.
pub fn ensure_url_scheme(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(anyhow::anyhow!("API URL cannot be empty"));
  }

  let lowered = trimmed.to_ascii_lowercase();
  let candidate = if lowered.starts_with("http://") || lowered.starts_with("https://") {
    trimmed.to_string()
  } else {
    format!("https://{trimmed}")
  };

  let url = Url::parse(&candidate).with_context(|| format!("Failed to parse API URL: '{input}'"))?;
  if url.host_str().is_none() {
    return Err(anyhow::anyhow!("API URL '{input}' has no host"));
  }

  Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Resolve the API root from an optional override, defaulting to github.com.
pub fn resolve_api_base_url_from(value: Option<&str>) -> Result<String> {
  match value.map(str::trim).filter(|v| !v.is_empty()) {
    Some(value) => ensure_url_scheme(value).with_context(|| format!("Invalid {ENV_API_URL}")),
    None => Ok(API_BASE_URL.to_string()),
  }
}

/// Resolve the API root from `STAMP_GITHUB_API_URL`.
pub fn resolve_api_base_url() -> Result<String> {
  let value = std::env::var(ENV_API_URL).ok();
  resolve_api_base_url_from(value.as_deref())
}

/// Creates an authenticated client using credentials from `.netrc` and the
/// configured API root.
pub fn create_commit_status_client_from_netrc(home: &Path) -> Result<CommitStatusClient> {
  let credentials = get_github_credentials(home).context("Failed to get credentials")?;
  let base_url = resolve_api_base_url()?;
  debug!(%base_url, username = %credentials.username, "Creating commit status client");

  let auth = GitHubAuth {
    username: credentials.username,
    token: credentials.password,
  };
  Ok(CommitStatusClient::with_base_url(&base_url, auth))
}

/// Creates a tokio runtime and an authenticated client.
pub fn create_runtime_and_client(home: &Path) -> Result<(Runtime, CommitStatusClient)> {
  let rt = Runtime::new().context("Failed to create async runtime")?;
  let client = create_commit_status_client_from_netrc(home)?;
  Ok((rt, client))
}
