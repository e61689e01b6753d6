//! # Commit Status Endpoints
//!
//! List, summarize and create statuses for a commit:
//!
//! | Operation | Request |
//! |---|---|
//! | [`get_all`](CommitStatusClient::get_all) | `GET /repos/{owner}/{repo}/commits/{ref}/statuses` |
//! | [`get_combined`](CommitStatusClient::get_combined) | `GET /repos/{owner}/{repo}/commits/{ref}/status` |
//! | [`create`](CommitStatusClient::create) | `POST /repos/{owner}/{repo}/statuses/{sha}` |

use tracing::{debug, instrument, trace};

use crate::client::{CommitStatusClient, decode};
use crate::consts::MAX_PER_PAGE;
use crate::error::{Operation, RequestTarget, StatusError};
use crate::models::{CombinedCommitStatus, CommitStatus, NewCommitStatus};
use crate::transport::{ApiRequest, Transport};

/// Pagination controls for listing statuses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
  /// Page size, 1 to 100. The server default (30) applies when unset
  pub per_page: Option<u32>,
  /// Fetch only this page instead of following the pagination links
  pub page: Option<u32>,
  /// Stop following pagination links after this many pages
  pub max_pages: Option<u32>,
}

impl ListOptions {
  fn validate(&self, target: &RequestTarget) -> Result<(), StatusError> {
    if let Some(per_page) = self.per_page
      && !(1..=MAX_PER_PAGE).contains(&per_page)
    {
      return Err(StatusError::invalid_argument(
        target.clone(),
        format!("per_page must be between 1 and {MAX_PER_PAGE}, got {per_page}"),
      ));
    }
    if self.page == Some(0) {
      return Err(StatusError::invalid_argument(target.clone(), "page numbers start at 1"));
    }
    if self.max_pages == Some(0) {
      return Err(StatusError::invalid_argument(target.clone(), "max_pages must be at least 1"));
    }
    Ok(())
  }

  fn query(&self, page: Option<u32>) -> Vec<(String, String)> {
    let mut query = Vec::new();
    if let Some(per_page) = self.per_page {
      query.push(("per_page".to_string(), per_page.to_string()));
    }
    if let Some(page) = page {
      query.push(("page".to_string(), page.to_string()));
    }
    query
  }
}

/// Reject arguments that would produce a malformed request path
fn validate_target(target: &RequestTarget) -> Result<(), StatusError> {
  let reference_name = match target.operation {
    Operation::Create => "sha",
    Operation::GetAll | Operation::GetCombined => "ref",
  };

  for (name, value) in [
    ("owner", target.owner.as_str()),
    ("repo", target.repo.as_str()),
    (reference_name, target.reference.as_str()),
  ] {
    if value.trim().is_empty() {
      return Err(StatusError::invalid_argument(
        target.clone(),
        format!("{name} must not be empty"),
      ));
    }
    if value.chars().any(|c| c.is_whitespace() || matches!(c, '?' | '#')) {
      return Err(StatusError::invalid_argument(
        target.clone(),
        format!("{name} '{value}' contains characters that are not allowed in a path"),
      ));
    }
  }

  for (name, value) in [("owner", target.owner.as_str()), ("repo", target.repo.as_str())] {
    if value.contains('/') || value == "." || value == ".." {
      return Err(StatusError::invalid_argument(
        target.clone(),
        format!("{name} '{value}' must be a single path segment"),
      ));
    }
  }

  // Branch names may contain '/', but every segment must be a real name
  if target
    .reference
    .split('/')
    .any(|segment| segment.is_empty() || segment == "." || segment == "..")
  {
    return Err(StatusError::invalid_argument(
      target.clone(),
      format!("{reference_name} '{}' contains an empty or relative path segment", target.reference),
    ));
  }

  if matches!(target.operation, Operation::Create) && target.reference.contains('/') {
    return Err(StatusError::invalid_argument(
      target.clone(),
      format!("sha '{}' must be a commit SHA, not a ref name", target.reference),
    ));
  }

  Ok(())
}

impl<T: Transport> CommitStatusClient<T> {
  /// List every status for a ref, most recent first.
  ///
  /// The history spans all contexts, so `statuses[0]` is the latest report
  /// overall. An empty list means nothing has reported yet.
  #[instrument(skip(self), level = "debug")]
  pub async fn get_all(&self, owner: &str, repo: &str, reference: &str) -> Result<Vec<CommitStatus>, StatusError> {
    self
      .get_all_with_options(owner, repo, reference, ListOptions::default())
      .await
  }

  /// List statuses for a ref with explicit pagination.
  ///
  /// Without `options.page` every page is followed (up to `max_pages`) and
  /// the pages are concatenated in server order.
  #[instrument(skip(self), level = "debug")]
  pub async fn get_all_with_options(
    &self,
    owner: &str,
    repo: &str,
    reference: &str,
    options: ListOptions,
  ) -> Result<Vec<CommitStatus>, StatusError> {
    let target = RequestTarget::new(Operation::GetAll, owner, repo, reference);
    validate_target(&target)?;
    options.validate(&target)?;

    let path = format!("/repos/{owner}/{repo}/commits/{reference}/statuses");
    let mut statuses = Vec::new();
    let mut page = options.page;
    let mut pages_read = 0u32;

    loop {
      let request = ApiRequest::get(&path).with_query(options.query(page));
      let response = self.execute(&target, request).await?;
      let batch: Vec<CommitStatus> = decode(&target, &response)?;
      pages_read += 1;
      trace!(page = ?page, count = batch.len(), "Fetched page of commit statuses");
      statuses.extend(batch);

      if options.page.is_some() {
        break;
      }
      let current = page.unwrap_or(1);
      match response.next_page {
        Some(next) if next <= current => {
          debug!(current, next, "Pagination link does not advance, stopping");
          break;
        }
        Some(next) if options.max_pages.is_none_or(|max| pages_read < max) => page = Some(next),
        _ => break,
      }
    }

    debug!(count = statuses.len(), pages = pages_read, "Listed commit statuses");
    Ok(statuses)
  }

  /// Get the combined status for a ref: the latest report per context and
  /// the server's overall verdict.
  #[instrument(skip(self), level = "debug")]
  pub async fn get_combined(&self, owner: &str, repo: &str, reference: &str) -> Result<CombinedCommitStatus, StatusError> {
    let target = RequestTarget::new(Operation::GetCombined, owner, repo, reference);
    validate_target(&target)?;

    let path = format!("/repos/{owner}/{repo}/commits/{reference}/status");
    let response = self.execute(&target, ApiRequest::get(path)).await?;
    let combined: CombinedCommitStatus = decode(&target, &response)?;

    if !combined.is_consistent() {
      // GitHub caps the embedded list; the count still reflects every context
      debug!(
        total_count = combined.total_count,
        embedded = combined.statuses.len(),
        "Combined status embeds fewer statuses than total_count"
      );
    }

    Ok(combined)
  }

  /// Append a status report to a commit.
  ///
  /// Not idempotent: each call stores a new record. Reporting again under the
  /// same context supersedes the earlier report in the combined view.
  #[instrument(skip(self, new_status), fields(state = %new_status.state), level = "debug")]
  pub async fn create(
    &self,
    owner: &str,
    repo: &str,
    sha: &str,
    new_status: &NewCommitStatus,
  ) -> Result<CommitStatus, StatusError> {
    let target = RequestTarget::new(Operation::Create, owner, repo, sha);
    validate_target(&target)?;

    let body = serde_json::to_value(new_status).map_err(|source| StatusError::Json {
      target: target.clone(),
      source,
    })?;

    let path = format!("/repos/{owner}/{repo}/statuses/{sha}");
    let response = self.execute(&target, ApiRequest::post(path, body)).await?;
    let status: CommitStatus = decode(&target, &response)?;

    debug!(id = status.id, context = %status.context, "Created commit status");
    Ok(status)
  }
}
