use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_CONTEXT;

/// Represents GitHub authentication credentials
#[derive(Clone)]
pub struct GitHubAuth {
  pub username: String,
  pub token: String,
}

impl fmt::Debug for GitHubAuth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GitHubAuth")
      .field("username", &self.username)
      .field("token", &"***")
      .finish()
  }
}

/// Lifecycle stage of a single status report.
///
/// Ordering between reports is owned by the server; the client never moves a
/// status from one state to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitState {
  Error,
  Failure,
  Pending,
  Success,
}

impl CommitState {
  /// All states, in the order GitHub documents them
  pub const ALL: [CommitState; 4] = [Self::Error, Self::Failure, Self::Pending, Self::Success];

  /// Wire name of the state
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::Error => "error",
      Self::Failure => "failure",
      Self::Pending => "pending",
      Self::Success => "success",
    }
  }
}

impl fmt::Display for CommitState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for CommitState {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|state| state.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| format!("unknown commit state '{s}', expected one of: error, failure, pending, success"))
  }
}

/// Represents a GitHub user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub login: String,
  pub id: u64,
  #[serde(default)]
  pub avatar_url: Option<String>,
  #[serde(default)]
  pub html_url: Option<String>,
  #[serde(rename = "type", default)]
  pub kind: Option<String>,
}

/// Repository reference embedded in a combined status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
  pub id: u64,
  pub name: String,
  pub full_name: String,
  pub owner: User,
  #[serde(default)]
  pub private: bool,
  #[serde(default)]
  pub html_url: Option<String>,
}

fn default_context() -> String {
  DEFAULT_CONTEXT.to_string()
}

/// A single status report attached to a commit.
///
/// Reports are never mutated. A new report under the same context supersedes
/// the previous one while the history keeps both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitStatus {
  pub id: u64,
  pub state: CommitState,
  pub target_url: Option<String>,
  pub description: Option<String>,
  #[serde(default = "default_context")]
  pub context: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  #[serde(default)]
  pub creator: Option<User>,
  #[serde(default)]
  pub url: Option<String>,
  #[serde(default)]
  pub node_id: Option<String>,
}

/// Payload for creating a commit status.
///
/// `context` is left out of the request when unset or empty so the server
/// files the report under its own default context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCommitStatus {
  pub state: CommitState,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub target_url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "is_unset")]
  pub context: Option<String>,
}

fn is_unset(value: &Option<String>) -> bool {
  value.as_deref().is_none_or(str::is_empty)
}

impl NewCommitStatus {
  pub const fn new(state: CommitState) -> Self {
    Self {
      state,
      target_url: None,
      description: None,
      context: None,
    }
  }

  pub fn with_target_url(mut self, target_url: impl Into<String>) -> Self {
    self.target_url = Some(target_url.into());
    self
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn with_context(mut self, context: impl Into<String>) -> Self {
    self.context = Some(context.into());
    self
  }
}

/// Server-computed summary of the latest status per context for a ref.
///
/// `state` is taken verbatim from the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedCommitStatus {
  pub state: CommitState,
  pub sha: String,
  pub total_count: usize,
  pub statuses: Vec<CommitStatus>,
  pub repository: Repository,
  #[serde(default)]
  pub commit_url: Option<String>,
  #[serde(default)]
  pub url: Option<String>,
}

impl CombinedCommitStatus {
  /// Whether the embedded statuses match the advertised count
  pub const fn is_consistent(&self) -> bool {
    self.statuses.len() == self.total_count
  }

  /// Latest status for a context, if the context reported at all
  pub fn for_context(&self, context: &str) -> Option<&CommitStatus> {
    self.statuses.iter().find(|status| status.context == context)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn status_json(state: &str, context: Option<&str>) -> serde_json::Value {
    let mut value = json!({
        "url": "https://api.github.com/repos/octocat/Hello-World/statuses/6dcb09b5",
        "id": 1,
        "node_id": "MDY6U3RhdHVzMQ==",
        "state": state,
        "description": "Build has completed successfully",
        "target_url": "https://ci.example.com/1000/output",
        "created_at": "2012-07-20T01:19:13Z",
        "updated_at": "2012-07-20T01:19:13Z",
        "creator": {
            "login": "octocat",
            "id": 1,
            "type": "User"
        }
    });
    if let Some(context) = context {
      value["context"] = json!(context);
    }
    value
  }

  #[test]
  fn test_github_auth_debug_hides_token() {
    let auth = GitHubAuth {
      username: "test_user".to_string(),
      token: "test_token".to_string(),
    };

    let debug = format!("{auth:?}");
    assert!(debug.contains("test_user"));
    assert!(!debug.contains("test_token"));
  }

  #[test]
  fn test_commit_state_wire_names() {
    assert_eq!(serde_json::to_value(CommitState::Pending).unwrap(), json!("pending"));
    assert_eq!(
      serde_json::from_value::<CommitState>(json!("failure")).unwrap(),
      CommitState::Failure
    );
    assert!(serde_json::from_value::<CommitState>(json!("cancelled")).is_err());
    assert!(serde_json::from_value::<CommitState>(json!("Success")).is_err());
  }

  #[test]
  fn test_commit_state_from_str() {
    assert_eq!("success".parse::<CommitState>().unwrap(), CommitState::Success);
    assert_eq!(" ERROR ".parse::<CommitState>().unwrap(), CommitState::Error);

    let err = "done".parse::<CommitState>().unwrap_err();
    assert!(err.contains("unknown commit state 'done'"));
  }

  #[test]
  fn test_commit_status_deserialization() {
    let status: CommitStatus = serde_json::from_value(status_json("success", Some("ci/build"))).unwrap();

    assert_eq!(status.id, 1);
    assert_eq!(status.state, CommitState::Success);
    assert_eq!(status.context, "ci/build");
    assert_eq!(status.target_url.as_deref(), Some("https://ci.example.com/1000/output"));
    assert_eq!(status.created_at.to_rfc3339(), "2012-07-20T01:19:13+00:00");
    assert_eq!(status.creator.unwrap().login, "octocat");
  }

  #[test]
  fn test_commit_status_missing_context_reads_as_default() {
    let status: CommitStatus = serde_json::from_value(status_json("pending", None)).unwrap();

    assert_eq!(status.context, "default");
  }

  #[test]
  fn test_commit_status_rejects_unknown_state() {
    let result = serde_json::from_value::<CommitStatus>(status_json("queued", Some("ci")));

    assert!(result.is_err());
  }

  #[test]
  fn test_new_commit_status_omits_unset_fields() {
    let status = NewCommitStatus::new(CommitState::Pending).with_description("this is a test status");

    let body = serde_json::to_value(&status).unwrap();
    assert_eq!(
      body,
      json!({
          "state": "pending",
          "description": "this is a test status"
      })
    );
  }

  #[test]
  fn test_new_commit_status_omits_empty_context() {
    let status = NewCommitStatus::new(CommitState::Success).with_context("");

    let body = serde_json::to_value(&status).unwrap();
    assert_eq!(body, json!({ "state": "success" }));
  }

  #[test]
  fn test_new_commit_status_full_payload() {
    let status = NewCommitStatus::new(CommitState::Failure)
      .with_target_url("https://ci.example.com/1")
      .with_description("2 tests failed")
      .with_context("System A");

    let body = serde_json::to_value(&status).unwrap();
    assert_eq!(
      body,
      json!({
          "state": "failure",
          "target_url": "https://ci.example.com/1",
          "description": "2 tests failed",
          "context": "System A"
      })
    );
  }

  #[test]
  fn test_combined_commit_status_deserialization() {
    let json = json!({
        "state": "success",
        "sha": "f54529997b6ad841be524654d9e9074ab8e7d41d",
        "total_count": 2,
        "statuses": [
            status_json("success", Some("continuous-integration/travis-ci")),
            status_json("success", Some("continuous-integration/appveyor"))
        ],
        "repository": {
            "id": 1296269,
            "name": "libgit2sharp",
            "full_name": "libgit2/libgit2sharp",
            "owner": { "login": "libgit2", "id": 2 },
            "private": false
        },
        "commit_url": "https://api.github.com/repos/libgit2/libgit2sharp/commits/f5452999"
    });

    let combined: CombinedCommitStatus = serde_json::from_value(json).unwrap();

    assert_eq!(combined.state, CommitState::Success);
    assert_eq!(combined.total_count, 2);
    assert!(combined.is_consistent());
    assert_eq!(combined.repository.full_name, "libgit2/libgit2sharp");
    assert_eq!(
      combined.for_context("continuous-integration/appveyor").map(|s| s.state),
      Some(CommitState::Success)
    );
    assert!(combined.for_context("missing").is_none());
  }
}
