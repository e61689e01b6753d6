//! Error taxonomy for commit status operations.
//!
//! Every failure names the operation and the `owner/repo@ref` it was issued
//! against. Messages returned by GitHub are carried through unchanged.

use std::fmt;

use thiserror::Error;

use crate::transport::TransportError;

/// The client operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  GetAll,
  GetCombined,
  Create,
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::GetAll => "list commit statuses",
      Self::GetCombined => "get combined commit status",
      Self::Create => "create commit status",
    };
    f.write_str(name)
  }
}

/// Parameters of the failed call, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
  pub operation: Operation,
  pub owner: String,
  pub repo: String,
  pub reference: String,
}

impl RequestTarget {
  pub fn new(operation: Operation, owner: &str, repo: &str, reference: &str) -> Self {
    Self {
      operation,
      owner: owner.to_string(),
      repo: repo.to_string(),
      reference: reference.to_string(),
    }
  }
}

impl fmt::Display for RequestTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} for {}/{}@{}", self.operation, self.owner, self.repo, self.reference)
  }
}

/// Errors returned by [`CommitStatusClient`](crate::CommitStatusClient)
#[derive(Debug, Error)]
pub enum StatusError {
  #[error("Failed to {target}: repository or ref not found, or not accessible ({message})")]
  NotFound { target: RequestTarget, message: String },

  #[error("Failed to {target}: authentication failed, check your GitHub credentials ({message})")]
  Unauthenticated { target: RequestTarget, message: String },

  #[error("Failed to {target}: insufficient permissions ({message})")]
  Unauthorized { target: RequestTarget, message: String },

  #[error("Failed to {target}: invalid request ({message})")]
  Validation { target: RequestTarget, message: String },

  #[error("Failed to {target}: transport failure")]
  Transport {
    target: RequestTarget,
    #[source]
    source: TransportError,
  },

  #[error("Failed to {target}: malformed JSON payload")]
  Json {
    target: RequestTarget,
    #[source]
    source: serde_json::Error,
  },

  #[error("Failed to {target}: unexpected HTTP {status} ({message})")]
  UnexpectedStatus {
    target: RequestTarget,
    status: u16,
    message: String,
  },
}

impl StatusError {
  /// Map a non-2xx response onto the taxonomy
  pub(crate) fn from_status(target: RequestTarget, status: u16, body: &str) -> Self {
    let message = api_message(body);
    match status {
      401 => Self::Unauthenticated { target, message },
      403 => Self::Unauthorized { target, message },
      404 => Self::NotFound { target, message },
      400 | 422 => Self::Validation { target, message },
      _ => Self::UnexpectedStatus {
        target,
        status,
        message,
      },
    }
  }

  pub(crate) fn invalid_argument(target: RequestTarget, message: impl Into<String>) -> Self {
    Self::Validation {
      target,
      message: message.into(),
    }
  }

  /// The call that produced this error
  pub const fn target(&self) -> &RequestTarget {
    match self {
      Self::NotFound { target, .. }
      | Self::Unauthenticated { target, .. }
      | Self::Unauthorized { target, .. }
      | Self::Validation { target, .. }
      | Self::Transport { target, .. }
      | Self::Json { target, .. }
      | Self::UnexpectedStatus { target, .. } => target,
    }
  }

  pub const fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }

  pub const fn is_auth_failure(&self) -> bool {
    matches!(self, Self::Unauthenticated { .. } | Self::Unauthorized { .. })
  }
}

/// Extract GitHub's `message` (and validation details) from an error body,
/// falling back to the raw text.
fn api_message(body: &str) -> String {
  let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
    return body.trim().to_string();
  };

  let Some(message) = json.get("message").and_then(|m| m.as_str()) else {
    return body.trim().to_string();
  };

  let details: Vec<&str> = json
    .get("errors")
    .and_then(|e| e.as_array())
    .map(|errors| {
      errors
        .iter()
        .filter_map(|e| e.get("message").or_else(|| e.get("code")).and_then(|m| m.as_str()))
        .collect()
    })
    .unwrap_or_default();

  if details.is_empty() {
    message.to_string()
  } else {
    format!("{message}: {}", details.join(", "))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn target() -> RequestTarget {
    RequestTarget::new(Operation::GetAll, "octocat", "hello-world", "main")
  }

  #[test]
  fn test_status_code_mapping() {
    let body = r#"{"message":"Not Found"}"#;

    assert!(matches!(
      StatusError::from_status(target(), 401, body),
      StatusError::Unauthenticated { .. }
    ));
    assert!(matches!(
      StatusError::from_status(target(), 403, body),
      StatusError::Unauthorized { .. }
    ));
    assert!(StatusError::from_status(target(), 404, body).is_not_found());
    assert!(matches!(
      StatusError::from_status(target(), 422, body),
      StatusError::Validation { .. }
    ));
    assert!(matches!(
      StatusError::from_status(target(), 400, body),
      StatusError::Validation { .. }
    ));
    assert!(matches!(
      StatusError::from_status(target(), 502, body),
      StatusError::UnexpectedStatus { status: 502, .. }
    ));
  }

  #[test]
  fn test_message_includes_target_and_api_message() {
    let err = StatusError::from_status(target(), 404, r#"{"message":"Not Found"}"#);

    assert_eq!(
      err.to_string(),
      "Failed to list commit statuses for octocat/hello-world@main: repository or ref not found, or not accessible (Not Found)"
    );
    assert_eq!(err.target().reference, "main");
  }

  #[test]
  fn test_validation_details_are_kept() {
    let body = r#"{
      "message": "Validation Failed",
      "errors": [{ "resource": "Status", "code": "custom", "field": "state", "message": "state is not included in the list" }]
    }"#;

    let err = StatusError::from_status(target(), 422, body);
    assert!(err.to_string().contains("Validation Failed: state is not included in the list"));
  }

  #[test]
  fn test_non_json_body_is_used_verbatim() {
    let err = StatusError::from_status(target(), 503, "upstream connect error\n");

    assert!(err.to_string().contains("unexpected HTTP 503 (upstream connect error)"));
  }

  #[test]
  fn test_auth_failure_predicate() {
    assert!(StatusError::from_status(target(), 401, "").is_auth_failure());
    assert!(StatusError::from_status(target(), 403, "").is_auth_failure());
    assert!(!StatusError::from_status(target(), 404, "").is_auth_failure());
  }
}
