//! # Commit Status Client
//!
//! Stateless client for the commit status sub-resource. All state lives on the
//! server; the client turns calls into requests through a [`Transport`] and
//! responses into the typed models.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{RequestTarget, StatusError};
use crate::models::GitHubAuth;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

/// Represents a GitHub commit status client
#[derive(Debug, Clone)]
pub struct CommitStatusClient<T = HttpTransport> {
  pub(crate) transport: T,
}

impl CommitStatusClient<HttpTransport> {
  /// Create a client for the public GitHub API
  pub fn new(auth: GitHubAuth) -> Self {
    Self::with_transport(HttpTransport::new(auth))
  }

  /// Create a client for another API root (GitHub Enterprise, mock servers)
  pub fn with_base_url(base_url: &str, auth: GitHubAuth) -> Self {
    Self::with_transport(HttpTransport::with_base_url(base_url, auth))
  }
}

impl<T: Transport> CommitStatusClient<T> {
  /// Create a client on top of an arbitrary transport
  pub const fn with_transport(transport: T) -> Self {
    Self { transport }
  }

  pub const fn transport(&self) -> &T {
    &self.transport
  }

  /// Send a request and turn non-2xx responses into [`StatusError`]s
  pub(crate) async fn execute(&self, target: &RequestTarget, request: ApiRequest) -> Result<ApiResponse, StatusError> {
    debug!(method = %request.method, path = %request.path, "Sending GitHub API request");

    let response = self
      .transport
      .send(request)
      .await
      .map_err(|source| StatusError::Transport {
        target: target.clone(),
        source,
      })?;

    debug!(status = response.status, "GitHub API responded");

    if response.is_success() {
      Ok(response)
    } else {
      Err(StatusError::from_status(target.clone(), response.status, &response.body))
    }
  }
}

/// Parse a successful response body into a model
pub(crate) fn decode<D: DeserializeOwned>(target: &RequestTarget, response: &ApiResponse) -> Result<D, StatusError> {
  serde_json::from_str(&response.body).map_err(|source| StatusError::Json {
    target: target.clone(),
    source,
  })
}

/// Create a commit status client from credentials
pub fn create_commit_status_client(username: &str, token: &str) -> CommitStatusClient {
  let auth = GitHubAuth {
    username: username.to_string(),
    token: token.to_string(),
  };

  CommitStatusClient::new(auth)
}
