//! # GitHub Commit Status Client
//!
//! Attach, update and query commit statuses (`pending`, `success`, `failure`,
//! `error`) on a commit identified by owner, repository and SHA.
//!
//! ```no_run
//! use stamp_gh::{CommitState, NewCommitStatus, create_commit_status_client};
//!
//! # async fn run() -> Result<(), stamp_gh::StatusError> {
//! let client = create_commit_status_client("octocat", "ghp_token");
//! let status = NewCommitStatus::new(CommitState::Pending).with_context("ci/build");
//! client.create("octocat", "hello-world", "6dcb09b5b57875f334f61aebed695e2e4193db5e", &status).await?;
//!
//! let latest = client.get_all("octocat", "hello-world", "main").await?;
//! let combined = client.get_combined("octocat", "hello-world", "main").await?;
//! # let _ = (latest, combined);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod consts;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod netrc;
pub mod transport;

// Re-export the client
pub use client::{CommitStatusClient, create_commit_status_client};
// Re-export endpoint parameters
pub use endpoints::statuses::ListOptions;
pub use error::{Operation, RequestTarget, StatusError};
// Re-export models
pub use models::{CombinedCommitStatus, CommitState, CommitStatus, GitHubAuth, NewCommitStatus, Repository, User};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport, TransportError};
