//! # HTTP Transport
//!
//! The seam between the commit status client and the network. The client only
//! needs `send(request) -> (status, body)`; [`HttpTransport`] provides that on
//! top of `reqwest` with GitHub's headers and basic authentication.

use std::future::Future;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::LINK;
use reqwest::{Client, Method};
use thiserror::Error;
use tracing::trace;
use url::Url;

use crate::consts::{ACCEPT, API_BASE_URL, USER_AGENT};
use crate::models::GitHubAuth;

static LINK_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"<([^>]+)>\s*;\s*rel="([^"]+)""#).expect("Failed to compile Link header regex"));

/// A request relative to the API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
  pub method: Method,
  pub path: String,
  pub query: Vec<(String, String)>,
  pub body: Option<serde_json::Value>,
}

impl ApiRequest {
  pub fn get(path: impl Into<String>) -> Self {
    Self {
      method: Method::GET,
      path: path.into(),
      query: Vec::new(),
      body: None,
    }
  }

  pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
    Self {
      method: Method::POST,
      path: path.into(),
      query: Vec::new(),
      body: Some(body),
    }
  }

  pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
    self.query = query;
    self
  }
}

/// Raw response handed back by a [`Transport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
  pub status: u16,
  pub body: String,
  /// Page number of the `rel="next"` link, when the result is paginated
  pub next_page: Option<u32>,
}

impl ApiResponse {
  pub const fn is_success(&self) -> bool {
    self.status >= 200 && self.status < 300
  }
}

/// Network-level failure, surfaced unchanged to callers
#[derive(Debug, Error)]
pub enum TransportError {
  #[error("Failed to send request to {url}")]
  Request {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("Failed to read response body from {url}")]
  Body {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{0}")]
  Other(String),
}

/// Sends API requests. Implementations own retries, rate limiting and
/// connection reuse; the client only maps the outcome.
pub trait Transport: Send + Sync {
  fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send;
}

/// `reqwest`-backed transport talking to the GitHub REST API
#[derive(Debug, Clone)]
pub struct HttpTransport {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) auth: GitHubAuth,
}

impl HttpTransport {
  /// Transport for the public GitHub API
  pub fn new(auth: GitHubAuth) -> Self {
    Self::with_base_url(API_BASE_URL, auth)
  }

  /// Transport for a GitHub Enterprise instance or a mock server
  pub fn with_base_url(base_url: &str, auth: GitHubAuth) -> Self {
    Self {
      client: Client::new(),
      base_url: base_url.trim_end_matches('/').to_string(),
      auth,
    }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }
}

impl Transport for HttpTransport {
  async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
    let url = format!("{}{}", self.base_url, request.path);

    let mut builder = self
      .client
      .request(request.method, &url)
      .header("Accept", ACCEPT)
      .header("User-Agent", USER_AGENT)
      .basic_auth(&self.auth.username, Some(&self.auth.token));

    if !request.query.is_empty() {
      builder = builder.query(&request.query);
    }
    if let Some(body) = &request.body {
      builder = builder.json(body);
    }

    let response = builder
      .send()
      .await
      .map_err(|source| TransportError::Request { url: url.clone(), source })?;

    let status = response.status().as_u16();
    let next_page = response
      .headers()
      .get(LINK)
      .and_then(|value| value.to_str().ok())
      .and_then(next_page_from_link);

    let body = response
      .text()
      .await
      .map_err(|source| TransportError::Body { url: url.clone(), source })?;

    trace!(%url, status, ?next_page, "GitHub API response");

    Ok(ApiResponse {
      status,
      body,
      next_page,
    })
  }
}

/// Page number of the `rel="next"` entry of an RFC 5988 `Link` header
pub fn next_page_from_link(header: &str) -> Option<u32> {
  LINK_REGEX
    .captures_iter(header)
    .find(|captures| &captures[2] == "next")
    .and_then(|captures| Url::parse(&captures[1]).ok())
    .and_then(|url| {
      url
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
    })
}
