//! In-memory GitHub commit status service for tests
//!
//! [`FakeStatusService`] stands in for a disposable repository on GitHub. It
//! keeps an append-only log of status reports per commit and answers the three
//! commit status endpoints the way GitHub does: history newest first,
//! pagination through `Link` headers, and a combined view holding the latest
//! report per context.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};
use wiremock::matchers::path_regex;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const STATES: [&str; 4] = ["error", "failure", "pending", "success"];
const DEFAULT_PER_PAGE: usize = 30;

#[derive(Debug, Clone)]
struct StoredStatus {
  id: u64,
  sha: String,
  state: String,
  target_url: Option<String>,
  description: Option<String>,
  context: String,
  created_at: DateTime<Utc>,
}

#[derive(Debug)]
struct State {
  owner: String,
  repo: String,
  credentials: Option<(String, String)>,
  commits: Vec<String>,
  refs: HashMap<String, String>,
  log: Vec<StoredStatus>,
  next_id: u64,
  clock: DateTime<Utc>,
  requests: usize,
}

/// A fake repository answering the commit status endpoints.
///
/// Cloning shares the underlying state, so a clone can be mounted on a
/// [`MockServer`] while the test keeps another to seed commits and inspect the
/// log.
#[derive(Debug, Clone)]
pub struct FakeStatusService {
  state: Arc<Mutex<State>>,
}

impl FakeStatusService {
  /// Create an empty repository `owner/repo`
  pub fn new(owner: &str, repo: &str) -> Self {
    let clock = Utc
      .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
      .single()
      .expect("valid fixture timestamp");

    Self {
      state: Arc::new(Mutex::new(State {
        owner: owner.to_string(),
        repo: repo.to_string(),
        credentials: None,
        commits: Vec::new(),
        refs: HashMap::new(),
        log: Vec::new(),
        next_id: 1,
        clock,
        requests: 0,
      })),
    }
  }

  /// Answer 401 unless requests carry these basic auth credentials
  pub fn require_credentials(self, username: &str, token: &str) -> Self {
    self.lock().credentials = Some((username.to_string(), token.to_string()));
    self
  }

  /// Mount the service on a mock server
  pub async fn mount(&self, server: &MockServer) {
    Mock::given(path_regex(r"^/repos/[^/]+/[^/]+/(commits/.+/status(es)?|statuses/[^/]+)$"))
      .respond_with(self.clone())
      .mount(server)
      .await;
  }

  /// Manufacture a new commit and return its SHA
  pub fn create_commit(&self) -> String {
    let mut state = self.lock();
    let mix = (state.commits.len() as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    let sha = format!("{mix:016x}{:016x}{:08x}", mix.rotate_left(17) ^ 0xdead_beef, (mix >> 32) as u32);
    state.commits.push(sha.clone());
    sha
  }

  /// Point a branch or tag name at a commit
  pub fn set_ref(&self, name: &str, sha: &str) {
    self.lock().refs.insert(name.to_string(), sha.to_string());
  }

  /// Number of statuses stored for a commit
  pub fn status_count(&self, sha: &str) -> usize {
    self.lock().log.iter().filter(|status| status.sha == sha).count()
  }

  /// Number of requests served so far
  pub fn request_count(&self) -> usize {
    self.lock().requests
  }

  fn lock(&self) -> MutexGuard<'_, State> {
    self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl Respond for FakeStatusService {
  fn respond(&self, request: &Request) -> ResponseTemplate {
    let mut state = self.lock();
    state.requests += 1;

    if let Some(expected) = &state.credentials
      && !has_basic_auth(request, expected)
    {
      return error_response(401, "Bad credentials");
    }

    let segments: Vec<&str> = request.url.path().trim_start_matches('/').splitn(4, '/').collect();
    let [_, owner, repo, rest] = segments.as_slice() else {
      return error_response(404, "Not Found");
    };
    if *owner != state.owner || *repo != state.repo {
      return error_response(404, "Not Found");
    }

    match request.method.as_str() {
      "GET" => {
        if let Some(reference) = rest.strip_prefix("commits/").and_then(|r| r.strip_suffix("/statuses")) {
          list_statuses(&state, request, reference)
        } else if let Some(reference) = rest.strip_prefix("commits/").and_then(|r| r.strip_suffix("/status")) {
          combined_status(&state, reference)
        } else {
          error_response(404, "Not Found")
        }
      }
      "POST" => match rest.strip_prefix("statuses/") {
        Some(sha) => create_status(&mut state, request, sha),
        None => error_response(404, "Not Found"),
      },
      _ => error_response(404, "Not Found"),
    }
  }
}

fn has_basic_auth(request: &Request, (username, token): &(String, String)) -> bool {
  let Some(value) = request.headers.get("authorization").and_then(|v| v.to_str().ok()) else {
    return false;
  };
  let expected = format!("Basic {}", STANDARD.encode(format!("{username}:{token}")));
  value == expected
}

fn resolve(state: &State, reference: &str) -> Option<String> {
  if let Some(sha) = state.refs.get(reference) {
    return Some(sha.clone());
  }
  let matches: Vec<&String> = state
    .commits
    .iter()
    .filter(|sha| reference.len() >= 7 && sha.starts_with(reference))
    .collect();
  match matches.as_slice() {
    [sha] => Some((*sha).clone()),
    _ => None,
  }
}

/// Newest first, across every context
fn history<'a>(state: &'a State, sha: &str) -> Vec<&'a StoredStatus> {
  state.log.iter().rev().filter(|status| status.sha == sha).collect()
}

fn list_statuses(state: &State, request: &Request, reference: &str) -> ResponseTemplate {
  let Some(sha) = resolve(state, reference) else {
    return error_response(404, "No commit found for SHA");
  };

  let query: HashMap<String, String> = request.url.query_pairs().into_owned().collect();
  let per_page = query
    .get("per_page")
    .and_then(|v| v.parse::<usize>().ok())
    .unwrap_or(DEFAULT_PER_PAGE)
    .clamp(1, 100);
  let page = query.get("page").and_then(|v| v.parse::<usize>().ok()).unwrap_or(1).max(1);

  let all = history(state, &sha);
  let body: Vec<Value> = all
    .iter()
    .skip((page - 1) * per_page)
    .take(per_page)
    .map(|status| status_json(state, status))
    .collect();

  let mut response = ResponseTemplate::new(200).set_body_json(body);
  if page * per_page < all.len() {
    let mut next = request.url.clone();
    next.set_query(Some(&format!("per_page={per_page}&page={}", page + 1)));
    response = response.insert_header("Link", format!("<{next}>; rel=\"next\"").as_str());
  }
  response
}

fn combined_status(state: &State, reference: &str) -> ResponseTemplate {
  let Some(sha) = resolve(state, reference) else {
    return error_response(404, "No commit found for SHA");
  };

  let mut latest: Vec<&StoredStatus> = Vec::new();
  for status in history(state, &sha) {
    if !latest.iter().any(|seen| seen.context == status.context) {
      latest.push(status);
    }
  }

  let overall = if latest.iter().any(|s| s.state == "failure" || s.state == "error") {
    "failure"
  } else if latest.is_empty() || latest.iter().any(|s| s.state == "pending") {
    "pending"
  } else {
    "success"
  };

  ResponseTemplate::new(200).set_body_json(json!({
      "state": overall,
      "sha": sha,
      "total_count": latest.len(),
      "statuses": latest.iter().map(|status| status_json(state, status)).collect::<Vec<_>>(),
      "repository": {
          "id": 1,
          "name": state.repo,
          "full_name": format!("{}/{}", state.owner, state.repo),
          "owner": { "login": state.owner, "id": 1, "type": "User" },
          "private": false
      },
      "commit_url": format!("https://api.github.com/repos/{}/{}/commits/{sha}", state.owner, state.repo)
  }))
}

fn create_status(state: &mut State, request: &Request, sha: &str) -> ResponseTemplate {
  if !state.commits.iter().any(|commit| commit == sha) {
    return validation_error(&format!("No commit found for SHA: {sha}"));
  }

  let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
    return error_response(400, "Problems parsing JSON");
  };

  let Some(requested_state) = body.get("state").and_then(Value::as_str).filter(|s| STATES.contains(s)) else {
    return validation_error("state is not included in the list");
  };

  let text = |field: &str| body.get(field).and_then(Value::as_str).map(str::to_string);
  let context = text("context")
    .filter(|context| !context.is_empty())
    .unwrap_or_else(|| "default".to_string());

  state.clock += Duration::seconds(1);
  let status = StoredStatus {
    id: state.next_id,
    sha: sha.to_string(),
    state: requested_state.to_string(),
    target_url: text("target_url"),
    description: text("description"),
    context,
    created_at: state.clock,
  };
  state.next_id += 1;

  let response = ResponseTemplate::new(201).set_body_json(status_json(state, &status));
  state.log.push(status);
  response
}

fn status_json(state: &State, status: &StoredStatus) -> Value {
  let timestamp = status.created_at.format("%Y-%m-%dT%H:%M:%SZ").to_string();
  json!({
      "url": format!("https://api.github.com/repos/{}/{}/statuses/{}", state.owner, state.repo, status.sha),
      "id": status.id,
      "node_id": format!("SC_{}", status.id),
      "state": status.state,
      "description": status.description,
      "target_url": status.target_url,
      "context": status.context,
      "created_at": timestamp,
      "updated_at": timestamp,
      "creator": { "login": state.owner, "id": 1, "type": "User" }
  })
}

fn error_response(status: u16, message: &str) -> ResponseTemplate {
  ResponseTemplate::new(status).set_body_json(json!({
      "message": message,
      "documentation_url": "https://docs.github.com/rest/commits/statuses"
  }))
}

fn validation_error(message: &str) -> ResponseTemplate {
  ResponseTemplate::new(422).set_body_json(json!({
      "message": "Validation Failed",
      "errors": [{ "resource": "Status", "code": "custom", "message": message }],
      "documentation_url": "https://docs.github.com/rest/commits/statuses#create-a-commit-status"
  }))
}
