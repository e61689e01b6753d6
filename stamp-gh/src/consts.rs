//! Constants for the stamp-gh client

/// Base URL for the official SaaS GitHub API
pub const API_BASE_URL: &str = "https://api.github.com";

/// User-Agent header value for the GitHub API client
pub const USER_AGENT: &str = concat!("stamp/", env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Accept header value for the GitHub API
pub const ACCEPT: &str = "application/vnd.github.v3+json";

/// Environment variable overriding the API base URL (GitHub Enterprise, mocks)
pub const ENV_API_URL: &str = "STAMP_GITHUB_API_URL";

/// `.netrc` machine name holding GitHub credentials
pub const GITHUB_MACHINE: &str = "github.com";

/// Largest page size the statuses endpoints accept
pub const MAX_PER_PAGE: u32 = 100;

/// Context the server assigns when a status is created without one
pub const DEFAULT_CONTEXT: &str = "default";
