//! Reading credentials from `.netrc` files.
//!
//! Entries may span several lines or sit on one
//! (`machine host login user password token`). Tokens are whitespace
//! separated, so both layouts parse the same way.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Credentials stored for a single machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

/// Returns the path to the `.netrc` file for the provided home directory.
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
  Target,
  Default,
  Other,
}

/// Parses `.netrc` content and returns credentials for the requested machine.
///
/// The first complete entry for the machine wins. Without one, the first
/// complete `default` entry is used. An entry lacking `login` or `password`
/// never matches.
pub fn parse_netrc(content: &str, target_machine: &str) -> Option<Credentials> {
  let mut tokens = content.split_whitespace();
  let mut entry = Entry::Other;
  let mut username: Option<String> = None;
  let mut password: Option<String> = None;
  let mut fallback: Option<Credentials> = None;

  loop {
    let token = tokens.next();
    if matches!(token, None | Some("machine" | "default")) {
      if let (Some(username), Some(password)) = (username.take(), password.take()) {
        let creds = Credentials { username, password };
        match entry {
          Entry::Target => return Some(creds),
          Entry::Default if fallback.is_none() => fallback = Some(creds),
          Entry::Default | Entry::Other => {}
        }
      }
    }

    match token {
      None => return fallback,
      Some("default") => entry = Entry::Default,
      Some("machine") => {
        entry = if tokens.next() == Some(target_machine) {
          Entry::Target
        } else {
          Entry::Other
        };
      }
      Some("login") if entry != Entry::Other => username = tokens.next().map(str::to_string),
      Some("password") if entry != Entry::Other => password = tokens.next().map(str::to_string),
      Some("login" | "password" | "account") => {
        tokens.next();
      }
      Some(_) => {}
    }
  }
}

/// Reads a `.netrc` file and returns credentials for the requested machine.
///
/// A missing file is treated like a file without the machine.
pub fn read_netrc_credentials(path: &Path, target_machine: &str) -> Result<Option<Credentials>> {
  if !path.exists() {
    return Ok(None);
  }

  let content =
    std::fs::read_to_string(path).with_context(|| format!("Failed to read .netrc file at {}", path.display()))?;

  Ok(parse_netrc(&content, target_machine))
}
