use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// RAII guard for test .netrc files
///
/// Creates a temporary home directory holding a `.netrc` with the given
/// content. The directory is removed when the guard is dropped. Pass
/// [`NetrcGuard::home_dir`] to code that looks up credentials, or export it as
/// `HOME` for a child process.
pub struct NetrcGuard {
  temp_dir: TempDir,
  netrc_path: PathBuf,
}

impl NetrcGuard {
  /// Create a new NetrcGuard with the given content
  pub fn new(content: &str) -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let netrc_path = temp_dir.path().join(".netrc");

    fs::write(&netrc_path, content).expect("Failed to write test .netrc");

    Self { temp_dir, netrc_path }
  }

  /// Create a guard holding GitHub credentials
  pub fn github(username: &str, token: &str) -> Self {
    Self::new(&format!("machine github.com\n  login {username}\n  password {token}\n"))
  }

  /// Get the path to the .netrc file
  pub fn netrc_path(&self) -> &Path {
    &self.netrc_path
  }

  /// Get the path to the temporary home directory
  pub fn home_dir(&self) -> &Path {
    self.temp_dir.path()
  }
}
