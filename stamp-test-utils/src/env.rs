//! Environment variable management for testing
//!
//! Tests that touch process-wide environment variables should hold an
//! [`EnvVarGuard`] so the previous value is restored even when the test fails.

use std::env;

/// Sets (or removes) an environment variable and restores the original value
/// on drop
pub struct EnvVarGuard {
  key: String,
  original: Option<String>,
}

impl EnvVarGuard {
  /// Set `key` to `value` for the lifetime of the guard
  pub fn set(key: &str, value: &str) -> Self {
    let original = env::var(key).ok();
    unsafe {
      env::set_var(key, value);
    }
    Self {
      key: key.to_string(),
      original,
    }
  }

  /// Remove `key` for the lifetime of the guard
  pub fn remove(key: &str) -> Self {
    let original = env::var(key).ok();
    unsafe {
      env::remove_var(key);
    }
    Self {
      key: key.to_string(),
      original,
    }
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    match &self.original {
      Some(val) => unsafe {
        env::set_var(&self.key, val);
      },
      None => unsafe {
        env::remove_var(&self.key);
      },
    }
  }
}
