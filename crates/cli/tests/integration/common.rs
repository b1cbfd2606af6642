//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Process variable standing in for PATH in the Session scope.
pub const SESSION_VAR: &str = "PATHEDIT_IT_SESSION";

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the scope store and
/// backup directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create an environment whose store holds the given System and User values.
  pub fn with_scopes(system: &str, user: &str) -> Self {
    let env = Self::empty();
    let content = serde_json::json!({ "system": system, "user": user });
    std::fs::write(env.store_path(), content.to_string()).unwrap();
    env
  }

  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn store_path(&self) -> PathBuf {
    self.temp.path().join("scopes.json")
  }

  pub fn backup_dir(&self) -> PathBuf {
    self.temp.path().join("backups")
  }

  /// Read back a persisted scope value from the store file.
  pub fn stored(&self, key: &str) -> String {
    let content = std::fs::read_to_string(self.store_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    value[key].as_str().unwrap_or_default().to_string()
  }

  /// Number of backup records written so far.
  pub fn backup_count(&self) -> usize {
    match std::fs::read_dir(self.backup_dir()) {
      Ok(entries) => entries.count(),
      Err(_) => 0,
    }
  }

  /// A pathedit command wired to this environment.
  pub fn cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("pathedit");
    cmd
      .env("PATHEDIT_STORE", self.store_path())
      .env("PATHEDIT_BACKUP_DIR", self.backup_dir())
      .env("PATHEDIT_SEPARATOR", ";")
      .env("PATHEDIT_SESSION_VAR", SESSION_VAR)
      .env(SESSION_VAR, r"C:\A;C:\B;C:\U")
      .env_remove("RUST_LOG");
    cmd
  }
}
