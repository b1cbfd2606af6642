//! Runtime configuration read from the environment.
//!
//! Every setting has a platform default and an environment override:
//!
//! - `PATHEDIT_STORE`: JSON file holding System/User values (selects the file store)
//! - `PATHEDIT_BACKUP_DIR`: where backup records are written
//! - `PATHEDIT_SEPARATOR`: single-character list separator
//! - `PATHEDIT_SESSION_VAR`: process variable backing the Session scope

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::PathListCodec;
use crate::consts::{BACKUP_DIR_ENV, PATH_VAR, SEPARATOR_ENV, SESSION_VAR_ENV, STORE_ENV};
use crate::platform::paths;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("{var} must be a single character, got {value:?}")]
  InvalidSeparator { var: &'static str, value: String },

  #[error("{var} must not be empty")]
  Empty { var: &'static str },
}

/// Where System and User values are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
  /// The Windows registry environment keys.
  Registry,
  /// A JSON document at the given path.
  File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub backend: StoreBackend,
  pub backup_dir: PathBuf,
  pub separator: char,
  pub session_var: String,
}

impl Config {
  /// Build the configuration from `PATHEDIT_*` variables and platform defaults.
  pub fn from_env() -> Result<Self, ConfigError> {
    let backend = match non_empty_var(STORE_ENV)? {
      Some(path) => StoreBackend::File(PathBuf::from(path)),
      None => default_backend(),
    };

    let backup_dir = non_empty_var(BACKUP_DIR_ENV)?
      .map(PathBuf::from)
      .unwrap_or_else(paths::backups_dir);

    let separator = match std::env::var(SEPARATOR_ENV) {
      Ok(value) => parse_separator(&value)?,
      Err(_) => PathListCodec::native().separator(),
    };

    let session_var = non_empty_var(SESSION_VAR_ENV)?.unwrap_or_else(|| PATH_VAR.to_string());

    Ok(Self {
      backend,
      backup_dir,
      separator,
      session_var,
    })
  }

  pub fn codec(&self) -> PathListCodec {
    PathListCodec::new(self.separator)
  }
}

#[cfg(windows)]
fn default_backend() -> StoreBackend {
  StoreBackend::Registry
}

#[cfg(not(windows))]
fn default_backend() -> StoreBackend {
  StoreBackend::File(paths::data_dir().join("scopes.json"))
}

/// Reads an optional variable, rejecting one that is set but blank.
fn non_empty_var(var: &'static str) -> Result<Option<String>, ConfigError> {
  match std::env::var(var) {
    Ok(value) if value.trim().is_empty() => Err(ConfigError::Empty { var }),
    Ok(value) => Ok(Some(value)),
    Err(_) => Ok(None),
  }
}

fn parse_separator(value: &str) -> Result<char, ConfigError> {
  let mut chars = value.chars();
  match (chars.next(), chars.next()) {
    (Some(c), None) if !c.is_whitespace() => Ok(c),
    _ => Err(ConfigError::InvalidSeparator {
      var: SEPARATOR_ENV,
      value: value.to_string(),
    }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const ALL_VARS: [&str; 4] = [STORE_ENV, BACKUP_DIR_ENV, SEPARATOR_ENV, SESSION_VAR_ENV];

  #[test]
  #[serial]
  fn defaults_without_overrides() {
    temp_env::with_vars(ALL_VARS.map(|v| (v, None::<&str>)), || {
      let config = Config::from_env().unwrap();
      assert_eq!(config.separator, PathListCodec::native().separator());
      assert_eq!(config.session_var, PATH_VAR);
      assert_eq!(config.backup_dir, paths::backups_dir());
      assert_eq!(config.backend, default_backend());
    });
  }

  #[test]
  #[serial]
  fn overrides_are_applied() {
    temp_env::with_vars(
      [
        (STORE_ENV, Some("/tmp/scopes.json")),
        (BACKUP_DIR_ENV, Some("/tmp/backups")),
        (SEPARATOR_ENV, Some(";")),
        (SESSION_VAR_ENV, Some("MY_PATH")),
      ],
      || {
        let config = Config::from_env().unwrap();
        assert_eq!(config.backend, StoreBackend::File(PathBuf::from("/tmp/scopes.json")));
        assert_eq!(config.backup_dir, PathBuf::from("/tmp/backups"));
        assert_eq!(config.codec(), PathListCodec::new(';'));
        assert_eq!(config.session_var, "MY_PATH");
      },
    );
  }

  #[test]
  #[serial]
  fn multi_character_separator_is_rejected() {
    temp_env::with_vars(
      [(SEPARATOR_ENV, Some(";;")), (STORE_ENV, None), (BACKUP_DIR_ENV, None)],
      || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeparator { .. }));
      },
    );
  }

  #[test]
  #[serial]
  fn blank_store_path_is_rejected() {
    temp_env::with_var(STORE_ENV, Some("  "), || {
      assert_eq!(Config::from_env().unwrap_err(), ConfigError::Empty { var: STORE_ENV });
    });
  }
}
