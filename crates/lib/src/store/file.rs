//! JSON file-backed store for hosts without a registry.
//!
//! ```text
//! { "system": "/usr/bin:/bin", "user": "/home/me/bin" }
//! ```
//!
//! The Session scope is still the process environment.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scope::Scope;

use super::{ProcessEnv, ScopeStore, StoreError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct ScopeFile {
  #[serde(default)]
  system: String,
  #[serde(default)]
  user: String,
}

impl ScopeFile {
  fn get(&self, scope: Scope) -> &str {
    match scope {
      Scope::System => &self.system,
      Scope::User => &self.user,
      Scope::Session => "",
    }
  }

  fn set(&mut self, scope: Scope, value: &str) {
    match scope {
      Scope::System => self.system = value.to_string(),
      Scope::User => self.user = value.to_string(),
      Scope::Session => {}
    }
  }
}

#[derive(Debug, Clone)]
pub struct FileStore {
  path: PathBuf,
  session: ProcessEnv,
}

impl FileStore {
  pub fn new(path: PathBuf, session: ProcessEnv) -> Self {
    Self { path, session }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn load(&self, scope: Scope) -> Result<ScopeFile, StoreError> {
    let content = match fs::read_to_string(&self.path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ScopeFile::default()),
      Err(e) => return Err(self.io_error(scope, e)),
    };

    if content.trim().is_empty() {
      return Ok(ScopeFile::default());
    }

    serde_json::from_str(&content).map_err(|source| StoreError::Parse {
      path: self.path.clone(),
      source,
    })
  }

  /// Write to a temp file and rename over the original.
  fn save(&self, scope: Scope, file: &ScopeFile) -> Result<(), StoreError> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).map_err(|e| self.io_error(scope, e))?;
    }

    let mut temp_path = self.path.clone().into_os_string();
    temp_path.push(".tmp");
    let temp_path = PathBuf::from(temp_path);

    let content = serde_json::to_string_pretty(file).map_err(|source| StoreError::Parse {
      path: self.path.clone(),
      source,
    })?;
    fs::write(&temp_path, content).map_err(|e| self.io_error(scope, e))?;
    fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(scope, e))?;
    Ok(())
  }

  fn io_error(&self, scope: Scope, source: io::Error) -> StoreError {
    if source.kind() == io::ErrorKind::PermissionDenied {
      return StoreError::AccessDenied { scope };
    }
    StoreError::Io {
      path: self.path.clone(),
      source,
    }
  }
}

impl ScopeStore for FileStore {
  fn read(&self, scope: Scope) -> Result<String, StoreError> {
    if scope == Scope::Session {
      return Ok(self.session.read());
    }
    Ok(self.load(scope)?.get(scope).to_string())
  }

  fn write(&mut self, scope: Scope, value: &str) -> Result<(), StoreError> {
    if scope == Scope::Session {
      return self.session.write(value);
    }

    let mut file = self.load(scope)?;
    file.set(scope, value);
    self.save(scope, &file)?;
    debug!(scope = %scope, path = ?self.path, "scope value saved");
    Ok(())
  }

  fn describe(&self) -> String {
    format!("file:{}", self.path.display())
  }
}
