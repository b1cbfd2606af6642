//! Read/write access to the raw value of each PATH scope.
//!
//! A [`ScopeStore`] is the only component that touches the operating system.
//! System and User values are persistent; the Session value lives in the
//! current process's environment table and is never persisted.

mod file;
mod memory;
mod process;
#[cfg(windows)]
mod registry;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::{Config, StoreBackend};
use crate::scope::Scope;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use process::ProcessEnv;
#[cfg(windows)]
pub use registry::RegistryStore;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("access denied to the {scope} scope (elevation required)")]
  AccessDenied { scope: Scope },

  #[error("failed to read the {scope} scope: {message}")]
  Read { scope: Scope, message: String },

  #[error("failed to write the {scope} scope: {message}")]
  Write { scope: Scope, message: String },

  #[error("failed to access store file {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse store file {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("the registry store is only available on Windows")]
  Unsupported,
}

impl StoreError {
  pub fn is_access_denied(&self) -> bool {
    matches!(self, StoreError::AccessDenied { .. })
  }
}

/// Raw access to one scope's PATH value.
pub trait ScopeStore {
  /// Read the raw value. A missing value reads as an empty string.
  fn read(&self, scope: Scope) -> Result<String, StoreError>;

  /// Replace the raw value.
  ///
  /// Persistent scopes attempt to notify other processes of the change.
  fn write(&mut self, scope: Scope, value: &str) -> Result<(), StoreError>;

  /// Short human-readable description of the backend.
  fn describe(&self) -> String;
}

impl<S: ScopeStore + ?Sized> ScopeStore for Box<S> {
  fn read(&self, scope: Scope) -> Result<String, StoreError> {
    (**self).read(scope)
  }

  fn write(&mut self, scope: Scope, value: &str) -> Result<(), StoreError> {
    (**self).write(scope, value)
  }

  fn describe(&self) -> String {
    (**self).describe()
  }
}

/// Open the store selected by the configuration.
pub fn open_store(config: &Config) -> Result<Box<dyn ScopeStore>, StoreError> {
  let session = ProcessEnv::new(config.session_var.clone());
  match &config.backend {
    StoreBackend::File(path) => Ok(Box::new(FileStore::new(path.clone(), session))),
    #[cfg(windows)]
    StoreBackend::Registry => Ok(Box::new(RegistryStore::new(session))),
    #[cfg(not(windows))]
    StoreBackend::Registry => Err(StoreError::Unsupported),
  }
}
