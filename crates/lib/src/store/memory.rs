use crate::scope::Scope;

use super::{ScopeStore, StoreError};

/// In-memory store with injectable failures.
///
/// Keeps a log of every successful write so callers can verify which scopes
/// were touched.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  values: [String; 3],
  denied_reads: Vec<Scope>,
  denied_writes: Vec<Scope>,
  writes: Vec<(Scope, String)>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_value(mut self, scope: Scope, value: &str) -> Self {
    self.values[scope.index()] = value.to_string();
    self
  }

  /// Make reads of `scope` fail with `AccessDenied`.
  pub fn deny_read(mut self, scope: Scope) -> Self {
    self.denied_reads.push(scope);
    self
  }

  /// Make writes to `scope` fail with `AccessDenied`.
  pub fn deny_write(mut self, scope: Scope) -> Self {
    self.denied_writes.push(scope);
    self
  }

  pub fn value(&self, scope: Scope) -> &str {
    &self.values[scope.index()]
  }

  pub fn writes(&self) -> &[(Scope, String)] {
    &self.writes
  }
}

impl ScopeStore for MemoryStore {
  fn read(&self, scope: Scope) -> Result<String, StoreError> {
    if self.denied_reads.contains(&scope) {
      return Err(StoreError::AccessDenied { scope });
    }
    Ok(self.values[scope.index()].clone())
  }

  fn write(&mut self, scope: Scope, value: &str) -> Result<(), StoreError> {
    if self.denied_writes.contains(&scope) {
      return Err(StoreError::AccessDenied { scope });
    }
    self.values[scope.index()] = value.to_string();
    self.writes.push((scope, value.to_string()));
    Ok(())
  }

  fn describe(&self) -> String {
    "memory".to_string()
  }
}
