use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::changeset::ChangeSet;
use crate::scope::Scope;
use crate::store::StoreError;

/// Stage of a commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPhase {
  Idle,
  Confirming,
  BackingUp,
  Applying,
  Reporting,
}

/// Accepts or rejects a change set before anything is written.
pub trait Confirm {
  fn confirm(&mut self, changes: &ChangeSet) -> bool;
}

impl<F> Confirm for F
where
  F: FnMut(&ChangeSet) -> bool,
{
  fn confirm(&mut self, changes: &ChangeSet) -> bool {
    self(changes)
  }
}

/// Whether the pre-commit backup was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BackupStatus {
  Written { id: String },
  Failed { error: String },
}

/// Outcome of writing one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScopeResult {
  Applied { message: String, new_value: String },
  Failed { message: String, error: String },
}

impl ScopeResult {
  pub(crate) fn applied(scope: Scope, new_value: String, entries: usize) -> Self {
    let noun = if entries == 1 { "entry" } else { "entries" };
    let message = if scope.is_persistent() {
      format!("{} PATH updated ({} {})", scope, entries, noun)
    } else {
      format!("{} PATH updated for this process only ({} {})", scope, entries, noun)
    };
    ScopeResult::Applied { message, new_value }
  }

  pub(crate) fn failed(scope: Scope, error: &StoreError) -> Self {
    ScopeResult::Failed {
      message: format!("{} PATH was not changed", scope),
      error: error.to_string(),
    }
  }

  pub fn is_success(&self) -> bool {
    matches!(self, ScopeResult::Applied { .. })
  }

  pub fn message(&self) -> &str {
    match self {
      ScopeResult::Applied { message, .. } | ScopeResult::Failed { message, .. } => message,
    }
  }

  pub fn new_value(&self) -> Option<&str> {
    match self {
      ScopeResult::Applied { new_value, .. } => Some(new_value),
      ScopeResult::Failed { .. } => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      ScopeResult::Applied { .. } => None,
      ScopeResult::Failed { error, .. } => Some(error),
    }
  }
}

impl fmt::Display for ScopeResult {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ScopeResult::Applied { message, .. } => f.write_str(message),
      ScopeResult::Failed { message, error } => write!(f, "{}: {}", message, error),
    }
  }
}

/// Per-scope results of a confirmed commit. Holds one entry per changed scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitReport {
  pub backup: BackupStatus,
  pub results: BTreeMap<Scope, ScopeResult>,
}

impl CommitReport {
  /// True when every attempted scope was written.
  pub fn is_success(&self) -> bool {
    self.results.values().all(ScopeResult::is_success)
  }

  pub fn successes(&self) -> impl Iterator<Item = (Scope, &ScopeResult)> {
    self.results.iter().filter(|(_, r)| r.is_success()).map(|(s, r)| (*s, r))
  }

  pub fn failures(&self) -> impl Iterator<Item = (Scope, &ScopeResult)> {
    self.results.iter().filter(|(_, r)| !r.is_success()).map(|(s, r)| (*s, r))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
  /// Nothing differed from what was loaded; no backup, no writes.
  NoChanges,
  /// The change set was rejected; no backup, no writes.
  Aborted,
  Committed(CommitReport),
}

impl CommitOutcome {
  pub fn report(&self) -> Option<&CommitReport> {
    match self {
      CommitOutcome::Committed(report) => Some(report),
      _ => None,
    }
  }
}
