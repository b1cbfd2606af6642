//! Commit coordination: confirm, back up, apply per scope, report.
//!
//! A commit attempt moves through
//! `Idle → Confirming → (aborted | BackingUp) → Applying → Reporting → Idle`.
//! Each scope in the change set is written independently: a failure in one
//! scope neither blocks nor rolls back another. Nothing is retried.

mod types;

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::backup::BackupWriter;
use crate::changeset::ChangeSet;
use crate::codec::PathListCodec;
use crate::scope::Scope;
use crate::session::EditSession;
use crate::store::ScopeStore;

pub use types::{BackupStatus, CommitOutcome, CommitPhase, CommitReport, Confirm, ScopeResult};

/// Runs commit attempts against one store and backup directory.
pub struct CommitCoordinator<'a, S: ScopeStore + ?Sized> {
  store: &'a mut S,
  backups: &'a BackupWriter,
  phase: CommitPhase,
}

impl<'a, S: ScopeStore + ?Sized> CommitCoordinator<'a, S> {
  pub fn new(store: &'a mut S, backups: &'a BackupWriter) -> Self {
    Self {
      store,
      backups,
      phase: CommitPhase::Idle,
    }
  }

  pub fn phase(&self) -> CommitPhase {
    self.phase
  }

  fn enter(&mut self, phase: CommitPhase) {
    debug!(from = ?self.phase, to = ?phase, "commit phase");
    self.phase = phase;
  }

  /// Commit the session's pending changes.
  ///
  /// Returns `NoChanges` without touching anything when the session is
  /// unchanged, and `Aborted` without side effects when `confirm` rejects.
  /// Otherwise the backup is captured before the first write, and every
  /// changed scope gets exactly one entry in the report.
  pub fn run<C: Confirm + ?Sized>(&mut self, session: &EditSession, confirm: &mut C) -> CommitOutcome {
    let changes = session.change_set();
    if changes.is_empty() {
      info!("no changes to commit");
      return CommitOutcome::NoChanges;
    }

    self.enter(CommitPhase::Confirming);
    if !confirm.confirm(&changes) {
      info!(scopes = changes.len(), "commit rejected");
      self.enter(CommitPhase::Idle);
      return CommitOutcome::Aborted;
    }

    self.enter(CommitPhase::BackingUp);
    let backup = match self.backups.capture(&*self.store) {
      Ok(record) => BackupStatus::Written { id: record.id },
      Err(e) => {
        warn!(error = %e, "backup failed, continuing with commit");
        BackupStatus::Failed { error: e.to_string() }
      }
    };

    self.enter(CommitPhase::Applying);
    let results = self.apply(&changes, session.codec());

    self.enter(CommitPhase::Reporting);
    let report = CommitReport { backup, results };
    info!(
      applied = report.successes().count(),
      failed = report.failures().count(),
      "commit finished"
    );

    self.enter(CommitPhase::Idle);
    CommitOutcome::Committed(report)
  }

  fn apply(&mut self, changes: &ChangeSet, codec: PathListCodec) -> BTreeMap<Scope, ScopeResult> {
    let mut results = BTreeMap::new();
    for (scope, change) in changes.iter() {
      let result = match self.store.write(scope, &change.value) {
        Ok(()) => {
          let new_value = self.read_back(scope, &change.value);
          let count = codec.decode(&new_value).len();
          info!(scope = %scope, entries = count, "scope written");
          ScopeResult::applied(scope, new_value, count)
        }
        Err(e) => {
          warn!(scope = %scope, error = %e, "scope write failed");
          ScopeResult::failed(scope, &e)
        }
      };
      results.insert(scope, result);
    }
    results
  }

  /// The value now held by the store, or the written value if it cannot be read.
  fn read_back(&self, scope: Scope, written: &str) -> String {
    if !scope.is_persistent() {
      return written.to_string();
    }
    match self.store.read(scope) {
      Ok(value) => value,
      Err(e) => {
        warn!(scope = %scope, error = %e, "could not read back written value");
        written.to_string()
      }
    }
  }
}
