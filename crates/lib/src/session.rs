//! In-memory edit session over the three scopes.
//!
//! The session loads each scope once, keeps the decoded list as its original
//! snapshot, and applies every edit to a separate live copy. The store is not
//! consulted again until the next session, so cancelling has no side effects.

use thiserror::Error;
use tracing::debug;

use crate::changeset::{ChangeSet, ScopeChange};
use crate::codec::{PathEntry, PathListCodec};
use crate::scope::Scope;
use crate::store::{ScopeStore, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
  #[error("the {scope} scope has not been loaded")]
  NotLoaded { scope: Scope },

  #[error("index {index} is out of range for the {scope} scope ({len} entries)")]
  IndexOutOfRange { scope: Scope, index: usize, len: usize },

  #[error("refusing to store an empty entry in the {scope} scope")]
  EmptyEntry { scope: Scope },

  #[error("entry {entry:?} contains the list separator '{separator}'")]
  ContainsSeparator {
    scope: Scope,
    entry: String,
    separator: char,
  },

  #[error(transparent)]
  Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default)]
struct ScopeList {
  live: Vec<PathEntry>,
  original: Vec<PathEntry>,
  loaded: bool,
}

#[derive(Debug, Clone)]
pub struct EditSession {
  codec: PathListCodec,
  lists: [ScopeList; 3],
}

impl EditSession {
  pub fn new(codec: PathListCodec) -> Self {
    Self {
      codec,
      lists: Default::default(),
    }
  }

  pub fn codec(&self) -> PathListCodec {
    self.codec
  }

  /// Read and decode one scope, resetting both its live list and snapshot.
  pub fn load<S: ScopeStore + ?Sized>(&mut self, scope: Scope, store: &S) -> Result<&[PathEntry], SessionError> {
    let raw = store.read(scope)?;
    let entries = self.codec.decode(&raw);
    debug!(scope = %scope, entries = entries.len(), "scope loaded");

    let list = &mut self.lists[scope.index()];
    list.original = entries.clone();
    list.live = entries;
    list.loaded = true;
    Ok(&list.live)
  }

  /// Load every scope, stopping at the first failure.
  pub fn load_all<S: ScopeStore + ?Sized>(&mut self, store: &S) -> Result<(), SessionError> {
    for scope in Scope::ALL {
      self.load(scope, store)?;
    }
    Ok(())
  }

  pub fn is_loaded(&self, scope: Scope) -> bool {
    self.lists[scope.index()].loaded
  }

  /// Current live entries. Empty for a scope that has not been loaded.
  pub fn entries(&self, scope: Scope) -> &[PathEntry] {
    &self.lists[scope.index()].live
  }

  /// Entries as they were loaded.
  pub fn original(&self, scope: Scope) -> &[PathEntry] {
    &self.lists[scope.index()].original
  }

  /// Append a trimmed entry. Duplicates are allowed.
  pub fn add(&mut self, scope: Scope, entry: &str) -> Result<usize, SessionError> {
    let entry = self.validate(scope, entry)?;
    let list = self.list_mut(scope)?;
    list.live.push(entry);
    Ok(list.live.len() - 1)
  }

  /// Replace the entry at `index` with a trimmed entry.
  pub fn edit(&mut self, scope: Scope, index: usize, entry: &str) -> Result<(), SessionError> {
    let entry = self.validate(scope, entry)?;
    let list = self.list_mut(scope)?;
    let len = list.live.len();
    let slot = list
      .live
      .get_mut(index)
      .ok_or(SessionError::IndexOutOfRange { scope, index, len })?;
    *slot = entry;
    Ok(())
  }

  /// Remove and return the entry at `index`.
  pub fn delete(&mut self, scope: Scope, index: usize) -> Result<PathEntry, SessionError> {
    let list = self.list_mut(scope)?;
    check_index(scope, index, list.live.len())?;
    Ok(list.live.remove(index))
  }

  /// Swap the entry at `index` with its predecessor.
  ///
  /// Index 0 is always a no-op, even on an empty list.
  pub fn move_up(&mut self, scope: Scope, index: usize) -> Result<(), SessionError> {
    let list = self.list_mut(scope)?;
    if index == 0 {
      return Ok(());
    }
    check_index(scope, index, list.live.len())?;
    list.live.swap(index - 1, index);
    Ok(())
  }

  /// Swap the entry at `index` with its successor.
  ///
  /// The last index is a no-op. On an empty list index 0 counts as the last
  /// index, so it is a no-op too.
  pub fn move_down(&mut self, scope: Scope, index: usize) -> Result<(), SessionError> {
    let list = self.list_mut(scope)?;
    let len = list.live.len();
    if len == 0 && index == 0 {
      return Ok(());
    }
    check_index(scope, index, len)?;
    if index + 1 < len {
      list.live.swap(index, index + 1);
    }
    Ok(())
  }

  /// Discard every edit made to `scope` since it was loaded.
  pub fn revert(&mut self, scope: Scope) -> Result<(), SessionError> {
    let list = self.list_mut(scope)?;
    list.live = list.original.clone();
    Ok(())
  }

  /// Scopes whose encoded live list differs from the encoded snapshot.
  pub fn change_set(&self) -> ChangeSet {
    let mut changes = ChangeSet::default();
    for scope in Scope::ALL {
      let list = &self.lists[scope.index()];
      if !list.loaded {
        continue;
      }

      let original = self.codec.encode(&list.original);
      let value = self.codec.encode(&list.live);
      if original != value {
        changes.insert(scope, ScopeChange::between(&list.original, &list.live, original, value));
      }
    }
    changes
  }

  pub fn has_changes(&self) -> bool {
    !self.change_set().is_empty()
  }

  fn list_mut(&mut self, scope: Scope) -> Result<&mut ScopeList, SessionError> {
    let list = &mut self.lists[scope.index()];
    if !list.loaded {
      return Err(SessionError::NotLoaded { scope });
    }
    Ok(list)
  }

  fn validate(&self, scope: Scope, entry: &str) -> Result<PathEntry, SessionError> {
    let entry = entry.trim();
    if entry.is_empty() {
      return Err(SessionError::EmptyEntry { scope });
    }
    let separator = self.codec.separator();
    if entry.contains(separator) {
      return Err(SessionError::ContainsSeparator {
        scope,
        entry: entry.to_string(),
        separator,
      });
    }
    Ok(entry.to_string())
  }
}

impl Default for EditSession {
  fn default() -> Self {
    Self::new(PathListCodec::default())
  }
}

fn check_index(scope: Scope, index: usize, len: usize) -> Result<(), SessionError> {
  if index >= len {
    return Err(SessionError::IndexOutOfRange { scope, index, len });
  }
  Ok(())
}
