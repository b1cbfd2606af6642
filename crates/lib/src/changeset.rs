//! The set of scopes whose in-session edits differ from what was loaded.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::codec::PathEntry;
use crate::scope::Scope;

/// Pending change for one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeChange {
  /// Serialized value of the list as it was loaded.
  pub original: String,
  /// Serialized value to write.
  pub value: String,
  /// Entries present now but not at load time (counting duplicates).
  pub added: Vec<PathEntry>,
  /// Entries present at load time but not now (counting duplicates).
  pub removed: Vec<PathEntry>,
  /// True when the entries that were kept changed relative order.
  pub reordered: bool,
}

impl ScopeChange {
  pub(crate) fn between(original: &[PathEntry], live: &[PathEntry], original_raw: String, value: String) -> Self {
    let removed = multiset_difference(original, live);
    let added = multiset_difference(live, original);
    let kept_before = without(original, &removed);
    let kept_after = without(live, &added);

    Self {
      original: original_raw,
      value,
      added,
      removed,
      reordered: kept_before != kept_after,
    }
  }
}

/// Elements of `a` left over after matching each element of `b` once.
fn multiset_difference(a: &[PathEntry], b: &[PathEntry]) -> Vec<PathEntry> {
  let mut pool: Vec<&PathEntry> = b.iter().collect();
  let mut out = Vec::new();
  for item in a {
    match pool.iter().position(|candidate| *candidate == item) {
      Some(pos) => {
        pool.swap_remove(pos);
      }
      None => out.push(item.clone()),
    }
  }
  out
}

/// `list` with one occurrence of each element of `drop` removed, order kept.
fn without<'a>(list: &'a [PathEntry], drop: &[PathEntry]) -> Vec<&'a PathEntry> {
  let mut pending: Vec<&PathEntry> = drop.iter().collect();
  list
    .iter()
    .filter(|item| match pending.iter().position(|d| d == item) {
      Some(pos) => {
        pending.swap_remove(pos);
        false
      }
      None => true,
    })
    .collect()
}

/// Scopes to write on commit, keyed by scope. A scope absent here is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
  changes: BTreeMap<Scope, ScopeChange>,
}

impl ChangeSet {
  pub(crate) fn insert(&mut self, scope: Scope, change: ScopeChange) {
    self.changes.insert(scope, change);
  }

  pub fn is_empty(&self) -> bool {
    self.changes.is_empty()
  }

  pub fn len(&self) -> usize {
    self.changes.len()
  }

  pub fn contains(&self, scope: Scope) -> bool {
    self.changes.contains_key(&scope)
  }

  pub fn get(&self, scope: Scope) -> Option<&ScopeChange> {
    self.changes.get(&scope)
  }

  /// New serialized value for `scope`, if it changed.
  pub fn value(&self, scope: Scope) -> Option<&str> {
    self.changes.get(&scope).map(|c| c.value.as_str())
  }

  pub fn scopes(&self) -> impl Iterator<Item = Scope> + '_ {
    self.changes.keys().copied()
  }

  pub fn iter(&self) -> impl Iterator<Item = (Scope, &ScopeChange)> {
    self.changes.iter().map(|(scope, change)| (*scope, change))
  }
}
