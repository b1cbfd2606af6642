//! Pre-commit backups of the persisted scope values.
//!
//! Every commit attempt writes one immutable, human-readable record before
//! any scope is modified. Records are never rewritten; the directory is an
//! append-only history.
//!
//! # Storage Layout
//!
//! ```text
//! {backup_dir}/
//! ├── 20261019081200123.txt
//! └── 20261019091533007.txt
//! ```

mod format;

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tracing::{info, warn};

use crate::scope::Scope;
use crate::store::{ScopeStore, StoreError};

pub use format::{HEADER, ParseError};

/// Extension of backup record files.
const RECORD_EXTENSION: &str = "txt";

/// How many suffixed ids to try when two captures share a timestamp.
const MAX_ID_ATTEMPTS: u32 = 100;

#[derive(Debug, Error)]
pub enum BackupError {
  #[error("failed to read the {scope} scope for backup: {source}")]
  ReadScope {
    scope: Scope,
    #[source]
    source: StoreError,
  },

  #[error("failed to create backup directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write backup {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read backup {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("backup {0} not found")]
  NotFound(String),

  #[error("backup {path} is corrupt: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: ParseError,
  },
}

/// A captured set of scope values. Immutable once written.
///
/// A scope that could not be read at capture time has no value; its read
/// error is kept in `unreadable` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
  pub id: String,
  pub captured_at: SystemTime,
  pub values: BTreeMap<Scope, String>,
  pub unreadable: BTreeMap<Scope, String>,
}

impl BackupRecord {
  pub fn value(&self, scope: Scope) -> Option<&str> {
    self.values.get(&scope).map(String::as_str)
  }
}

/// Writes and reads backup records in one directory.
#[derive(Debug, Clone)]
pub struct BackupWriter {
  dir: PathBuf,
}

impl BackupWriter {
  pub fn new(dir: PathBuf) -> Self {
    Self { dir }
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  fn record_path(&self, id: &str) -> PathBuf {
    self.dir.join(format!("{}.{}", id, RECORD_EXTENSION))
  }

  /// Capture the currently persisted values of every scope and write them.
  ///
  /// Reads go to the store, never to an edit session, so the record holds
  /// the state that a commit is about to replace. A scope that cannot be read
  /// is left out and noted in the record. Capture fails only when no scope
  /// can be read.
  pub fn capture<S: ScopeStore + ?Sized>(&self, store: &S) -> Result<BackupRecord, BackupError> {
    let mut values = BTreeMap::new();
    let mut unreadable = BTreeMap::new();
    let mut first_error = None;
    for scope in Scope::ALL {
      match store.read(scope) {
        Ok(value) => {
          values.insert(scope, value);
        }
        Err(source) => {
          warn!(scope = %scope, error = %source, "scope left out of backup");
          unreadable.insert(scope, source.to_string());
          first_error.get_or_insert((scope, source));
        }
      }
    }

    if values.is_empty() {
      if let Some((scope, source)) = first_error {
        return Err(BackupError::ReadScope { scope, source });
      }
    }

    let captured_at = format::now();
    let base_id = format::id_for(captured_at);

    fs::create_dir_all(&self.dir).map_err(|source| BackupError::CreateDir {
      path: self.dir.clone(),
      source,
    })?;

    for attempt in 0..MAX_ID_ATTEMPTS {
      let id = if attempt == 0 {
        base_id.clone()
      } else {
        format!("{}-{}", base_id, attempt)
      };
      let record = BackupRecord {
        id,
        captured_at,
        values: values.clone(),
        unreadable: unreadable.clone(),
      };

      match self.write_new(&record) {
        Ok(path) => {
          info!(id = %record.id, path = ?path, "backup written");
          return Ok(record);
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
        Err(source) => {
          return Err(BackupError::Write {
            path: self.record_path(&record.id),
            source,
          });
        }
      }
    }

    Err(BackupError::Write {
      path: self.record_path(&base_id),
      source: io::Error::new(io::ErrorKind::AlreadyExists, "no free backup id"),
    })
  }

  /// Create the record file, failing if it already exists.
  fn write_new(&self, record: &BackupRecord) -> io::Result<PathBuf> {
    let path = self.record_path(&record.id);
    let mut file = OpenOptions::new().write(true).create_new(true).open(&path)?;
    file.write_all(format::render(record).as_bytes())?;
    file.sync_all()?;
    Ok(path)
  }

  /// Load a record by id.
  pub fn load(&self, id: &str) -> Result<BackupRecord, BackupError> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
      return Err(BackupError::NotFound(id.to_string()));
    }
    self.load_path(&self.record_path(id)).map_err(|e| match e {
      BackupError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound => {
        BackupError::NotFound(id.to_string())
      }
      other => other,
    })
  }

  fn load_path(&self, path: &Path) -> Result<BackupRecord, BackupError> {
    let content = fs::read_to_string(path).map_err(|source| BackupError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    format::parse(&content).map_err(|source| BackupError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// List all readable records, oldest first.
  ///
  /// Corrupt files are skipped with a warning.
  pub fn list(&self) -> Result<Vec<BackupRecord>, BackupError> {
    let entries = match fs::read_dir(&self.dir) {
      Ok(entries) => entries,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
      Err(source) => {
        return Err(BackupError::Read {
          path: self.dir.clone(),
          source,
        });
      }
    };

    let mut records = Vec::new();
    for entry in entries {
      let path = entry
        .map_err(|source| BackupError::Read {
          path: self.dir.clone(),
          source,
        })?
        .path();
      if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
        continue;
      }

      match self.load_path(&path) {
        Ok(record) => records.push(record),
        Err(e) => warn!(path = ?path, error = %e, "skipping unreadable backup"),
      }
    }

    records.sort_by(|a, b| {
      a.captured_at
        .cmp(&b.captured_at)
        .then_with(|| id_sequence(&a.id).cmp(&id_sequence(&b.id)))
        .then_with(|| a.id.cmp(&b.id))
    });
    Ok(records)
  }
}

/// Collision suffix of an id (`-1`, `-2`, ...), 0 for an unsuffixed id.
fn id_sequence(id: &str) -> u32 {
  id.rsplit_once('-').and_then(|(_, n)| n.parse().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::MemoryStore;
  use tempfile::TempDir;

  fn store() -> MemoryStore {
    MemoryStore::new()
      .with_value(Scope::System, r"C:\Windows;C:\Windows\System32")
      .with_value(Scope::User, r"%USERPROFILE%\bin")
      .with_value(Scope::Session, r"C:\Windows;C:\Windows\System32;C:\Users\me\bin")
  }

  fn temp_writer() -> (TempDir, BackupWriter) {
    let temp = TempDir::new().unwrap();
    let writer = BackupWriter::new(temp.path().join("backups"));
    (temp, writer)
  }

  #[test]
  fn capture_writes_labeled_text_record() {
    let (_temp, writer) = temp_writer();
    let record = writer.capture(&store()).unwrap();

    let content = fs::read_to_string(writer.record_path(&record.id)).unwrap();
    assert!(content.starts_with(HEADER));
    assert!(content.contains("[System]\nC:\\Windows;C:\\Windows\\System32\n"));
    assert!(content.contains("[User]\n%USERPROFILE%\\bin\n"));
    assert!(content.contains("[Session]\n"));
    assert!(content.contains("captured_at: "));
  }

  #[test]
  fn capture_then_load() {
    let (_temp, writer) = temp_writer();
    let record = writer.capture(&store()).unwrap();
    let loaded = writer.load(&record.id).unwrap();

    assert_eq!(loaded.id, record.id);
    assert_eq!(loaded.values, record.values);
    assert_eq!(loaded.value(Scope::User), Some(r"%USERPROFILE%\bin"));
  }

  #[test]
  fn captures_never_overwrite() {
    let (_temp, writer) = temp_writer();
    let first = writer.capture(&store()).unwrap();
    let second = writer.capture(&store()).unwrap();
    assert_ne!(first.id, second.id);

    let list = writer.list().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, first.id);
    assert_eq!(list[1].id, second.id);
  }

  #[test]
  fn unreadable_scope_is_noted_and_others_are_kept() {
    let (_temp, writer) = temp_writer();
    let record = writer.capture(&store().deny_read(Scope::System)).unwrap();

    assert_eq!(record.value(Scope::System), None);
    assert_eq!(record.value(Scope::User), Some(r"%USERPROFILE%\bin"));
    assert!(record.unreadable[&Scope::System].contains("access denied"));

    let loaded = writer.load(&record.id).unwrap();
    assert_eq!(loaded, record);
  }

  #[test]
  fn capture_fails_when_no_scope_is_readable() {
    let (_temp, writer) = temp_writer();
    let store = store()
      .deny_read(Scope::System)
      .deny_read(Scope::User)
      .deny_read(Scope::Session);

    let err = writer.capture(&store).unwrap_err();
    assert!(matches!(err, BackupError::ReadScope { scope: Scope::System, .. }));
    assert!(writer.list().unwrap().is_empty());
  }

  #[test]
  fn list_orders_same_time_collisions_numerically() {
    let (_temp, writer) = temp_writer();
    fs::create_dir_all(writer.dir()).unwrap();
    let captured_at = format::now();
    let base = format::id_for(captured_at);
    for id in [format!("{}-10", base), format!("{}-2", base), base.clone()] {
      let record = BackupRecord {
        id,
        captured_at,
        values: BTreeMap::new(),
        unreadable: BTreeMap::new(),
      };
      writer.write_new(&record).unwrap();
    }

    let ids: Vec<String> = writer.list().unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, [base.clone(), format!("{}-2", base), format!("{}-10", base)]);
  }

  #[test]
  fn directory_that_is_a_file_fails_capture() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "x").unwrap();
    let writer = BackupWriter::new(blocker.join("backups"));

    let err = writer.capture(&store()).unwrap_err();
    assert!(matches!(err, BackupError::CreateDir { .. }));
  }

  #[test]
  fn list_empty_when_dir_missing() {
    let (_temp, writer) = temp_writer();
    assert!(writer.list().unwrap().is_empty());
  }

  #[test]
  fn list_skips_corrupt_records() {
    let (_temp, writer) = temp_writer();
    writer.capture(&store()).unwrap();
    fs::write(writer.dir().join("garbage.txt"), "not a backup").unwrap();
    fs::write(writer.dir().join("notes.md"), "ignored").unwrap();

    assert_eq!(writer.list().unwrap().len(), 1);
  }

  #[test]
  fn load_missing_and_invalid_ids() {
    let (_temp, writer) = temp_writer();
    assert!(matches!(writer.load("123"), Err(BackupError::NotFound(_))));
    assert!(matches!(writer.load("../etc/passwd"), Err(BackupError::NotFound(_))));
    assert!(matches!(writer.load(""), Err(BackupError::NotFound(_))));
  }

  #[test]
  fn load_corrupt_record_is_parse_error() {
    let (_temp, writer) = temp_writer();
    fs::create_dir_all(writer.dir()).unwrap();
    fs::write(writer.record_path("bad"), "# pathedit backup\nwhat is this\n").unwrap();
    assert!(matches!(writer.load("bad"), Err(BackupError::Parse { .. })));
  }
}
