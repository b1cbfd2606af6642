//! pathedit-lib: edit sessions and safe commits for PATH-like variables
//!
//! This crate provides the core of the PATH editor:
//! - `ScopeStore`: raw access to the System, User and Session values
//! - `PathListCodec`: separator-joined strings to ordered entry lists and back
//! - `EditSession`: staged, cancellable edits with change detection
//! - `BackupWriter`: append-only text backups taken before every commit
//! - `CommitCoordinator`: confirm, back up, apply per scope, report

pub mod backup;
pub mod changeset;
pub mod codec;
pub mod commit;
pub mod config;
pub mod consts;
pub mod platform;
pub mod scope;
pub mod session;
pub mod store;

pub use backup::{BackupError, BackupRecord, BackupWriter};
pub use changeset::{ChangeSet, ScopeChange};
pub use codec::{PathEntry, PathListCodec};
pub use commit::{BackupStatus, CommitCoordinator, CommitOutcome, CommitPhase, CommitReport, Confirm, ScopeResult};
pub use config::{Config, ConfigError, StoreBackend};
pub use scope::Scope;
pub use session::{EditSession, SessionError};
pub use store::{ScopeStore, StoreError, open_store};
