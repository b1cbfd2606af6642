//! The three PATH scopes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the three independent PATH scopes.
///
/// Ordering follows precedence in the combined process PATH: machine entries
/// come before user entries, and the session value is derived from both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
  /// Machine-wide, persistent. Writing requires elevation.
  System,
  /// Per-user, persistent.
  User,
  /// The current process's inherited environment. Never persisted.
  Session,
}

impl Scope {
  /// All scopes in display order.
  pub const ALL: [Scope; 3] = [Scope::System, Scope::User, Scope::Session];

  pub const fn as_str(&self) -> &'static str {
    match self {
      Scope::System => "System",
      Scope::User => "User",
      Scope::Session => "Session",
    }
  }

  /// Whether writes to this scope survive the current process.
  pub const fn is_persistent(&self) -> bool {
    !matches!(self, Scope::Session)
  }

  pub(crate) const fn index(&self) -> usize {
    match self {
      Scope::System => 0,
      Scope::User => 1,
      Scope::Session => 2,
    }
  }
}

impl fmt::Display for Scope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown scope '{0}' (expected system, user or session)")]
pub struct ParseScopeError(pub String);

impl FromStr for Scope {
  type Err = ParseScopeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "system" | "machine" => Ok(Scope::System),
      "user" => Ok(Scope::User),
      "session" | "process" | "temp" | "temporary" => Ok(Scope::Session),
      _ => Err(ParseScopeError(s.to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_aliases_case_insensitively() {
    assert_eq!("SYSTEM".parse::<Scope>().unwrap(), Scope::System);
    assert_eq!("machine".parse::<Scope>().unwrap(), Scope::System);
    assert_eq!(" User ".parse::<Scope>().unwrap(), Scope::User);
    assert_eq!("Temporary".parse::<Scope>().unwrap(), Scope::Session);
    assert_eq!("process".parse::<Scope>().unwrap(), Scope::Session);
  }

  #[test]
  fn rejects_unknown_scope() {
    let err = "global".parse::<Scope>().unwrap_err();
    assert_eq!(err, ParseScopeError("global".to_string()));
  }

  #[test]
  fn only_session_is_transient() {
    assert!(Scope::System.is_persistent());
    assert!(Scope::User.is_persistent());
    assert!(!Scope::Session.is_persistent());
  }

  #[test]
  fn serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Scope::User).unwrap(), "\"user\"");
  }
}
