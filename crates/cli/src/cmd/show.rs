//! Implementation of the `pathedit show` command.

use anyhow::{Context, Result};
use serde::Serialize;

use pathedit_lib::{EditSession, PathEntry, Scope};

use crate::output::{OutputFormat, print_json, print_scope_list};

#[derive(Debug, Serialize)]
struct ScopeListing {
  scope: Scope,
  entries: Vec<PathEntry>,
}

/// Print the decoded entries of one scope, or all three.
pub fn cmd_show(scope: Option<Scope>, output: OutputFormat) -> Result<()> {
  let (config, store) = super::open()?;
  let scopes = match scope {
    Some(scope) => vec![scope],
    None => Scope::ALL.to_vec(),
  };

  let mut session = EditSession::new(config.codec());
  for scope in &scopes {
    session
      .load(*scope, &store)
      .with_context(|| format!("Failed to load the {} scope", scope))?;
  }

  if output.is_json() {
    let listings: Vec<ScopeListing> = scopes
      .iter()
      .map(|scope| ScopeListing {
        scope: *scope,
        entries: session.entries(*scope).to_vec(),
      })
      .collect();
    return print_json(&listings);
  }

  for (i, scope) in scopes.iter().enumerate() {
    if i > 0 {
      println!();
    }
    print_scope_list(*scope, session.entries(*scope));
  }

  Ok(())
}
