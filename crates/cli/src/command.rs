//! Line commands accepted by `pathedit edit`.

use std::str::FromStr;

use anyhow::{Context, Error, anyhow, bail};
use pathedit_lib::Scope;

pub const HELP: &str = "\
Commands:
  list [scope]                  show entries (all scopes by default)
  add <scope> <path>            append a path
  edit <scope> <index> <path>   replace the path at index
  delete <scope> <index>        remove the path at index
  up <scope> <index>            move the path one position earlier
  down <scope> <index>          move the path one position later
  revert <scope>                discard edits to a scope
  diff                          show pending changes
  commit                        confirm, back up and apply pending changes
  cancel                        leave without changing anything
  help                          show this help

Scopes: system, user, session. Indexes start at 0.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
  List(Option<Scope>),
  Add { scope: Scope, entry: String },
  Edit { scope: Scope, index: usize, entry: String },
  Delete { scope: Scope, index: usize },
  Up { scope: Scope, index: usize },
  Down { scope: Scope, index: usize },
  Revert(Scope),
  Diff,
  Commit,
  Cancel,
  Help,
}

/// Split off the first whitespace-delimited word.
fn split_word(input: &str) -> (&str, &str) {
  let input = input.trim_start();
  match input.find(char::is_whitespace) {
    Some(pos) => (&input[..pos], input[pos..].trim_start()),
    None => (input, ""),
  }
}

fn scope_arg(rest: &str) -> Result<(Scope, &str), Error> {
  let (word, rest) = split_word(rest);
  if word.is_empty() {
    bail!("missing scope");
  }
  Ok((word.parse()?, rest))
}

fn index_arg(rest: &str) -> Result<(usize, &str), Error> {
  let (word, rest) = split_word(rest);
  if word.is_empty() {
    bail!("missing index");
  }
  let index = word.parse().with_context(|| format!("invalid index '{}'", word))?;
  Ok((index, rest))
}

fn path_arg(rest: &str) -> Result<String, Error> {
  let path = rest.trim();
  if path.is_empty() {
    bail!("missing path");
  }
  Ok(path.to_string())
}

fn no_more(rest: &str) -> Result<(), Error> {
  if !rest.trim().is_empty() {
    bail!("unexpected argument '{}'", rest.trim());
  }
  Ok(())
}

impl FromStr for EditCommand {
  type Err = Error;

  fn from_str(line: &str) -> Result<Self, Self::Err> {
    let (name, rest) = split_word(line);

    let command = match name.to_ascii_lowercase().as_str() {
      "list" | "ls" => {
        let (word, extra) = split_word(rest);
        no_more(extra)?;
        EditCommand::List(if word.is_empty() { None } else { Some(word.parse()?) })
      }
      "add" => {
        let (scope, rest) = scope_arg(rest)?;
        EditCommand::Add {
          scope,
          entry: path_arg(rest)?,
        }
      }
      "edit" | "set" => {
        let (scope, rest) = scope_arg(rest)?;
        let (index, rest) = index_arg(rest)?;
        EditCommand::Edit {
          scope,
          index,
          entry: path_arg(rest)?,
        }
      }
      "delete" | "del" | "rm" => {
        let (scope, rest) = scope_arg(rest)?;
        let (index, rest) = index_arg(rest)?;
        no_more(rest)?;
        EditCommand::Delete { scope, index }
      }
      "up" => {
        let (scope, rest) = scope_arg(rest)?;
        let (index, rest) = index_arg(rest)?;
        no_more(rest)?;
        EditCommand::Up { scope, index }
      }
      "down" => {
        let (scope, rest) = scope_arg(rest)?;
        let (index, rest) = index_arg(rest)?;
        no_more(rest)?;
        EditCommand::Down { scope, index }
      }
      "revert" => {
        let (scope, rest) = scope_arg(rest)?;
        no_more(rest)?;
        EditCommand::Revert(scope)
      }
      "diff" => EditCommand::Diff,
      "commit" | "save" => EditCommand::Commit,
      "cancel" | "quit" | "exit" => EditCommand::Cancel,
      "help" | "?" => EditCommand::Help,
      "" => return Err(anyhow!("empty command")),
      other => return Err(anyhow!("unknown command '{}' (try 'help')", other)),
    };

    Ok(command)
  }
}
