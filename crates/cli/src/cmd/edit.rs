//! Implementation of the `pathedit edit` command.
//!
//! Loads all three scopes into an edit session and reads line commands from
//! stdin (or a script file) until `commit`, `cancel` or end of input. Nothing
//! is written before a confirmed `commit`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Lines, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use pathedit_lib::{
  BackupWriter, ChangeSet, CommitCoordinator, CommitOutcome, EditSession, Scope, ScopeStore, SessionError,
};

use crate::command::{EditCommand, HELP};
use crate::output::{
  print_change_set, print_error, print_info, print_report, print_scope_list, print_success, print_warning,
};
use crate::prompts::confirm;

/// Where edit commands come from.
enum Input {
  Stdin,
  Script(Lines<BufReader<File>>),
}

impl Input {
  /// Stdin is read line by line without holding its lock, so the commit
  /// prompt can read from it too.
  fn next_line(&mut self) -> io::Result<Option<String>> {
    match self {
      Input::Stdin => {
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
          return Ok(None);
        }
        Ok(Some(line))
      }
      Input::Script(lines) => lines.next().transpose(),
    }
  }
}

/// What the loop should do after a command.
enum Flow {
  Continue,
  Done,
}

pub fn cmd_edit(script: Option<&Path>, force: bool) -> Result<()> {
  let (config, mut store) = super::open()?;
  let backups = BackupWriter::new(config.backup_dir.clone());

  let mut session = EditSession::new(config.codec());
  session.load_all(&store).context("Failed to load PATH scopes")?;

  let (mut input, interactive) = match script {
    Some(path) => {
      let file = File::open(path).with_context(|| format!("Failed to open script {}", path.display()))?;
      (Input::Script(BufReader::new(file).lines()), false)
    }
    None => (Input::Stdin, io::stdin().is_terminal()),
  };

  if interactive {
    print_lists(&session, None);
    print_info("Type 'help' for commands");
  }

  let mut line_number = 0usize;
  loop {
    if interactive {
      eprint!("pathedit> ");
      io::stderr().flush()?;
    }

    let Some(line) = input.next_line().context("Failed to read command")? else {
      print_info("End of input; nothing was changed");
      return Ok(());
    };
    line_number += 1;

    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
      continue;
    }

    let command = match line.parse::<EditCommand>() {
      Ok(command) => command,
      Err(e) if interactive => {
        print_error(&e.to_string());
        continue;
      }
      Err(e) => bail!("line {}: {}; nothing was changed", line_number, e),
    };
    debug!(line = line_number, command = ?command, "edit command");

    match run_command(command, &mut session, &mut store, &backups, force, interactive) {
      Ok(Flow::Continue) => {}
      Ok(Flow::Done) => return Ok(()),
      Err(e) if interactive && e.downcast_ref::<SessionError>().is_some() => print_error(&e.to_string()),
      Err(e) => return Err(e.context(format!("line {}", line_number))),
    }
  }
}

fn run_command(
  command: EditCommand,
  session: &mut EditSession,
  store: &mut Box<dyn ScopeStore>,
  backups: &BackupWriter,
  force: bool,
  interactive: bool,
) -> Result<Flow> {
  match command {
    EditCommand::List(scope) => print_lists(session, scope),
    EditCommand::Add { scope, entry } => {
      let index = session.add(scope, &entry)?;
      print_success(&format!("Added [{}] {} to {}", index, session.entries(scope)[index], scope));
    }
    EditCommand::Edit { scope, index, entry } => {
      session.edit(scope, index, &entry)?;
      print_success(&format!("Replaced [{}] in {}", index, scope));
    }
    EditCommand::Delete { scope, index } => {
      let removed = session.delete(scope, index)?;
      print_success(&format!("Removed {} from {}", removed, scope));
    }
    EditCommand::Up { scope, index } => {
      session.move_up(scope, index)?;
      if interactive {
        print_scope_list(scope, session.entries(scope));
      }
    }
    EditCommand::Down { scope, index } => {
      session.move_down(scope, index)?;
      if interactive {
        print_scope_list(scope, session.entries(scope));
      }
    }
    EditCommand::Revert(scope) => {
      session.revert(scope)?;
      print_success(&format!("Reverted {}", scope));
    }
    EditCommand::Diff => {
      let changes = session.change_set();
      if changes.is_empty() {
        print_info("No pending changes");
      } else {
        print_change_set(&changes);
      }
    }
    EditCommand::Commit => return commit(session, store, backups, force, interactive),
    EditCommand::Cancel => {
      print_info("Cancelled; nothing was changed");
      return Ok(Flow::Done);
    }
    EditCommand::Help => println!("{}", HELP),
  }

  Ok(Flow::Continue)
}

fn commit(
  session: &EditSession,
  store: &mut Box<dyn ScopeStore>,
  backups: &BackupWriter,
  force: bool,
  interactive: bool,
) -> Result<Flow> {
  let mut ask = |changes: &ChangeSet| {
    print_change_set(changes);
    match confirm("Apply these changes?", force) {
      Ok(accepted) => accepted,
      Err(e) => {
        print_error(&e.to_string());
        false
      }
    }
  };

  match CommitCoordinator::new(store.as_mut(), backups).run(session, &mut ask) {
    CommitOutcome::NoChanges => {
      print_info("No changes to commit");
      Ok(Flow::Done)
    }
    CommitOutcome::Aborted if interactive => {
      print_warning("Commit cancelled; keep editing or type 'cancel'");
      Ok(Flow::Continue)
    }
    CommitOutcome::Aborted => bail!("commit was not confirmed; nothing was changed"),
    CommitOutcome::Committed(report) => {
      print_report(&report);
      let failed = report.failures().count();
      if failed > 0 {
        bail!("{} of {} scope(s) failed to update", failed, report.results.len());
      }
      Ok(Flow::Done)
    }
  }
}

fn print_lists(session: &EditSession, scope: Option<Scope>) {
  match scope {
    Some(scope) => print_scope_list(scope, session.entries(scope)),
    None => {
      for (i, scope) in Scope::ALL.iter().enumerate() {
        if i > 0 {
          println!();
        }
        print_scope_list(*scope, session.entries(*scope));
      }
    }
  }
}
