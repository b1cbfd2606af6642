//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output: colored status
//! messages, indexed path lists, change sets and commit reports.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};
use pathedit_lib::{BackupStatus, ChangeSet, CommitReport, PathEntry, Scope};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ADD: &str = "+";
  pub const REMOVE: &str = "-";
  pub const MODIFY: &str = "~";
}

/// Human-readable age such as `5m 12s` or `3d 4h`.
pub fn format_age(age: Duration) -> String {
  let secs = age.as_secs();

  if secs >= 86_400 {
    format!("{}d {}h", secs / 86_400, (secs % 86_400) / 3600)
  } else if secs >= 3600 {
    format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
  } else if secs >= 60 {
    format!("{}m {}s", secs / 60, secs % 60)
  } else {
    format!("{}s", secs)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Print one scope's entries with the indexes edit commands expect.
pub fn print_scope_list(scope: Scope, entries: &[PathEntry]) {
  let noun = if entries.len() == 1 { "entry" } else { "entries" };
  println!(
    "{} {}",
    scope.as_str().if_supports_color(Stream::Stdout, |s| s.bold()),
    format!("({} {})", entries.len(), noun).if_supports_color(Stream::Stdout, |s| s.dimmed())
  );
  for (index, entry) in entries.iter().enumerate() {
    println!(
      "  {} {}",
      format!("[{}]", index).if_supports_color(Stream::Stdout, |s| s.dimmed()),
      entry
    );
  }
}

pub fn print_change_set(changes: &ChangeSet) {
  for (scope, change) in changes.iter() {
    println!("{}", scope.as_str().if_supports_color(Stream::Stdout, |s| s.bold()));
    for entry in &change.removed {
      println!(
        "  {} {}",
        symbols::REMOVE.if_supports_color(Stream::Stdout, |s| s.red()),
        entry.if_supports_color(Stream::Stdout, |s| s.red())
      );
    }
    for entry in &change.added {
      println!(
        "  {} {}",
        symbols::ADD.if_supports_color(Stream::Stdout, |s| s.green()),
        entry.if_supports_color(Stream::Stdout, |s| s.green())
      );
    }
    if change.reordered {
      println!(
        "  {} {}",
        symbols::MODIFY.if_supports_color(Stream::Stdout, |s| s.yellow()),
        "order changed".if_supports_color(Stream::Stdout, |s| s.yellow())
      );
    }
  }
}

pub fn print_report(report: &CommitReport) {
  match &report.backup {
    BackupStatus::Written { id } => print_info(&format!("Backup {} written", id)),
    BackupStatus::Failed { error } => print_warning(&format!("Backup failed (commit continued): {}", error)),
  }

  for result in report.results.values() {
    if result.is_success() {
      print_success(result.message());
    } else {
      print_error(&result.to_string());
    }
  }
}
