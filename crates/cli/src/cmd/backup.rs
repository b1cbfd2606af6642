//! Implementation of the `pathedit backup` commands.

use std::collections::BTreeMap;
use std::time::SystemTime;

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;

use pathedit_lib::{BackupRecord, BackupWriter, Config, Scope};

use crate::output::{OutputFormat, format_age, print_info, print_json, print_scope_list, print_warning};

#[derive(Subcommand, Debug)]
pub enum BackupCommand {
  /// List backup records, newest first
  List {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Show the values captured in a backup record
  Show {
    /// Backup ID to show
    id: String,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

#[derive(Debug, Serialize)]
struct RecordOutput<'a> {
  id: &'a str,
  captured_at: String,
  values: &'a BTreeMap<Scope, String>,
  #[serde(skip_serializing_if = "no_entries")]
  unreadable: &'a BTreeMap<Scope, String>,
}

fn no_entries(map: &&BTreeMap<Scope, String>) -> bool {
  map.is_empty()
}

impl<'a> From<&'a BackupRecord> for RecordOutput<'a> {
  fn from(record: &'a BackupRecord) -> Self {
    Self {
      id: &record.id,
      captured_at: humantime::format_rfc3339_millis(record.captured_at).to_string(),
      values: &record.values,
      unreadable: &record.unreadable,
    }
  }
}

pub fn cmd_backup(command: BackupCommand) -> Result<()> {
  let config = Config::from_env().context("Invalid configuration")?;
  let backups = BackupWriter::new(config.backup_dir.clone());

  match command {
    BackupCommand::List { output } => cmd_list(&backups, output),
    BackupCommand::Show { id, output } => cmd_show(&backups, &config, &id, output),
  }
}

fn cmd_list(backups: &BackupWriter, output: OutputFormat) -> Result<()> {
  let mut records = backups.list().context("Failed to list backups")?;
  records.reverse();

  if output.is_json() {
    let items: Vec<RecordOutput> = records.iter().map(RecordOutput::from).collect();
    return print_json(&items);
  }

  if records.is_empty() {
    print_info("No backups found");
    return Ok(());
  }

  let now = SystemTime::now();
  for record in &records {
    let age = now
      .duration_since(record.captured_at)
      .map(|d| format!(" ({} ago)", format_age(d)))
      .unwrap_or_default();
    println!(
      "{} - {}{}",
      record.id,
      humantime::format_rfc3339_seconds(record.captured_at),
      age
    );
  }

  print_info(&format!("{} backup(s) in {}", records.len(), backups.dir().display()));
  Ok(())
}

fn cmd_show(backups: &BackupWriter, config: &Config, id: &str, output: OutputFormat) -> Result<()> {
  let record = backups.load(id)?;

  if output.is_json() {
    return print_json(&RecordOutput::from(&record));
  }

  print_info(&format!(
    "Backup {} captured at {}",
    record.id,
    humantime::format_rfc3339_seconds(record.captured_at)
  ));

  for (scope, error) in &record.unreadable {
    print_warning(&format!("{} was not captured: {}", scope, error));
  }

  let codec = config.codec();
  for (scope, value) in &record.values {
    println!();
    print_scope_list(*scope, &codec.decode(value));
  }

  Ok(())
}
