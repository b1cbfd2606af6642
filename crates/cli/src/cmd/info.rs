//! Implementation of the `pathedit info` command.

use anyhow::Result;

use pathedit_lib::BackupWriter;
use pathedit_lib::platform::is_elevated;

use crate::output::{print_info, print_stat, print_warning};

pub fn cmd_info() -> Result<()> {
  let (config, store) = super::open()?;
  let backups = BackupWriter::new(config.backup_dir.clone());
  let backup_dir = dunce::canonicalize(backups.dir()).unwrap_or_else(|_| backups.dir().to_path_buf());

  print_info(&format!("pathedit v{}", env!("CARGO_PKG_VERSION")));
  print_stat("Store", &store.describe());
  print_stat("Backups", &backup_dir.display().to_string());
  print_stat("Separator", &config.separator.to_string());
  print_stat("Session variable", &config.session_var);
  print_stat("Elevated", if is_elevated() { "yes" } else { "no" });

  match backups.list() {
    Ok(records) => print_stat("Backup records", &records.len().to_string()),
    Err(e) => print_warning(&format!("Could not list backups: {}", e)),
  }

  Ok(())
}
