use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pathedit_lib::Scope;

mod cmd;
mod command;
mod output;
mod prompts;

use cmd::{BackupCommand, cmd_backup, cmd_edit, cmd_info, cmd_show};
use output::OutputFormat;

/// pathedit - inspect and safely edit the System, User and Session PATH
#[derive(Parser)]
#[command(name = "pathedit")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show the entries of each PATH scope
  Show {
    /// Only show this scope (system, user or session)
    #[arg(short, long)]
    scope: Option<Scope>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Edit the PATH scopes and commit the changes
  Edit {
    /// Read commands from a file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,

    /// Commit without asking for confirmation
    #[arg(short, long)]
    force: bool,
  },

  /// Inspect pre-commit backups
  #[command(subcommand)]
  Backup(BackupCommand),

  /// Show store, backup and privilege information
  Info,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Show { scope, output } => cmd_show(scope, output),
    Commands::Edit { script, force } => cmd_edit(script.as_deref(), force),
    Commands::Backup(command) => cmd_backup(command),
    Commands::Info => cmd_info(),
  }
}
