mod backup;
mod edit;
mod info;
mod show;

use anyhow::{Context, Result};
use pathedit_lib::{Config, ScopeStore, open_store};

pub use backup::{BackupCommand, cmd_backup};
pub use edit::cmd_edit;
pub use info::cmd_info;
pub use show::cmd_show;

/// Load configuration and open the configured store.
fn open() -> Result<(Config, Box<dyn ScopeStore>)> {
  let config = Config::from_env().context("Invalid configuration")?;
  let store = open_store(&config).context("Failed to open the scope store")?;
  Ok((config, store))
}
