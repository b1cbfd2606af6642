/// Application name used for data directories and backup headers.
pub const APP_NAME: &str = "pathedit";

/// Name of the PATH-like variable edited in every scope.
#[cfg(windows)]
pub const PATH_VAR: &str = "Path";

/// Name of the PATH-like variable edited in every scope.
#[cfg(not(windows))]
pub const PATH_VAR: &str = "PATH";

/// Environment variable selecting a JSON file-backed scope store.
pub const STORE_ENV: &str = "PATHEDIT_STORE";

/// Environment variable overriding the backup directory.
pub const BACKUP_DIR_ENV: &str = "PATHEDIT_BACKUP_DIR";

/// Environment variable overriding the list separator.
pub const SEPARATOR_ENV: &str = "PATHEDIT_SEPARATOR";

/// Environment variable naming the process variable behind the Session scope.
pub const SESSION_VAR_ENV: &str = "PATHEDIT_SESSION_VAR";
