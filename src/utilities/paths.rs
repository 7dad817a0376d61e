//! Path management for the agent's database file.

use std::env;
use std::path::PathBuf;

/// Default database file name inside the data directory.
pub const DEFAULT_DB_FILE: &str = "recall_agent_brain.db";

/// Returns the directory used for SQLite database storage.
///
/// `RECALL_STORAGE_DIR` wins when set. Otherwise a platform data directory:
/// - Linux: `~/.local/share/recall-agent`
/// - macOS: `~/Library/Application Support/recall-agent`
/// - Windows: `%LOCALAPPDATA%\recall-agent`
///
/// The directory is not created here; the store does that on open.
pub fn db_storage_dir() -> PathBuf {
    if let Ok(dir) = env::var("RECALL_STORAGE_DIR") {
        return PathBuf::from(dir);
    }

    let app_name = "recall-agent";
    if cfg!(target_os = "linux") {
        let home = env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        PathBuf::from(home).join(".local").join("share").join(app_name)
    } else if cfg!(target_os = "macos") {
        let home = env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        PathBuf::from(home)
            .join("Library")
            .join("Application Support")
            .join(app_name)
    } else if cfg!(target_os = "windows") {
        let local_app_data = env::var("LOCALAPPDATA")
            .unwrap_or_else(|_| env::var("APPDATA").unwrap_or_else(|_| "C:\\tmp".to_string()));
        PathBuf::from(local_app_data).join(app_name)
    } else {
        PathBuf::from("/tmp").join(app_name)
    }
}

/// Full path of the default database file.
pub fn default_db_path() -> PathBuf {
    db_storage_dir().join(DEFAULT_DB_FILE)
}
