pub mod database;

pub use database::{Database, PersistedRecord, RECORD_KEY};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/pomoloop[-dev]/` based on POMOLOOP_ENV.
///
/// Set POMOLOOP_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMOLOOP_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomoloop-dev")
    } else {
        base_dir.join("pomoloop")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
