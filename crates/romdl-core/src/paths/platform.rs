//! Platform-specific path resolution.

use std::env;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV_VAR: &str = "ROMDL_DATA_DIR";

/// Environment variable overriding the configuration file.
pub const CONFIG_ENV_VAR: &str = "ROMDL_CONFIG";

const QUEUE_FILE_NAME: &str = "queue.json";
const DEFAULT_CONFIG_PATH: &str = "conf/application.json";

/// Get the root directory for application data.
///
/// Resolution order:
/// 1. `ROMDL_DATA_DIR` environment variable
/// 2. System data directory (e.g., `~/.local/share/romdl`)
///
/// The directory is not created here; writers ensure it exists.
pub fn data_root() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(DATA_DIR_ENV_VAR) {
        return from_override(DATA_DIR_ENV_VAR, &path);
    }

    let data_dir = dirs::data_local_dir().ok_or(PathError::NoDataDir)?;
    Ok(data_dir.join("romdl"))
}

/// Well-known location of the persisted queue file.
pub fn queue_file_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join(QUEUE_FILE_NAME))
}

/// Resolve the catalog configuration file.
///
/// An explicit path wins, then `ROMDL_CONFIG`, then `conf/application.json`
/// relative to the current directory.
pub fn config_file_path(explicit: Option<&Path>) -> Result<PathBuf, PathError> {
    if let Some(path) = explicit {
        return normalize_user_path(&path.to_string_lossy());
    }
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return from_override(CONFIG_ENV_VAR, &path);
    }
    normalize_user_path(DEFAULT_CONFIG_PATH)
}

fn from_override(var: &'static str, value: &str) -> Result<PathBuf, PathError> {
    match normalize_user_path(value) {
        Err(PathError::EmptyPath) => Err(PathError::EmptyOverride(var)),
        other => other,
    }
}

/// Normalize a user-provided path, expanding `~` and making it absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = dirs::home_dir().ok_or_else(|| PathError::NoHomeDir(trimmed.to_string()))?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        match env::current_dir() {
            Ok(cwd) => Ok(cwd.join(expanded)),
            Err(source) => Err(PathError::Relative {
                path: expanded,
                source,
            }),
        }
    }
}
