//! Catalog configuration.
//!
//! The configuration file is a JSON document listing the platforms that can be
//! browsed and where their files are stored:
//!
//! ```json
//! {
//!   "download_limit": 1,
//!   "platforms": [
//!     { "name": "snes", "url": "https://host/snes/", "ext": "zip", "directory": "~/roms/snes" }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::{PathError, normalize_user_path};
use crate::ports::DestinationResolver;

/// Default number of concurrent transfers.
pub const DEFAULT_DOWNLOAD_LIMIT: usize = 1;

/// One browsable platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSettings {
    /// Platform key, used in catalog entries and persisted records.
    pub name: String,
    /// Directory-listing URL. Entry links are appended to it verbatim.
    pub url: String,
    /// File extension (without the dot) of the entries to list.
    pub ext: String,
    /// Local directory downloads are written to.
    pub directory: PathBuf,
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Maximum concurrent transfers.
    #[serde(default = "default_download_limit")]
    pub download_limit: usize,
    /// Configured platforms, in display order.
    #[serde(default)]
    pub platforms: Vec<PlatformSettings>,
}

const fn default_download_limit() -> usize {
    DEFAULT_DOWNLOAD_LIMIT
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            download_limit: DEFAULT_DOWNLOAD_LIMIT,
            platforms: Vec::new(),
        }
    }
}

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read configuration {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Configuration {path} is not valid JSON: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Download limit must be at least 1, got {0}")]
    InvalidDownloadLimit(usize),

    #[error("Platform {0} is configured more than once")]
    DuplicatePlatform(String),

    #[error("Platform {0} has an empty listing URL")]
    EmptyUrl(String),

    #[error("Platform {0} not found")]
    UnknownPlatform(String),

    #[error(transparent)]
    Path(#[from] PathError),
}

impl CatalogSettings {
    /// Read, validate and normalize a configuration file.
    ///
    /// Platform directories are made absolute (`~` expanded, relative paths
    /// joined onto the current directory).
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut settings: Self = serde_json::from_str(&raw).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        validate_settings(&settings)?;
        for platform in &mut settings.platforms {
            platform.directory = normalize_user_path(&platform.directory.to_string_lossy())?;
        }

        tracing::debug!(
            path = %path.display(),
            platforms = settings.platforms.len(),
            "Loaded catalog configuration"
        );
        Ok(settings)
    }

    /// Platform names in configuration order.
    pub fn platform_names(&self) -> Vec<String> {
        self.platforms.iter().map(|p| p.name.clone()).collect()
    }

    /// Look up a platform by name.
    pub fn platform(&self, name: &str) -> Result<&PlatformSettings, SettingsError> {
        self.platforms
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| SettingsError::UnknownPlatform(name.to_string()))
    }
}

impl DestinationResolver for CatalogSettings {
    fn resolve_destination(&self, platform: &str) -> Option<PathBuf> {
        self.platform(platform).ok().map(|p| p.directory.clone())
    }
}

/// Validate settings values.
pub fn validate_settings(settings: &CatalogSettings) -> Result<(), SettingsError> {
    if settings.download_limit == 0 {
        return Err(SettingsError::InvalidDownloadLimit(0));
    }

    let mut seen = HashSet::new();
    for platform in &settings.platforms {
        if !seen.insert(platform.name.as_str()) {
            return Err(SettingsError::DuplicatePlatform(platform.name.clone()));
        }
        if platform.url.trim().is_empty() {
            return Err(SettingsError::EmptyUrl(platform.name.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("application.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_and_resolve() {
        let temp = tempdir().unwrap();
        let path = write_config(
            temp.path(),
            r#"{
                "platforms": [
                    { "name": "snes", "url": "https://host/snes/", "ext": "zip", "directory": "/data/snes" },
                    { "name": "gba", "url": "https://host/gba/", "ext": "7z", "directory": "/data/gba" }
                ]
            }"#,
        );

        let settings = CatalogSettings::load(&path).unwrap();
        assert_eq!(settings.download_limit, DEFAULT_DOWNLOAD_LIMIT);
        assert_eq!(settings.platform_names(), vec!["snes", "gba"]);
        assert_eq!(
            settings.resolve_destination("gba"),
            Some(PathBuf::from("/data/gba"))
        );
        assert_eq!(settings.resolve_destination("n64"), None);
    }

    #[test]
    fn test_relative_directory_made_absolute() {
        let temp = tempdir().unwrap();
        let path = write_config(
            temp.path(),
            r#"{ "platforms": [ { "name": "nes", "url": "https://host/nes/", "ext": "zip", "directory": "out/nes" } ] }"#,
        );

        let settings = CatalogSettings::load(&path).unwrap();
        let dir = settings.resolve_destination("nes").unwrap();
        assert!(dir.is_absolute());
        assert!(dir.ends_with("out/nes"));
    }

    #[test]
    fn test_duplicate_platform_rejected() {
        let settings = CatalogSettings {
            download_limit: 1,
            platforms: vec![
                PlatformSettings {
                    name: "snes".into(),
                    url: "https://a/".into(),
                    ext: "zip".into(),
                    directory: PathBuf::from("/a"),
                },
                PlatformSettings {
                    name: "snes".into(),
                    url: "https://b/".into(),
                    ext: "zip".into(),
                    directory: PathBuf::from("/b"),
                },
            ],
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::DuplicatePlatform(_))
        ));
    }

    #[test]
    fn test_zero_limit_rejected() {
        let settings = CatalogSettings {
            download_limit: 0,
            platforms: Vec::new(),
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidDownloadLimit(0))
        ));
    }

    #[test]
    fn test_malformed_json() {
        let temp = tempdir().unwrap();
        let path = write_config(temp.path(), "{ not json");
        assert!(matches!(
            CatalogSettings::load(&path),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let temp = tempdir().unwrap();
        assert!(matches!(
            CatalogSettings::load(&temp.path().join("nope.json")),
            Err(SettingsError::Read { .. })
        ));
    }
}
