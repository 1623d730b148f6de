//! Browser configuration loaded from TOML.
//!
//! Lookup order: an explicit `--config` path, then
//! `<config dir>/manifest-browser/config.toml` if it exists, then built-in defaults.
//! Command-line flags are applied on top by the binary.

use crate::error::ConfigError;
use crate::pager::DEFAULT_PAGE_SIZE;
use crate::search::suggest::DEFAULT_LIMIT;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL (`http://` / `https://`) or local directory holding the manifests.
    pub source: String,
    /// Name of the full file list.
    pub files_manifest: String,
    /// Name of the newly added file list.
    pub new_manifest: String,
    /// Folder prepended to every entry path when building links.
    pub storage_prefix: String,
    pub page_size: usize,
    pub suggestion_limit: usize,
    /// Markers placed around highlighted text in plain output.
    pub highlight_open: String,
    pub highlight_close: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: ".".to_string(),
            files_manifest: "files.json".to_string(),
            new_manifest: "new.json".to_string(),
            storage_prefix: "db/".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            suggestion_limit: DEFAULT_LIMIT,
            highlight_open: "[".to_string(),
            highlight_close: "]".to_string(),
        }
    }
}

impl Config {
    /// Where the config file lives when no path is given.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("manifest-browser").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is used if
    /// present, otherwise defaults are returned.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => path,
                None => {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let config = Self::parse(&text, &path)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text. `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
