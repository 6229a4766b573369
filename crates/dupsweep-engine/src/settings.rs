//! Engine configuration and persisted user settings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use dupsweep_analyze::{SortMode, DEFAULT_HASH_BUFFER};
use dupsweep_core::DEFAULT_PAGE_SIZE;
use dupsweep_ops::DeleteMode;

/// Errors reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform has no per-user config directory.
    #[error("No config directory")]
    NoConfigDir,

    /// The file could not be read or written.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid settings TOML.
    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The settings could not be rendered as TOML.
    #[error("Cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Knobs the engine applies to every request.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct EngineConfig {
    /// Rows per page in result sessions.
    #[builder(default = "DEFAULT_PAGE_SIZE")]
    pub page_size: usize,

    /// Read buffer used while hashing.
    #[builder(default = "DEFAULT_HASH_BUFFER")]
    pub hash_buffer_size: usize,

    /// How deleted files are removed.
    #[builder(default)]
    pub delete_mode: DeleteMode,

    /// Number of threads for directory reads (0 = auto-detect).
    #[builder(default = "0")]
    pub threads: usize,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    pub include_hidden: bool,

    /// Maximum depth to descend below a root (None = unlimited).
    #[builder(default)]
    pub max_depth: Option<u32>,

    /// Files smaller than this are left out of duplicate and large file results.
    #[builder(default = "0")]
    pub min_size: u64,

    /// Maximum number of ranked large files (0 = unlimited).
    #[builder(default = "0")]
    pub limit: usize,
}

impl EngineConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.hash_buffer_size == Some(0) {
            return Err("Hash buffer size must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl EngineConfig {
    /// Create a new config builder.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            hash_buffer_size: DEFAULT_HASH_BUFFER,
            delete_mode: DeleteMode::Permanent,
            threads: 0,
            include_hidden: true,
            max_depth: None,
            min_size: 0,
            limit: 0,
        }
    }
}

/// Persistent user settings stored in the config file.
///
/// Command line flags take precedence over anything stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Rows per page.
    pub page_size: usize,
    /// Default ordering of the duplicate list.
    pub sort: SortMode,
    /// Default extension filter, comma separated.
    pub filter: String,
    /// Move files to the trash instead of unlinking them.
    pub use_trash: bool,
    /// Number of threads for directory reads (0 = auto-detect).
    pub threads: usize,
    /// Include hidden files (starting with .).
    pub include_hidden: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortMode::Path,
            filter: String::new(),
            use_trash: false,
            threads: 0,
            include_hidden: true,
        }
    }
}

impl UserSettings {
    /// Get the config file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dupsweep").join("settings.toml"))
    }

    /// Load settings from disk, or return defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(SettingsError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Self::default()
            }
            Err(err) => {
                warn!(error = %err, "ignoring settings file");
                Self::default()
            }
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save settings to the default config file.
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::config_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save settings to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_err)
    }

    /// Engine configuration derived from these settings.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            page_size: self.page_size,
            delete_mode: if self.use_trash {
                DeleteMode::Trash
            } else {
                DeleteMode::Permanent
            },
            threads: self.threads,
            include_hidden: self.include_hidden,
            ..EngineConfig::default()
        }
    }
}
