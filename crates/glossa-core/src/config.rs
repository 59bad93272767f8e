//! Configuration management for Glossa.
//!
//! Two layers of configuration exist:
//!
//! - [`Config`]: the global `glossa.toml` in a platform-appropriate location,
//!   holding defaults such as the glossary home and index location.
//! - [`ProjectConfig`]: a `.glossa.toml` placed in a project directory, naming
//!   the glossary and language pair used when working inside that project.
//!
//! Both are TOML. Command-line options take precedence over the project file,
//! which takes precedence over the global file.

use crate::error::{GlossaError, Result};
use crate::path::{PathResolver, DEFAULT_EXTENSION};
use crate::persistence::IndexStore;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the per-project configuration.
pub const PROJECT_FILE_NAME: &str = ".glossa.toml";

/// Main configuration structure for Glossa.
///
/// ## Example Configuration File (glossa.toml)
///
/// ```toml
/// [general]
/// home = "/home/me/glossaries"
/// log_level = "info"
///
/// [index]
/// compress = true
///
/// [format]
/// extension = "yml"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Search index settings
    pub index: IndexConfig,

    /// Glossary file format settings
    pub format: FormatConfig,
}

/// General configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Glossary home directory (None = default location)
    pub home: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            home: None,
            log_level: "warn".to_string(),
        }
    }
}

/// Index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Index directory (None = `.index` inside the glossary home)
    pub path: Option<PathBuf>,

    /// Use compression for index storage
    pub compress: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            path: None,
            compress: true,
        }
    }
}

/// Glossary file format configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Extension of glossary files, without the dot
    pub extension: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default config if no config file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        info!(path = %path.display(), "Loading configuration");
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents).map_err(|e| GlossaError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
        })?;

        Ok(config)
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "glossa").ok_or_else(|| GlossaError::ConfigError {
            reason: "Could not determine config directory".to_string(),
        })?;

        Ok(dirs.config_dir().join("glossa.toml"))
    }

    /// Get the default data directory path.
    pub fn default_data_dir() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "glossa").ok_or_else(|| GlossaError::ConfigError {
            reason: "Could not determine data directory".to_string(),
        })?;

        Ok(dirs.data_dir().to_path_buf())
    }

    /// Get the glossary home (from config or default).
    pub fn glossary_home(&self) -> Result<PathBuf> {
        match &self.general.home {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::default_data_dir()?.join("glossaries")),
        }
    }

    /// Get the index directory for a glossary home.
    pub fn index_dir(&self, home: &Path) -> PathBuf {
        match &self.index.path {
            Some(path) => path.clone(),
            None => home.join(".index"),
        }
    }

    /// Path resolver for a glossary home, using the configured extension.
    pub fn resolver(&self, home: &Path) -> PathResolver {
        PathResolver::new(home).with_extension(self.format.extension.clone())
    }

    /// Index store for a glossary home, using the configured compression.
    pub fn index_store(&self, home: &Path) -> IndexStore {
        IndexStore::new(self.index_dir(home)).with_compression(self.index.compress)
    }
}

/// Per-project defaults, read from `.glossa.toml`.
///
/// ```toml
/// glossary = "spec"
/// source_language = "en"
/// target_language = "ja"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub glossary: Option<String>,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub home: Option<PathBuf>,
}

impl ProjectConfig {
    /// Find the nearest project file, starting in `start` and walking up to
    /// the filesystem root.
    ///
    /// Path-like values are made absolute relative to the directory holding
    /// the project file.
    pub fn discover(start: &Path) -> Result<Option<(PathBuf, ProjectConfig)>> {
        for dir in start.ancestors() {
            let candidate = dir.join(PROJECT_FILE_NAME);
            if candidate.is_file() {
                let config = Self::load_from(&candidate)?.resolved_against(dir);
                debug!(path = %candidate.display(), "Project file found");
                return Ok(Some((candidate, config)));
            }
        }
        Ok(None)
    }

    /// Load a project file as written, without resolving relative paths.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| GlossaError::ConfigError {
            reason: format!("Failed to parse {}: {}", path.display(), e),
        })
    }

    fn resolved_against(mut self, dir: &Path) -> Self {
        if let Some(glossary) = &self.glossary {
            let is_path = glossary.contains('/') || glossary.contains(std::path::MAIN_SEPARATOR);
            if is_path && Path::new(glossary).is_relative() {
                self.glossary = Some(dir.join(glossary).to_string_lossy().into_owned());
            }
        }
        if let Some(home) = &self.home {
            if home.is_relative() {
                self.home = Some(dir.join(home));
            }
        }
        self
    }
}
