//! Configuration system for yamlnav.
//!
//! Settings are read from a TOML file and then overridden by command-line
//! flags. Every field has a default, so a partial (or missing) file is fine.
//!
//! # Example
//!
//! ```
//! use yamlnav::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.indent_size, 2);
//! assert!(config.auto_create);
//!
//! let custom = Config {
//!     indent_size: 4,
//!     strict_kinds: true,
//!     ..Config::default()
//! };
//! assert!(custom.follow_aliases);
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for yamlnav.
///
/// # Fields
///
/// * `indent_size` - Spaces per indentation level in YAML output (default: 2)
/// * `auto_create` - Create missing keys when writing (default: true)
/// * `follow_aliases` - Resolve aliases and merge keys while walking (default: true)
/// * `strict_kinds` - Refuse writes that change a node's kind (default: false)
/// * `output_json` - Print read results as JSON (default: false)
/// * `create_backup` - Create .bak files before saving in place (default: false)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Spaces per indentation level in YAML output
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Create missing keys when writing
    #[serde(default = "default_true")]
    pub auto_create: bool,

    /// Resolve aliases and merge keys while walking
    #[serde(default = "default_true")]
    pub follow_aliases: bool,

    /// Refuse writes that replace a non-null node with one of another kind
    #[serde(default)]
    pub strict_kinds: bool,

    /// Print read results as JSON
    #[serde(default)]
    pub output_json: bool,

    /// Create .bak files before saving in place
    #[serde(default)]
    pub create_backup: bool,
}

fn default_indent_size() -> usize {
    2
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_size: default_indent_size(),
            auto_create: true,
            follow_aliases: true,
            strict_kinds: false,
            output_json: false,
            create_backup: false,
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/yamlnav/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("yamlnav");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults when the
    /// file is missing or malformed.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("ignoring malformed config {}: {}", path.display(), err);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to the default config file.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }
}
