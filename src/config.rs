//! Sorting configuration.
//!
//! This module loads the category table, the regex rules and the default
//! ignore list from a TOML configuration file. Every section is optional;
//! a missing `categories` section means the built-in table.
//!
//! # Configuration File Format
//!
//! ```toml
//! ignore = [".git", "node_modules"]
//!
//! [[categories]]
//! name = "Images"
//! extensions = [".png", ".jpg"]
//!
//! [[rules]]
//! category = "invoices"
//! pattern = '^invoice_\d+\.pdf$'
//! ```

use crate::error::SortError;
use crate::file_category::CategoryTable;
use crate::sorter::RuleSet;
use crate::traversal::IgnoreSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration parsed but describes an invalid table or rule set.
    #[error(transparent)]
    Invalid(#[from] SortError),
}

/// Sorting configuration as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Entry names skipped by every traversal.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Replacement category table. Empty means the built-in table.
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,

    /// Regex rules for `sort-regex`, in priority order.
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

/// One category of the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub name: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}

/// One regex rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub category: String,
    pub pattern: String,
}

impl Config {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.sortiumrc.toml` in the current directory
    /// 3. Look for `~/.config/sortium/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any discovered file fails to parse.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".sortiumrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sortium")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Builds the category table, or the built-in one when none is configured.
    pub fn category_table(&self) -> Result<CategoryTable, ConfigError> {
        if self.categories.is_empty() {
            return Ok(CategoryTable::default());
        }

        let table = CategoryTable::new(
            self.categories
                .iter()
                .map(|entry| (entry.name.clone(), entry.extensions.iter())),
        )?;
        Ok(table)
    }

    /// Compiles the configured regex rules.
    pub fn rule_set(&self) -> Result<RuleSet, ConfigError> {
        let rules = RuleSet::new(
            self.rules
                .iter()
                .map(|rule| (rule.category.clone(), rule.pattern.as_str())),
        )?;
        Ok(rules)
    }

    /// Ignore set built from the configured names.
    pub fn ignore_set(&self) -> IgnoreSet {
        IgnoreSet::from_names(self.ignore.iter().cloned())
    }
}
