//! Library state configuration.
//!
//! Configuration can be loaded from:
//! - a TOML file (default: ~/.config/cohort/library.toml, `[library]` table)
//! - environment variables (`COHORT_*` prefixed)
//!
//! # Example
//!
//! ```rust,no_run
//! use cohort_state::config::LibraryConfig;
//!
//! // Load from default path or fall back to env vars
//! let config = LibraryConfig::load().expect("Failed to load config");
//!
//! // Or from environment variables only
//! let config = LibraryConfig::from_env();
//! ```

use std::env;
use std::path::{Path, PathBuf};

use cohort_core::defaults;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for cohort_core::Error {
    fn from(e: ConfigError) -> Self {
        cohort_core::Error::Config(e.to_string())
    }
}

/// Capacities and locale for the library view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Locale used to pick the seed interest tags.
    pub locale: String,
    /// Visited tags kept before the oldest is evicted.
    pub max_visited_tags: usize,
    /// Recently viewed ids kept before the oldest is evicted.
    pub max_recently_viewed: usize,
    /// Items shown by the recommendation widget.
    pub recommendation_limit: usize,
    /// Directory for the file-backed store; in-memory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            locale: defaults::LOCALE.to_string(),
            max_visited_tags: defaults::MAX_VISITED_TAGS,
            max_recently_viewed: defaults::MAX_RECENTLY_VIEWED,
            recommendation_limit: defaults::RECOMMENDATION_LIMIT,
            storage_dir: None,
        }
    }
}

impl LibraryConfig {
    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        path.push("cohort");
        path.push("library.toml");
        path
    }

    /// Load configuration from the default path, falling back to environment variables.
    pub fn load() -> ConfigResult<Self> {
        let path = Self::default_config_path();

        if path.exists() {
            info!("Loading library config from: {}", path.display());
            Self::from_file(&path)
        } else {
            debug!(
                "Config file not found at {}, using environment variables",
                path.display()
            );
            let config = Self::from_env();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text with a `[library]` table.
    ///
    /// Missing keys (or a missing table) take their defaults.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        #[derive(Deserialize)]
        struct TomlRoot {
            #[serde(default)]
            library: LibraryConfig,
        }

        let root: TomlRoot = toml::from_str(content)?;
        root.library.validate()?;
        Ok(root.library)
    }

    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unparseable numbers fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let number = |key: &str, fallback: usize| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(fallback)
        };

        Self {
            locale: lookup("COHORT_LOCALE").unwrap_or(default.locale),
            max_visited_tags: number("COHORT_MAX_VISITED_TAGS", default.max_visited_tags),
            max_recently_viewed: number("COHORT_MAX_RECENTLY_VIEWED", default.max_recently_viewed),
            recommendation_limit: number(
                "COHORT_RECOMMENDATION_LIMIT",
                default.recommendation_limit,
            ),
            storage_dir: lookup("COHORT_STORAGE_DIR").map(PathBuf::from),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.locale.trim().is_empty() {
            return Err(ConfigError::Validation(
                "locale cannot be empty".to_string(),
            ));
        }
        if self.max_visited_tags == 0 {
            return Err(ConfigError::Validation(
                "max_visited_tags must be at least 1".to_string(),
            ));
        }
        if self.max_recently_viewed == 0 {
            return Err(ConfigError::Validation(
                "max_recently_viewed must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Seed interest tags for the configured locale.
    pub fn seed_tags(&self) -> Vec<String> {
        defaults::seed_tags(&self.locale)
            .iter()
            .take(self.max_visited_tags)
            .map(|t| t.to_string())
            .collect()
    }
}
