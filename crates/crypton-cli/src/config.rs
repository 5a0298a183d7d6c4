//! Crypton CLI Configuration Management
//!
//! Configuration is layered with figment, lowest priority first:
//! - Built-in defaults
//! - `crypton.toml` in the working directory
//! - `~/.crypton/config.toml`
//! - Environment variables (`CRYPTON_*`, nested keys split on `__`,
//!   e.g. `CRYPTON_GENERATOR__MIN_INTERVAL_MS=500`)
//! - Command line overrides
//!
//! `--config FILE` replaces both file layers with that one file.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crypton_core::{ConsoleConfig, GeneratorConfig, InterpreterConfig, LogFilter, StoreConfig};

const LOCAL_CONFIG_FILE: &str = "crypton.toml";
const ENV_PREFIX: &str = "CRYPTON_";

// ----------------------------------------------------------------------------
// CLI Application Configuration
// ----------------------------------------------------------------------------

/// Complete configuration for the Crypton CLI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleAppConfig {
    /// Initial store values and limits
    pub store: StoreConfig,

    /// Synthetic event stream shape
    pub generator: GeneratorConfig,

    /// Terminal vocabulary knobs
    pub interpreter: InterpreterConfig,

    /// Presentation settings
    pub cli: CliConfig,
}

/// Presentation settings for the interactive console
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Colour terminal lines by their tag
    pub colored_output: bool,

    /// Print generated log entries as they arrive
    pub live_feed: bool,

    /// Log type shown by the live feed (`all`, `critical`, `alert`, ...)
    pub feed_filter: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            colored_output: true,
            live_feed: true,
            feed_filter: "all".to_string(),
        }
    }
}

impl CliConfig {
    pub fn feed_filter(&self) -> LogFilter {
        LogFilter::parse(&self.feed_filter).unwrap_or_default()
    }
}

/// Command line values that take precedence over every other layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub no_color: bool,
}

// ----------------------------------------------------------------------------
// Configuration Loading Logic
// ----------------------------------------------------------------------------

impl ConsoleAppConfig {
    /// Load configuration with the standard priority order
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_overrides(&ConfigOverrides::default())
    }

    /// Load configuration from a specific file path on top of defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileSystem(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let config: ConsoleAppConfig = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| {
                ConfigError::Loading(format!("Failed to load from {}: {}", path.display(), e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load every layer, then apply command line overrides
    pub fn load_with_overrides(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        match &overrides.config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileSystem(format!(
                        "Configuration file not found: {}",
                        path.display()
                    )));
                }
                debug!("Loading configuration from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => {
                figment = figment.merge(Toml::file(LOCAL_CONFIG_FILE));
                if let Some(home_config) = Self::default_config_path() {
                    figment = figment.merge(Toml::file(home_config));
                }
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(seed) = overrides.seed {
            figment = figment
                .merge(("generator.seed", seed))
                .merge(("interpreter.seed", seed));
        }
        if overrides.no_color {
            figment = figment.merge(("cli.colored_output", false));
        }

        let config: ConsoleAppConfig = figment
            .extract()
            .map_err(|e| ConfigError::Loading(format!("Failed to load configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// `~/.crypton/config.toml`, when a home directory is known
    pub fn default_config_path() -> Option<PathBuf> {
        std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()
            .map(|home| PathBuf::from(home).join(".crypton").join("config.toml"))
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.console_config()
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if LogFilter::parse(&self.cli.feed_filter).is_none() {
            return Err(ConfigError::Validation(format!(
                "Unknown feed filter: {}",
                self.cli.feed_filter
            )));
        }

        Ok(())
    }

    /// The part of the configuration the console runtime consumes
    pub fn console_config(&self) -> ConsoleConfig {
        ConsoleConfig {
            store: self.store.clone(),
            generator: self.generator.clone(),
            interpreter: self.interpreter.clone(),
        }
    }

    /// Create example configuration file content
    pub fn example_config() -> Result<String, ConfigError> {
        let example_config = ConsoleAppConfig {
            store: StoreConfig {
                log_capacity: Some(500),
                ..Default::default()
            },
            generator: GeneratorConfig {
                seed: Some(42),
                ..Default::default()
            },
            cli: CliConfig {
                feed_filter: "critical".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        toml::to_string_pretty(&example_config)
            .map_err(|e| ConfigError::Serialization(format!("Failed to serialize config: {}", e)))
    }
}

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {0}")]
    Loading(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
