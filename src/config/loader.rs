//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::checks::{ensure_directory, ensure_file, CheckContext, CheckError};
use crate::config::coercion::coerce;
use crate::config::configuration::Configuration;
use crate::config::parser::parse_entries;
use crate::config::schema::{ParamType, Schema};
use crate::config::validation::{RuleViolation, Validate};

pub const DEFAULT_CONFIG_FILE: &str = "/etc/failover.conf";
pub const DEFAULT_RESOURCE_DIR: &str = "/etc/drbd.d";
pub const DEFAULT_INIT_DIR: &str = "/etc/init.d";
pub const DEFAULT_PLUGIN_EXTENSION: &str = "py";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file or resource directory is missing.
    #[error(transparent)]
    Filesystem(#[from] CheckError),

    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parameter '{name}' should be a {expected}")]
    InvalidType { name: String, expected: ParamType },

    #[error("Parameter '{name}' validation failed ({violation})")]
    Validation {
        name: String,
        #[source]
        violation: RuleViolation,
    },

    #[error("Parameter '{name}' cannot be empty or unset")]
    Unset { name: String },
}

impl ConfigError {
    /// Name of the offending parameter, if the error concerns one.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            ConfigError::InvalidType { name, .. }
            | ConfigError::Validation { name, .. }
            | ConfigError::Unset { name } => Some(name),
            ConfigError::Filesystem(_) | ConfigError::Io { .. } => None,
        }
    }
}

/// Where the loader looks for its inputs.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Path of the `name = value` configuration file.
    pub config_file: PathBuf,

    /// Directory holding DRBD `*.res` files.
    pub resource_dir: PathBuf,

    /// Directory holding init scripts referenced by `services`.
    pub init_dir: PathBuf,

    /// Extension of quorum and switcher plugin files.
    pub plugin_extension: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            resource_dir: PathBuf::from(DEFAULT_RESOURCE_DIR),
            init_dir: PathBuf::from(DEFAULT_INIT_DIR),
            plugin_extension: DEFAULT_PLUGIN_EXTENSION.to_string(),
        }
    }
}

impl LoadOptions {
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = path.into();
        self
    }

    pub fn with_resource_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.resource_dir = path.into();
        self
    }

    pub fn with_init_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.init_dir = path.into();
        self
    }

    pub fn with_plugin_extension(mut self, ext: impl Into<String>) -> Self {
        self.plugin_extension = ext.into();
        self
    }
}

/// Load and validate configuration from the file named in `options`.
pub fn load_config(options: &LoadOptions) -> Result<Configuration, ConfigError> {
    ensure_file(&options.config_file)?;
    ensure_directory(&options.resource_dir)?;

    let content = read(&options.config_file)?;
    load_config_str(&content, options)
}

/// Validate configuration text. `options.config_file` is not read.
pub fn load_config_str(text: &str, options: &LoadOptions) -> Result<Configuration, ConfigError> {
    let schema = Schema::builtin();
    let mut config = schema.defaults();

    for entry in parse_entries(text, schema) {
        let Some(spec) = schema.get(&entry.name) else {
            continue;
        };

        let value = coerce(spec, &entry.raw_value)?;

        let ctx = CheckContext {
            config: &config,
            resource_dir: &options.resource_dir,
            init_dir: &options.init_dir,
            plugin_extension: &options.plugin_extension,
        };
        spec.rule
            .validate(&value, &ctx)
            .map_err(|violation| ConfigError::Validation {
                name: spec.name.to_string(),
                violation,
            })?;

        tracing::debug!(line = entry.line, name = spec.name, value = %value, "Parameter accepted");
        config.set(spec.name, value);
    }

    enforce_required(schema, &config)?;

    tracing::info!(parameters = config.len(), "Configuration loaded");
    Ok(config)
}

/// Every non-optional parameter must hold a value.
pub fn enforce_required(schema: &Schema, config: &Configuration) -> Result<(), ConfigError> {
    for spec in schema.parameters().filter(|spec| !spec.optional) {
        if config.get(spec.name).map_or(true, |value| value.is_unset()) {
            return Err(ConfigError::Unset {
                name: spec.name.to_string(),
            });
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
