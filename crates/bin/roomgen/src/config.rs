//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `roomgen.toml` in the working directory unless another file is
//! given. Every field has a sensible default so the file is optional.
//! Environment variables take precedence over file values; command-line
//! flags are applied last by the caller.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "roomgen.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and output locations.
    pub paths: PathsConfig,
    /// Generated code settings.
    pub codegen: CodegenConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Input and output locations.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// House description, JSON or TOML.
    pub input: PathBuf,
    /// Directory receiving one folder per room.
    pub output_dir: PathBuf,
    /// Registry file name, relative to `output_dir`.
    pub registry_file: String,
}

/// Generated code settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Module the generated code imports runtime types from.
    pub runtime_module: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `path`, or from `roomgen.toml` (if present)
    /// when `path` is `None`, then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed, or if an explicitly given
    /// file cannot be read.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path, true)?,
            None => Self::from_file(Path::new(DEFAULT_CONFIG_FILE), false)?,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("ROOMGEN_INPUT") {
            self.paths.input = PathBuf::from(val);
        }
        if let Some(val) = var("ROOMGEN_OUTPUT_DIR") {
            self.paths.output_dir = PathBuf::from(val);
        }
        if let Some(val) = var("ROOMGEN_RUNTIME_MODULE") {
            self.codegen.runtime_module = val;
        }
        if let Some(val) = var("ROOMGEN_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    /// Check that every required value is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first empty value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paths.input.as_os_str().is_empty() {
            return Err(ConfigError::Validation("input path must be set".to_string()));
        }
        if self.paths.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output directory must be set".to_string(),
            ));
        }
        if self.paths.registry_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "registry file name must be set".to_string(),
            ));
        }
        if self.codegen.runtime_module.trim().is_empty() {
            return Err(ConfigError::Validation(
                "runtime module must be set".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("rooms.json"),
            output_dir: PathBuf::from("src/rooms"),
            registry_file: "RoomImportEnforcer.generated.ts".to_string(),
        }
    }
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            runtime_module: "hoffmation-base".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "roomgen=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
