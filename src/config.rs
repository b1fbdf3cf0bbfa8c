//! Converter configuration
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming a YAML configuration file
pub const CONFIG_PATH_ENV: &str = "DOTGRAPH_CONFIG";
/// Environment variable overriding the input directory
pub const INPUT_DIR_ENV: &str = "DOTGRAPH_INPUT_DIR";
/// Environment variable overriding the output directory
pub const OUTPUT_DIR_ENV: &str = "DOTGRAPH_OUTPUT_DIR";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Batch conversion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Directory scanned for DOT files
    pub input_dir: PathBuf,

    /// Directory receiving snapshots
    pub output_dir: PathBuf,

    /// Suffix selecting input files
    pub input_extension: String,

    /// Suffix replacing `input_extension` in output names
    pub output_extension: String,

    /// Store unquoted numerals as Integer/Float instead of strings
    pub coerce_numerals: bool,

    /// Create the output directory (with parents) when it is absent
    pub create_output_dir: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("target/out/pdg"),
            output_dir: PathBuf::from("target/out/graphs"),
            input_extension: ".dot".to_string(),
            output_extension: ".pkl".to_string(),
            coerce_numerals: false,
            create_output_dir: true,
        }
    }
}

impl ConverterConfig {
    /// Configuration for an explicit pair of directories
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Parse YAML text; missing keys take their default
    pub fn from_yaml(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration from {:?}", path);
        Self::from_yaml(&text)
    }

    /// Defaults, then the file named by `DOTGRAPH_CONFIG`, then directory
    /// overrides from the environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same layering as [`ConverterConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_ENV) {
            Some(path) if !path.is_empty() => Self::from_file(path)?,
            _ => Self::default(),
        };

        if let Some(dir) = lookup(INPUT_DIR_ENV).filter(|v| !v.is_empty()) {
            debug!("{} overrides input_dir", INPUT_DIR_ENV);
            config.input_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|v| !v.is_empty()) {
            debug!("{} overrides output_dir", OUTPUT_DIR_ENV);
            config.output_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make output names ambiguous
    pub fn validate(&self) -> ConfigResult<()> {
        if self.input_extension.is_empty() || self.output_extension.is_empty() {
            return Err(ConfigError::Invalid(
                "file extensions must not be empty".to_string(),
            ));
        }
        if self.input_extension == self.output_extension {
            return Err(ConfigError::Invalid(format!(
                "input and output extension are both '{}'",
                self.input_extension
            )));
        }
        Ok(())
    }
}
