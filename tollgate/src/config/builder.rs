//! Configuration assembly with file, environment, and programmatic
//! sources.
//!
//! Sources are merged with the following precedence (highest wins):
//!
//! 1. Programmatic overrides (via `with_config`)
//! 2. Environment variables (`TOLLGATE_*`)
//! 3. The data directory's `config.yaml`
//! 4. Built-in defaults

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::environment::EnvironmentConfig;
use super::schema::Config;

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Returns the default data directory (`~/.tollgate`).
///
/// # Errors
///
/// Returns a validation error when the home directory cannot be
/// determined.
pub fn default_data_dir() -> Result<PathBuf> {
    home::home_dir()
        .map(|home| home.join(".tollgate"))
        .ok_or_else(|| Error::Validation {
            field: "data_dir".into(),
            message: "could not determine home directory".into(),
        })
}

/// Builds a [`Config`] from files, environment, and overrides.
///
/// # Examples
///
/// Programmatic configuration for tests:
///
/// ```
/// use tollgate::config::{Config, ConfigBuilder};
///
/// let custom = Config {
///     operator: Some("operator".to_string()),
///     max_slots: Some(4),
///     ..Default::default()
/// };
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(custom)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.max_slots(), 4);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    data_dir: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Vec<Config>,
}

impl ConfigBuilder {
    /// Creates a builder with default behavior (files and environment
    /// both consulted).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the data directory to load `config.yaml` from.
    ///
    /// Without this, the default data directory is used.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = Some(data_dir.as_ref().to_path_buf());
        self
    }

    /// Skips configuration file loading.
    #[must_use]
    pub const fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Skips environment variable loading.
    #[must_use]
    pub const fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Adds a programmatic override (highest precedence; later calls win
    /// over earlier ones).
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides.push(config);
        self
    }

    /// Builds and validates the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the config file exists but cannot be read or
    /// parsed, an environment variable cannot be parsed, or the merged
    /// result fails validation.
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        if !self.skip_files {
            if let Some(file_config) = self.load_file_config()? {
                config = config.merge(file_config);
            }
        }

        if !self.skip_env {
            config = config.merge(EnvironmentConfig::load()?);
        }

        for overlay in self.overrides {
            config = config.merge(overlay);
        }

        config.validate()?;
        Ok(config)
    }

    fn load_file_config(&self) -> Result<Option<Config>> {
        let data_dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => match default_data_dir() {
                Ok(dir) => dir,
                // No home directory; behave as if no file exists.
                Err(_) => return Ok(None),
            },
        };

        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(Some(config))
    }
}
