use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// File name of the configuration, relative to the project root.
pub const CONFIG_FILE_NAME: &str = "reqlock.toml";

/// Project settings for regenerating requirement files.
///
/// Every path is relative to the project root. A project without a
/// configuration file uses [`Config::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The manifest declaring dependencies and extras.
    pub manifest: PathBuf,

    /// Directory holding the five flat requirement files.
    pub requirements_dir: PathBuf,

    /// Program name of the external resolver.
    pub resolver: String,

    /// Label written into the header of every generated file.
    ///
    /// When the generator is a script this should be its path relative to the
    /// project root, so readers know what to rerun.
    pub generator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            requirements_dir: default_requirements_dir(),
            resolver: default_resolver(),
            generator: default_generator(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the configuration, falling back to the defaults if the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            result => result,
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Errors raised while loading or saving a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}", .path.display())]
    Read {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The config file is not valid TOML, or has unexpected fields.
    #[error("failed to parse config file {}", .path.display())]
    Parse {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// The config could not be serialized.
    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
    /// The config file could not be written.
    #[error("failed to write config file {}", .path.display())]
    Write {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

fn default_manifest() -> PathBuf {
    PathBuf::from("pyproject.toml")
}

fn default_requirements_dir() -> PathBuf {
    PathBuf::from("requirements")
}

fn default_resolver() -> String {
    "uv".to_string()
}

fn default_generator() -> String {
    "make-requirements".to_string()
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_manifest")]
        manifest: PathBuf,

        #[serde(default = "default_requirements_dir")]
        requirements_dir: PathBuf,

        #[serde(default = "default_resolver")]
        resolver: String,

        #[serde(default = "default_generator")]
        generator: String,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                manifest,
                requirements_dir,
                resolver,
                generator,
            } => Self {
                manifest,
                requirements_dir,
                resolver,
                generator,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        let Config {
            manifest,
            requirements_dir,
            resolver,
            generator,
        } = config;
        Self::V1 {
            manifest,
            requirements_dir,
            resolver,
            generator,
        }
    }
}
