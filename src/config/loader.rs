use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::ConfigDocument;

/// Errors that can occur when reading, writing or migrating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Backup '{path}' is not a valid config: {source}")]
    InvalidFormat {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {source}")]
    SerializeError {
        #[source]
        source: toml::ser::Error,
    },

    #[error("Merged config could not be saved to '{path}', the file may be stale: {source}")]
    PersistError {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("Unknown config key '{key}'")]
    UnknownKey { key: String },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// A decoded file together with what the raw table said about it.
#[derive(Debug)]
pub(crate) struct Decoded {
    pub document: ConfigDocument,
    /// `None` when the file has no `version` key at all.
    pub version_marker: Option<String>,
}

impl ConfigDocument {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.lai/config.toml`. Falls back to the current directory if
    /// the home directory is unavailable.
    pub fn config_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".lai").join("config.toml")
    }

    /// Loads the default config file, migrating it if needed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`, migrating it if needed.
    ///
    /// A missing file yields the built-in defaults without touching disk.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        crate::config::migrate::MigrationCoordinator::new(path)
            .load()
            .map(|outcome| outcome.document)
    }

    /// Saves to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Serializes and overwrites `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        write_file(path, content.as_bytes())
    }

    /// Renders the document as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError { source: e })
    }
}

/// Reads a whole file, mapping a missing file to [`ConfigError::NotFound`].
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, ConfigError> {
    fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, bytes).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Decodes raw bytes into a document plus its raw version marker.
pub(crate) fn decode(path: &Path, bytes: &[u8]) -> Result<Decoded, ConfigError> {
    let content = std::str::from_utf8(bytes).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: serde::de::Error::custom(format!("file is not valid UTF-8: {e}")),
    })?;

    let parse_error = |e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    };
    let table: toml::Table = toml::from_str(content).map_err(parse_error)?;
    let document: ConfigDocument = toml::from_str(content).map_err(parse_error)?;

    let version_marker = table.contains_key("version").then(|| document.version.clone());
    Ok(Decoded {
        document,
        version_marker,
    })
}
