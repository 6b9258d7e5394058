//! Editable config bound to its file.
//!
//! Opening goes through the migration pipeline; edits stay in memory until
//! [`ConfigStore::save`]. Single writer: nothing here locks the file.

use std::path::{Path, PathBuf};

use crate::config::keys;
use crate::config::loader::ConfigError;
use crate::config::migrate::{LoadReport, MigrationCoordinator};
use crate::config::types::ConfigDocument;

pub struct ConfigStore {
    document: ConfigDocument,
    path: PathBuf,
    report: LoadReport,
}

impl ConfigStore {
    /// Load `path` (migrating if needed) and keep it for editing.
    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        let outcome = MigrationCoordinator::new(path).load()?;
        Ok(Self {
            document: outcome.document,
            path: path.to_path_buf(),
            report: outcome.report,
        })
    }

    /// Wrap an already loaded document.
    pub fn new(document: ConfigDocument, path: PathBuf) -> Self {
        Self {
            document,
            path,
            report: LoadReport::Fresh,
        }
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// How the document was obtained when the store was opened or reloaded.
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Result<toml::Value, ConfigError> {
        keys::get(&self.document, key)
    }

    /// Set a key in memory. On error the document is unchanged.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        keys::set(&mut self.document, key, raw)
    }

    pub fn unset(&mut self, key: &str) -> Result<(), ConfigError> {
        keys::unset(&mut self.document, key)
    }

    /// Replace the document with the built-in defaults (in memory).
    pub fn reset(&mut self) {
        self.document = ConfigDocument::default();
    }

    /// Write the current document to the file.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.document.save_to(&self.path)
    }

    /// Reload from the file.
    ///
    /// On success, replaces the current document.
    /// On failure, keeps the old one and returns the error.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        let outcome = MigrationCoordinator::new(&self.path).load()?;
        self.document = outcome.document;
        self.report = outcome.report;
        Ok(())
    }
}
