//! Load pipeline: decode, decide, back up, merge, persist, rotate.
//!
//! Backup and rotation failures are soft: they are logged, recorded on the
//! [`LoadReport`], and migration carries on. Persisting the merged document
//! is the only hard failure after decoding.

use std::path::{Path, PathBuf};

use crate::config::backup;
use crate::config::loader::{decode, read_file, ConfigError};
use crate::config::merge::merge;
use crate::config::normalize::normalize;
use crate::config::types::ConfigDocument;
use crate::config::version::needs_migration;

/// Number of backups kept after a migration.
pub const DEFAULT_KEEP_BACKUPS: usize = 5;

/// What a load did to the file on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadReport {
    /// No file existed; built-in defaults were returned and nothing was written.
    Fresh,
    /// The file was already at (or past) the current schema.
    Current { version: String },
    /// The file was upgraded and rewritten.
    Migrated(MigrationReport),
}

/// Details of a performed migration.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationReport {
    /// Version found in the file; `None` if it had no version marker.
    pub from: Option<String>,
    pub to: String,
    /// Where the pre-migration snapshot went, or why it could not be taken.
    pub backup: Result<PathBuf, String>,
    /// Set when pruning old backups failed.
    pub rotation_error: Option<String>,
}

/// Document handed to callers plus the report of how it was obtained.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub document: ConfigDocument,
    pub report: LoadReport,
}

/// Runs the load pipeline against one config file.
pub struct MigrationCoordinator {
    path: PathBuf,
    defaults: ConfigDocument,
    keep_backups: usize,
}

impl MigrationCoordinator {
    /// Coordinator targeting `path` with this build's defaults.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            defaults: ConfigDocument::default(),
            keep_backups: DEFAULT_KEEP_BACKUPS,
        }
    }

    /// Use a different target schema (tests, forced upgrades).
    pub fn with_defaults(mut self, defaults: ConfigDocument) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_keep_backups(mut self, keep: usize) -> Self {
        self.keep_backups = keep;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load, migrating if the file is behind the target schema.
    ///
    /// Decode errors return before anything is written. The returned
    /// document is normalized; the normalization itself is never persisted.
    pub fn load(&self) -> Result<LoadOutcome, ConfigError> {
        let bytes = match read_file(&self.path) {
            Ok(bytes) => bytes,
            Err(ConfigError::NotFound { .. }) => {
                tracing::debug!(config = %self.path.display(), "No config file, using defaults");
                let mut document = self.defaults.clone();
                normalize(&mut document);
                return Ok(LoadOutcome {
                    document,
                    report: LoadReport::Fresh,
                });
            }
            Err(e) => return Err(e),
        };

        let decoded = decode(&self.path, &bytes)?;
        let from = decoded.version_marker;

        let (mut document, report) = if needs_migration(from.as_deref(), &self.defaults.version) {
            let (document, report) = self.migrate(decoded.document, from)?;
            (document, LoadReport::Migrated(report))
        } else {
            let version = decoded.document.version.clone();
            (decoded.document, LoadReport::Current { version })
        };

        normalize(&mut document);
        Ok(LoadOutcome { document, report })
    }

    fn migrate(
        &self,
        existing: ConfigDocument,
        from: Option<String>,
    ) -> Result<(ConfigDocument, MigrationReport), ConfigError> {
        let to = self.defaults.version.clone();
        tracing::info!(
            config = %self.path.display(),
            from = from.as_deref().unwrap_or("<none>"),
            to = %to,
            "Migrating config"
        );

        let backup = match backup::backup(&self.path) {
            Ok(path) => {
                tracing::info!(backup = %path.display(), "Created config backup");
                Ok(path)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create config backup, migrating anyway");
                Err(e.to_string())
            }
        };

        let merged = merge(existing, &self.defaults);

        merged
            .save_to(&self.path)
            .map_err(|e| ConfigError::PersistError {
                path: self.path.clone(),
                source: Box::new(e),
            })?;

        let rotation_error = match backup::cleanup_old_backups(&self.path, self.keep_backups) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to clean up old config backups");
                Some(e.to_string())
            }
        };

        Ok((
            merged,
            MigrationReport {
                from,
                to,
                backup,
                rotation_error,
            },
        ))
    }
}
