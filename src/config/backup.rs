//! Timestamped snapshots of the config file.
//!
//! Snapshots live next to the config file and are named
//! `config.v<version>.<YYYYMMDD-HHMMSS>.backup.toml`. The stamp sorts
//! lexicographically in chronological order, which [`list_backups`] and
//! [`cleanup_old_backups`] rely on. Two backups taken within the same second
//! share a name; the later one wins.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::config::loader::{decode, read_file, write_file, ConfigError};

/// Version token used when the source has no string `version`.
pub const UNKNOWN_VERSION: &str = "unknown";

const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Snapshots `path` using the current local time.
pub fn backup(path: &Path) -> Result<PathBuf, ConfigError> {
    backup_at(path, Local::now().naive_local())
}

/// Snapshots `path` as of `taken_at`.
///
/// The copy is byte-identical. A source that is not valid TOML is still
/// copied, under the [`UNKNOWN_VERSION`] token.
pub fn backup_at(path: &Path, taken_at: NaiveDateTime) -> Result<PathBuf, ConfigError> {
    let bytes = read_file(path)?;
    let version = version_token(&bytes);

    let name = format!(
        "{}.v{}.{}{}",
        stem(path),
        version,
        taken_at.format(STAMP_FORMAT),
        suffix(path)
    );
    let backup_path = sibling(path, &name);
    write_file(&backup_path, &bytes)?;

    tracing::debug!(backup = %backup_path.display(), version = %version, "Config backup written");
    Ok(backup_path)
}

/// Restores `backup_path` over `path`.
///
/// The backup must decode as a full config document; otherwise the live
/// file is left untouched.
pub fn restore(backup_path: &Path, path: &Path) -> Result<(), ConfigError> {
    let bytes = read_file(backup_path)?;

    // Same decode as a load, so a restored file is always loadable.
    decode(backup_path, &bytes).map_err(|e| match e {
        ConfigError::ParseError { path, source } => ConfigError::InvalidFormat { path, source },
        other => other,
    })?;

    write_file(path, &bytes)?;
    tracing::info!(
        backup = %backup_path.display(),
        config = %path.display(),
        "Config restored from backup"
    );
    Ok(())
}

/// Backups of `path`, oldest first.
///
/// A missing config directory has no backups.
pub fn list_backups(path: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let dir = parent_dir(path);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ConfigError::ReadError { path: dir, source: e }),
    };

    let prefix = format!("{}.v", stem(path));
    let suffix = suffix(path);
    let mut backups = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::ReadError {
            path: dir.clone(),
            source: e,
        })?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if is_file && name.starts_with(&prefix) && name.ends_with(&suffix) {
            backups.push((stamp_of(&name, &suffix).to_string(), entry.path()));
        }
    }

    // The version token sits before the stamp, so order by stamp explicitly.
    backups.sort();
    Ok(backups.into_iter().map(|(_, path)| path).collect())
}

/// The `YYYYMMDD-HHMMSS` segment of a backup name.
fn stamp_of<'a>(name: &'a str, suffix: &str) -> &'a str {
    let head = name.strip_suffix(suffix).unwrap_or(name);
    head.rsplit('.').next().unwrap_or(head)
}

/// Deletes all but the `keep_count` newest backups.
///
/// A file that cannot be removed is logged and skipped.
pub fn cleanup_old_backups(path: &Path, keep_count: usize) -> Result<(), ConfigError> {
    let backups = list_backups(path)?;
    if backups.len() <= keep_count {
        return Ok(());
    }

    let excess = backups.len() - keep_count;
    for old in &backups[..excess] {
        match fs::remove_file(old) {
            Ok(()) => tracing::debug!(backup = %old.display(), "Removed old config backup"),
            Err(e) => tracing::warn!(
                backup = %old.display(),
                error = %e,
                "Failed to remove old config backup"
            ),
        }
    }
    Ok(())
}

fn version_token(bytes: &[u8]) -> String {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|content| toml::from_str::<toml::Table>(content).ok())
        .and_then(|table| match table.get("version") {
            Some(toml::Value::String(v)) if is_file_name_safe(v) => Some(v.clone()),
            _ => None,
        })
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}

/// The version lands in a file name: no separators or other surprises.
fn is_file_name_safe(version: &str) -> bool {
    !version.is_empty()
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("config")
        .to_string()
}

fn suffix(path: &Path) -> String {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    format!(".backup.{ext}")
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn sibling(path: &Path, name: &str) -> PathBuf {
    parent_dir(path).join(name)
}
