//! `lai config …` command line.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::metadata::{self, FieldSection};
use crate::config::{
    self, keys, mask, ConfigDocument, ConfigStore, CredentialStatus, LoadReport,
    MigrationCoordinator, MigrationReport, DEFAULT_KEEP_BACKUPS,
};

#[derive(Debug, Parser)]
#[command(name = "lai", version, about = "Log monitoring with AI summaries")]
pub struct Cli {
    /// Config file to use instead of ~/.lai/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (overrides logging.level from the config)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the global configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,
    /// Show every configuration value
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
        /// Do not mask secrets
        #[arg(long)]
        reveal: bool,
    },
    /// Get one configuration value
    Get {
        key: String,
        /// Do not mask secrets
        #[arg(long)]
        reveal: bool,
    },
    /// Set a configuration value
    Set { key: String, value: String },
    /// Remove a configuration value or provider entry
    Unset { key: String },
    /// Reset the configuration to defaults (a backup is taken first)
    Reset,
    /// Create a backup of the current configuration
    Backup,
    /// Restore the configuration from a backup
    Restore {
        /// Backup path, or a file name from `list-backups`
        backup: PathBuf,
    },
    /// List configuration backups, oldest first
    ListBackups,
    /// Delete old backups
    Cleanup {
        /// Number of newest backups to keep
        #[arg(long, default_value_t = DEFAULT_KEEP_BACKUPS)]
        keep: usize,
    },
    /// Load the configuration, migrating it if it is outdated
    Migrate {
        /// Number of newest backups to keep after migrating
        #[arg(long, default_value_t = DEFAULT_KEEP_BACKUPS)]
        keep: usize,
    },
    /// Describe the known configuration fields
    Fields,
}

impl Cli {
    /// Config file this invocation works on.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(ConfigDocument::config_path)
    }
}

/// Log level to start with: CLI flag, else the file's `logging.level`.
///
/// Reads the raw file without migrating so logging is up before the load
/// pipeline runs.
pub fn initial_log_level(cli: &Cli) -> String {
    if let Some(level) = &cli.log_level {
        return level.clone();
    }
    std::fs::read_to_string(cli.config_path())
        .ok()
        .and_then(|content| toml::from_str::<toml::Table>(&content).ok())
        .and_then(|table| {
            table
                .get("logging")?
                .get("level")?
                .as_str()
                .map(str::to_string)
        })
        .filter(|level| !level.is_empty())
        .unwrap_or_else(|| "info".to_string())
}

/// Execute `cli`, writing user-facing output to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let path = cli.config_path();
    match &cli.command {
        Command::Config(cmd) => run_config(cmd, &path, out),
    }
}

fn run_config(cmd: &ConfigCommand, path: &Path, out: &mut impl Write) -> Result<()> {
    match cmd {
        ConfigCommand::Path => {
            writeln!(out, "{}", path.display())?;
        }
        ConfigCommand::Show { json, reveal } => {
            let store = open(path)?;
            if *json {
                show_json(store.document(), *reveal, out)?;
            } else {
                show(store.document(), *reveal, out)?;
            }
        }
        ConfigCommand::Get { key, reveal } => {
            let store = open(path)?;
            let value = store.get(key)?;
            writeln!(out, "{} = {}", key, render(key, &value, *reveal))?;
        }
        ConfigCommand::Set { key, value } => {
            let mut store = open(path)?;
            store
                .set(key, value)
                .with_context(|| format!("Failed to set '{}'", key))?;
            store.save().context("Failed to save config")?;
            let stored = store.get(key)?;
            writeln!(out, "Set {} = {}", key, render(key, &stored, false))?;
        }
        ConfigCommand::Unset { key } => {
            let mut store = open(path)?;
            store
                .unset(key)
                .with_context(|| format!("Failed to unset '{}'", key))?;
            store.save().context("Failed to save config")?;
            writeln!(out, "Removed {}", key)?;
        }
        ConfigCommand::Reset => {
            if path.exists() {
                let backup = config::backup(path).context("Failed to back up config")?;
                writeln!(out, "Configuration backup created: {}", backup.display())?;
            }
            // Not opened through the loader, so a corrupt file can still be reset.
            ConfigStore::new(ConfigDocument::default(), path.to_path_buf())
                .save()
                .context("Failed to save default config")?;
            writeln!(out, "Configuration reset to defaults")?;
        }
        ConfigCommand::Backup => {
            let backup = config::backup(path).context("Error creating backup")?;
            writeln!(out, "Configuration backup created: {}", backup.display())?;
        }
        ConfigCommand::Restore { backup } => {
            let backup = resolve_backup(backup, path);
            config::restore(&backup, path)
                .with_context(|| format!("Failed to restore from '{}'", backup.display()))?;
            writeln!(out, "Configuration restored from: {}", backup.display())?;
        }
        ConfigCommand::ListBackups => {
            let backups = config::list_backups(path).context("Error listing backups")?;
            if backups.is_empty() {
                writeln!(out, "No configuration backups found")?;
            } else {
                writeln!(out, "Found {} configuration backups:", backups.len())?;
                for (i, backup) in backups.iter().enumerate() {
                    let name = backup.file_name().unwrap_or(backup.as_os_str());
                    writeln!(out, "{:2}. {}", i + 1, name.to_string_lossy())?;
                }
            }
        }
        ConfigCommand::Cleanup { keep } => {
            let before = config::list_backups(path)?.len();
            config::cleanup_old_backups(path, *keep)?;
            let after = config::list_backups(path)?.len();
            writeln!(
                out,
                "Removed {} backups, {} kept",
                before.saturating_sub(after),
                after
            )?;
        }
        ConfigCommand::Migrate { keep } => {
            let coordinator = MigrationCoordinator::new(path).with_keep_backups(*keep);
            let outcome = coordinator.load().with_context(|| {
                format!("Failed to load config '{}'", coordinator.path().display())
            })?;
            describe_report(&outcome.report, out)?;
        }
        ConfigCommand::Fields => fields(out)?,
    }
    Ok(())
}

fn open(path: &Path) -> Result<ConfigStore> {
    ConfigStore::open(path).with_context(|| format!("Failed to load config '{}'", path.display()))
}

/// Bare backup names are looked up next to the config file.
fn resolve_backup(backup: &Path, config_path: &Path) -> PathBuf {
    if backup.exists() || backup.components().count() > 1 {
        return backup.to_path_buf();
    }
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(backup),
        _ => backup.to_path_buf(),
    }
}

fn render(key: &str, value: &toml::Value, reveal: bool) -> String {
    let text = keys::display_value(value);
    if !reveal && metadata::is_sensitive(key) {
        if let toml::Value::String(s) = value {
            return mask(s);
        }
    }
    text
}

fn show(doc: &ConfigDocument, reveal: bool, out: &mut impl Write) -> Result<()> {
    match doc.notifications.openai.credential() {
        CredentialStatus::Configured(key) if reveal => {
            writeln!(out, "# AI service: configured ({})", key.expose())?
        }
        CredentialStatus::Configured(key) => writeln!(out, "# AI service: configured ({})", key)?,
        CredentialStatus::Unconfigured { reason } => {
            writeln!(out, "# AI service: not configured ({})", reason)?
        }
    }
    for (key, value) in keys::flatten(doc)? {
        writeln!(out, "{} = {}", key, render(&key, &value, reveal))?;
    }
    Ok(())
}

fn show_json(doc: &ConfigDocument, reveal: bool, out: &mut impl Write) -> Result<()> {
    let mut value = serde_json::to_value(doc).context("Failed to encode config as JSON")?;
    if !reveal {
        mask_json("", &mut value);
    }
    writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    Ok(())
}

fn mask_json(prefix: &str, value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (name, child) in map.iter_mut() {
                let key = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                mask_json(&key, child);
            }
        }
        serde_json::Value::String(s) if metadata::is_sensitive(prefix) => *s = mask(s),
        _ => {}
    }
}

fn describe_report(report: &LoadReport, out: &mut impl Write) -> Result<()> {
    match report {
        LoadReport::Fresh => writeln!(out, "No config file yet; defaults are in effect")?,
        LoadReport::Current { version } => {
            writeln!(out, "Config is up to date (version {})", version)?
        }
        LoadReport::Migrated(MigrationReport {
            from,
            to,
            backup,
            rotation_error,
        }) => {
            writeln!(
                out,
                "Migrated config from {} to {}",
                from.as_deref().unwrap_or("an unversioned file"),
                to
            )?;
            match backup {
                Ok(path) => writeln!(out, "Backup: {}", path.display())?,
                Err(reason) => writeln!(out, "Warning: no backup taken: {}", reason)?,
            }
            if let Some(reason) = rotation_error {
                writeln!(out, "Warning: old backups not cleaned up: {}", reason)?;
            }
        }
    }
    Ok(())
}

fn fields(out: &mut impl Write) -> Result<()> {
    let mut section: Option<FieldSection> = None;
    for def in metadata::registry() {
        if section != Some(def.section) {
            writeln!(out, "\n[{}]", def.section.label())?;
            section = Some(def.section);
        }
        writeln!(out, "  {:<48} {}", def.key, def.label)?;
        writeln!(out, "  {:<48} {}", "", def.description)?;
        if !def.allowed.is_empty() {
            writeln!(out, "  {:<48} one of: {}", "", def.allowed.join(", "))?;
        }
    }
    Ok(())
}
