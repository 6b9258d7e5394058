//! End-to-end tests for `lai config …` against a temporary config file.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn lai(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lai"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("LAI_LOG")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_help_lists_config_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_lai"))
        .args(["config", "--help"])
        .output()
        .expect("Failed to execute command");

    let text = stdout(&output);
    for command in ["show", "set", "backup", "restore", "list-backups", "migrate"] {
        assert!(text.contains(command), "missing {command} in:\n{text}");
    }
}

#[test]
fn test_path_prints_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");

    let output = lai(&path, &["config", "path"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), path.display().to_string());
}

#[test]
fn test_show_without_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let output = lai(&path, &["config", "show"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("# AI service: not configured"));
    assert!(text.contains("defaults.line_threshold = 10"));
    assert!(text.contains("notifications.providers.telegram.enabled = false"));
    // show never creates the file
    assert!(!path.exists());
}

#[test]
fn test_set_then_get() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let output = lai(&path, &["config", "set", "defaults.language", "Japanese"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let output = lai(&path, &["config", "get", "defaults.language"]);
    assert_eq!(stdout(&output).trim(), "defaults.language = Japanese");
}

#[test]
fn test_invalid_set_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let output = lai(&path, &["config", "set", "defaults.line_threshold", "many"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error: Failed to set 'defaults.line_threshold'"));
    assert!(!path.exists());
}

#[test]
fn test_unknown_key_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let output = lai(&path, &["config", "get", "defaults.nope"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Unknown config key 'defaults.nope'"));
}

#[test]
fn test_migrate_reports_backup_for_legacy_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[defaults]\nlanguage = \"Dutch\"\n").unwrap();

    let output = lai(&path, &["config", "migrate"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Migrated config from an unversioned file"));
    assert!(text.contains("vunknown"));

    let output = lai(&path, &["config", "migrate"]);
    assert!(stdout(&output).contains("Config is up to date"));
}

#[test]
fn test_backup_list_and_restore_by_name() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let original = "version = \"0.0.1\"\n[logging]\nlevel = \"warn\"\n";
    fs::write(&path, original).unwrap();

    let output = lai(&path, &["config", "backup"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let output = lai(&path, &["config", "list-backups"]);
    let text = stdout(&output);
    assert!(text.contains("Found 1 configuration backups:"));
    let name = text
        .lines()
        .find_map(|line| line.trim().strip_prefix("1. "))
        .expect("backup line")
        .to_string();

    fs::write(&path, "version = \"0.0.1\"\n").unwrap();
    let output = lai(&path, &["config", "restore", &name]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_restore_garbage_fails_and_keeps_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let original = "version = \"0.0.1\"\n";
    fs::write(&path, original).unwrap();
    let bogus = dir.path().join("bogus.backup.toml");
    fs::write(&bogus, "<<< not a config >>>").unwrap();

    let output = lai(&path, &["config", "restore", bogus.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to restore"));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_reset_backs_up_then_writes_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "version = \"0.0.1\"\n[defaults]\nline_threshold = 77\n").unwrap();

    let output = lai(&path, &["config", "reset"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Configuration backup created"));

    let output = lai(&path, &["config", "get", "defaults.line_threshold"]);
    assert_eq!(stdout(&output).trim(), "defaults.line_threshold = 10");
}

#[test]
fn test_migrate_keep_limits_backups() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "version = \"0.0.1\"\n").unwrap();
    for stamp in ["20230101-000000", "20230102-000000"] {
        fs::write(
            dir.path().join(format!("config.v0.0.1.{stamp}.backup.toml")),
            "version = \"0.0.1\"\n",
        )
        .unwrap();
    }

    let output = lai(&path, &["config", "migrate", "--keep", "1"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let output = lai(&path, &["config", "list-backups"]);
    let text = stdout(&output);
    assert!(text.contains("Found 1 configuration backups:"), "{text}");
    assert!(!text.contains("20230101-000000"));
}

#[test]
fn test_show_reveal_prints_full_key() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    lai(&path, &["config", "set", "notifications.openai.api_key", "sk-abcdefghijkl"]);

    let masked = stdout(&lai(&path, &["config", "show"]));
    assert!(masked.contains("# AI service: configured (sk-*********jkl)"), "{masked}");
    assert!(!masked.contains("sk-abcdefghijkl"));

    let revealed = stdout(&lai(&path, &["config", "show", "--reveal"]));
    assert!(revealed.contains("# AI service: configured (sk-abcdefghijkl)"));
}
