use lai::config::{
    backup, cleanup_old_backups, list_backups, restore, ConfigDocument, ConfigError, ConfigStore,
    UNKNOWN_VERSION,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn config_in(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    path
}

/// Backups named as if taken at distinct seconds.
fn seed_backups(path: &Path, stamps: &[&str]) -> Vec<PathBuf> {
    let bytes = fs::read(path).unwrap();
    stamps
        .iter()
        .map(|stamp| {
            let backup = path.with_file_name(format!("config.v1.0.0.{stamp}.backup.toml"));
            fs::write(&backup, &bytes).unwrap();
            backup
        })
        .collect()
}

#[test]
fn test_backup_then_restore_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let original = "version = \"1.0.0\"\n\n[defaults]\nlanguage = \"Italian\"  # mine\n";
    let path = config_in(&dir, original);

    let snapshot = backup(&path).unwrap();
    assert_eq!(fs::read_to_string(&snapshot).unwrap(), original);
    assert!(snapshot
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("config.v1.0.0."));

    fs::write(&path, "version = \"1.0.0\"\n").unwrap();
    restore(&snapshot, &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_backup_without_version_uses_unknown_token() {
    let dir = TempDir::new().unwrap();
    let path = config_in(&dir, "[logging]\nlevel = \"warn\"\n");

    let snapshot = backup(&path).unwrap();
    let name = snapshot.file_name().unwrap().to_str().unwrap().to_string();
    assert!(
        name.contains(&format!(".v{UNKNOWN_VERSION}.")),
        "unexpected name {name}"
    );
    assert!(name.ends_with(".backup.toml"));
}

#[test]
fn test_restore_of_garbage_leaves_live_file_unchanged() {
    let dir = TempDir::new().unwrap();
    let original = "version = \"1.0.0\"\n[defaults]\nline_threshold = 3\n";
    let path = config_in(&dir, original);
    let bogus = dir.path().join("config.vjunk.20240101-000000.backup.toml");
    fs::write(&bogus, "Dear diary, today the logs were quiet. {{{ ::: ]]]").unwrap();

    let err = restore(&bogus, &path).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidFormat { .. }), "{err:?}");
    assert_eq!(fs::read(&path).unwrap(), original.as_bytes());
}

#[test]
fn test_restore_of_non_utf8_backup_is_rejected() {
    let dir = TempDir::new().unwrap();
    let original = "version = \"1.0.0\"\n";
    let path = config_in(&dir, original);
    let bad = dir.path().join("config.v0.3.0.20240101-000000.backup.toml");
    fs::write(&bad, b"version = \"0.3.0\"\n# caf\xff\n").unwrap();

    let err = restore(&bad, &path).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidFormat { .. }), "{err:?}");
    assert_eq!(fs::read(&path).unwrap(), original.as_bytes());
    assert!(ConfigDocument::load_from(&path).is_ok());
}

#[test]
fn test_restore_of_wrong_shape_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = config_in(&dir, "version = \"1.0.0\"\n");
    let bogus = dir.path().join("other.toml");
    fs::write(&bogus, "[defaults]\nfinal_summary = \"sometimes\"\n").unwrap();

    assert!(matches!(
        restore(&bogus, &path),
        Err(ConfigError::InvalidFormat { .. })
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), "version = \"1.0.0\"\n");
}

#[test]
fn test_restore_missing_backup_is_not_found() {
    let dir = TempDir::new().unwrap();
    let path = config_in(&dir, "version = \"1.0.0\"\n");
    let missing = dir.path().join("nope.backup.toml");

    assert!(matches!(
        restore(&missing, &path),
        Err(ConfigError::NotFound { .. })
    ));
}

#[test]
fn test_backup_of_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    assert!(matches!(backup(&path), Err(ConfigError::NotFound { .. })));
    assert!(list_backups(&path).unwrap().is_empty());
}

#[test]
fn test_cleanup_keeps_newest() {
    let dir = TempDir::new().unwrap();
    let path = config_in(&dir, "version = \"1.0.0\"\n");
    let seeded = seed_backups(
        &path,
        &["20240101-000000", "20240102-000000", "20240103-000000"],
    );

    cleanup_old_backups(&path, 2).unwrap();

    let left = list_backups(&path).unwrap();
    assert_eq!(left, seeded[1..].to_vec());
    assert!(path.exists());
}

#[test]
fn test_cleanup_below_limit_is_noop() {
    let dir = TempDir::new().unwrap();
    let path = config_in(&dir, "version = \"1.0.0\"\n");
    let seeded = seed_backups(&path, &["20240101-000000"]);

    cleanup_old_backups(&path, 3).unwrap();
    assert_eq!(list_backups(&path).unwrap(), seeded);
}

#[test]
fn test_cleanup_in_missing_directory_is_noop() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent").join("config.toml");

    cleanup_old_backups(&path, 1).unwrap();
    assert!(list_backups(&path).unwrap().is_empty());
}

#[test]
fn test_store_edits_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut store = ConfigStore::open(&path).unwrap();
    store.set("defaults.line_threshold", "50").unwrap();
    store.set("notifications.providers.slack.enabled", "true").unwrap();
    store
        .set("notifications.providers.slack.config.webhook_url", "https://hooks.example/x")
        .unwrap();
    store.save().unwrap();

    let reopened = ConfigDocument::load_from(&path).unwrap();
    assert_eq!(reopened.defaults.line_threshold, 50);
    let slack = &reopened.notifications.providers["slack"];
    assert!(slack.enabled);
    assert_eq!(
        slack.config["webhook_url"].as_str(),
        Some("https://hooks.example/x")
    );
}

#[test]
fn test_rejected_set_leaves_file_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    ConfigDocument::default().save_to(&path).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let mut store = ConfigStore::open(&path).unwrap();
    assert!(matches!(
        store.set("defaults.final_summary", "maybe"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        store.set("logging.level", "verbose"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        store.set("defaults.no_such_field", "1"),
        Err(ConfigError::UnknownKey { .. })
    ));
    assert_eq!(store.document(), &ConfigDocument::load_from(&path).unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}
