pub mod backup;
pub mod credentials;
pub mod keys;
pub mod loader;
pub mod merge;
pub mod metadata;
pub mod migrate;
pub mod normalize;
pub mod store;
pub mod types;
pub mod version;

pub use backup::{backup, cleanup_old_backups, list_backups, restore, UNKNOWN_VERSION};
pub use credentials::{mask, CredentialStatus, SecureString};
pub use loader::ConfigError;
pub use merge::{merge, Merge};
pub use migrate::{
    LoadOutcome, LoadReport, MigrationCoordinator, MigrationReport, DEFAULT_KEEP_BACKUPS,
};
pub use normalize::normalize;
pub use store::ConfigStore;
pub use types::{
    ColorsConfig, ConfigDocument, DefaultsConfig, DisplayConfig, FallbackEntry, LoggingConfig,
    NotificationsConfig, OpenAiConfig, PromptTemplatesConfig, ProviderEntry, ProviderSettings,
    SCHEMA_VERSION,
};
pub use version::{compare as compare_versions, needs_migration, DEV_VERSION};
