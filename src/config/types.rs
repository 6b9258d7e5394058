use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Schema version written by this build.
pub const SCHEMA_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Arbitrary provider-specific settings (tokens, webhook URLs, ...).
pub type ProviderSettings = BTreeMap<String, toml::Value>;

/// Root configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Schema version that produced this document.
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub prompt_templates: PromptTemplatesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// AI service credentials plus the notification provider table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub openai: OpenAiConfig,
    /// Provider entries keyed by their stable name (e.g. "telegram").
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackEntry>,
}

/// Credentials for the summarization service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub model: String,
}

/// One notification channel.
///
/// The map key the entry lives under is its identity; `provider` names the
/// adapter and may differ from the key (a "discord" entry may use the
/// "discord_webhook" adapter).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderEntry {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub config: ProviderSettings,
    /// Pre-seeded suggested values for the adapter.
    #[serde(default)]
    pub defaults: ProviderSettings,
}

/// Channel used when every enabled provider fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FallbackEntry {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub config: ProviderSettings,
}

/// Runtime behavior settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Number of new lines that triggers a summary.
    #[serde(default)]
    pub line_threshold: u32,
    /// How often the monitored source is polled.
    #[serde(default, with = "humantime_serde")]
    pub check_interval: Duration,
    #[serde(default)]
    pub final_summary: bool,
    #[serde(default)]
    pub final_summary_only: bool,
    #[serde(default)]
    pub error_only_mode: bool,
    /// Language the AI answers in.
    #[serde(default)]
    pub language: String,
}

/// Prompt overrides. Empty templates mean "use the built-in one".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplatesConfig {
    #[serde(default)]
    pub summarize_template: String,
    #[serde(default)]
    pub error_analysis_template: String,
    #[serde(default)]
    pub custom_variables: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub colors: ColorsConfig,
}

/// Colors applied to captured stdout/stderr lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
}

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub(crate) const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub(crate) const DEFAULT_LINE_THRESHOLD: u32 = 10;
pub(crate) const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(30);
pub(crate) const DEFAULT_LANGUAGE: &str = "English";
pub(crate) const DEFAULT_LOG_LEVEL: &str = "info";

fn settings<const N: usize>(pairs: [(&str, &str); N]) -> ProviderSettings {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), toml::Value::String(v.to_string())))
        .collect()
}

fn disabled_provider(adapter: &str, defaults: ProviderSettings) -> ProviderEntry {
    ProviderEntry {
        enabled: false,
        provider: adapter.to_string(),
        config: ProviderSettings::new(),
        defaults,
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        let mut providers = BTreeMap::new();
        providers.insert(
            "telegram".to_string(),
            disabled_provider("telegram", settings([("parse_mode", "markdown")])),
        );
        providers.insert(
            "email".to_string(),
            disabled_provider("smtp", settings([("subject", "Log Summary Notification")])),
        );
        providers.insert(
            "slack".to_string(),
            disabled_provider(
                "slack",
                settings([("username", "Lai Bot"), ("icon_emoji", ":robot_face:")]),
            ),
        );
        providers.insert(
            "discord".to_string(),
            disabled_provider("discord", ProviderSettings::new()),
        );
        providers.insert(
            "discord_webhook".to_string(),
            disabled_provider("discord_webhook", ProviderSettings::new()),
        );

        Self {
            openai: OpenAiConfig {
                api_key: String::new(),
                base_url: DEFAULT_BASE_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
            },
            providers,
            fallback: Some(FallbackEntry {
                enabled: false,
                provider: "email".to_string(),
                config: ProviderSettings::new(),
            }),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            line_threshold: DEFAULT_LINE_THRESHOLD,
            check_interval: DEFAULT_CHECK_INTERVAL,
            final_summary: true,
            final_summary_only: false,
            error_only_mode: false,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stdout: "gray".to_string(),
            stderr: "red".to_string(),
        }
    }
}

/// Built-in defaults. Pure: no I/O, no logging.
impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            notifications: NotificationsConfig::default(),
            defaults: DefaultsConfig::default(),
            prompt_templates: PromptTemplatesConfig::default(),
            logging: LoggingConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}
