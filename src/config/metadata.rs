//! Static registry of known config fields.
//!
//! Adding a field: add a `FieldDef` to `REGISTRY`. Keys may use `*` for a
//! single free-form segment (a provider name). Keys not in the registry are
//! still settable; they just get no extra validation.

/// Value shape of a field, used to validate `set` input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Bool,
    Duration,
    TextList,
    Secret,
}

/// UI section for grouping fields in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSection {
    General,
    Defaults,
    OpenAi,
    Providers,
    PromptTemplates,
    Logging,
    Display,
}

impl FieldSection {
    /// Display label for the section header.
    pub fn label(&self) -> &'static str {
        match self {
            Self::General => "General Settings",
            Self::Defaults => "Default Behavior",
            Self::OpenAi => "AI Service",
            Self::Providers => "Notification Providers",
            Self::PromptTemplates => "Prompt Templates",
            Self::Logging => "Logging",
            Self::Display => "Display",
        }
    }
}

/// Self-contained definition of a single field.
pub struct FieldDef {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub section: FieldSection,
    pub kind: FieldKind,
    /// Accepted values; empty means anything of the right kind.
    pub allowed: &'static [&'static str],
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const COLORS: &[&str] = &[
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white", "gray",
];

const fn field(
    key: &'static str,
    label: &'static str,
    description: &'static str,
    section: FieldSection,
    kind: FieldKind,
) -> FieldDef {
    FieldDef {
        key,
        label,
        description,
        section,
        kind,
        allowed: &[],
    }
}

static REGISTRY: &[FieldDef] = &[
    field(
        "version",
        "Version",
        "Schema version of this file, managed by migrations",
        FieldSection::General,
        FieldKind::Text,
    ),
    field(
        "defaults.line_threshold",
        "Line Threshold",
        "Number of new lines that triggers a summary",
        FieldSection::Defaults,
        FieldKind::Integer,
    ),
    field(
        "defaults.check_interval",
        "Check Interval",
        "How often the monitored source is polled (e.g. 30s, 5m)",
        FieldSection::Defaults,
        FieldKind::Duration,
    ),
    field(
        "defaults.language",
        "AI Response Language",
        "Language used by the AI when writing summaries",
        FieldSection::Defaults,
        FieldKind::Text,
    ),
    field(
        "defaults.final_summary",
        "Final Summary",
        "Send a summary when the monitored command exits",
        FieldSection::Defaults,
        FieldKind::Bool,
    ),
    field(
        "defaults.final_summary_only",
        "Final Summary Only",
        "Only send the exit summary, skip periodic ones",
        FieldSection::Defaults,
        FieldKind::Bool,
    ),
    field(
        "defaults.error_only_mode",
        "Error Only Mode",
        "Only notify when errors are detected",
        FieldSection::Defaults,
        FieldKind::Bool,
    ),
    field(
        "notifications.openai.api_key",
        "API Key",
        "Key for the summarization service",
        FieldSection::OpenAi,
        FieldKind::Secret,
    ),
    field(
        "notifications.openai.base_url",
        "Base URL",
        "Endpoint of the OpenAI-compatible API",
        FieldSection::OpenAi,
        FieldKind::Text,
    ),
    field(
        "notifications.openai.model",
        "Model",
        "Model used for summaries",
        FieldSection::OpenAi,
        FieldKind::Text,
    ),
    field(
        "notifications.providers.*.enabled",
        "Enabled",
        "Whether this provider receives notifications",
        FieldSection::Providers,
        FieldKind::Bool,
    ),
    field(
        "notifications.providers.*.provider",
        "Adapter",
        "Adapter type used for this provider",
        FieldSection::Providers,
        FieldKind::Text,
    ),
    field(
        "notifications.providers.*.config.bot_token",
        "Bot Token",
        "Bot token for the provider",
        FieldSection::Providers,
        FieldKind::Secret,
    ),
    field(
        "notifications.providers.*.config.password",
        "Password",
        "SMTP password",
        FieldSection::Providers,
        FieldKind::Secret,
    ),
    field(
        "notifications.providers.*.config.webhook_url",
        "Webhook URL",
        "Incoming webhook URL",
        FieldSection::Providers,
        FieldKind::Secret,
    ),
    field(
        "notifications.providers.*.config.smtp_port",
        "SMTP Port",
        "SMTP server port",
        FieldSection::Providers,
        FieldKind::Integer,
    ),
    field(
        "notifications.providers.*.config.to_emails",
        "Recipients",
        "Comma separated recipient addresses",
        FieldSection::Providers,
        FieldKind::TextList,
    ),
    field(
        "notifications.fallback.enabled",
        "Fallback Enabled",
        "Use the fallback provider when all others fail",
        FieldSection::Providers,
        FieldKind::Bool,
    ),
    field(
        "prompt_templates.summarize_template",
        "Summarize Template",
        "Override for the summary prompt; empty uses the built-in one",
        FieldSection::PromptTemplates,
        FieldKind::Text,
    ),
    field(
        "prompt_templates.error_analysis_template",
        "Error Analysis Template",
        "Override for the error analysis prompt; empty uses the built-in one",
        FieldSection::PromptTemplates,
        FieldKind::Text,
    ),
    FieldDef {
        allowed: LOG_LEVELS,
        ..field(
            "logging.level",
            "Log Level",
            "Minimum level of log output",
            FieldSection::Logging,
            FieldKind::Text,
        )
    },
    field(
        "display.colors.enabled",
        "Colors",
        "Colorize captured output",
        FieldSection::Display,
        FieldKind::Bool,
    ),
    FieldDef {
        allowed: COLORS,
        ..field(
            "display.colors.stdout",
            "Stdout Color",
            "Color of captured stdout lines",
            FieldSection::Display,
            FieldKind::Text,
        )
    },
    FieldDef {
        allowed: COLORS,
        ..field(
            "display.colors.stderr",
            "Stderr Color",
            "Color of captured stderr lines",
            FieldSection::Display,
            FieldKind::Text,
        )
    },
];

/// The ordered registry.
pub fn registry() -> &'static [FieldDef] {
    REGISTRY
}

/// Definition for a concrete dotted key, if any.
pub fn find(key: &str) -> Option<&'static FieldDef> {
    REGISTRY.iter().find(|def| key_matches(def.key, key))
}

/// Whether values under `key` must be masked on display.
///
/// Free-form provider settings are matched by name as well, so a custom
/// `api_token` under a provider's config is treated as secret.
pub fn is_sensitive(key: &str) -> bool {
    if find(key).is_some_and(|def| def.kind == FieldKind::Secret) {
        return true;
    }
    let last = key.rsplit('.').next().unwrap_or(key).to_ascii_lowercase();
    ["token", "password", "secret", "api_key", "webhook"]
        .iter()
        .any(|needle| last.contains(needle))
}

impl FieldDef {
    /// Validate raw user input for this field.
    pub fn validate(&self, value: &str) -> Result<(), String> {
        match self.kind {
            FieldKind::Integer => {
                value
                    .parse::<u32>()
                    .map_err(|_| "must be a non-negative integer".to_string())?;
            }
            FieldKind::Bool => {
                value
                    .parse::<bool>()
                    .map_err(|_| "must be true or false".to_string())?;
            }
            FieldKind::Duration => {
                humantime::parse_duration(value)
                    .map_err(|e| format!("must be a duration such as 30s or 5m ({e})"))?;
            }
            FieldKind::TextList => {
                if value.split(',').any(|part| part.trim().is_empty()) {
                    return Err("contains an empty list item".to_string());
                }
            }
            FieldKind::Text | FieldKind::Secret => {}
        }

        if !self.allowed.is_empty() && !self.allowed.contains(&value) {
            return Err(format!("must be one of: {}", self.allowed.join(", ")));
        }
        Ok(())
    }
}

fn key_matches(pattern: &str, key: &str) -> bool {
    let mut p = pattern.split('.');
    let mut k = key.split('.');
    loop {
        match (p.next(), k.next()) {
            (None, None) => return true,
            (Some("*"), Some(_)) => continue,
            (Some(a), Some(b)) if a == b => continue,
            _ => return false,
        }
    }
}
