//! Structural merge of a user document with the built-in defaults.
//!
//! Each field kind has one policy, implemented once on the [`Merge`] trait:
//!
//! | kind | result |
//! |---|---|
//! | record | merged field by field |
//! | string | existing unless empty |
//! | integer, duration | existing unless zero |
//! | boolean | existing, always |
//! | sequence | existing unless empty |
//! | optional | existing unless absent |
//! | keyed map | existing entries untouched, missing keys copied from defaults |
//!
//! Booleans keep the existing value because an explicit `false` cannot be
//! told apart from an untouched field once serialized. A document where the
//! user picked the default value and a freshly defaulted one look the same.

use std::collections::BTreeMap;
use std::time::Duration;

use super::types::{
    ColorsConfig, ConfigDocument, DefaultsConfig, DisplayConfig, LoggingConfig,
    NotificationsConfig, OpenAiConfig, PromptTemplatesConfig,
};

/// Reconcile `self` (what the user has) with `defaults` (what this build ships).
pub trait Merge: Sized {
    fn merge(self, defaults: &Self) -> Self;
}

impl Merge for String {
    fn merge(self, defaults: &Self) -> Self {
        if self.is_empty() {
            defaults.clone()
        } else {
            self
        }
    }
}

impl Merge for u32 {
    fn merge(self, defaults: &Self) -> Self {
        if self == 0 {
            *defaults
        } else {
            self
        }
    }
}

impl Merge for Duration {
    fn merge(self, defaults: &Self) -> Self {
        if self.is_zero() {
            *defaults
        } else {
            self
        }
    }
}

impl Merge for bool {
    fn merge(self, _defaults: &Self) -> Self {
        self
    }
}

impl<T: Clone> Merge for Vec<T> {
    fn merge(self, defaults: &Self) -> Self {
        if self.is_empty() {
            defaults.clone()
        } else {
            self
        }
    }
}

impl<T: Clone> Merge for Option<T> {
    fn merge(self, defaults: &Self) -> Self {
        self.or_else(|| defaults.clone())
    }
}

/// Additive only: existing entries are never altered or deep-merged, keys
/// are never removed.
impl<V: Clone> Merge for BTreeMap<String, V> {
    fn merge(mut self, defaults: &Self) -> Self {
        for (key, value) in defaults {
            if !self.contains_key(key) {
                self.insert(key.clone(), value.clone());
            }
        }
        self
    }
}

impl Merge for ConfigDocument {
    fn merge(self, defaults: &Self) -> Self {
        Self {
            version: defaults.version.clone(),
            notifications: self.notifications.merge(&defaults.notifications),
            defaults: self.defaults.merge(&defaults.defaults),
            prompt_templates: self.prompt_templates.merge(&defaults.prompt_templates),
            logging: self.logging.merge(&defaults.logging),
            display: self.display.merge(&defaults.display),
        }
    }
}

impl Merge for NotificationsConfig {
    fn merge(self, defaults: &Self) -> Self {
        Self {
            openai: self.openai.merge(&defaults.openai),
            providers: self.providers.merge(&defaults.providers),
            fallback: self.fallback.merge(&defaults.fallback),
        }
    }
}

impl Merge for OpenAiConfig {
    fn merge(self, defaults: &Self) -> Self {
        Self {
            api_key: self.api_key.merge(&defaults.api_key),
            base_url: self.base_url.merge(&defaults.base_url),
            model: self.model.merge(&defaults.model),
        }
    }
}

impl Merge for DefaultsConfig {
    fn merge(self, defaults: &Self) -> Self {
        Self {
            line_threshold: self.line_threshold.merge(&defaults.line_threshold),
            check_interval: self.check_interval.merge(&defaults.check_interval),
            final_summary: self.final_summary.merge(&defaults.final_summary),
            final_summary_only: self.final_summary_only.merge(&defaults.final_summary_only),
            error_only_mode: self.error_only_mode.merge(&defaults.error_only_mode),
            language: self.language.merge(&defaults.language),
        }
    }
}

impl Merge for PromptTemplatesConfig {
    fn merge(self, defaults: &Self) -> Self {
        Self {
            summarize_template: self.summarize_template.merge(&defaults.summarize_template),
            error_analysis_template: self
                .error_analysis_template
                .merge(&defaults.error_analysis_template),
            custom_variables: self.custom_variables.merge(&defaults.custom_variables),
        }
    }
}

impl Merge for LoggingConfig {
    fn merge(self, defaults: &Self) -> Self {
        Self {
            level: self.level.merge(&defaults.level),
        }
    }
}

impl Merge for DisplayConfig {
    fn merge(self, defaults: &Self) -> Self {
        Self {
            colors: self.colors.merge(&defaults.colors),
        }
    }
}

impl Merge for ColorsConfig {
    fn merge(self, defaults: &Self) -> Self {
        Self {
            enabled: self.enabled.merge(&defaults.enabled),
            stdout: self.stdout.merge(&defaults.stdout),
            stderr: self.stderr.merge(&defaults.stderr),
        }
    }
}

/// Merge a decoded document against `defaults`. Pure.
pub fn merge(existing: ConfigDocument, defaults: &ConfigDocument) -> ConfigDocument {
    existing.merge(defaults)
}
