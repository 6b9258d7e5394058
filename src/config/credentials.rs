//! Secret handling for values read from the config.
//!
//! Secrets are stored in plain text; this module only keeps them out of
//! logs and terminal listings.

use super::types::OpenAiConfig;

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when needed for API calls.
#[derive(Clone)]
pub struct SecureString(String);

impl SecureString {
    /// Create a new secure string.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Expose the inner value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString({})", mask(&self.0))
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&mask(&self.0))
    }
}

/// Status of the AI service credential.
#[derive(Debug, Clone)]
pub enum CredentialStatus {
    Configured(SecureString),
    Unconfigured {
        /// Reason for missing configuration.
        reason: String,
    },
}

impl OpenAiConfig {
    /// Resolve the API key. Called on demand, never cached.
    pub fn credential(&self) -> CredentialStatus {
        let key = self.api_key.trim();
        if key.is_empty() {
            return CredentialStatus::Unconfigured {
                reason: "notifications.openai.api_key is not set".to_string(),
            };
        }
        CredentialStatus::Configured(SecureString::new(key.to_string()))
    }
}

/// Mask a secret for display.
///
/// Short values are fully starred; longer ones keep three characters at
/// each end so the user can tell keys apart.
pub fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    format!("{head}{}{tail}", "*".repeat(chars.len() - 6))
}
