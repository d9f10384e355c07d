//! Configuration resolved from the environment
//!
//! Credentials are read once at startup. A missing value is recorded as
//! absent and surfaced in the console status panel; it never stops the
//! process from starting.

use std::collections::BTreeSet;
use std::fmt;

pub const DEFAULT_APP_NAME: &str = "ChatGPT Twilio Integration";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TWILIO_BASE_URL: &str = "https://api.twilio.com/2010-04-01";

/// A required credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigKey {
    CompletionApiKey,
    MessagingAccountId,
    MessagingAuthToken,
    MessagingFromNumber,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::CompletionApiKey,
        ConfigKey::MessagingAccountId,
        ConfigKey::MessagingAuthToken,
        ConfigKey::MessagingFromNumber,
    ];

    pub fn env_var(self) -> &'static str {
        match self {
            ConfigKey::CompletionApiKey => "OPENAI_API_KEY",
            ConfigKey::MessagingAccountId => "TWILIO_ACCOUNT_SID",
            ConfigKey::MessagingAuthToken => "TWILIO_AUTH_TOKEN",
            ConfigKey::MessagingFromNumber => "TWILIO_PHONE_NUMBER",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ConfigKey::CompletionApiKey => "OpenAI API Key",
            ConfigKey::MessagingAccountId => "Twilio Account SID",
            ConfigKey::MessagingAuthToken => "Twilio Auth Token",
            ConfigKey::MessagingFromNumber => "Twilio Phone Number",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ConfigKey::CompletionApiKey => "Required for ChatGPT integration",
            ConfigKey::MessagingAccountId | ConfigKey::MessagingAuthToken => {
                "Required for SMS functionality"
            }
            ConfigKey::MessagingFromNumber => "Your Twilio phone number",
        }
    }
}

/// Provider credentials. Empty values are treated as absent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub completion_api_key: Option<String>,
    pub messaging_account_id: Option<String>,
    pub messaging_auth_token: Option<String>,
    pub messaging_from_number: Option<String>,
}

impl Credentials {
    pub fn resolve() -> Self {
        Self::resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve every key through `lookup`, called once per key.
    pub fn resolve_with(mut lookup: impl FnMut(&str) -> Option<String>) -> Self {
        let mut read = |key: ConfigKey| lookup(key.env_var()).filter(|v| !v.is_empty());
        Self {
            completion_api_key: read(ConfigKey::CompletionApiKey),
            messaging_account_id: read(ConfigKey::MessagingAccountId),
            messaging_auth_token: read(ConfigKey::MessagingAuthToken),
            messaging_from_number: read(ConfigKey::MessagingFromNumber),
        }
    }

    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        let value = match key {
            ConfigKey::CompletionApiKey => &self.completion_api_key,
            ConfigKey::MessagingAccountId => &self.messaging_account_id,
            ConfigKey::MessagingAuthToken => &self.messaging_auth_token,
            ConfigKey::MessagingFromNumber => &self.messaging_from_number,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    pub fn is_present(&self, key: ConfigKey) -> bool {
        self.get(key).is_some()
    }

    pub fn is_complete(&self) -> bool {
        ConfigKey::ALL.iter().all(|key| self.is_present(*key))
    }

    /// Environment variable names of the absent credentials
    pub fn missing_keys(&self) -> BTreeSet<&'static str> {
        ConfigKey::ALL
            .iter()
            .filter(|key| !self.is_present(**key))
            .map(|key| key.env_var())
            .collect()
    }

    pub fn configured_count(&self) -> usize {
        ConfigKey::ALL.iter().filter(|key| self.is_present(**key)).count()
    }

    pub fn completion_configured(&self) -> bool {
        self.is_present(ConfigKey::CompletionApiKey)
    }

    pub fn messaging_configured(&self) -> bool {
        self.is_present(ConfigKey::MessagingAccountId)
            && self.is_present(ConfigKey::MessagingAuthToken)
            && self.is_present(ConfigKey::MessagingFromNumber)
    }

    /// One entry per key, in display order
    pub fn status(&self) -> Vec<(ConfigKey, bool)> {
        ConfigKey::ALL
            .iter()
            .map(|key| (*key, self.is_present(*key)))
            .collect()
    }
}

// Secrets never reach logs or panics through Debug.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = |key: ConfigKey| if self.is_present(key) { "<set>" } else { "<missing>" };
        f.debug_struct("Credentials")
            .field("completion_api_key", &mark(ConfigKey::CompletionApiKey))
            .field("messaging_account_id", &mark(ConfigKey::MessagingAccountId))
            .field("messaging_auth_token", &mark(ConfigKey::MessagingAuthToken))
            .field("messaging_from_number", &mark(ConfigKey::MessagingFromNumber))
            .finish()
    }
}

/// Non-secret settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub app_name: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub twilio_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            twilio_base_url: DEFAULT_TWILIO_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(mut lookup: impl FnMut(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let mut read = |name: &str, default: String| {
            lookup(name).filter(|v| !v.trim().is_empty()).unwrap_or(default)
        };
        Self {
            app_name: read("TEXTBRIDGE_APP_NAME", defaults.app_name),
            openai_model: read("OPENAI_MODEL", defaults.openai_model),
            openai_base_url: read("OPENAI_BASE_URL", defaults.openai_base_url),
            twilio_base_url: read("TWILIO_BASE_URL", defaults.twilio_base_url),
        }
    }
}
