//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub oauth: OAuthConfig,
    pub graph: GraphConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Bot identity and fixed texts
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub name: String,
    pub welcome_text: String,
}

/// Delegated sign-in configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OAuthConfig {
    /// Name of the OAuth connection registered for the bot
    pub connection_name: String,
    pub token_service_url: String,
    /// How long a user has to finish signing in
    pub prompt_timeout_seconds: u64,
    /// The only channel allowed to confirm sign-in through an invoke
    pub silent_auth_channel: String,
    pub request_timeout_seconds: u64,
    /// Fixed bearer token, used by the console host instead of the token service
    #[serde(default)]
    pub static_token: Option<String>,
}

/// Graph API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphConfig {
    pub api_url: String,
    pub timeout_seconds: u64,
    pub timezone: String,
}

/// Which conversation state store to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Redis,
}

/// Conversation state storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub redis: RedisConfig,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables.
    ///
    /// Values from `config.toml` are layered over the defaults, and
    /// `ROOMBUDDY__SECTION__KEY` environment variables override both.
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("ROOMBUDDY").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::RoomBuddyError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "RoomBuddy".to_string(),
                welcome_text: "Hi, I'm able to look for a room and book it on your name".to_string(),
            },
            oauth: OAuthConfig {
                connection_name: String::new(),
                token_service_url: "https://token.botframework.com".to_string(),
                prompt_timeout_seconds: 300,
                silent_auth_channel: "msteams".to_string(),
                request_timeout_seconds: 10,
                static_token: None,
            },
            graph: GraphConfig {
                api_url: "https://graph.microsoft.com/v1.0".to_string(),
                timeout_seconds: 15,
                timezone: "UTC".to_string(),
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                redis: RedisConfig {
                    url: "redis://localhost:6379".to_string(),
                    prefix: "roombuddy:".to_string(),
                    ttl_seconds: 86400,
                },
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
            },
        }
    }
}
