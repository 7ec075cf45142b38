//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{RoomBuddyError, Result};
use super::{Settings, StorageBackend};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_oauth_config(&settings.oauth)?;
    validate_graph_config(&settings.graph)?;
    validate_storage_config(&settings.storage)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.welcome_text.trim().is_empty() {
        return Err(RoomBuddyError::Config(
            "Welcome text is required".to_string()
        ));
    }

    Ok(())
}

/// Validate OAuth configuration
pub fn validate_oauth_config(config: &super::OAuthConfig) -> Result<()> {
    if config.connection_name.trim().is_empty() {
        return Err(RoomBuddyError::Config(
            "OAuth connection name must be configured prior to handling turns".to_string()
        ));
    }

    if config.static_token.is_none() && config.token_service_url.trim().is_empty() {
        return Err(RoomBuddyError::Config(
            "Token service URL is required".to_string()
        ));
    }

    if config.prompt_timeout_seconds == 0 {
        return Err(RoomBuddyError::Config(
            "Sign-in prompt timeout must be greater than 0".to_string()
        ));
    }

    if config.request_timeout_seconds == 0 {
        return Err(RoomBuddyError::Config(
            "Token service timeout must be greater than 0".to_string()
        ));
    }

    if config.silent_auth_channel.trim().is_empty() {
        return Err(RoomBuddyError::Config(
            "Silent sign-in channel is required".to_string()
        ));
    }

    Ok(())
}

/// Validate Graph API configuration
fn validate_graph_config(config: &super::GraphConfig) -> Result<()> {
    if config.api_url.trim().is_empty() {
        return Err(RoomBuddyError::Config(
            "Graph API URL is required".to_string()
        ));
    }

    url::Url::parse(&config.api_url)?;

    if config.timeout_seconds == 0 {
        return Err(RoomBuddyError::Config(
            "Graph timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.backend == StorageBackend::Redis && config.redis.url.trim().is_empty() {
        return Err(RoomBuddyError::Config(
            "Redis URL is required".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(RoomBuddyError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(RoomBuddyError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
