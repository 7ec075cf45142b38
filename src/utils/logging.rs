//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the RoomBuddy application.

use std::path::Path;
use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{RoomBuddyError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer when dropped, so the caller must
/// keep it alive for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(Path::new(&config.file_path), "roombuddy.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().json().with_writer(non_blocking))
        .try_init()
        .map_err(|e| RoomBuddyError::Config(format!("Failed to initialize logging: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log an inbound activity
pub fn log_turn(conversation_id: &str, activity_kind: &str, channel_id: &str) {
    debug!(
        conversation_id = conversation_id,
        activity_kind = activity_kind,
        channel_id = channel_id,
        "Turn received"
    );
}

/// Log a dialog step transition
pub fn log_dialog_transition(conversation_id: &str, dialog: &str, from: &str, to: &str) {
    debug!(
        conversation_id = conversation_id,
        dialog = dialog,
        from = from,
        to = to,
        "Dialog transition"
    );
}

/// Log a user command about to run
pub fn log_command(conversation_id: &str, verb: &str, details: Option<&str>) {
    info!(
        conversation_id = conversation_id,
        verb = verb,
        details = details,
        "Running command"
    );
}

/// Log a failed or timed out sign-in
pub fn log_auth_failure(conversation_id: &str, reason: &str) {
    warn!(
        conversation_id = conversation_id,
        reason = reason,
        "Sign-in did not complete"
    );
}

/// Log API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}
