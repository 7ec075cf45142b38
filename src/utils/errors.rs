//! Error handling for RoomBuddy
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for RoomBuddy application
#[derive(Error, Debug)]
pub enum RoomBuddyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel '{channel}' does not support silent sign-in confirmation")]
    UnsupportedChannel { channel: String },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Graph API error: {0}")]
    Graph(#[from] GraphError),

    #[error("Token service error: {0}")]
    TokenService(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Graph API specific errors
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Graph request failed: {0}")]
    RequestFailed(String),

    #[error("Graph request timed out")]
    Timeout,

    #[error("Graph rejected the access token")]
    Unauthorized,

    #[error("Invalid Graph response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for RoomBuddy operations
pub type Result<T> = std::result::Result<T, RoomBuddyError>;

impl RoomBuddyError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            RoomBuddyError::Config(_) => false,
            RoomBuddyError::UnsupportedChannel { .. } => false,
            RoomBuddyError::Authentication(_) => true,
            RoomBuddyError::Graph(_) => true,
            RoomBuddyError::TokenService(_) => true,
            RoomBuddyError::InvalidStateTransition { .. } => false,
            RoomBuddyError::Redis(_) => false,
            RoomBuddyError::Http(_) => true,
            RoomBuddyError::Serialization(_) => false,
            RoomBuddyError::Io(_) => false,
            RoomBuddyError::UrlParse(_) => false,
            RoomBuddyError::InvalidInput(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RoomBuddyError::Config(_) => ErrorSeverity::Critical,
            RoomBuddyError::Redis(_) => ErrorSeverity::Critical,
            RoomBuddyError::UnsupportedChannel { .. } => ErrorSeverity::Warning,
            RoomBuddyError::Authentication(_) => ErrorSeverity::Warning,
            RoomBuddyError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Text shown to the user when this error ends a dialog step
    pub fn user_message(&self) -> String {
        match self {
            RoomBuddyError::InvalidInput(message) => message.clone(),
            RoomBuddyError::Graph(GraphError::Unauthorized) | RoomBuddyError::Authentication(_) => {
                "We couldn't log you in. Please try again later.".to_string()
            }
            other => format!("Sorry, something went wrong: {}", other),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
