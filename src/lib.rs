//! RoomBuddy conversational assistant
//!
//! A bot that signs users in through a delegated OAuth flow and then runs
//! a handful of text commands against their Graph account: show the
//! profile, send and list mail, and look for meeting rooms.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{RoomBuddyError, Result};

// Re-export main components for easy access
pub use handlers::TurnDispatcher;
pub use services::ServiceFactory;
pub use state::{AppContext, DialogEngine, StateStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
