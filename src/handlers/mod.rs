//! Bot handlers module
//!
//! This module contains the turn handlers organized by type:
//! - The turn dispatcher routing each activity
//! - Message handlers for control words and new members
//! - Command parsing and the command handlers
//! - Card builders used by all of the above

pub mod cards;
pub mod commands;
pub mod messages;
pub mod turn;

// Re-export commonly used handler types
pub use commands::{Command, ParsedCommand};
pub use turn::TurnDispatcher;
