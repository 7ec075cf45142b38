//! Help command handler

use crate::state::TurnContext;
use crate::utils::errors::Result;

/// Fixed help text listing every command
pub const HELP_TEXT: &str = "I can look for a room and book it on your name.\n\n\
    me - Show your profile\n\
    send <address> - Send a test message from your account\n\
    recent - Show your most recent mail\n\
    find [room] - Look for a free room in the next 24 hours\n\
    continue - List the rooms available to you\n\
    token - Show your access token\n\
    signout - Sign out\n\
    help - Show this help message";

/// Handle help
pub async fn handle_help(turn: &mut TurnContext<'_>) -> Result<()> {
    turn.send_text(HELP_TEXT);
    Ok(())
}
