//! Message handlers module
//!
//! Handles text messages outside of commands (sign-out words and help),
//! and greets members joining the conversation.

use tracing::{debug, info};

use crate::handlers::cards::welcome_card;
use crate::handlers::commands::{help::HELP_TEXT, SIGN_OUT_WORDS};
use crate::models::activity::Reply;
use crate::state::{DialogEngine, TurnContext, AUTH_THEN_EXECUTE};
use crate::utils::errors::Result;
use crate::utils::helpers::normalize_text;

/// Handle an incoming text message
pub async fn handle_message(turn: &mut TurnContext<'_>, engine: &DialogEngine) -> Result<()> {
    let text = normalize_text(turn.activity.text());
    debug!(conversation_id = %turn.activity.conversation_id, "Processing message");

    if SIGN_OUT_WORDS.contains(&text.as_str()) {
        return handle_sign_out(turn).await;
    }

    if text == "help" {
        turn.send_text(HELP_TEXT);
        return Ok(());
    }

    engine.continue_or_start(turn, AUTH_THEN_EXECUTE).await?;
    Ok(())
}

/// Revoke the user's token and forget any dialog in progress
pub async fn handle_sign_out(turn: &mut TurnContext<'_>) -> Result<()> {
    // The dialog is dropped even when the revoke fails
    turn.state.reset();
    turn.app.credentials.sign_out(turn.activity).await?;

    info!(
        conversation_id = %turn.activity.conversation_id,
        user_id = %turn.activity.from.id,
        "User signed out"
    );
    turn.send_text("You are now signed out.");
    Ok(())
}

/// Welcome every added member except the bot itself
pub async fn handle_members_added(turn: &mut TurnContext<'_>) -> Result<()> {
    let activity = turn.activity;
    let welcome_text = turn.app.settings.bot.welcome_text.clone();

    for member in activity.members_added.iter().filter(|member| member.id != activity.recipient.id) {
        debug!(conversation_id = %activity.conversation_id, member_id = %member.id, "Welcoming new member");
        let reply = Reply::text(activity, welcome_text.as_str()).with_attachment(welcome_card(&member.name));
        turn.send(reply);
    }

    Ok(())
}
