//! Mail command handlers

use tracing::{debug, info};

use crate::handlers::cards::mail_card;
use crate::models::activity::{AttachmentLayout, Reply};
use crate::services::{Credential, RECENT_MAIL_LIMIT};
use crate::state::TurnContext;
use crate::utils::errors::{Result, RoomBuddyError};

const MAIL_SUBJECT: &str = "Message from a bot!";

/// Handle `send <address>`
pub async fn handle_send_mail(turn: &mut TurnContext<'_>, credential: &Credential, address: Option<&str>) -> Result<()> {
    let address = address
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .ok_or_else(|| RoomBuddyError::InvalidInput("Tell me who to write to, for example: send someone@example.com".to_string()))?;

    let profile = turn.app.graph.get_profile(credential).await?;
    let body = format!(
        "Hi there! I had this message sent from a bot. - Your friend, {}",
        profile.display_name()
    );

    turn.app.graph.send_mail(credential, address, MAIL_SUBJECT, &body).await?;
    info!(conversation_id = %turn.activity.conversation_id, to = address, "Mail sent");

    turn.send_text(format!("I sent a message to '{}' from your account.", address));
    Ok(())
}

/// Handle `recent`
pub async fn handle_recent_mail(turn: &mut TurnContext<'_>, credential: &Credential) -> Result<()> {
    let messages = turn.app.graph.list_recent_mail(credential).await?;
    debug!(conversation_id = %turn.activity.conversation_id, count = messages.len(), "Recent mail fetched");

    if messages.is_empty() {
        turn.send_text("Unable to find any recent unread mail.");
        return Ok(());
    }

    let reply = messages
        .iter()
        .take(RECENT_MAIL_LIMIT)
        .map(mail_card)
        .fold(Reply::to(turn.activity).with_layout(AttachmentLayout::Carousel), Reply::with_attachment);

    turn.send(reply);
    Ok(())
}
