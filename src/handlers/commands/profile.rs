//! Profile and token command handlers

use tracing::info;

use crate::services::Credential;
use crate::state::TurnContext;
use crate::utils::errors::Result;

/// Handle `me`
pub async fn handle_profile(turn: &mut TurnContext<'_>, credential: &Credential) -> Result<()> {
    let profile = turn.app.graph.get_profile(credential).await?;
    info!(conversation_id = %turn.activity.conversation_id, user = %profile.display_name(), "Profile fetched");

    turn.send_text(format!("You are {}", profile));
    Ok(())
}

/// Handle `token`
pub async fn handle_show_token(turn: &mut TurnContext<'_>, credential: &Credential) -> Result<()> {
    turn.send_text(format!("Your token is: {}", credential.token()));
    Ok(())
}
