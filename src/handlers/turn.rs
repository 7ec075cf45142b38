//! Turn dispatcher
//!
//! Entry point for every inbound activity. Classifies it, routes it and
//! commits the conversation state once the turn is done.

use tracing::{debug, warn};

use crate::config::validation::validate_oauth_config;
use crate::config::Settings;
use crate::models::activity::{Activity, ActivityKind, Reply};
use crate::state::{AppContext, DialogEngine, TurnContext, AUTH_THEN_EXECUTE};
use crate::utils::errors::{Result, RoomBuddyError};
use crate::utils::logging::log_turn;
use super::messages;

/// Routes activities to the message, welcome and dialog paths
#[derive(Debug, Clone)]
pub struct TurnDispatcher {
    engine: DialogEngine,
    silent_auth_channel: String,
}

impl TurnDispatcher {
    /// Create a dispatcher. Fails when no OAuth connection is configured.
    pub fn new(settings: &Settings) -> Result<Self> {
        validate_oauth_config(&settings.oauth)?;

        Ok(Self {
            engine: DialogEngine::new(settings.oauth.prompt_timeout_seconds),
            silent_auth_channel: settings.oauth.silent_auth_channel.clone(),
        })
    }

    /// Handle one activity and return the replies it produced.
    ///
    /// State changes are saved only when the whole turn succeeds.
    pub async fn handle_turn(&self, app: &AppContext, activity: &Activity) -> Result<Vec<Reply>> {
        log_turn(&activity.conversation_id, activity.kind.as_str(), &activity.channel_id);

        match activity.kind {
            ActivityKind::Unknown => {
                debug!(conversation_id = %activity.conversation_id, "Ignoring activity of unknown kind");
                return Ok(Vec::new());
            }
            ActivityKind::SystemInvoke if activity.channel_id != self.silent_auth_channel => {
                warn!(
                    conversation_id = %activity.conversation_id,
                    channel_id = %activity.channel_id,
                    "Silent sign-in confirmation on an unsupported channel"
                );
                return Err(RoomBuddyError::UnsupportedChannel {
                    channel: activity.channel_id.clone(),
                });
            }
            _ => {}
        }

        let mut turn = TurnContext::load(app, activity).await?;

        let result = match activity.kind {
            ActivityKind::Message => messages::handle_message(&mut turn, &self.engine).await,
            ActivityKind::ConversationMembersAdded => messages::handle_members_added(&mut turn).await,
            ActivityKind::SystemInvoke | ActivityKind::Event => self
                .engine
                .continue_or_start(&mut turn, AUTH_THEN_EXECUTE)
                .await
                .map(|_| ()),
            ActivityKind::Unknown => Ok(()),
        };

        match result {
            Ok(()) => {}
            Err(e) if e.is_recoverable() => {
                warn!(conversation_id = %activity.conversation_id, error = %e, "Turn failed, telling the user");
                turn.send_text(e.user_message());
            }
            Err(e) => return Err(e),
        }

        turn.commit().await
    }
}
