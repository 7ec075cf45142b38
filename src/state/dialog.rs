//! Dialog engine
//!
//! A small step sequencer persisted in the conversation state. The only
//! registered dialog signs the user in and then runs the command they typed.
//! Sign-in is the one place a dialog suspends: the frame stays on the stack
//! with its expiry and the next turn resumes it with whatever credential
//! that turn carries.

use std::collections::HashMap;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, warn};

use crate::config::Settings;
use crate::handlers::cards::sign_in_card;
use crate::handlers::commands::{self, ParsedCommand};
use crate::models::activity::Reply;
use crate::services::oauth::{recognize_credential, CredentialOutcome};
use crate::utils::errors::{RoomBuddyError, Result};
use crate::utils::helpers::is_magic_code;
use crate::utils::logging::{log_auth_failure, log_dialog_transition};
use super::context::{DialogFrame, DialogStep};
use super::turn::TurnContext;

/// Dialog that signs the user in and then executes their command
pub const AUTH_THEN_EXECUTE: &str = "authThenExecute";

/// Reply sent when sign-in fails or times out
pub const LOGIN_FAILED_TEXT: &str = "We couldn't log you in. Please try again later.";

const PROMPT_EXPIRES_AT: &str = "prompt_expires_at";

/// Where a dialog stands after a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogStatus {
    /// Suspended, waiting for a later turn
    Waiting,
    /// Finished; the stack is back to where it was before the dialog started
    Complete,
}

/// Ordered steps of a dialog
#[derive(Debug, Clone)]
pub struct DialogDefinition {
    pub id: String,
    pub steps: Vec<DialogStep>,
}

impl DialogDefinition {
    pub fn initial_step(&self) -> DialogStep {
        self.steps[0]
    }

    pub fn next_step(&self, current: DialogStep) -> Option<DialogStep> {
        let index = self.steps.iter().position(|step| *step == current)?;
        self.steps.get(index + 1).copied()
    }
}

/// Runs dialogs against the state of a turn
#[derive(Debug, Clone)]
pub struct DialogEngine {
    dialogs: HashMap<String, DialogDefinition>,
    prompt_timeout: Duration,
}

impl DialogEngine {
    /// Create an engine with the sign-in dialog registered
    pub fn new(prompt_timeout_seconds: u64) -> Self {
        let mut engine = Self {
            dialogs: HashMap::new(),
            prompt_timeout: Duration::seconds(prompt_timeout_seconds as i64),
        };

        engine.register(DialogDefinition {
            id: AUTH_THEN_EXECUTE.to_string(),
            steps: vec![DialogStep::PromptForAuth, DialogStep::ExecuteCommand],
        });
        engine
    }

    pub fn register(&mut self, definition: DialogDefinition) {
        self.dialogs.insert(definition.id.clone(), definition);
    }

    pub fn get_dialog(&self, id: &str) -> Result<&DialogDefinition> {
        self.dialogs
            .get(id)
            .ok_or_else(|| RoomBuddyError::InvalidInput(format!("Unknown dialog: {}", id)))
    }

    /// Resume the named dialog if it is active, otherwise start it.
    ///
    /// Errors raised by a step end the dialog and become one reply; they are
    /// not returned to the caller.
    pub async fn continue_or_start(&self, turn: &mut TurnContext<'_>, name: &str) -> Result<DialogStatus> {
        let definition = self.get_dialog(name)?;

        let result = if turn.state.is_in_dialog(name) {
            self.resume(turn, definition).await
        } else {
            self.begin(turn, definition).await
        };

        match result {
            Ok(status) => Ok(status),
            Err(e) => {
                error!(
                    conversation_id = %turn.activity.conversation_id,
                    dialog = name,
                    severity = %e.severity(),
                    error = %e,
                    "Dialog step failed"
                );
                turn.send_text(e.user_message());
                self.end_dialog(turn, name);
                Ok(DialogStatus::Complete)
            }
        }
    }

    async fn begin(&self, turn: &mut TurnContext<'_>, definition: &DialogDefinition) -> Result<DialogStatus> {
        let fresh = turn.state.is_idle();
        let step = definition.initial_step();
        turn.state.push_frame(DialogFrame::new(&definition.id, step));
        log_dialog_transition(&turn.activity.conversation_id, &definition.id, "idle", step.as_str());

        self.prompt_for_auth(turn, definition, fresh).await
    }

    async fn resume(&self, turn: &mut TurnContext<'_>, definition: &DialogDefinition) -> Result<DialogStatus> {
        let frame = turn.state.active_frame().cloned().ok_or_else(|| RoomBuddyError::InvalidStateTransition {
            from: "idle".to_string(),
            to: "resume".to_string(),
        })?;

        if frame.step != DialogStep::PromptForAuth {
            // Only the sign-in step ever stays on the stack between turns
            warn!(conversation_id = %turn.activity.conversation_id, step = frame.step.as_str(), "Discarding stale dialog frame");
            turn.state.pop_frame();
            return self.begin(turn, definition).await;
        }

        let expires_at: Option<DateTime<Utc>> = frame.get_data(PROMPT_EXPIRES_AT)?;
        let outcome = if expires_at.map_or(false, |expires_at| Utc::now() >= expires_at) {
            Some(CredentialOutcome::Timeout)
        } else {
            recognize_credential(turn.app.credentials.as_ref(), turn.activity).await?
        };

        match outcome {
            Some(outcome) => self.execute_command(turn, definition, outcome).await,
            None if turn.activity.is_message() => {
                debug!(conversation_id = %turn.activity.conversation_id, "New command while waiting for sign-in, restarting");
                turn.state.pop_frame();
                turn.state.pending_command_text = None;
                self.begin(turn, definition).await
            }
            None => {
                debug!(conversation_id = %turn.activity.conversation_id, "Activity carries no sign-in result, still waiting");
                Ok(DialogStatus::Waiting)
            }
        }
    }

    async fn prompt_for_auth(&self, turn: &mut TurnContext<'_>, definition: &DialogDefinition, fresh: bool) -> Result<DialogStatus> {
        let activity = turn.activity;
        if fresh && activity.is_message() && !is_magic_code(activity.text()) {
            turn.state.set_pending_command(activity.text());
        }

        if let Some(credential) = turn.app.credentials.cached_credential(activity).await? {
            debug!(conversation_id = %activity.conversation_id, "User already signed in");
            return self.execute_command(turn, definition, CredentialOutcome::Success(credential)).await;
        }

        let expires_at = Utc::now() + self.prompt_timeout;
        if let Some(frame) = turn.state.active_frame_mut() {
            frame.set_data(PROMPT_EXPIRES_AT, expires_at)?;
        }

        let card = sign_in_card(turn.app.credentials.connection_name());
        let reply = Reply::to(activity).with_attachment(card);
        turn.send(reply);

        debug!(conversation_id = %activity.conversation_id, expires_at = %expires_at, "Waiting for sign-in");
        Ok(DialogStatus::Waiting)
    }

    async fn execute_command(&self, turn: &mut TurnContext<'_>, definition: &DialogDefinition, outcome: CredentialOutcome) -> Result<DialogStatus> {
        let next = definition.next_step(DialogStep::PromptForAuth).unwrap_or(DialogStep::ExecuteCommand);
        turn.state.advance(next)?;
        log_dialog_transition(&turn.activity.conversation_id, &definition.id, DialogStep::PromptForAuth.as_str(), next.as_str());

        match outcome {
            CredentialOutcome::Success(credential) => {
                let text = turn.state.pending_command_text.clone().unwrap_or_default();
                let command = ParsedCommand::parse(&text);
                commands::execute(turn, &credential, &command).await?;
            }
            CredentialOutcome::Failure(reason) => {
                log_auth_failure(&turn.activity.conversation_id, &reason);
                turn.send_text(LOGIN_FAILED_TEXT);
            }
            CredentialOutcome::Timeout => {
                log_auth_failure(&turn.activity.conversation_id, "sign-in window expired");
                turn.send_text(LOGIN_FAILED_TEXT);
            }
        }

        self.end_dialog(turn, &definition.id);
        Ok(DialogStatus::Complete)
    }

    /// Pop the dialog's frame and forget the pending command
    fn end_dialog(&self, turn: &mut TurnContext<'_>, name: &str) {
        if turn.state.is_in_dialog(name) {
            turn.state.pop_frame();
        }
        turn.state.take_pending_command();
        log_dialog_transition(&turn.activity.conversation_id, name, "end", "idle");
    }
}

impl Default for DialogEngine {
    fn default() -> Self {
        Self::new(Settings::default().oauth.prompt_timeout_seconds)
    }
}
