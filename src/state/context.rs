//! Conversation context management
//!
//! This module holds the per-conversation record persisted between turns
//! (the pending command and the dialog stack) and the application context
//! handed to every turn.

use std::collections::HashMap;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::Settings;
use crate::config::StorageBackend;
use crate::services::{CredentialProvider, GraphApi, ServiceFactory};
use crate::utils::errors::{RoomBuddyError, Result};
use crate::state::storage::{MemoryStateStore, RedisStateStore, StateStore};

/// Everything a turn needs, passed explicitly into each turn
#[derive(Clone)]
pub struct AppContext {
    pub settings: Settings,
    pub state_store: Arc<dyn StateStore>,
    pub credentials: Arc<dyn CredentialProvider>,
    pub graph: Arc<dyn GraphApi>,
}

impl AppContext {
    /// Create a new AppContext from services
    pub fn new(settings: Settings, state_store: Arc<dyn StateStore>, services: ServiceFactory) -> Self {
        Self {
            settings,
            state_store,
            credentials: services.credentials,
            graph: services.graph,
        }
    }

    /// Build all collaborators from settings
    pub async fn from_settings(settings: Settings) -> Result<Self> {
        settings.validate()?;

        let state_store: Arc<dyn StateStore> = match settings.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStateStore::new()),
            StorageBackend::Redis => {
                let store = RedisStateStore::new(settings.storage.redis.clone()).await?;
                store.test_connection().await?;
                info!(url = %settings.storage.redis.url, "Connected to Redis");
                Arc::new(store)
            }
        };
        let services = ServiceFactory::new(&settings)?;

        Ok(Self::new(settings, state_store, services))
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("bot", &self.settings.bot.name)
            .field("connection_name", &self.credentials.connection_name())
            .finish_non_exhaustive()
    }
}

/// Named steps of the sign-in-then-execute dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogStep {
    PromptForAuth,
    ExecuteCommand,
}

impl DialogStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogStep::PromptForAuth => "prompt_for_auth",
            DialogStep::ExecuteCommand => "execute_command",
        }
    }
}

/// Where a dialog is paused and what it needs on resume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogFrame {
    pub dialog: String,
    pub step: DialogStep,
    /// Step-local data replayed on resume
    pub data: HashMap<String, serde_json::Value>,
    pub started_at: DateTime<Utc>,
}

impl DialogFrame {
    pub fn new(dialog: &str, step: DialogStep) -> Self {
        Self {
            dialog: dialog.to_string(),
            step,
            data: HashMap::new(),
            started_at: Utc::now(),
        }
    }

    pub fn set_data<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;
        self.data.insert(key.to_string(), json_value);
        Ok(())
    }

    pub fn get_data<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        match self.data.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }
}

/// Per-conversation state persisted across turns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub conversation_id: String,
    /// Utterance captured before sign-in was requested
    pub pending_command_text: Option<String>,
    pub dialog_stack: Vec<DialogFrame>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    /// Create a new, idle state for a conversation
    pub fn new(conversation_id: &str) -> Self {
        Self {
            conversation_id: conversation_id.to_string(),
            pending_command_text: None,
            dialog_stack: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// The frame at the top of the stack
    pub fn active_frame(&self) -> Option<&DialogFrame> {
        self.dialog_stack.last()
    }

    pub fn active_frame_mut(&mut self) -> Option<&mut DialogFrame> {
        self.dialog_stack.last_mut()
    }

    pub fn is_idle(&self) -> bool {
        self.dialog_stack.is_empty()
    }

    /// Whether the active frame belongs to the given dialog
    pub fn is_in_dialog(&self, dialog: &str) -> bool {
        self.active_frame().map_or(false, |frame| frame.dialog == dialog)
    }

    pub fn push_frame(&mut self, frame: DialogFrame) {
        self.dialog_stack.push(frame);
        self.updated_at = Utc::now();
    }

    pub fn pop_frame(&mut self) -> Option<DialogFrame> {
        self.updated_at = Utc::now();
        self.dialog_stack.pop()
    }

    /// Move the active frame to another step
    pub fn advance(&mut self, step: DialogStep) -> Result<()> {
        let frame = self.dialog_stack.last_mut().ok_or_else(|| RoomBuddyError::InvalidStateTransition {
            from: "idle".to_string(),
            to: step.as_str().to_string(),
        })?;
        frame.step = step;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_pending_command(&mut self, text: &str) {
        self.pending_command_text = Some(text.to_string());
        self.updated_at = Utc::now();
    }

    pub fn take_pending_command(&mut self) -> Option<String> {
        self.updated_at = Utc::now();
        self.pending_command_text.take()
    }

    /// Drop every frame and the pending command
    pub fn reset(&mut self) {
        self.dialog_stack.clear();
        self.pending_command_text = None;
        self.updated_at = Utc::now();
    }

    /// Create a summary of the state for logging
    pub fn summary(&self) -> StateSummary {
        StateSummary {
            conversation_id: self.conversation_id.clone(),
            depth: self.dialog_stack.len(),
            dialog: self.active_frame().map(|frame| frame.dialog.clone()),
            step: self.active_frame().map(|frame| frame.step),
            has_pending_command: self.pending_command_text.is_some(),
        }
    }
}

/// State summary for logging and debugging
#[derive(Debug, Clone, Serialize)]
pub struct StateSummary {
    pub conversation_id: String,
    pub depth: usize,
    pub dialog: Option<String>,
    pub step: Option<DialogStep>,
    pub has_pending_command: bool,
}
