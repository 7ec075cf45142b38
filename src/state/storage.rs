//! State storage implementation
//!
//! This module handles persistence of conversation state between turns,
//! either in process memory or in Redis with expiration.

use std::collections::HashMap;
use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::{debug, error};
use crate::utils::errors::Result;
use crate::config::RedisConfig;
use super::context::ConversationState;

/// Keyed, conversation-scoped state persistence
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the state of a conversation, or a fresh idle state if none is stored
    async fn load(&self, conversation_id: &str) -> Result<ConversationState>;

    async fn save(&self, state: &ConversationState) -> Result<()>;

    async fn delete(&self, conversation_id: &str) -> Result<()>;
}

/// In-process state store
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    states: RwLock<HashMap<String, ConversationState>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations with stored state
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self, conversation_id: &str) -> Result<ConversationState> {
        let states = self.states.read().await;
        Ok(states
            .get(conversation_id)
            .cloned()
            .unwrap_or_else(|| ConversationState::new(conversation_id)))
    }

    async fn save(&self, state: &ConversationState) -> Result<()> {
        let mut states = self.states.write().await;
        states.insert(state.conversation_id.clone(), state.clone());
        Ok(())
    }

    async fn delete(&self, conversation_id: &str) -> Result<()> {
        self.states.write().await.remove(conversation_id);
        Ok(())
    }
}

/// Redis-based state store
#[derive(Clone)]
pub struct RedisStateStore {
    /// Redis connection manager
    connection_manager: redis::aio::ConnectionManager,
    /// Redis configuration
    config: RedisConfig,
}

impl RedisStateStore {
    /// Create a new state storage instance
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Get the Redis key for a conversation's state
    fn state_key(&self, conversation_id: &str) -> String {
        format!("{}conversation:{}", self.config.prefix, conversation_id)
    }

    /// Test Redis connection
    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for RedisStateStore {
    async fn load(&self, conversation_id: &str) -> Result<ConversationState> {
        let key = self.state_key(conversation_id);
        debug!(conversation_id = conversation_id, key = %key, "Loading state from Redis");

        let mut conn = self.connection_manager.clone();
        let serialized: Option<String> = match conn.get::<&str, Option<String>>(&key).await {
            Ok(data) => data,
            Err(e) => {
                error!(conversation_id = conversation_id, error = %e, "Failed to get state from Redis");
                return Err(e.into());
            }
        };

        match serialized {
            Some(data) => {
                let state: ConversationState = match serde_json::from_str(&data) {
                    Ok(state) => state,
                    Err(e) => {
                        error!(conversation_id = conversation_id, error = %e, "Failed to deserialize state");
                        return Err(e.into());
                    }
                };
                debug!(conversation_id = conversation_id, depth = state.dialog_stack.len(), "State loaded");
                Ok(state)
            }
            None => {
                debug!(conversation_id = conversation_id, "No state found in Redis");
                Ok(ConversationState::new(conversation_id))
            }
        }
    }

    async fn save(&self, state: &ConversationState) -> Result<()> {
        let key = self.state_key(&state.conversation_id);
        let serialized = serde_json::to_string(state)?;

        let mut conn = self.connection_manager.clone();
        match conn.set_ex::<_, _, ()>(&key, serialized, self.config.ttl_seconds).await {
            Ok(_) => {
                debug!(conversation_id = %state.conversation_id, ttl_seconds = self.config.ttl_seconds, "State saved to Redis");
                Ok(())
            }
            Err(e) => {
                error!(conversation_id = %state.conversation_id, error = %e, "Failed to save state to Redis");
                Err(e.into())
            }
        }
    }

    async fn delete(&self, conversation_id: &str) -> Result<()> {
        let key = self.state_key(conversation_id);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;
        debug!(conversation_id = conversation_id, deleted = deleted, "Deleted conversation state");
        Ok(())
    }
}

impl std::fmt::Debug for RedisStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStateStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
