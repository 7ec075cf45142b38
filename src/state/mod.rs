//! State management module
//!
//! This module handles conversation state, its storage between turns,
//! the per-turn context and the dialog engine.

pub mod context;
pub mod dialog;
pub mod storage;
pub mod turn;

// Re-export commonly used state components
pub use context::{AppContext, ConversationState, DialogFrame, DialogStep, StateSummary};
pub use dialog::{DialogDefinition, DialogEngine, DialogStatus, AUTH_THEN_EXECUTE, LOGIN_FAILED_TEXT};
pub use storage::{MemoryStateStore, RedisStateStore, StateStore};
pub use turn::TurnContext;
