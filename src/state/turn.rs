//! Per-turn context
//!
//! A turn loads the conversation state once, mutates it in memory and
//! buffers its replies. Nothing is persisted until [`TurnContext::commit`],
//! so a turn that fails or is cancelled leaves the stored state untouched.

use tracing::debug;

use crate::models::activity::{Activity, Reply};
use crate::utils::errors::Result;
use super::context::{AppContext, ConversationState};

pub struct TurnContext<'a> {
    pub app: &'a AppContext,
    pub activity: &'a Activity,
    pub state: ConversationState,
    replies: Vec<Reply>,
}

impl<'a> TurnContext<'a> {
    /// Start a turn, loading the conversation's state
    pub async fn load(app: &'a AppContext, activity: &'a Activity) -> Result<TurnContext<'a>> {
        let state = app.state_store.load(&activity.conversation_id).await?;
        debug!(conversation_id = %activity.conversation_id, summary = ?state.summary(), "Turn state loaded");

        Ok(Self {
            app,
            activity,
            state,
            replies: Vec::new(),
        })
    }

    pub fn send(&mut self, reply: Reply) {
        self.replies.push(reply);
    }

    pub fn send_text(&mut self, text: impl Into<String>) {
        let reply = Reply::text(self.activity, text);
        self.replies.push(reply);
    }

    pub fn replies(&self) -> &[Reply] {
        &self.replies
    }

    /// Persist the state and hand back the replies
    pub async fn commit(self) -> Result<Vec<Reply>> {
        self.app.state_store.save(&self.state).await?;
        debug!(
            conversation_id = %self.state.conversation_id,
            replies = self.replies.len(),
            depth = self.state.dialog_stack.len(),
            "Turn committed"
        );
        Ok(self.replies)
    }
}
