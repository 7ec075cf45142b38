//! Activity model
//!
//! Inbound conversational events and the replies sent back for them.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use super::card::Attachment;
use crate::utils::helpers::generate_uuid;

/// Name of the invoke a channel sends when sign-in completes without a magic code
pub const VERIFY_STATE_INVOKE: &str = "signin/verifyState";

/// Name of the event an emulator sends carrying a token directly
pub const TOKEN_RESPONSE_EVENT: &str = "tokens/response";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityKind {
    Message,
    ConversationMembersAdded,
    SystemInvoke,
    Event,
    #[serde(other)]
    Unknown,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Message => "message",
            ActivityKind::ConversationMembersAdded => "conversationMembersAdded",
            ActivityKind::SystemInvoke => "systemInvoke",
            ActivityKind::Event => "event",
            ActivityKind::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAccount {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl ChannelAccount {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// An inbound conversational event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub id: String,
    pub channel_id: String,
    pub conversation_id: String,
    /// The user (or system) that sent the activity
    pub from: ChannelAccount,
    /// The bot account receiving the activity
    pub recipient: ChannelAccount,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub members_added: Vec<ChannelAccount>,
    /// Invoke or event name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    fn base(kind: ActivityKind, channel_id: &str, conversation_id: &str, from: ChannelAccount, recipient: ChannelAccount) -> Self {
        Self {
            kind,
            id: generate_uuid(),
            channel_id: channel_id.to_string(),
            conversation_id: conversation_id.to_string(),
            from,
            recipient,
            text: None,
            members_added: Vec::new(),
            name: None,
            value: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a plain text message activity
    pub fn message(channel_id: &str, conversation_id: &str, from: ChannelAccount, recipient: ChannelAccount, text: &str) -> Self {
        let mut activity = Self::base(ActivityKind::Message, channel_id, conversation_id, from, recipient);
        activity.text = Some(text.to_string());
        activity
    }

    /// Create a members-added activity
    pub fn members_added(channel_id: &str, conversation_id: &str, recipient: ChannelAccount, members: Vec<ChannelAccount>) -> Self {
        let from = members.first().cloned().unwrap_or_else(|| recipient.clone());
        let mut activity = Self::base(ActivityKind::ConversationMembersAdded, channel_id, conversation_id, from, recipient);
        activity.members_added = members;
        activity
    }

    /// Create a sign-in confirmation invoke carrying the verification code
    pub fn verify_state(channel_id: &str, conversation_id: &str, from: ChannelAccount, recipient: ChannelAccount, code: &str) -> Self {
        let mut activity = Self::base(ActivityKind::SystemInvoke, channel_id, conversation_id, from, recipient);
        activity.name = Some(VERIFY_STATE_INVOKE.to_string());
        activity.value = Some(serde_json::json!({ "state": code }));
        activity
    }

    /// Create a token response event carrying a token directly
    pub fn token_response(channel_id: &str, conversation_id: &str, from: ChannelAccount, recipient: ChannelAccount, token: &str) -> Self {
        let mut activity = Self::base(ActivityKind::Event, channel_id, conversation_id, from, recipient);
        activity.name = Some(TOKEN_RESPONSE_EVENT.to_string());
        activity.value = Some(serde_json::json!({ "token": token }));
        activity
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn is_message(&self) -> bool {
        self.kind == ActivityKind::Message
    }

    /// Look up a string field in the activity value
    pub fn value_str(&self, key: &str) -> Option<&str> {
        self.value.as_ref()?.get(key)?.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentLayout {
    #[default]
    List,
    Carousel,
}

/// An outbound reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub conversation_id: String,
    pub reply_to_id: Option<String>,
    pub text: Option<String>,
    pub attachments: Vec<Attachment>,
    pub attachment_layout: AttachmentLayout,
}

impl Reply {
    /// Create an empty reply to an activity
    pub fn to(activity: &Activity) -> Self {
        Self {
            conversation_id: activity.conversation_id.clone(),
            reply_to_id: Some(activity.id.clone()),
            text: None,
            attachments: Vec::new(),
            attachment_layout: AttachmentLayout::List,
        }
    }

    /// Create a text reply to an activity
    pub fn text(activity: &Activity, text: impl Into<String>) -> Self {
        Self::to(activity).with_text(text)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_layout(mut self, layout: AttachmentLayout) -> Self {
        self.attachment_layout = layout;
        self
    }
}
