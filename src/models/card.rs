//! Card model
//!
//! Plain data for the cards attached to replies. Channels render them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    ImBack,
    OpenUrl,
    Signin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAction {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub title: String,
    pub value: serde_json::Value,
}

impl CardAction {
    /// A button that posts its value back into the conversation
    pub fn im_back(title: impl Into<String>, value: serde_json::Value) -> Self {
        Self { action_type: ActionType::ImBack, title: title.into(), value }
    }

    pub fn open_url(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self { action_type: ActionType::OpenUrl, title: title.into(), value: serde_json::Value::String(url.into()) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardImage {
    pub url: String,
    pub alt: Option<String>,
    pub tap: Option<CardAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroCard {
    pub title: String,
    pub subtitle: Option<String>,
    pub text: Option<String>,
    pub images: Vec<CardImage>,
    pub buttons: Vec<CardAction>,
}

/// Sign-in card; the channel turns the connection name into a login link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthCard {
    pub title: String,
    pub text: String,
    pub connection_name: String,
    pub buttons: Vec<CardAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "contentType", content = "content")]
pub enum Attachment {
    #[serde(rename = "application/vnd.microsoft.card.hero")]
    Hero(HeroCard),
    #[serde(rename = "application/vnd.microsoft.card.oauth")]
    OAuth(OAuthCard),
}

impl Attachment {
    pub fn as_hero(&self) -> Option<&HeroCard> {
        match self {
            Attachment::Hero(card) => Some(card),
            _ => None,
        }
    }

    pub fn as_oauth(&self) -> Option<&OAuthCard> {
        match self {
            Attachment::OAuth(card) => Some(card),
            _ => None,
        }
    }
}
