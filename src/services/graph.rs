//! Graph API service implementation
//!
//! This service wraps the identity-and-mail API: the signed-in user's profile,
//! sending mail, reading the inbox and finding meeting times. Every call is
//! parameterized with the credential of the current turn; nothing is cached.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::GraphConfig;
use crate::models::graph::{MailMessage, MeetingTimeSuggestions, TimeWindow, UserProfile};
use crate::services::oauth::Credential;
use crate::utils::errors::{GraphError, Result, RoomBuddyError};
use crate::utils::logging::log_api_error;

/// Most messages ever returned by [`GraphApi::list_recent_mail`]
pub const RECENT_MAIL_LIMIT: usize = 5;

/// Capabilities the dialog needs from the downstream API
#[async_trait]
pub trait GraphApi: Send + Sync {
    async fn get_profile(&self, credential: &Credential) -> Result<UserProfile>;

    async fn send_mail(&self, credential: &Credential, to: &str, subject: &str, body: &str) -> Result<()>;

    /// Newest inbox messages, at most [`RECENT_MAIL_LIMIT`]
    async fn list_recent_mail(&self, credential: &Credential) -> Result<Vec<MailMessage>>;

    async fn find_room(
        &self,
        credential: &Credential,
        window: TimeWindow,
        duration_hint: &str,
        room_name_hint: &str,
        room_address_hint: Option<&str>,
    ) -> Result<MeetingTimeSuggestions>;
}

#[derive(Debug, Deserialize)]
struct ValueList<T> {
    #[serde(default)]
    value: Vec<T>,
}

/// reqwest-backed Graph client
#[derive(Clone, Debug)]
pub struct GraphClient {
    client: Client,
    config: GraphConfig,
}

impl GraphClient {
    /// Create a new GraphClient instance
    pub fn new(config: GraphConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("RoomBuddy-Bot/1.0")
            .build()
            .map_err(RoomBuddyError::Http)?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder, credential: &Credential) -> RequestBuilder {
        request
            .bearer_auth(credential.token())
            .header("Prefer", format!("outlook.timezone=\"{}\"", self.config.timezone))
    }

    async fn send(&self, request: RequestBuilder, operation: &str) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            log_api_error("graph", &e.to_string(), Some(operation));
            if e.is_timeout() {
                RoomBuddyError::Graph(GraphError::Timeout)
            } else {
                RoomBuddyError::Graph(GraphError::RequestFailed(e.to_string()))
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            log_api_error("graph", "token rejected", Some(operation));
            return Err(RoomBuddyError::Graph(GraphError::Unauthorized));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log_api_error("graph", &format!("HTTP {}", status), Some(operation));
            return Err(RoomBuddyError::Graph(GraphError::RequestFailed(
                format!("HTTP {}: {}", status, error_text)
            )));
        }

        debug!(operation = operation, status = %status, "Graph request succeeded");
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| RoomBuddyError::Graph(GraphError::InvalidResponse(e.to_string())))
    }
}

fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RoomBuddyError::InvalidInput(format!("{} must not be empty", what)));
    }
    Ok(())
}

#[async_trait]
impl GraphApi for GraphClient {
    async fn get_profile(&self, credential: &Credential) -> Result<UserProfile> {
        let request = self.authorize(self.client.get(self.url("/me")), credential);
        let response = self.send(request, "get_profile").await?;
        Self::json(response).await
    }

    async fn send_mail(&self, credential: &Credential, to: &str, subject: &str, body: &str) -> Result<()> {
        require(to, "Recipient address")?;
        require(subject, "Subject")?;
        require(body, "Message body")?;

        let payload = json!({
            "message": {
                "subject": subject,
                "body": { "contentType": "Text", "content": body },
                "toRecipients": [ { "emailAddress": { "address": to } } ],
            },
            "saveToSentItems": true,
        });

        let request = self
            .authorize(self.client.post(self.url("/me/sendMail")), credential)
            .json(&payload);
        self.send(request, "send_mail").await?;
        Ok(())
    }

    async fn list_recent_mail(&self, credential: &Credential) -> Result<Vec<MailMessage>> {
        let request = self
            .authorize(self.client.get(self.url("/me/mailFolders/inbox/messages")), credential)
            .query(&[("$top", RECENT_MAIL_LIMIT.to_string())]);
        let response = self.send(request, "list_recent_mail").await?;
        let list: ValueList<MailMessage> = Self::json(response).await?;

        Ok(list.value.into_iter().take(RECENT_MAIL_LIMIT).collect())
    }

    async fn find_room(
        &self,
        credential: &Credential,
        window: TimeWindow,
        duration_hint: &str,
        room_name_hint: &str,
        room_address_hint: Option<&str>,
    ) -> Result<MeetingTimeSuggestions> {
        if window.end <= window.start {
            return Err(RoomBuddyError::InvalidInput("The search window must end after it starts".to_string()));
        }

        let mut location = json!({ "displayName": room_name_hint });
        if let Some(address) = room_address_hint {
            location["locationEmailAddress"] = json!(address);
        }

        let payload = json!({
            "locationConstraint": {
                "isRequired": false,
                "suggestLocation": room_address_hint.is_none(),
                "locations": [location],
            },
            "timeConstraint": {
                "timeslots": [{
                    "start": { "dateTime": window.start.format("%Y-%m-%dT%H:%M:%S").to_string(), "timeZone": "UTC" },
                    "end": { "dateTime": window.end.format("%Y-%m-%dT%H:%M:%S").to_string(), "timeZone": "UTC" },
                }],
            },
            "meetingDuration": duration_hint,
        });

        let request = self
            .authorize(self.client.post(self.url("/me/findMeetingTimes")), credential)
            .json(&payload);
        let response = self.send(request, "find_room").await?;
        Self::json(response).await
    }
}
