//! Delegated sign-in service implementation
//!
//! This service handles the credential side of the dialog: looking up a token
//! for a user who already signed in, exchanging magic codes, recognizing the
//! sign-in confirmations channels send, and signing users out. Tokens are never
//! stored by the bot; they are requested again whenever a turn needs one.

use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::OAuthConfig;
use crate::models::activity::{Activity, ActivityKind, TOKEN_RESPONSE_EVENT, VERIFY_STATE_INVOKE};
use crate::utils::errors::{Result, RoomBuddyError};
use crate::utils::helpers::extract_magic_code;
use crate::utils::logging::log_api_error;

/// A bearer token valid for the turn that received it
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into(), expires_at: None }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Result of a sign-in attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialOutcome {
    Success(Credential),
    Failure(String),
    Timeout,
}

impl CredentialOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CredentialOutcome::Success(_))
    }
}

/// Source of user credentials
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Name of the OAuth connection shown on sign-in cards
    fn connection_name(&self) -> &str;

    /// Token for the activity's user if they are already signed in
    async fn cached_credential(&self, activity: &Activity) -> Result<Option<Credential>>;

    /// Exchange a sign-in code; `None` when the code is rejected
    async fn exchange_code(&self, activity: &Activity, code: &str) -> Result<Option<Credential>>;

    /// Revoke whatever token the provider holds for the activity's user
    async fn sign_out(&self, activity: &Activity) -> Result<()>;
}

/// Interpret an activity as the answer to a pending sign-in prompt.
///
/// Returns `None` when the activity carries no sign-in information at all.
pub async fn recognize_credential(provider: &dyn CredentialProvider, activity: &Activity) -> Result<Option<CredentialOutcome>> {
    let code = match activity.kind {
        ActivityKind::Message => match extract_magic_code(activity.text()) {
            Some(code) => code,
            None => return Ok(None),
        },
        ActivityKind::SystemInvoke if activity.name.as_deref() == Some(VERIFY_STATE_INVOKE) => {
            match activity.value_str("state") {
                Some(state) => state.to_string(),
                None => return Ok(Some(CredentialOutcome::Failure("sign-in confirmation without a code".to_string()))),
            }
        }
        ActivityKind::Event if activity.name.as_deref() == Some(TOKEN_RESPONSE_EVENT) => {
            return Ok(Some(match activity.value_str("token") {
                Some(token) if !token.is_empty() => CredentialOutcome::Success(Credential::new(token)),
                _ => CredentialOutcome::Failure("token response without a token".to_string()),
            }));
        }
        _ => return Ok(None),
    };

    match provider.exchange_code(activity, &code).await? {
        Some(credential) => Ok(Some(CredentialOutcome::Success(credential))),
        None => Ok(Some(CredentialOutcome::Failure("sign-in code was rejected".to_string()))),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    token: String,
    #[serde(default)]
    expiration: Option<DateTime<Utc>>,
}

/// Client for the channel's user token service
#[derive(Clone, Debug)]
pub struct TokenServiceClient {
    client: Client,
    config: OAuthConfig,
}

impl TokenServiceClient {
    /// Create a new TokenServiceClient instance
    pub fn new(config: OAuthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent("RoomBuddy-Bot/1.0")
            .build()
            .map_err(RoomBuddyError::Http)?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.token_service_url.trim_end_matches('/'), path)
    }

    async fn get_token(&self, activity: &Activity, code: Option<&str>) -> Result<Option<Credential>> {
        let mut query = vec![
            ("userId", activity.from.id.as_str()),
            ("connectionName", self.config.connection_name.as_str()),
            ("channelId", activity.channel_id.as_str()),
        ];
        if let Some(code) = code {
            query.push(("code", code));
        }

        let response = self.client
            .get(self.url("/api/usertoken/GetToken"))
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                log_api_error("token_service", &e.to_string(), Some("get_token"));
                RoomBuddyError::TokenService(e.to_string())
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(user_id = %activity.from.id, "No token available for user");
                Ok(None)
            }
            status if status.is_success() => {
                let body: TokenResponse = response.json().await
                    .map_err(|e| RoomBuddyError::TokenService(format!("Invalid token response: {}", e)))?;
                if body.token.is_empty() {
                    return Ok(None);
                }
                let credential = Credential::new(body.token);
                Ok(Some(match body.expiration {
                    Some(expires_at) => credential.with_expiry(expires_at),
                    None => credential,
                }))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                log_api_error("token_service", &format!("HTTP {}", status), Some("get_token"));
                Err(RoomBuddyError::TokenService(format!("HTTP {}: {}", status, error_text)))
            }
        }
    }
}

#[async_trait]
impl CredentialProvider for TokenServiceClient {
    fn connection_name(&self) -> &str {
        &self.config.connection_name
    }

    async fn cached_credential(&self, activity: &Activity) -> Result<Option<Credential>> {
        self.get_token(activity, None).await
    }

    async fn exchange_code(&self, activity: &Activity, code: &str) -> Result<Option<Credential>> {
        let credential = self.get_token(activity, Some(code)).await?;
        if credential.is_none() {
            warn!(user_id = %activity.from.id, "Sign-in code was not accepted");
        }
        Ok(credential)
    }

    async fn sign_out(&self, activity: &Activity) -> Result<()> {
        let response = self.client
            .delete(self.url("/api/usertoken/SignOut"))
            .query(&[
                ("userId", activity.from.id.as_str()),
                ("connectionName", self.config.connection_name.as_str()),
                ("channelId", activity.channel_id.as_str()),
            ])
            .send()
            .await
            .map_err(|e| RoomBuddyError::TokenService(e.to_string()))?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(RoomBuddyError::TokenService(format!("Sign out failed with HTTP {}", status)));
        }

        info!(user_id = %activity.from.id, "User signed out");
        Ok(())
    }
}

/// Provider that always hands out one configured token
#[derive(Clone)]
pub struct StaticCredentialProvider {
    connection_name: String,
    token: String,
}

impl StaticCredentialProvider {
    pub fn new(connection_name: impl Into<String>, token: impl Into<String>) -> Self {
        Self { connection_name: connection_name.into(), token: token.into() }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    fn connection_name(&self) -> &str {
        &self.connection_name
    }

    async fn cached_credential(&self, _activity: &Activity) -> Result<Option<Credential>> {
        Ok(Some(Credential::new(self.token.clone())))
    }

    async fn exchange_code(&self, _activity: &Activity, _code: &str) -> Result<Option<Credential>> {
        Ok(Some(Credential::new(self.token.clone())))
    }

    async fn sign_out(&self, _activity: &Activity) -> Result<()> {
        debug!("Static credentials cannot be revoked; ignoring sign out");
        Ok(())
    }
}
