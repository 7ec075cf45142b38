//! Services module
//!
//! This module contains the collaborators the dialog talks to: the Graph API
//! and the credential provider.

pub mod graph;
pub mod oauth;

// Re-export commonly used services
pub use graph::{GraphApi, GraphClient, RECENT_MAIL_LIMIT};
pub use oauth::{recognize_credential, Credential, CredentialOutcome, CredentialProvider, StaticCredentialProvider, TokenServiceClient};

use std::sync::Arc;
use tracing::info;
use crate::config::settings::Settings;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub graph: Arc<dyn GraphApi>,
    pub credentials: Arc<dyn CredentialProvider>,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings) -> Result<Self> {
        let graph: Arc<dyn GraphApi> = Arc::new(GraphClient::new(settings.graph.clone())?);

        let credentials: Arc<dyn CredentialProvider> = match &settings.oauth.static_token {
            Some(token) => {
                info!("Using a static token instead of the token service");
                Arc::new(StaticCredentialProvider::new(settings.oauth.connection_name.clone(), token.clone()))
            }
            None => Arc::new(TokenServiceClient::new(settings.oauth.clone())?),
        };

        Ok(Self { graph, credentials })
    }

    /// Create a factory from already constructed collaborators
    pub fn from_parts(graph: Arc<dyn GraphApi>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self { graph, credentials }
    }
}

impl std::fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceFactory")
            .field("connection_name", &self.credentials.connection_name())
            .finish_non_exhaustive()
    }
}
