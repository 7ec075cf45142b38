//! Test context for unified test setup
//!
//! Builds an `AppContext` around an in-memory state store, a fake credential
//! provider and the real Graph client pointed at a mock server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use RoomBuddy::config::Settings;
use RoomBuddy::models::{Activity, Reply};
use RoomBuddy::services::{Credential, CredentialProvider, GraphClient, ServiceFactory};
use RoomBuddy::state::{AppContext, ConversationState, MemoryStateStore, StateStore};
use RoomBuddy::utils::helpers::generate_uuid;
use RoomBuddy::{Result, TurnDispatcher};

use super::graph_mock::GraphMockServer;
use super::test_data::{self, TEST_TOKEN, VALID_CODE};

/// Credential provider driven by the test
pub struct FakeCredentialProvider {
    signed_in: bool,
    sign_outs: AtomicUsize,
}

impl FakeCredentialProvider {
    pub fn new(signed_in: bool) -> Self {
        Self { signed_in, sign_outs: AtomicUsize::new(0) }
    }

    /// How many times sign-out was requested
    pub fn sign_out_count(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialProvider for FakeCredentialProvider {
    fn connection_name(&self) -> &str {
        "graph"
    }

    async fn cached_credential(&self, _activity: &Activity) -> Result<Option<Credential>> {
        Ok(self.signed_in.then(|| Credential::new(TEST_TOKEN)))
    }

    async fn exchange_code(&self, _activity: &Activity, code: &str) -> Result<Option<Credential>> {
        Ok((code == VALID_CODE).then(|| Credential::new(TEST_TOKEN)))
    }

    async fn sign_out(&self, _activity: &Activity) -> Result<()> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Test configuration options
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// The user already holds a token, so no sign-in prompt is shown
    pub signed_in: bool,
}

/// Unified test context that manages all test components
pub struct TestContext {
    pub graph_mock: GraphMockServer,
    pub credentials: Arc<FakeCredentialProvider>,
    pub store: Arc<MemoryStateStore>,
    pub app: AppContext,
    pub dispatcher: TurnDispatcher,
    pub conversation_id: String,
}

impl TestContext {
    /// Create a context for a user who still has to sign in
    pub async fn new() -> Self {
        Self::new_with_config(TestConfig::default()).await
    }

    pub async fn new_with_config(config: TestConfig) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let graph_mock = GraphMockServer::new().await;
        let settings = create_test_settings(&graph_mock.api_url());

        let credentials = Arc::new(FakeCredentialProvider::new(config.signed_in));
        let store = Arc::new(MemoryStateStore::new());
        let graph = Arc::new(GraphClient::new(settings.graph.clone()).expect("Failed to create Graph client"));

        let services = ServiceFactory::from_parts(graph, credentials.clone());
        let dispatcher = TurnDispatcher::new(&settings).expect("Failed to create dispatcher");
        let app = AppContext::new(settings, store.clone(), services);

        Self {
            graph_mock,
            credentials,
            store,
            app,
            dispatcher,
            conversation_id: generate_uuid(),
        }
    }

    /// Send a text message from the test user
    pub async fn send(&self, text: &str) -> Result<Vec<Reply>> {
        let activity = test_data::message(&self.conversation_id, text);
        self.handle(&activity).await
    }

    pub async fn handle(&self, activity: &Activity) -> Result<Vec<Reply>> {
        self.dispatcher.handle_turn(&self.app, activity).await
    }

    /// Stored state of the test conversation
    pub async fn state(&self) -> ConversationState {
        self.store.load(&self.conversation_id).await.expect("Failed to load state")
    }

    /// Overwrite the stored state of the test conversation
    pub async fn save_state(&self, state: &ConversationState) {
        self.store.save(state).await.expect("Failed to save state");
    }
}

/// Create test-specific settings
pub fn create_test_settings(graph_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.oauth.connection_name = "graph".to_string();
    settings.oauth.prompt_timeout_seconds = 300;
    settings.graph.api_url = graph_url.to_string();
    settings.graph.timeout_seconds = 5;
    settings.logging.level = "debug".to_string();
    settings
}

/// Text of every reply, in order
pub fn reply_texts(replies: &[Reply]) -> Vec<String> {
    replies.iter().filter_map(|reply| reply.text.clone()).collect()
}
