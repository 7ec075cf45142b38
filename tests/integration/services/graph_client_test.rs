//! Graph client tests against a mock server

use assert_matches::assert_matches;
use RoomBuddy::config::GraphConfig;
use RoomBuddy::services::{Credential, GraphApi, GraphClient};
use RoomBuddy::utils::errors::GraphError;
use RoomBuddy::RoomBuddyError;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::*;

fn client(mock: &GraphMockServer) -> GraphClient {
    GraphClient::new(GraphConfig {
        api_url: mock.api_url(),
        timeout_seconds: 5,
        timezone: "Pacific Standard Time".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_requests_carry_token_and_timezone() {
    let mock = GraphMockServer::new().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("prefer", "outlook.timezone=\"Pacific Standard Time\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
        .expect(1)
        .mount(&mock.server)
        .await;

    let profile = client(&mock).get_profile(&Credential::new(TEST_TOKEN)).await.unwrap();

    assert_eq!(profile.display_name(), "Ada Lovelace");
    assert_eq!(profile.org_unit(), "Contoso");
}

#[tokio::test]
async fn test_recent_mail_asks_for_five_and_keeps_five() {
    let mock = GraphMockServer::new().await;
    let messages: Vec<serde_json::Value> = (1..=8).map(mail_message).collect();
    Mock::given(method("GET"))
        .and(path("/me/mailFolders/inbox/messages"))
        .and(query_param("$top", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "value": messages })))
        .mount(&mock.server)
        .await;

    let mail = client(&mock).list_recent_mail(&Credential::new(TEST_TOKEN)).await.unwrap();

    assert_eq!(mail.len(), 5);
    assert_eq!(mail[4].subject.as_deref(), Some("Subject 5"));
}

#[tokio::test]
async fn test_unauthorized_maps_to_graph_error() {
    let mock = GraphMockServer::new().await;
    mock.mock_failure("GET", "/me", 401).await;

    let result = client(&mock).get_profile(&Credential::new(TEST_TOKEN)).await;

    assert_matches!(result, Err(RoomBuddyError::Graph(GraphError::Unauthorized)));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock = GraphMockServer::new().await;
    mock.mock_failure("POST", "/me/sendMail", 503).await;

    let result = client(&mock)
        .send_mail(&Credential::new(TEST_TOKEN), "bob@x.com", "Hi", "Body")
        .await;

    assert_matches!(result, Err(RoomBuddyError::Graph(GraphError::RequestFailed(_))));
    assert_eq!(mock.request_count().await, 1);
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let mock = GraphMockServer::new().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock.server)
        .await;

    let result = client(&mock).get_profile(&Credential::new(TEST_TOKEN)).await;

    assert_matches!(result, Err(RoomBuddyError::Graph(GraphError::InvalidResponse(_))));
}
