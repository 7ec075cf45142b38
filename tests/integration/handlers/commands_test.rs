//! Command integration tests
//!
//! The user is already signed in, so every command runs in a single turn.

use serde_json::json;
use RoomBuddy::handlers::commands::rooms::SAMPLE_ROOMS;
use RoomBuddy::models::AttachmentLayout;

use crate::helpers::*;

async fn signed_in() -> TestContext {
    TestContext::new_with_config(TestConfig { signed_in: true }).await
}

#[tokio::test]
async fn test_me_replies_with_profile() {
    let ctx = signed_in().await;
    ctx.graph_mock.mock_profile(profile_json()).await;

    let replies = ctx.send("me").await.unwrap();

    assert_eq!(
        reply_texts(&replies),
        vec!["You are Ada Lovelace (ada@contoso.com), Engineer"]
    );
    assert!(ctx.state().await.is_idle());
}

#[tokio::test]
async fn test_recent_truncates_to_five_cards() {
    let ctx = signed_in().await;
    ctx.graph_mock.mock_recent_mail(7).await;

    let replies = ctx.send("recent").await.unwrap();

    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].attachment_layout, AttachmentLayout::Carousel);
    assert_eq!(replies[0].attachments.len(), 5);

    let first = replies[0].attachments[0].as_hero().unwrap();
    assert_eq!(first.title, "Subject 1");
    assert_eq!(first.subtitle.as_deref(), Some("Sender 1 <sender1@contoso.com>"));
    assert_eq!(first.text.as_deref(), Some("Preview 1"));
}

#[tokio::test]
async fn test_recent_with_empty_inbox() {
    let ctx = signed_in().await;
    ctx.graph_mock.mock_recent_mail(0).await;

    let replies = ctx.send("recent").await.unwrap();

    assert_eq!(reply_texts(&replies), vec!["Unable to find any recent unread mail."]);
    assert!(replies[0].attachments.is_empty());
}

#[tokio::test]
async fn test_send_mails_the_given_address() {
    let ctx = signed_in().await;
    ctx.graph_mock.mock_profile(profile_json()).await;
    ctx.graph_mock.mock_send_mail().await;

    let replies = ctx.send("send bob@x.com").await.unwrap();

    assert_eq!(
        reply_texts(&replies),
        vec!["I sent a message to 'bob@x.com' from your account."]
    );

    let requests = ctx.graph_mock.server.received_requests().await.unwrap();
    let send = requests.iter().find(|r| r.url.path() == "/me/sendMail").unwrap();
    let body: serde_json::Value = serde_json::from_slice(&send.body).unwrap();
    assert_eq!(body["message"]["subject"], "Message from a bot!");
    assert_eq!(body["message"]["toRecipients"][0]["emailAddress"]["address"], "bob@x.com");
    assert_eq!(
        body["message"]["body"]["content"],
        "Hi there! I had this message sent from a bot. - Your friend, Ada Lovelace"
    );
}

#[tokio::test]
async fn test_send_without_address_gives_usage_hint() {
    let ctx = signed_in().await;

    let replies = ctx.send("send").await.unwrap();

    assert_eq!(replies.len(), 1);
    assert!(replies[0].text.as_deref().unwrap().contains("send someone@example.com"));
    assert_eq!(ctx.graph_mock.request_count().await, 0);
    assert!(ctx.state().await.is_idle());
}

#[tokio::test]
async fn test_token_shows_the_credential() {
    let ctx = signed_in().await;

    let replies = ctx.send("token").await.unwrap();

    assert_eq!(reply_texts(&replies), vec![format!("Your token is: {}", TEST_TOKEN)]);
    assert_eq!(ctx.graph_mock.request_count().await, 0);
}

#[tokio::test]
async fn test_continue_lists_three_sample_rooms() {
    let ctx = signed_in().await;
    ctx.graph_mock.mock_profile(profile_json()).await;

    let replies = ctx.send("continue").await.unwrap();

    assert_eq!(replies.len(), 1);
    assert!(replies[0].text.as_deref().unwrap().contains("Ada Lovelace"));

    let card = replies[0].attachments[0].as_hero().unwrap();
    assert_eq!(card.title, "For Contoso I have these rooms listed");
    assert_eq!(card.buttons.len(), 3);
    for (index, button) in card.buttons.iter().enumerate() {
        assert_eq!(button.title, SAMPLE_ROOMS[index]);
        assert_eq!(button.value, json!(index + 1));
    }
}

#[tokio::test]
async fn test_find_lists_free_slots() {
    let ctx = signed_in().await;
    ctx.graph_mock
        .mock_find_meeting_times(json!({
            "meetingTimeSuggestions": [{
                "confidence": 100.0,
                "meetingTimeSlot": {
                    "start": { "dateTime": "2024-01-01T10:00:00", "timeZone": "UTC" },
                    "end": { "dateTime": "2024-01-01T11:00:00", "timeZone": "UTC" }
                },
                "locations": [{ "displayName": "Board Room" }]
            }]
        }))
        .await;

    let replies = ctx.send("find Board Room").await.unwrap();

    let text = replies[0].text.as_deref().unwrap();
    assert!(text.contains("2024-01-01T10:00:00 to 2024-01-01T11:00:00 in Board Room"));

    let requests = ctx.graph_mock.server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["meetingDuration"], "PT1H");
    assert_eq!(body["locationConstraint"]["locations"][0]["displayName"], "Board Room");
}

#[tokio::test]
async fn test_find_reports_empty_reason() {
    let ctx = signed_in().await;
    ctx.graph_mock
        .mock_find_meeting_times(json!({
            "meetingTimeSuggestions": [],
            "emptySuggestionsReason": "AttendeesUnavailable"
        }))
        .await;

    let replies = ctx.send("find").await.unwrap();

    assert_eq!(reply_texts(&replies), vec!["I couldn't find a free room: AttendeesUnavailable"]);
}

#[tokio::test]
async fn test_unknown_verb_is_silent() {
    let ctx = signed_in().await;

    let replies = ctx.send("dance").await.unwrap();

    assert!(replies.is_empty());
    assert_eq!(ctx.graph_mock.request_count().await, 0);
    let state = ctx.state().await;
    assert!(state.is_idle());
    assert!(state.pending_command_text.is_none());
}

#[tokio::test]
async fn test_empty_input_is_silent() {
    let ctx = signed_in().await;

    let replies = ctx.send("").await.unwrap();

    assert!(replies.is_empty());
    assert_eq!(ctx.graph_mock.request_count().await, 0);
    assert!(ctx.state().await.is_idle());
}

#[tokio::test]
async fn test_downstream_failure_is_reported_once() {
    let ctx = signed_in().await;
    ctx.graph_mock.mock_failure("GET", "/me", 500).await;

    let replies = ctx.send("me").await.unwrap();

    assert_eq!(replies.len(), 1);
    assert!(replies[0].text.as_deref().unwrap().starts_with("Sorry, something went wrong:"));
    let state = ctx.state().await;
    assert!(state.is_idle());
    assert!(state.pending_command_text.is_none());
}

#[tokio::test]
async fn test_rejected_token_reports_login_failure() {
    let ctx = signed_in().await;
    ctx.graph_mock.mock_failure("GET", "/me", 401).await;

    let replies = ctx.send("me").await.unwrap();

    assert_eq!(reply_texts(&replies), vec!["We couldn't log you in. Please try again later."]);
}
