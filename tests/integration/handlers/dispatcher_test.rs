//! Turn dispatcher integration tests

use assert_matches::assert_matches;
use RoomBuddy::handlers::commands::help::HELP_TEXT;
use RoomBuddy::models::{Activity, ActivityKind, ChannelAccount};
use RoomBuddy::state::{DialogFrame, DialogStep, StateStore, AUTH_THEN_EXECUTE};
use RoomBuddy::{RoomBuddyError, TurnDispatcher};

use crate::helpers::*;

#[tokio::test]
async fn test_welcome_skips_the_bot_itself() {
    let ctx = TestContext::new().await;
    let activity = members_added(
        &ctx.conversation_id,
        vec![test_bot(), ChannelAccount::new("user-1", "Ada"), ChannelAccount::new("user-2", "Grace")],
    );

    let replies = ctx.handle(&activity).await.unwrap();

    assert_eq!(replies.len(), 2);
    let titles: Vec<String> = replies
        .iter()
        .map(|reply| reply.attachments[0].as_hero().unwrap().title.clone())
        .collect();
    assert_eq!(titles, vec!["Welcome Ada", "Welcome Grace"]);
    assert_eq!(replies[0].text.as_deref(), Some(ctx.app.settings.bot.welcome_text.as_str()));
}

#[tokio::test]
async fn test_bot_joining_alone_sends_nothing() {
    let ctx = TestContext::new().await;
    let activity = members_added(&ctx.conversation_id, vec![test_bot()]);

    let replies = ctx.handle(&activity).await.unwrap();
    assert!(replies.is_empty());
}

#[tokio::test]
async fn test_sign_out_words_clear_the_dialog() {
    for word in ["signout", "logout", "signoff", "logoff", "not me", "  Not Me "] {
        let ctx = TestContext::new().await;

        ctx.send("me").await.unwrap();
        assert_eq!(ctx.state().await.dialog_stack.len(), 1);

        let replies = ctx.send(word).await.unwrap();

        assert_eq!(reply_texts(&replies), vec!["You are now signed out."], "{}", word);
        let state = ctx.state().await;
        assert!(state.is_idle());
        assert!(state.pending_command_text.is_none());
        assert_eq!(ctx.credentials.sign_out_count(), 1);
    }
}

#[tokio::test]
async fn test_help_does_not_start_the_dialog() {
    let ctx = TestContext::new().await;

    let replies = ctx.send("HELP").await.unwrap();

    assert_eq!(reply_texts(&replies), vec![HELP_TEXT]);
    assert!(ctx.state().await.is_idle());
}

#[tokio::test]
async fn test_verify_state_on_unsupported_channel_fails() {
    let ctx = TestContext::new().await;
    ctx.send("me").await.unwrap();

    let activity = verify_state("slack", &ctx.conversation_id, VALID_CODE);
    let result = ctx.handle(&activity).await;

    assert_matches!(result, Err(RoomBuddyError::UnsupportedChannel { channel }) if channel == "slack");
    // The pending dialog is untouched
    assert_eq!(ctx.state().await.pending_command_text.as_deref(), Some("me"));
}

#[tokio::test]
async fn test_unknown_activity_kind_is_ignored() {
    let ctx = TestContext::new().await;
    let mut activity = message(&ctx.conversation_id, "me");
    activity.kind = ActivityKind::Unknown;

    let replies = ctx.handle(&activity).await.unwrap();

    assert!(replies.is_empty());
    assert!(ctx.store.is_empty().await);
}

#[tokio::test]
async fn test_typing_activity_from_the_wire_is_ignored() {
    let ctx = TestContext::new().await;
    let json = format!(
        r#"{{"type":"typing","id":"t1","channelId":"test","conversationId":"{}","from":{{"id":"user-1"}},"recipient":{{"id":"bot-1"}},"timestamp":"2024-01-01T10:00:00Z"}}"#,
        ctx.conversation_id
    );
    let activity: Activity = serde_json::from_str(&json).unwrap();

    assert!(ctx.handle(&activity).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_stale_execute_frame_restarts_the_dialog() {
    let ctx = TestContext::new().await;
    let mut state = ctx.state().await;
    state.set_pending_command("recent");
    state.push_frame(DialogFrame::new(AUTH_THEN_EXECUTE, DialogStep::ExecuteCommand));
    ctx.save_state(&state).await;

    let replies = ctx.send("me").await.unwrap();

    assert!(replies[0].attachments[0].as_oauth().is_some());
    let state = ctx.state().await;
    assert_eq!(state.dialog_stack.len(), 1);
    assert_eq!(state.active_frame().unwrap().step, DialogStep::PromptForAuth);
}

#[test]
fn test_dispatcher_refuses_blank_connection_name() {
    let mut settings = create_test_settings("http://localhost");
    settings.oauth.connection_name = "   ".to_string();

    assert_matches!(TurnDispatcher::new(&settings), Err(RoomBuddyError::Config(_)));
}

#[tokio::test]
async fn test_failed_sign_out_still_clears_the_dialog() {
    let token_service = TokenServiceMock::new().await;
    token_service.mock_no_token().await;
    token_service.mock_sign_out(500).await;

    let mut settings = create_test_settings("http://localhost");
    settings.oauth.token_service_url = token_service.url();
    let services = RoomBuddy::services::ServiceFactory::new(&settings).unwrap();
    let store = std::sync::Arc::new(RoomBuddy::state::MemoryStateStore::new());
    let app = RoomBuddy::AppContext::new(settings.clone(), store.clone(), services);
    let dispatcher = TurnDispatcher::new(&settings).unwrap();

    let replies = dispatcher.handle_turn(&app, &message("c1", "me")).await.unwrap();
    assert!(replies[0].attachments[0].as_oauth().is_some());

    let replies = dispatcher.handle_turn(&app, &message("c1", "logout")).await.unwrap();

    assert_eq!(replies.len(), 1);
    assert!(replies[0].text.as_deref().unwrap().starts_with("Sorry, something went wrong:"));
    let state = store.load("c1").await.unwrap();
    assert!(state.is_idle());
    assert!(state.pending_command_text.is_none());
}
