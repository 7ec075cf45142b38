//! Room command handlers

use chrono::Duration;
use tracing::debug;

use crate::handlers::cards::room_choice_card;
use crate::models::activity::Reply;
use crate::models::graph::{MeetingTimeSuggestion, TimeWindow};
use crate::services::Credential;
use crate::state::TurnContext;
use crate::utils::errors::Result;

/// Placeholder room list until rooms are looked up per organization
pub const SAMPLE_ROOMS: [&str; 3] = ["Room one", "Room two", "Room three"];

const SEARCH_HOURS: i64 = 24;
const MEETING_DURATION: &str = "PT1H";

/// Handle `continue`
pub async fn handle_continue_booking(turn: &mut TurnContext<'_>, credential: &Credential) -> Result<()> {
    let profile = turn.app.graph.get_profile(credential).await?;
    let org_unit = profile.org_unit().to_string();
    debug!(conversation_id = %turn.activity.conversation_id, org_unit = %org_unit, "Listing rooms");

    let reply = Reply::text(turn.activity, format!("You are {} in {}", profile, org_unit))
        .with_attachment(room_choice_card(&org_unit, &SAMPLE_ROOMS));

    turn.send(reply);
    Ok(())
}

/// Handle `find [room]`
pub async fn handle_find_room(turn: &mut TurnContext<'_>, credential: &Credential, room_name: Option<&str>) -> Result<()> {
    let window = TimeWindow::starting_now(Duration::hours(SEARCH_HOURS));
    let suggestions = turn
        .app
        .graph
        .find_room(credential, window, MEETING_DURATION, room_name.unwrap_or(""), None)
        .await?;

    if suggestions.meeting_time_suggestions.is_empty() {
        let reason = suggestions
            .empty_suggestions_reason
            .unwrap_or_else(|| "no reason given".to_string());
        turn.send_text(format!("I couldn't find a free room: {}", reason));
        return Ok(());
    }

    let lines: Vec<String> = suggestions.meeting_time_suggestions.iter().map(describe_slot).collect();
    turn.send_text(format!("These times are free:\n{}", lines.join("\n")));
    Ok(())
}

fn describe_slot(suggestion: &MeetingTimeSuggestion) -> String {
    let slot = &suggestion.meeting_time_slot;
    let rooms: Vec<&str> = suggestion
        .locations
        .iter()
        .filter_map(|location| location.display_name.as_deref())
        .collect();

    if rooms.is_empty() {
        format!("{} to {}", slot.start.date_time, slot.end.date_time)
    } else {
        format!("{} to {} in {}", slot.start.date_time, slot.end.date_time, rooms.join(", "))
    }
}
