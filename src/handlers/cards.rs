//! Card builders
//!
//! Functions here only assemble card data; channels do the rendering.

use serde_json::json;

use crate::models::card::{ActionType, Attachment, CardAction, CardImage, HeroCard, OAuthCard};
use crate::models::graph::MailMessage;
use crate::utils::helpers::truncate_text;

const WELCOME_IMAGE_URL: &str =
    "https://i0.wp.com/static1.wikia.nocookie.net/__cb20121001100335/adventuretimewithfinnandjake/images/5/56/Get_A_Room.png";
const DIRECTORY_LOGO_URL: &str = "https://botframeworksamples.blob.core.windows.net/samples/aadlogo.png";
const DIRECTORY_PORTAL_URL: &str = "https://ms.portal.azure.com/#blade/Microsoft_AAD_IAM/ActiveDirectoryMenuBlade/Overview";
const PREVIEW_LENGTH: usize = 240;
const OUTLOOK_LOGO_URL: &str = "https://botframeworksamples.blob.core.windows.net/samples/OutlookLogo.jpg";

/// Button value the welcome card posts when the user is someone else
pub const NOT_ME: &str = "Not Me";
/// Button value the welcome card posts to carry on
pub const CONTINUE: &str = "Continue";

/// Card asking a newly joined user whether this is them
pub fn welcome_card(user_name: &str) -> Attachment {
    Attachment::Hero(HeroCard {
        title: format!("Welcome {}", user_name),
        images: vec![CardImage {
            url: WELCOME_IMAGE_URL.to_string(),
            alt: Some("Get A Room".to_string()),
            tap: None,
        }],
        buttons: vec![
            CardAction::im_back(NOT_ME, json!(NOT_ME)),
            CardAction::im_back(CONTINUE, json!(CONTINUE)),
        ],
        ..Default::default()
    })
}

/// Card listing rooms to choose from; selection values start at 1
pub fn room_choice_card(org_unit: &str, rooms: &[&str]) -> Attachment {
    let buttons = rooms
        .iter()
        .enumerate()
        .map(|(index, room)| CardAction::im_back(*room, json!(index + 1)))
        .collect();

    Attachment::Hero(HeroCard {
        title: format!("For {} I have these rooms listed", org_unit),
        subtitle: Some("Choose which one you want to use".to_string()),
        images: vec![CardImage {
            url: DIRECTORY_LOGO_URL.to_string(),
            alt: Some("Directory".to_string()),
            tap: Some(CardAction::open_url("Directory", DIRECTORY_PORTAL_URL)),
        }],
        buttons,
        ..Default::default()
    })
}

/// One card per mail message for the recent mail carousel
pub fn mail_card(message: &MailMessage) -> Attachment {
    Attachment::Hero(HeroCard {
        title: message.subject.clone().unwrap_or_default(),
        subtitle: Some(message.sender()),
        text: message.body_preview.as_deref().map(|preview| truncate_text(preview, PREVIEW_LENGTH)),
        images: vec![CardImage {
            url: OUTLOOK_LOGO_URL.to_string(),
            alt: Some("Outlook Logo".to_string()),
            tap: None,
        }],
        buttons: Vec::new(),
    })
}

/// Sign-in prompt for the given OAuth connection
pub fn sign_in_card(connection_name: &str) -> Attachment {
    Attachment::OAuth(OAuthCard {
        title: "Login".to_string(),
        text: "Please click here to login".to_string(),
        connection_name: connection_name.to_string(),
        buttons: vec![CardAction {
            action_type: ActionType::Signin,
            title: "Sign In".to_string(),
            value: json!(connection_name),
        }],
    })
}
