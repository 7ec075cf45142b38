//! RoomBuddy console host
//!
//! Main application entry point. Feeds lines typed on stdin to the bot as
//! message activities and prints the replies.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use RoomBuddy::{
    config::Settings,
    handlers::TurnDispatcher,
    models::{Activity, Attachment, ChannelAccount, Reply},
    state::AppContext,
    utils::{helpers::generate_uuid, logging},
};

const CONSOLE_CHANNEL: &str = "console";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", RoomBuddy::info());

    let dispatcher = TurnDispatcher::new(&settings)?;
    let bot = ChannelAccount::new("roombuddy", settings.bot.name.clone());
    let user = ChannelAccount::new("console-user", whoami());
    let app = AppContext::from_settings(settings).await?;
    let conversation_id = generate_uuid();

    info!(conversation_id = %conversation_id, "Console conversation started");

    let welcome = Activity::members_added(CONSOLE_CHANNEL, &conversation_id, bot.clone(), vec![bot.clone(), user.clone()]);
    run_turn(&dispatcher, &app, &welcome).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let activity = Activity::message(CONSOLE_CHANNEL, &conversation_id, user.clone(), bot.clone(), &line);
                run_turn(&dispatcher, &app, &activity).await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    info!("RoomBuddy has been shut down.");
    Ok(())
}

async fn run_turn(dispatcher: &TurnDispatcher, app: &AppContext, activity: &Activity) {
    match dispatcher.handle_turn(app, activity).await {
        Ok(replies) => replies.iter().for_each(print_reply),
        Err(e) => {
            error!(error = %e, "Turn failed");
            eprintln!("error: {}", e);
        }
    }
}

fn print_reply(reply: &Reply) {
    if let Some(text) = &reply.text {
        println!("{}", text);
    }

    for attachment in &reply.attachments {
        match attachment {
            Attachment::Hero(card) => {
                println!("[{}]", card.title);
                if let Some(subtitle) = &card.subtitle {
                    println!("  {}", subtitle);
                }
                if let Some(text) = &card.text {
                    println!("  {}", text);
                }
                for button in &card.buttons {
                    println!("  ({}) {}", button.value, button.title);
                }
            }
            Attachment::OAuth(card) => {
                println!("[{}] {} ({})", card.title, card.text, card.connection_name);
                println!("  Reply with the 6-digit code once signed in.");
            }
        }
    }
}

fn whoami() -> String {
    std::env::var("USER").unwrap_or_else(|_| "console user".to_string())
}
