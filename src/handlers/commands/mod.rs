//! Command parsing and dispatch
//!
//! Commands are plain words typed by the user once they are signed in:
//! `me`, `send <address>`, `recent`, `find [room]`, `token`, `continue`.

pub mod help;
pub mod mail;
pub mod profile;
pub mod rooms;

use tracing::debug;

use crate::services::Credential;
use crate::state::TurnContext;
use crate::utils::errors::Result;
use crate::utils::logging::log_command;

/// Words that sign the user out instead of running a command
pub const SIGN_OUT_WORDS: &[&str] = &["signout", "logout", "signoff", "logoff", "not me"];

/// Recognized verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Profile,
    SendMail,
    RecentMail,
    FindRoom,
    ShowToken,
    ContinueBooking,
    SignOut,
    Help,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Profile => "profile",
            Command::SendMail => "sendMail",
            Command::RecentMail => "recentMail",
            Command::FindRoom => "findRoom",
            Command::ShowToken => "showToken",
            Command::ContinueBooking => "continueBooking",
            Command::SignOut => "signOut",
            Command::Help => "help",
        }
    }
}

/// Utterance split into a verb and its argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lowercased first word, empty for blank input
    pub verb: String,
    /// Everything after the first whitespace run, as one argument
    pub args: Vec<String>,
}

impl ParsedCommand {
    /// Parse an utterance. Never fails.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text.split_once(char::is_whitespace) {
            Some((verb, rest)) => {
                let rest = rest.trim();
                Self {
                    verb: verb.to_lowercase(),
                    args: if rest.is_empty() { Vec::new() } else { vec![rest.to_string()] },
                }
            }
            None => Self {
                verb: text.to_lowercase(),
                args: Vec::new(),
            },
        }
    }

    /// Classify the verb. Matching is by prefix for everything but `me`.
    pub fn command(&self) -> Option<Command> {
        let verb = self.verb.as_str();
        if verb.is_empty() {
            return None;
        }

        if verb == "me" {
            Some(Command::Profile)
        } else if verb.starts_with("send") {
            Some(Command::SendMail)
        } else if verb.starts_with("recent") {
            Some(Command::RecentMail)
        } else if verb.starts_with("token") {
            Some(Command::ShowToken)
        } else if verb.starts_with("continue") {
            Some(Command::ContinueBooking)
        } else if verb.starts_with("find") {
            Some(Command::FindRoom)
        } else if verb == "help" {
            Some(Command::Help)
        } else if SIGN_OUT_WORDS.contains(&self.normalized().as_str()) {
            Some(Command::SignOut)
        } else {
            None
        }
    }

    /// First argument, if any
    pub fn arg(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    fn normalized(&self) -> String {
        match self.arg() {
            Some(arg) => format!("{} {}", self.verb, arg.to_lowercase()),
            None => self.verb.clone(),
        }
    }
}

/// Run a parsed command with the turn's credential.
///
/// Unrecognized verbs do nothing and send nothing.
pub async fn execute(turn: &mut TurnContext<'_>, credential: &Credential, command: &ParsedCommand) -> Result<()> {
    let conversation_id = turn.activity.conversation_id.clone();

    let Some(kind) = command.command() else {
        debug!(conversation_id = %conversation_id, verb = %command.verb, "No command matches, nothing to do");
        return Ok(());
    };

    log_command(&conversation_id, kind.as_str(), command.arg());

    match kind {
        Command::Profile => profile::handle_profile(turn, credential).await,
        Command::SendMail => mail::handle_send_mail(turn, credential, command.arg()).await,
        Command::RecentMail => mail::handle_recent_mail(turn, credential).await,
        Command::FindRoom => rooms::handle_find_room(turn, credential, command.arg()).await,
        Command::ShowToken => profile::handle_show_token(turn, credential).await,
        Command::ContinueBooking => rooms::handle_continue_booking(turn, credential).await,
        Command::Help => help::handle_help(turn).await,
        Command::SignOut => crate::handlers::messages::handle_sign_out(turn).await,
    }
}
