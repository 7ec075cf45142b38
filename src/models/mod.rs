//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod activity;
pub mod card;
pub mod graph;

// Re-export commonly used models
pub use activity::{Activity, ActivityKind, AttachmentLayout, ChannelAccount, Reply};
pub use card::{ActionType, Attachment, CardAction, CardImage, HeroCard, OAuthCard};
pub use graph::{MailMessage, MeetingTimeSuggestion, MeetingTimeSuggestions, TimeWindow, UserProfile};
