//! Graph resource models
//!
//! Only the fields the bot reads or writes are modelled.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub mail: Option<String>,
    pub user_principal_name: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub department: Option<String>,
    pub office_location: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("an unnamed user")
    }

    /// Address to show for the user, preferring the mailbox over the sign-in name
    pub fn address(&self) -> Option<&str> {
        self.mail.as_deref().or(self.user_principal_name.as_deref())
    }

    /// Organizational unit used to pick meeting rooms
    pub fn org_unit(&self) -> &str {
        self.company_name
            .as_deref()
            .or(self.department.as_deref())
            .or(self.office_location.as_deref())
            .unwrap_or("your organization")
    }
}

impl std::fmt::Display for UserProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())?;
        if let Some(address) = self.address() {
            write!(f, " ({})", address)?;
        }
        if let Some(job_title) = &self.job_title {
            write!(f, ", {}", job_title)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAddress {
    #[serde(default)]
    pub name: Option<String>,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub email_address: EmailAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body_preview: Option<String>,
    #[serde(default)]
    pub from: Option<Recipient>,
    #[serde(default)]
    pub received_date_time: Option<DateTime<Utc>>,
}

impl MailMessage {
    /// "Name <address>" of the sender
    pub fn sender(&self) -> String {
        match &self.from {
            Some(from) => format!(
                "{} <{}>",
                from.email_address.name.as_deref().unwrap_or(""),
                from.email_address.address
            ),
            None => "unknown sender".to_string(),
        }
    }
}

/// Time range searched for meeting slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window starting now and lasting the given duration
    pub fn starting_now(duration: chrono::Duration) -> Self {
        let start = Utc::now();
        Self { start, end: start + duration }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeTimeZone {
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start: DateTimeTimeZone,
    pub end: DateTimeTimeZone,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedLocation {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub location_email_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingTimeSuggestion {
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub suggestion_reason: Option<String>,
    pub meeting_time_slot: TimeSlot,
    #[serde(default)]
    pub locations: Vec<SuggestedLocation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingTimeSuggestions {
    #[serde(default)]
    pub meeting_time_suggestions: Vec<MeetingTimeSuggestion>,
    #[serde(default)]
    pub empty_suggestions_reason: Option<String>,
}
