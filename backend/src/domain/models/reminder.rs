use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Format of the combined due date/time in storage and over the API
pub const DUE_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    /// Stable key; list position is never used to address a reminder
    pub id: String,
    pub task: String,
    /// `None` when the stored date could not be read
    pub due_at: Option<NaiveDateTime>,
    /// Stored date text kept verbatim when `due_at` is `None`
    pub unparsed_due_at: Option<String>,
    pub completed: bool,
}

impl Reminder {
    pub fn new(task: String, due_at: NaiveDateTime) -> Self {
        Self {
            id: Self::generate_id(),
            task,
            due_at: Some(due_at),
            unparsed_due_at: None,
            completed: false,
        }
    }

    /// Rebuild a stored reminder, keeping the raw date text if it does not parse
    pub fn from_stored(id: String, task: String, raw_date: &str, completed: bool) -> Self {
        let due_at = parse_due_at(raw_date);
        Self {
            id,
            task,
            unparsed_due_at: due_at.is_none().then(|| raw_date.to_string()),
            due_at,
            completed,
        }
    }

    pub fn generate_id() -> String {
        format!("reminder::{}", uuid::Uuid::new_v4())
    }

    pub fn format_due_at(&self) -> String {
        match (&self.due_at, &self.unparsed_due_at) {
            (Some(due_at), _) => due_at.format(DUE_AT_FORMAT).to_string(),
            (None, Some(raw)) => raw.clone(),
            (None, None) => String::new(),
        }
    }
}

/// Time of day used when a reminder is created without one
pub fn default_reminder_time() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 45, 0).unwrap_or(NaiveTime::MIN)
}

/// Parse a stored due date. Accepts the canonical format as well as the
/// `T`-separated and fractional-second variants older files may contain.
pub fn parse_due_at(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ReminderError {
    #[error("Reminder not found: {0}")]
    NotFound(String),
    #[error("No reminder at position {0}")]
    NoReminderAtPosition(usize),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
}
