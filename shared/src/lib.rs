use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pregnancy state of a breeding pair.
///
/// Serialized with the labels used in the breeding CSV file and shown in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PregnancyStatus {
    #[serde(rename = "Not Pregnant")]
    NotPregnant,
    #[serde(rename = "Pregnant")]
    Pregnant,
}

impl PregnancyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PregnancyStatus::NotPregnant => "Not Pregnant",
            PregnancyStatus::Pregnant => "Pregnant",
        }
    }
}

impl Default for PregnancyStatus {
    fn default() -> Self {
        PregnancyStatus::NotPregnant
    }
}

impl fmt::Display for PregnancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PregnancyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pregnant" => Ok(PregnancyStatus::Pregnant),
            "Not Pregnant" => Ok(PregnancyStatus::NotPregnant),
            other => Err(format!("Unknown pregnancy status: '{}'", other)),
        }
    }
}

/// A breeding pair as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingPair {
    /// Generated identifier, "Pair N"
    pub pair_id: String,
    pub male_id: String,
    pub female_id: String,
    /// ISO date (YYYY-MM-DD)
    pub date_set_up: String,
    pub pregnancy_status: PregnancyStatus,
    /// ISO date (YYYY-MM-DD), absent until a delivery date is recorded
    pub expected_delivery: Option<String>,
    pub litter_size: u32,
    /// Derived: expected delivery + 21 days
    pub weaning_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingListResponse {
    pub pairs: Vec<BreedingPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddBreedingPairRequest {
    pub male_id: String,
    pub female_id: String,
    /// ISO date; today when omitted
    pub date_set_up: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddBreedingPairResponse {
    pub pair: BreedingPair,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePregnancyStatusRequest {
    pub pregnancy_status: PregnancyStatus,
    /// ISO date; `None` clears the expected delivery
    pub expected_delivery: Option<String>,
    pub litter_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePregnancyStatusResponse {
    pub pair_id: String,
    pub updated_count: usize,
    pub success_message: String,
}

/// One row of the breeding table view, every field preformatted for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingTableRow {
    pub pair_id: String,
    pub male_id: String,
    pub female_id: String,
    pub date_set_up: String,
    pub pregnancy_status: String,
    pub expected_delivery: String,
    pub litter_size: u32,
    pub weaning_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingTableResponse {
    pub rows: Vec<BreedingTableRow>,
    pub total_pairs: usize,
}

/// Pair ids offered by the update-status form, most recent first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairChoicesResponse {
    pub pair_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLitterBar {
    pub pair_id: String,
    pub pregnancy_status: PregnancyStatus,
    pub litter_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LitterPoint {
    pub date: String,
    pub litter_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LitterSeries {
    pub label: String,
    pub points: Vec<LitterPoint>,
}

/// Data behind the litter-size visualizations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LitterChartResponse {
    pub status_bars: Vec<StatusLitterBar>,
    pub date_series: Vec<LitterSeries>,
}

/// A reminder as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub task: String,
    /// Combined date and time, "YYYY-MM-DD HH:MM:SS", or the stored text if it is not a date
    pub due_at: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderListResponse {
    pub reminders: Vec<Reminder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddReminderRequest {
    pub task: String,
    /// ISO date (YYYY-MM-DD); today when omitted
    pub date: Option<String>,
    /// "HH:MM" or "HH:MM:SS"; 08:45 when omitted
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddReminderResponse {
    pub reminder: Reminder,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteReminderResponse {
    pub reminder: Reminder,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearCompletedResponse {
    pub removed_count: usize,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token to send with every subsequent request
    pub token: String,
    pub username: String,
    /// RFC 3339
    pub issued_at: String,
    /// RFC 3339
    pub expires_at: String,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub username: String,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub username: String,
    pub issued_at: String,
    pub expires_at: String,
    pub seconds_remaining: i64,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
