// backend/src/domain/commands.rs

//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod auth {
    use chrono::{DateTime, Utc};

    use crate::domain::models::session::Session;

    #[derive(Debug, Clone)]
    pub struct LoginCommand {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Clone)]
    pub struct LoginResult {
        pub session: Session,
        pub expires_at: DateTime<Utc>,
        pub success_message: String,
    }

    #[derive(Debug, Clone)]
    pub struct RegisterCommand {
        pub username: String,
        pub password: String,
        pub confirm_password: String,
    }

    #[derive(Debug, Clone)]
    pub struct RegisterResult {
        pub username: String,
        pub success_message: String,
    }
}

pub mod breeding {
    use chrono::NaiveDate;
    use shared::PregnancyStatus;

    use crate::domain::models::breeding_pair::BreedingPair;

    /// Input for setting up a new breeding pair.
    #[derive(Debug, Clone)]
    pub struct AddBreedingPairCommand {
        pub male_id: String,
        pub female_id: String,
        /// Today when `None`
        pub date_set_up: Option<NaiveDate>,
    }

    #[derive(Debug, Clone)]
    pub struct AddBreedingPairResult {
        pub pair: BreedingPair,
        pub success_message: String,
    }

    /// Overwrites status, delivery date and litter size together.
    #[derive(Debug, Clone)]
    pub struct UpdatePregnancyStatusCommand {
        pub pair_id: String,
        pub pregnancy_status: PregnancyStatus,
        pub expected_delivery: Option<NaiveDate>,
        pub litter_size: u32,
    }

    #[derive(Debug, Clone)]
    pub struct UpdatePregnancyStatusResult {
        pub pair_id: String,
        pub updated_count: usize,
        pub success_message: String,
    }
}

pub mod reminders {
    use chrono::{NaiveDate, NaiveTime};

    use crate::domain::models::reminder::Reminder;

    #[derive(Debug, Clone)]
    pub struct AddReminderCommand {
        pub task: String,
        /// Today when `None`
        pub date: Option<NaiveDate>,
        /// 08:45 when `None`
        pub time: Option<NaiveTime>,
    }

    #[derive(Debug, Clone)]
    pub struct AddReminderResult {
        pub reminder: Reminder,
        pub success_message: String,
    }

    #[derive(Debug, Clone)]
    pub struct CompleteReminderResult {
        pub reminder: Reminder,
        pub success_message: String,
    }

    #[derive(Debug, Clone)]
    pub struct ClearCompletedResult {
        pub removed_count: usize,
        pub success_message: String,
    }
}
