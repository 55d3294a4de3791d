//! # Flat-File Storage
//!
//! Every store lives in one data directory as a plain file the user can open
//! in a spreadsheet or text editor:
//!
//! - `users.json`: username → password hash
//! - `breeding_data.csv`: one row per breeding pair
//! - `breeding_sequence.yaml`: last pair number handed out
//! - `reminders.json`: ordered list of reminders
//!
//! Writes always replace the whole file through a temp file and a rename.

pub mod breeding_repository;
pub mod connection;
pub mod credential_repository;
pub mod reminder_repository;

#[cfg(test)]
pub mod test_utils;

pub use breeding_repository::BreedingRepository;
pub use connection::CsvConnection;
pub use credential_repository::CredentialRepository;
pub use reminder_repository::ReminderRepository;
