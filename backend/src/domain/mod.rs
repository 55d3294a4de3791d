//! # Domain Module
//!
//! Business logic for the breeding manager: accounts and login sessions,
//! breeding pairs and their pregnancy timeline, and task reminders.
//!
//! Services work against the storage traits and never touch files directly.
//! They return `anyhow::Result`; failures the caller is expected to act on
//! are typed errors from `models` (`AuthError`, `ValidationError`,
//! `BreedingError`, `ReminderError`) that can be recovered with `downcast_ref`.

pub mod breeding_service;
pub mod breeding_table;
pub mod commands;
pub mod credential_service;
pub mod models;
pub mod password;
pub mod reminder_service;
pub mod session_service;

pub use breeding_service::*;
pub use breeding_table::*;
pub use credential_service::*;
pub use reminder_service::*;
pub use session_service::*;
