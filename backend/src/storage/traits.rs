//! # Storage Traits
//!
//! Storage abstractions the domain layer works against, so the flat-file
//! backend can be swapped without touching the services.

use anyhow::Result;
use async_trait::async_trait;
use shared::PregnancyStatus;
use chrono::NaiveDate;

use crate::domain::models::breeding_pair::BreedingPair;
use crate::domain::models::credential::Credential;
use crate::domain::models::reminder::Reminder;

/// Username → password hash mapping
#[async_trait]
pub trait CredentialStorage: Send + Sync {
    /// Load the store, seeding the default accounts when nothing is persisted yet.
    /// Returns the number of known accounts.
    async fn initialize(&self) -> Result<usize>;

    /// Password hash for `username`, if registered
    async fn get_password_hash(&self, username: &str) -> Result<Option<String>>;

    /// Insert a credential. Returns false (and writes nothing) if the username exists.
    async fn store_credential(&self, credential: &Credential) -> Result<bool>;
}

/// Table of breeding pairs in insertion order
#[async_trait]
pub trait BreedingStorage: Send + Sync {
    async fn list_pairs(&self) -> Result<Vec<BreedingPair>>;

    /// Reserve the next pair number. The reservation is persisted before it is
    /// returned, so a number is never handed out twice.
    async fn allocate_pair_number(&self) -> Result<u64>;

    /// Append a pair at the end of the table
    async fn store_pair(&self, pair: &BreedingPair) -> Result<()>;

    /// Overwrite status, delivery date and litter size of every row whose id equals
    /// `pair_id`. Returns the number of rows changed.
    async fn update_pair_status(
        &self,
        pair_id: &str,
        status: PregnancyStatus,
        expected_delivery: Option<NaiveDate>,
        litter_size: u32,
    ) -> Result<usize>;
}

/// Ordered list of reminders
#[async_trait]
pub trait ReminderStorage: Send + Sync {
    async fn list_reminders(&self) -> Result<Vec<Reminder>>;

    async fn store_reminder(&self, reminder: &Reminder) -> Result<()>;

    /// Set `completed` on the reminder with this id. `None` if no such reminder.
    async fn mark_completed(&self, reminder_id: &str) -> Result<Option<Reminder>>;

    /// Drop every completed reminder, keeping the order of the rest.
    /// Returns how many were removed.
    async fn remove_completed(&self) -> Result<usize>;
}

/// Factory for the repositories backing one data directory
pub trait Connection: Send + Sync + Clone {
    type CredentialRepository: CredentialStorage;
    type BreedingRepository: BreedingStorage;
    type ReminderRepository: ReminderStorage;

    fn create_credential_repository(&self) -> Self::CredentialRepository;
    fn create_breeding_repository(&self) -> Self::BreedingRepository;
    fn create_reminder_repository(&self) -> Self::ReminderRepository;
}
