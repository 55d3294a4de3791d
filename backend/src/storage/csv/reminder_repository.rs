//! # Reminder Repository
//!
//! Stores reminders in `reminders.json` at the root of the data directory as a
//! JSON array, in the order they were added:
//!
//! ```json
//! [
//!   {"Id": "reminder::6f1c...", "Task": "Check Pair 1", "Date": "2024-05-01 08:45:00", "Completed": false}
//! ]
//! ```
//!
//! Files written before reminders carried an `Id` are upgraded on first read:
//! every record without one gets a fresh id and the file is rewritten.
//! A `Date` that cannot be read is kept and written back exactly as found.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::connection::CsvConnection;
use crate::domain::models::reminder::Reminder;
use crate::storage::traits::ReminderStorage;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReminderRecord {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "Task")]
    task: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Completed", default)]
    completed: bool,
}

impl From<&Reminder> for ReminderRecord {
    fn from(reminder: &Reminder) -> Self {
        ReminderRecord {
            id: Some(reminder.id.clone()),
            task: reminder.task.clone(),
            date: reminder.format_due_at(),
            completed: reminder.completed,
        }
    }
}

#[derive(Clone)]
pub struct ReminderRepository {
    connection: CsvConnection,
    write_lock: Arc<Mutex<()>>,
}

impl ReminderRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            connection,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Must be called with the write lock held, since it may backfill ids
    fn read_reminders(&self) -> Result<Vec<Reminder>> {
        let path = self.connection.reminders_file_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Reminder file {} is not valid JSON", path.display()))?;
        if !value.is_array() {
            // Very old files were initialized with an empty object
            warn!("Reminder file {} does not hold a list; treating it as empty", path.display());
            return Ok(Vec::new());
        }
        let records: Vec<ReminderRecord> = serde_json::from_value(value)
            .with_context(|| format!("Reminder file {} has malformed entries", path.display()))?;

        let mut needs_backfill = false;
        let mut reminders = Vec::with_capacity(records.len());
        for record in records {
            let id = match record.id {
                Some(id) if !id.trim().is_empty() => id,
                _ => {
                    needs_backfill = true;
                    Reminder::generate_id()
                }
            };
            let reminder = Reminder::from_stored(id, record.task, &record.date, record.completed);
            if reminder.due_at.is_none() {
                warn!("Reminder '{}' has unreadable date '{}'", reminder.task, record.date);
            }
            reminders.push(reminder);
        }

        if needs_backfill {
            self.write_reminders(&reminders)?;
            info!("Assigned ids to legacy reminders in {}", path.display());
        }

        debug!("Loaded {} reminders from {}", reminders.len(), path.display());
        Ok(reminders)
    }

    fn write_reminders(&self, reminders: &[Reminder]) -> Result<()> {
        let records: Vec<ReminderRecord> = reminders.iter().map(ReminderRecord::from).collect();
        let json = serde_json::to_string_pretty(&records)?;
        self.connection
            .write_atomically(&self.connection.reminders_file_path(), json.as_bytes())
    }
}

#[async_trait]
impl ReminderStorage for ReminderRepository {
    async fn list_reminders(&self) -> Result<Vec<Reminder>> {
        let _guard = self.write_lock.lock().await;
        self.read_reminders()
    }

    async fn store_reminder(&self, reminder: &Reminder) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut reminders = self.read_reminders()?;
        reminders.push(reminder.clone());
        self.write_reminders(&reminders)?;

        info!("Stored reminder {} due {}", reminder.id, reminder.format_due_at());
        Ok(())
    }

    async fn mark_completed(&self, reminder_id: &str) -> Result<Option<Reminder>> {
        let _guard = self.write_lock.lock().await;

        let mut reminders = self.read_reminders()?;
        let completed = match reminders.iter_mut().find(|r| r.id == reminder_id) {
            Some(reminder) => {
                reminder.completed = true;
                reminder.clone()
            }
            None => return Ok(None),
        };
        self.write_reminders(&reminders)?;

        info!("Marked reminder {} completed", reminder_id);
        Ok(Some(completed))
    }

    async fn remove_completed(&self) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let mut reminders = self.read_reminders()?;
        let before = reminders.len();
        reminders.retain(|r| !r.completed);
        let removed = before - reminders.len();

        if removed > 0 {
            self.write_reminders(&reminders)?;
        }
        info!("Removed {} completed reminders", removed);
        Ok(removed)
    }
}
