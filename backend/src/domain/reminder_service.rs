use anyhow::Result;
use chrono::Local;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::reminders::{
    AddReminderCommand, AddReminderResult, ClearCompletedResult, CompleteReminderResult,
};
use crate::domain::models::reminder::{default_reminder_time, Reminder, ReminderError};
use crate::storage::csv::{CsvConnection, ReminderRepository};
use crate::storage::traits::{Connection, ReminderStorage};

/// Task reminders. They are plain records; nothing fires when one falls due.
#[derive(Clone)]
pub struct ReminderService {
    reminder_repository: ReminderRepository,
}

impl ReminderService {
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            reminder_repository: csv_conn.create_reminder_repository(),
        }
    }

    pub async fn list_reminders(&self) -> Result<Vec<Reminder>> {
        self.reminder_repository.list_reminders().await
    }

    pub async fn add_reminder(&self, command: AddReminderCommand) -> Result<AddReminderResult> {
        let date = command.date.unwrap_or_else(|| Local::now().date_naive());
        let time = command.time.unwrap_or_else(default_reminder_time);

        let reminder = Reminder::new(command.task, date.and_time(time));
        self.reminder_repository.store_reminder(&reminder).await?;

        info!("Added reminder '{}' due {}", reminder.task, reminder.format_due_at());
        Ok(AddReminderResult {
            reminder,
            success_message: "Reminder added successfully!".to_string(),
        })
    }

    /// Mark a reminder done. Completing an already completed reminder is fine.
    pub async fn complete_reminder(&self, reminder_id: &str) -> Result<CompleteReminderResult> {
        match self.reminder_repository.mark_completed(reminder_id).await? {
            Some(reminder) => Ok(CompleteReminderResult {
                reminder,
                success_message: "Reminder completed!".to_string(),
            }),
            None => {
                warn!("No reminder with id {}", reminder_id);
                Err(ReminderError::NotFound(reminder_id.to_string()).into())
            }
        }
    }

    /// Complete the reminder currently shown at `index` (zero-based).
    /// The position is resolved to an id first, so only that reminder is touched.
    pub async fn complete_reminder_at(&self, index: usize) -> Result<CompleteReminderResult> {
        let reminders = self.reminder_repository.list_reminders().await?;
        let reminder_id = reminders
            .get(index)
            .map(|reminder| reminder.id.clone())
            .ok_or(ReminderError::NoReminderAtPosition(index))?;

        self.complete_reminder(&reminder_id).await
    }

    pub async fn clear_completed(&self) -> Result<ClearCompletedResult> {
        let removed_count = self.reminder_repository.remove_completed().await?;
        Ok(ClearCompletedResult {
            removed_count,
            success_message: "Completed reminders cleared!".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use chrono::{NaiveDate, NaiveTime};

    async fn setup_test() -> (TestEnvironment, ReminderService) {
        let env = TestEnvironment::new().await.expect("Failed to create test environment");
        let service = ReminderService::new(Arc::new(env.connection.clone()));
        (env, service)
    }

    fn add_command(task: &str, day: u32) -> AddReminderCommand {
        AddReminderCommand {
            task: task.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, day),
            time: None,
        }
    }

    #[tokio::test]
    async fn test_add_reminder_defaults_time() {
        let (_env, service) = setup_test().await;

        let result = service.add_reminder(add_command("Check Pair 1", 1)).await.unwrap();

        assert_eq!(result.reminder.format_due_at(), "2024-05-01 08:45:00");
        assert!(!result.reminder.completed);
        assert_eq!(result.success_message, "Reminder added successfully!");
        assert_eq!(service.list_reminders().await.unwrap(), vec![result.reminder]);
    }

    #[tokio::test]
    async fn test_add_reminder_with_explicit_time() {
        let (_env, service) = setup_test().await;

        let result = service
            .add_reminder(AddReminderCommand {
                task: "Wean Pair 3".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 2, 22),
                time: NaiveTime::from_hms_opt(14, 30, 0),
            })
            .await
            .unwrap();

        assert_eq!(result.reminder.format_due_at(), "2024-02-22 14:30:00");
    }

    #[tokio::test]
    async fn test_complete_by_id_and_position() {
        let (_env, service) = setup_test().await;
        let first = service.add_reminder(add_command("First", 1)).await.unwrap().reminder;
        let second = service.add_reminder(add_command("Second", 2)).await.unwrap().reminder;

        let done = service.complete_reminder(&second.id).await.unwrap();
        assert!(done.reminder.completed);
        assert_eq!(done.reminder.id, second.id);

        let done = service.complete_reminder_at(0).await.unwrap();
        assert_eq!(done.reminder.id, first.id);

        assert!(service.list_reminders().await.unwrap().iter().all(|r| r.completed));
    }

    #[tokio::test]
    async fn test_complete_missing_reminder() {
        let (_env, service) = setup_test().await;
        service.add_reminder(add_command("Only", 1)).await.unwrap();

        let err = service.complete_reminder("reminder::nope").await.unwrap_err();
        assert_eq!(
            err.downcast::<ReminderError>().unwrap(),
            ReminderError::NotFound("reminder::nope".to_string())
        );

        let err = service.complete_reminder_at(1).await.unwrap_err();
        assert_eq!(
            err.downcast::<ReminderError>().unwrap(),
            ReminderError::NoReminderAtPosition(1)
        );
    }

    #[tokio::test]
    async fn test_clear_completed_removes_only_completed() {
        let (_env, service) = setup_test().await;
        let mut ids = Vec::new();
        for (day, task) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            let added = service.add_reminder(add_command(task, day as u32 + 1)).await.unwrap();
            ids.push(added.reminder.id);
        }
        service.complete_reminder(&ids[1]).await.unwrap();
        service.complete_reminder(&ids[3]).await.unwrap();

        let result = service.clear_completed().await.unwrap();
        assert_eq!(result.removed_count, 2);

        let tasks: Vec<String> = service
            .list_reminders()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.task)
            .collect();
        assert_eq!(tasks, vec!["a", "c", "e"]);
    }
}
