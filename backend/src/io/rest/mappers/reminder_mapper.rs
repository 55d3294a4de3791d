use chrono::{NaiveDate, NaiveTime};
use shared::{
    AddReminderRequest, AddReminderResponse, ClearCompletedResponse, CompleteReminderResponse,
    Reminder as ReminderDto,
};

use crate::domain::commands::reminders::{
    AddReminderCommand, AddReminderResult, ClearCompletedResult, CompleteReminderResult,
};
use crate::domain::models::reminder::{Reminder, ReminderError};

pub struct ReminderMapper;

impl ReminderMapper {
    pub fn to_dto(domain: Reminder) -> ReminderDto {
        let due_at = domain.format_due_at();
        ReminderDto {
            id: domain.id,
            task: domain.task,
            due_at,
            completed: domain.completed,
        }
    }

    pub fn to_dto_list(reminders: Vec<Reminder>) -> Vec<ReminderDto> {
        reminders.into_iter().map(Self::to_dto).collect()
    }

    fn non_blank(raw: Option<&str>) -> Option<&str> {
        raw.map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ReminderError> {
        match Self::non_blank(raw) {
            Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| ReminderError::InvalidDate(value.to_string())),
            None => Ok(None),
        }
    }

    /// "HH:MM" or "HH:MM:SS"
    pub fn parse_time(raw: Option<&str>) -> Result<Option<NaiveTime>, ReminderError> {
        match Self::non_blank(raw) {
            Some(value) => NaiveTime::parse_from_str(value, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
                .map(Some)
                .map_err(|_| ReminderError::InvalidTime(value.to_string())),
            None => Ok(None),
        }
    }

    pub fn to_add_command(request: AddReminderRequest) -> Result<AddReminderCommand, ReminderError> {
        Ok(AddReminderCommand {
            date: Self::parse_date(request.date.as_deref())?,
            time: Self::parse_time(request.time.as_deref())?,
            task: request.task,
        })
    }

    pub fn to_add_response(result: AddReminderResult) -> AddReminderResponse {
        AddReminderResponse {
            reminder: Self::to_dto(result.reminder),
            success_message: result.success_message,
        }
    }

    pub fn to_complete_response(result: CompleteReminderResult) -> CompleteReminderResponse {
        CompleteReminderResponse {
            reminder: Self::to_dto(result.reminder),
            success_message: result.success_message,
        }
    }

    pub fn to_clear_response(result: ClearCompletedResult) -> ClearCompletedResponse {
        ClearCompletedResponse {
            removed_count: result.removed_count,
            success_message: result.success_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_formats() {
        assert_eq!(ReminderMapper::parse_time(Some("09:30")), Ok(NaiveTime::from_hms_opt(9, 30, 0)));
        assert_eq!(
            ReminderMapper::parse_time(Some("09:30:15")),
            Ok(NaiveTime::from_hms_opt(9, 30, 15))
        );
        assert_eq!(ReminderMapper::parse_time(Some("")), Ok(None));
        assert_eq!(
            ReminderMapper::parse_time(Some("9.30am")),
            Err(ReminderError::InvalidTime("9.30am".to_string()))
        );
    }

    #[test]
    fn test_add_command_rejects_bad_date() {
        let request = AddReminderRequest {
            task: "Check Pair 1".to_string(),
            date: Some("2024-13-01".to_string()),
            time: None,
        };

        assert_eq!(
            ReminderMapper::to_add_command(request).unwrap_err(),
            ReminderError::InvalidDate("2024-13-01".to_string())
        );
    }
}
