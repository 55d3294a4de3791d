//! # REST API for Reminders

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;
use shared::{AddReminderRequest, ReminderListResponse};

use crate::io::rest::mappers::reminder_mapper::ReminderMapper;
use crate::io::rest::{authorize, domain_error_response};
use crate::AppState;

/// Create a router for reminder related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reminders).post(add_reminder))
        .route("/:reminder_id/complete", post(complete_reminder))
        .route("/clear-completed", post(clear_completed))
}

async fn list_reminders(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("GET /api/reminders");
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    match state.reminder_service.list_reminders().await {
        Ok(reminders) => {
            let response = ReminderListResponse {
                reminders: ReminderMapper::to_dto_list(reminders),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e, "Listing reminders"),
    }
}

async fn add_reminder(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AddReminderRequest>,
) -> impl IntoResponse {
    info!("POST /api/reminders - request: {:?}", request);
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    let command = match ReminderMapper::to_add_command(request) {
        Ok(command) => command,
        Err(e) => return domain_error_response(e.into(), "Adding reminder"),
    };

    match state.reminder_service.add_reminder(command).await {
        Ok(result) => {
            let response = ReminderMapper::to_add_response(result);
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e, "Adding reminder"),
    }
}

async fn complete_reminder(
    State(state): State<AppState>,
    Path(reminder_id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    info!("POST /api/reminders/{}/complete", reminder_id);
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    match state.reminder_service.complete_reminder(&reminder_id).await {
        Ok(result) => {
            let response = ReminderMapper::to_complete_response(result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e, "Completing reminder"),
    }
}

async fn clear_completed(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("POST /api/reminders/clear-completed");
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    match state.reminder_service.clear_completed().await {
        Ok(result) => {
            let response = ReminderMapper::to_clear_response(result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e, "Clearing completed reminders"),
    }
}
