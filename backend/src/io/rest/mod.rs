//! # REST API Interface Layer
//!
//! HTTP endpoints for the breeding manager. Handlers translate JSON DTOs from
//! the `shared` crate into domain commands, call the services, and turn domain
//! errors into status codes:
//!
//! | Error                                  | Status |
//! |----------------------------------------|--------|
//! | `AuthError` (login, missing/expired)   | 401    |
//! | `ValidationError`, bad date or time    | 400    |
//! | unknown pair or reminder               | 404    |
//! | anything else (storage)                | 500    |
//!
//! Every route except login and registration needs `Authorization: Bearer <token>`.

pub mod auth_apis;
pub mod breeding_apis;
pub mod mappers;
pub mod reminder_apis;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use log::{error, info};
use shared::ErrorResponse;

use crate::domain::models::breeding_pair::BreedingError;
use crate::domain::models::credential::ValidationError;
use crate::domain::models::reminder::ReminderError;
use crate::domain::models::session::{AuthError, Session};
use crate::AppState;

pub fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    let body = ErrorResponse {
        error: message.into(),
        code: code.to_string(),
    };
    (status, Json(body)).into_response()
}

/// Status code and error code for the typed domain errors, `None` for anything else
fn classify(err: &anyhow::Error) -> Option<(StatusCode, &'static str)> {
    if let Some(auth) = err.downcast_ref::<AuthError>() {
        let code = match auth {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::SessionExpired => "session_expired",
            AuthError::NotAuthenticated => "not_authenticated",
        };
        return Some((StatusCode::UNAUTHORIZED, code));
    }
    if err.downcast_ref::<ValidationError>().is_some() {
        return Some((StatusCode::BAD_REQUEST, "validation_error"));
    }
    if let Some(breeding) = err.downcast_ref::<BreedingError>() {
        return Some(match breeding {
            BreedingError::PairNotFound(_) => (StatusCode::NOT_FOUND, "pair_not_found"),
            BreedingError::InvalidDate(_) => (StatusCode::BAD_REQUEST, "invalid_date"),
        });
    }
    if let Some(reminder) = err.downcast_ref::<ReminderError>() {
        return Some(match reminder {
            ReminderError::NotFound(_) | ReminderError::NoReminderAtPosition(_) => {
                (StatusCode::NOT_FOUND, "reminder_not_found")
            }
            ReminderError::InvalidDate(_) => (StatusCode::BAD_REQUEST, "invalid_date"),
            ReminderError::InvalidTime(_) => (StatusCode::BAD_REQUEST, "invalid_time"),
        });
    }
    None
}

/// Map a service error to a JSON error response. `action` names what failed
/// and is the only detail shown for unexpected errors.
pub fn domain_error_response(err: anyhow::Error, action: &str) -> Response {
    match classify(&err) {
        Some((status, code)) => {
            info!("{} rejected: {}", action, err);
            error_response(status, code, err.to_string())
        }
        None => {
            error!("{} failed: {:#}", action, err);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                format!("Error {}", action.to_lowercase()),
            )
        }
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve the caller's session, or the 401 response to send back
pub fn authorize(state: &AppState, headers: &HeaderMap) -> Result<Session, Response> {
    let token = bearer_token(headers)
        .ok_or_else(|| domain_error_response(AuthError::NotAuthenticated.into(), "Authorization"))?;

    state
        .session_service
        .check(token, Utc::now())
        .map_err(|e| domain_error_response(e, "Authorization"))
}
