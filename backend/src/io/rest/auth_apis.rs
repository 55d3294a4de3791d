//! # REST API for Login and Registration
//!
//! Login hands out a bearer token; every other route in the API expects it.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use log::info;
use shared::{
    LoginRequest, LoginResponse, LogoutResponse, RegisterRequest, RegisterResponse,
    SessionStatusResponse,
};

use crate::domain::commands::auth::{LoginCommand, RegisterCommand};
use crate::domain::models::session::AuthError;
use crate::io::rest::{authorize, bearer_token, domain_error_response};
use crate::AppState;

/// Create a router for authentication related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/session", get(session_status))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/login - user: {}", request.username);

    let command = LoginCommand {
        username: request.username,
        password: request.password,
    };

    match state.session_service.login(command, Utc::now()).await {
        Ok(result) => {
            let response = LoginResponse {
                token: result.session.session_id,
                username: result.session.username,
                issued_at: result.session.issued_at.to_rfc3339(),
                expires_at: result.expires_at.to_rfc3339(),
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e, "Logging in"),
    }
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/register - user: {}", request.username);

    let command = RegisterCommand {
        username: request.username,
        password: request.password,
        confirm_password: request.confirm_password,
    };

    match state.credential_service.register(command).await {
        Ok(result) => {
            let response = RegisterResponse {
                username: result.username,
                success_message: result.success_message,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e, "Registering account"),
    }
}

/// Ends the session. Logging out an unknown or already expired token still succeeds.
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("POST /api/auth/logout");

    let token = match bearer_token(&headers) {
        Some(token) => token,
        None => return domain_error_response(AuthError::NotAuthenticated.into(), "Logging out"),
    };

    match state.session_service.logout(token) {
        Ok(_) => {
            let response = LogoutResponse {
                success_message: "You have been logged out.".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e, "Logging out"),
    }
}

async fn session_status(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("GET /api/auth/session");

    let session = match authorize(&state, &headers) {
        Ok(session) => session,
        Err(response) => return response,
    };

    let expires_at = session.expires_at(state.session_service.timeout());
    let response = SessionStatusResponse {
        username: session.username,
        issued_at: session.issued_at.to_rfc3339(),
        expires_at: expires_at.to_rfc3339(),
        seconds_remaining: (expires_at - Utc::now()).num_seconds().max(0),
    };
    (StatusCode::OK, Json(response)).into_response()
}
