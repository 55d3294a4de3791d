//! # Breeding Manager Backend
//!
//! Record keeping for a mouse colony: breeding pairs with their pregnancy
//! timeline, task reminders, and the accounts allowed to see them.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (services, models)
//!     ↓
//! Storage Layer (flat files in the data directory)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{http::Method, Router};
use chrono::Utc;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::domain::{
    BreedingService, BreedingTableService, CredentialService, ReminderService, SessionService,
};
use crate::io::rest::{auth_apis, breeding_apis, reminder_apis};
use crate::storage::csv::CsvConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub credential_service: CredentialService,
    pub session_service: SessionService,
    pub breeding_service: BreedingService,
    pub breeding_table_service: BreedingTableService,
    pub reminder_service: ReminderService,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    let data_directory = config.resolved_data_directory()?;
    info!("Setting up data directory {}", data_directory.display());
    let csv_conn = Arc::new(CsvConnection::new(&data_directory)?);

    info!("Setting up domain model");
    let credential_service = CredentialService::new(csv_conn.clone());
    let accounts = credential_service.initialize().await?;
    info!("{} accounts registered", accounts);

    let session_service = SessionService::new(credential_service.clone(), config.session_timeout());
    let breeding_service = BreedingService::new(csv_conn.clone());
    let breeding_table_service = BreedingTableService::new();
    let reminder_service = ReminderService::new(csv_conn);

    info!("Setting up application state");
    Ok(AppState {
        credential_service,
        session_service,
        breeding_service,
        breeding_table_service,
        reminder_service,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/auth", auth_apis::router())
        .nest("/breeding", breeding_apis::router())
        .nest("/reminders", reminder_apis::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}

/// Periodically drop expired sessions so logins lapse on time even without traffic
pub fn spawn_session_sweeper(session_service: SessionService, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            if let Err(e) = session_service.sweep_expired(Utc::now()) {
                error!("Session sweep failed: {:#}", e);
            }
        }
    })
}
