//! # REST API for Breeding Pairs
//!
//! Listing, setting up and updating breeding pairs, plus the table, form
//! choices and chart data derived from them.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use log::info;
use serde::Deserialize;
use shared::{AddBreedingPairRequest, BreedingListResponse, UpdatePregnancyStatusRequest};

use crate::io::rest::mappers::breeding_mapper::BreedingMapper;
use crate::io::rest::{authorize, domain_error_response};
use crate::AppState;

// Query parameters for the breeding table API
#[derive(Debug, Deserialize)]
pub struct BreedingTableQuery {
    pub limit: Option<usize>,
}

/// Create a router for breeding related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pairs).post(add_pair))
        .route("/:pair_id/status", put(update_status))
        .route("/table", get(get_breeding_table))
        .route("/pairs", get(get_pair_choices))
        .route("/chart", get(get_litter_chart))
}

async fn list_pairs(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("GET /api/breeding");
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    match state.breeding_service.list_pairs().await {
        Ok(pairs) => {
            let response = BreedingListResponse {
                pairs: BreedingMapper::to_dto_list(pairs),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e, "Listing breeding pairs"),
    }
}

async fn add_pair(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AddBreedingPairRequest>,
) -> impl IntoResponse {
    info!("POST /api/breeding - request: {:?}", request);
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    let command = match BreedingMapper::to_add_command(request) {
        Ok(command) => command,
        Err(e) => return domain_error_response(e.into(), "Adding breeding pair"),
    };

    match state.breeding_service.add_pair(command).await {
        Ok(result) => {
            let response = BreedingMapper::to_add_response(result);
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e, "Adding breeding pair"),
    }
}

async fn update_status(
    State(state): State<AppState>,
    Path(pair_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<UpdatePregnancyStatusRequest>,
) -> impl IntoResponse {
    info!("PUT /api/breeding/{}/status - request: {:?}", pair_id, request);
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    let command = match BreedingMapper::to_update_command(pair_id, request) {
        Ok(command) => command,
        Err(e) => return domain_error_response(e.into(), "Updating pregnancy status"),
    };

    match state.breeding_service.update_status(command).await {
        Ok(result) => {
            let response = BreedingMapper::to_update_response(result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e, "Updating pregnancy status"),
    }
}

async fn get_breeding_table(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BreedingTableQuery>,
) -> impl IntoResponse {
    info!("GET /api/breeding/table - query: {:?}", query);
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    match state.breeding_service.list_pairs().await {
        Ok(pairs) => {
            let table = state.breeding_table_service.build_table(&pairs, query.limit);
            (StatusCode::OK, Json(table)).into_response()
        }
        Err(e) => domain_error_response(e, "Building breeding table"),
    }
}

async fn get_pair_choices(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("GET /api/breeding/pairs");
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    match state.breeding_service.list_pairs().await {
        Ok(pairs) => {
            let choices = state.breeding_table_service.pair_choices(&pairs);
            (StatusCode::OK, Json(choices)).into_response()
        }
        Err(e) => domain_error_response(e, "Listing pair choices"),
    }
}

async fn get_litter_chart(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("GET /api/breeding/chart");
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    match state.breeding_service.list_pairs().await {
        Ok(pairs) => {
            let chart = state.breeding_table_service.litter_chart(&pairs);
            (StatusCode::OK, Json(chart)).into_response()
        }
        Err(e) => domain_error_response(e, "Building litter chart"),
    }
}
