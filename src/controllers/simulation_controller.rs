use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::config::{Config, EstimatorConfig};
use crate::error::{ApiError, ErrorResponse};
use crate::models::simulation::{
    HealthStatus, RegionTableResponse, SimulationListResponse, SimulationQuery, SimulationRecord,
    SimulationRequest, SimulationResponse,
};
use crate::services::simulation_service;
use crate::shared_state::AppState;

/// POST /api/simulation
/// Run a savings simulation
///
/// Sizes a photovoltaic system for the given bill and location and forecasts
/// savings, payback and avoided CO2. The result is kept in the recent history.
#[utoipa::path(
    post,
    path = "/api/simulation",
    request_body = SimulationRequest,
    responses(
        (status = 201, description = "Simulation computed", body = SimulationResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_simulation(
    State(state): State<AppState>,
    payload: Result<Json<SimulationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // Missing or non-numeric bill and unknown installation types fail here.
    let Json(request) = payload.map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))?;

    let record = simulation_service::run_simulation(&state, request)?;
    let response = SimulationResponse { success: true, simulation_id: record.id, data: record };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/simulation
/// List recent simulations
///
/// Newest first, paginated, optionally filtered by location substring and installation type.
#[utoipa::path(
    get,
    path = "/api/simulation",
    params(SimulationQuery),
    responses(
        (status = 200, description = "Page of recent simulations", body = SimulationListResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
pub async fn list_simulations(
    State(state): State<AppState>,
    query: Result<Query<SimulationQuery>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<SimulationListResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))?;
    let (data, pagination) = state.list(&query)?;
    Ok(Json(SimulationListResponse { success: true, data, pagination }))
}

/// GET /api/simulation/{id}
/// Get one simulation from the history
#[utoipa::path(
    get,
    path = "/api/simulation/{id}",
    params(
        ("id" = Uuid, Path, description = "Simulation ID")
    ),
    responses(
        (status = 200, description = "Simulation record", body = SimulationRecord),
        (status = 404, description = "Simulation not found", body = ErrorResponse)
    )
)]
pub async fn get_simulation(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<SimulationRecord>, ApiError> {
    state
        .get(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("simulation {}", id)))
}

/// GET /api/regions
/// Regional generation factors
///
/// Returns the daily yield (kWh/kWp/day) used for each region and the
/// region applied when a location cannot be classified.
#[utoipa::path(
    get,
    path = "/api/regions",
    responses(
        (status = 200, description = "Region table", body = RegionTableResponse)
    )
)]
pub async fn get_regions(State(state): State<AppState>) -> Json<RegionTableResponse> {
    Json(RegionTableResponse::from_config(state.estimator.config()))
}

/// GET /api/estimator/config
/// Active estimator constants
#[utoipa::path(
    get,
    path = "/api/estimator/config",
    responses(
        (status = 200, description = "Tariff, efficiency, panel, cost and emission constants", body = EstimatorConfig)
    )
)]
pub async fn get_estimator_config(State(config): State<Config>) -> Json<EstimatorConfig> {
    Json(config.estimator)
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health", body = HealthStatus),
        (status = 500, description = "Simulation history unavailable", body = ErrorResponse)
    )
)]
pub async fn get_health(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        simulations_recorded: state.len()?,
    }))
}
