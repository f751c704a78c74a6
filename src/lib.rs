//! Solar savings estimator.
//!
//! Sizes a photovoltaic system from a customer's electricity bill and
//! location, and forecasts savings, payback and avoided emissions. The
//! engine lives in [`services::estimator`]; the rest is a thin axum service
//! around it.

pub mod api_docs;
pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod shared_state;

use axum::{response::Html, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::config::Config;
use crate::routes::simulation_routes::api_routes;
use crate::services::estimator::Estimator;
use crate::shared_state::{AppState, SharedState};

pub use crate::error::EstimateError;
pub use crate::models::estimate::{EstimationInput, EstimationResult, InstallationType, Payback, Region};
pub use crate::services::estimator::estimate;

/// Build the shared state from a validated configuration.
pub fn build_state(config: Config) -> Result<SharedState, config::ConfigError> {
    let estimator = Estimator::new(config.estimator.clone())?;
    let app = AppState::new(estimator, config.history.capacity);
    Ok(SharedState { app, config })
}

/// Full application router: API, Scalar docs and the static site fallback.
pub fn build_app(shared: SharedState) -> Router {
    let static_dir = shared.config.server.static_dir.clone();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_routes(shared))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
