use axum::{routing::get, Router};

use crate::controllers::simulation_controller::{
    create_simulation, get_estimator_config, get_health, get_regions, get_simulation, list_simulations,
};
use crate::shared_state::SharedState;

/// Build the `/api/*` sub-router.
pub fn api_routes(shared: SharedState) -> Router {
    Router::new()
        .route("/simulation",        get(list_simulations).post(create_simulation))
        .route("/simulation/{id}",   get(get_simulation))
        .route("/regions",           get(get_regions))
        .route("/estimator/config",  get(get_estimator_config))
        .route("/health",            get(get_health))
        .with_state(shared)
}
