use utoipa::OpenApi;
use crate::config;
use crate::controllers::simulation_controller;
use crate::error;
use crate::models::{estimate, simulation};

#[derive(OpenApi)]
#[openapi(
    paths(
        simulation_controller::create_simulation,
        simulation_controller::list_simulations,
        simulation_controller::get_simulation,
        simulation_controller::get_regions,
        simulation_controller::get_estimator_config,
        simulation_controller::get_health
    ),
    components(
        schemas(
            estimate::EstimationInput,
            estimate::EstimationResult,
            estimate::InstallationType,
            estimate::Region,
            estimate::Payback,
            simulation::SimulationRequest,
            simulation::SimulationRecord,
            simulation::SimulationResponse,
            simulation::SimulationListResponse,
            config::EstimatorConfig,
            error::ErrorResponse
        )
    ),
    tags(
        (name = "solar-savings-estimator", description = "Solar savings simulation API")
    )
)]
pub struct ApiDoc;
