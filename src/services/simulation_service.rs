use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::simulation::{SimulationRecord, SimulationRequest};
use crate::shared_state::AppState;

/// Run the estimator on a request and keep the outcome in the history.
pub fn run_simulation(state: &AppState, request: SimulationRequest) -> Result<SimulationRecord, ApiError> {
    let SimulationRequest { input, lead_id } = request;

    let result = state.estimator.estimate(&input).map_err(|e| {
        warn!(error = %e, location = %input.location, "simulation rejected");
        ApiError::from(e)
    })?;

    let record = SimulationRecord {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        lead_id,
        input,
        result,
    };
    state.record(record.clone())?;

    info!(
        id = %record.id,
        region = record.result.region.as_str(),
        panels = record.result.sizing.panel_count,
        monthly_savings = record.result.financials.monthly_savings,
        "simulation recorded"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::estimate::{EstimationInput, InstallationType};
    use crate::services::estimator::Estimator;

    #[test]
    fn test_run_records_successful_simulation() {
        let state = AppState::new(Estimator::default(), 10);
        let request = SimulationRequest {
            input: EstimationInput::new(350.0, "São Paulo/SP", InstallationType::Residential),
            lead_id: Some("lead-42".into()),
        };
        let record = run_simulation(&state, request).unwrap();
        assert_eq!(record.lead_id.as_deref(), Some("lead-42"));
        assert_eq!(state.len().unwrap(), 1);
        assert_eq!(state.get(record.id).unwrap().unwrap().result, record.result);
    }

    #[test]
    fn test_rejected_input_is_not_recorded() {
        let state = AppState::new(Estimator::default(), 10);
        let request = SimulationRequest {
            input: EstimationInput::new(-1.0, "SP", InstallationType::Residential),
            lead_id: None,
        };
        let err = run_simulation(&state, request).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert!(state.is_empty().unwrap());
    }
}
