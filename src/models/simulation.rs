use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::config::EstimatorConfig;
use crate::models::estimate::{EstimationInput, EstimationResult, InstallationType, Region};

// ─── Requests ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    #[serde(flatten)]
    pub input: EstimationInput,
    /// Lead captured by the contact form, if the visitor left one
    #[serde(default)]
    pub lead_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SimulationQuery {
    /// 1-based page number (default 1)
    pub page: Option<usize>,
    /// Page size, 1..=100 (default 10)
    pub limit: Option<usize>,
    /// Case and accent-insensitive substring of the location
    pub location: Option<String>,
    pub installation_type: Option<InstallationType>,
}

// ─── Records ──────────────────────────────────────────────────────────────────

/// A computed simulation as kept in the history. The timestamp is attached
/// after the estimate and never feeds into it.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub lead_id: Option<String>,
    pub input: EstimationInput,
    pub result: EstimationResult,
}

// ─── Responses ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResponse {
    pub success: bool,
    pub simulation_id: Uuid,
    pub data: SimulationRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationListResponse {
    pub success: bool,
    pub data: Vec<SimulationRecord>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionInfo {
    pub region: Region,
    /// kWh per kWp per day
    pub generation_factor: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionTableResponse {
    pub default_region: Region,
    pub regions: Vec<RegionInfo>,
}

impl RegionTableResponse {
    pub fn from_config(cfg: &EstimatorConfig) -> Self {
        Self {
            default_region: cfg.default_region,
            regions: Region::ALL
                .iter()
                .map(|&region| RegionInfo { region, generation_factor: cfg.region_factors.get(region) })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub simulations_recorded: usize,
}
