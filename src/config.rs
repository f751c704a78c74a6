use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::estimate::{InstallationType, Region};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn default_port() -> u16 { 8080 }
fn default_static_dir() -> String { "static".to_string() }
fn default_history_capacity() -> usize { 500 }

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub estimator: EstimatorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served as the site front end for every unmatched path.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port(), static_dir: default_static_dir() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    /// Maximum number of simulations kept in memory; oldest are evicted first.
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: default_history_capacity() }
    }
}

/// A value per installation type.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, ToSchema)]
pub struct InstallationTable {
    pub residential: f64,
    pub commercial: f64,
    pub rural: f64,
}

impl InstallationTable {
    pub fn get(&self, kind: InstallationType) -> f64 {
        match kind {
            InstallationType::Residential => self.residential,
            InstallationType::Commercial => self.commercial,
            InstallationType::Rural => self.rural,
        }
    }

    fn values(&self) -> [f64; 3] {
        [self.residential, self.commercial, self.rural]
    }
}

/// Average daily yield per region, in kWh per kWp per day.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionFactors {
    pub north: f64,
    pub northeast: f64,
    pub central_west: f64,
    pub southeast: f64,
    pub south: f64,
}

impl RegionFactors {
    pub fn get(&self, region: Region) -> f64 {
        match region {
            Region::North => self.north,
            Region::Northeast => self.northeast,
            Region::CentralWest => self.central_west,
            Region::Southeast => self.southeast,
            Region::South => self.south,
        }
    }
}

impl Default for RegionFactors {
    fn default() -> Self {
        Self {
            north: 4.8,
            northeast: 5.2,
            central_west: 5.0,
            southeast: 4.6,
            south: 4.2,
        }
    }
}

/// Every constant the estimator uses. Missing fields fall back to the
/// market figures below.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimatorConfig {
    /// Average energy tariff (currency per kWh)
    pub average_tariff: f64,
    /// Fraction of theoretical generation left after wiring, inverter and soiling losses
    pub system_efficiency: f64,
    /// Nameplate power of one module (kW)
    pub panel_unit_power_kw: f64,
    pub days_per_month: f64,
    /// Flat monthly amount the utility bills regardless of generation
    pub minimum_fee: InstallationTable,
    /// Installed cost per kWp
    pub cost_per_kw: InstallationTable,
    pub region_factors: RegionFactors,
    /// Region used when the location matches nothing
    pub default_region: Region,
    /// Grid carbon intensity (kg CO2 per kWh)
    pub emission_factor_kg_per_kwh: f64,
    /// CO2 absorbed by one tree per year (kg)
    pub kg_co2_per_tree_per_year: f64,
    /// Panel service life used for lifetime savings and ROI (years)
    pub lifetime_years: u32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            average_tariff: 0.75,
            system_efficiency: 0.85,
            panel_unit_power_kw: 0.55,
            days_per_month: 30.0,
            minimum_fee: InstallationTable { residential: 30.0, commercial: 100.0, rural: 30.0 },
            cost_per_kw: InstallationTable { residential: 4800.0, commercial: 4200.0, rural: 4500.0 },
            region_factors: RegionFactors::default(),
            default_region: Region::Southeast,
            emission_factor_kg_per_kwh: 0.0817,
            kg_co2_per_tree_per_year: 22.0,
            lifetime_years: 25,
        }
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("must be a finite number > 0, got {}", value) })
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("averageTariff", self.average_tariff)?;
        require_positive("systemEfficiency", self.system_efficiency)?;
        if self.system_efficiency > 1.0 {
            return Err(ConfigError::Invalid {
                field: "systemEfficiency",
                reason: format!("must not exceed 1.0, got {}", self.system_efficiency),
            });
        }
        require_positive("panelUnitPowerKw", self.panel_unit_power_kw)?;
        require_positive("daysPerMonth", self.days_per_month)?;
        for fee in self.minimum_fee.values() {
            if !fee.is_finite() || fee < 0.0 {
                return Err(ConfigError::Invalid {
                    field: "minimumFee",
                    reason: format!("must be a finite number >= 0, got {}", fee),
                });
            }
        }
        for cost in self.cost_per_kw.values() {
            require_positive("costPerKw", cost)?;
        }
        for region in Region::ALL {
            require_positive("regionFactors", self.region_factors.get(region))?;
        }
        require_positive("emissionFactorKgPerKwh", self.emission_factor_kg_per_kwh)?;
        require_positive("kgCo2PerTreePerYear", self.kg_co2_per_tree_per_year)?;
        if self.lifetime_years == 0 {
            return Err(ConfigError::Invalid { field: "lifetimeYears", reason: "must be at least 1".to_string() });
        }
        Ok(())
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid { field: "history.capacity", reason: "must be at least 1".to_string() });
        }
        self.estimator.validate()
    }
}
