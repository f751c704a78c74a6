use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Input ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InstallationType {
    #[serde(alias = "residencial")]
    Residential,
    #[serde(alias = "comercial")]
    Commercial,
    /// Rural and industrial sites share one tariff class.
    #[serde(alias = "industrial")]
    Rural,
}

/// Customer data collected by the simulator form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstimationInput {
    /// Current electricity bill (currency per month)
    pub monthly_bill: f64,
    /// Free text: city, state name or state abbreviation
    #[serde(default)]
    pub location: String,
    pub installation_type: InstallationType,
    /// Known monthly consumption; replaces the bill-derived estimate when positive
    #[serde(default, rename = "monthlyConsumptionKWh", alias = "monthlyConsumption")]
    pub monthly_consumption_kwh: Option<f64>,
    #[serde(default, alias = "roofArea")]
    pub roof_area_m2: Option<f64>,
    #[serde(default, alias = "residents")]
    pub resident_count: Option<u32>,
}

impl EstimationInput {
    pub fn new(monthly_bill: f64, location: impl Into<String>, installation_type: InstallationType) -> Self {
        Self {
            monthly_bill,
            location: location.into(),
            installation_type,
            monthly_consumption_kwh: None,
            roof_area_m2: None,
            resident_count: None,
        }
    }

    pub fn with_consumption(mut self, kwh: f64) -> Self {
        self.monthly_consumption_kwh = Some(kwh);
        self
    }
}

// ─── Regions ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    North,
    Northeast,
    CentralWest,
    Southeast,
    South,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::North,
        Region::Northeast,
        Region::CentralWest,
        Region::Southeast,
        Region::South,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::North => "north",
            Region::Northeast => "northeast",
            Region::CentralWest => "central-west",
            Region::Southeast => "southeast",
            Region::South => "south",
        }
    }
}

// ─── Result ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionSource {
    Provided,
    DerivedFromBill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemSizing {
    #[serde(rename = "monthlyConsumptionKWh")]
    pub monthly_consumption_kwh: f64,
    pub consumption_source: ConsumptionSource,
    /// Capacity needed to cover consumption before rounding to whole panels (kWp)
    pub required_power_kw: f64,
    pub panel_count: u32,
    /// Installed capacity, `panel_count` × module power (kWp)
    pub system_power_kw: f64,
    #[serde(rename = "monthlyProductionKWh")]
    pub monthly_production_kwh: f64,
}

/// Years to recover the installation cost.
///
/// `Undefined` is reported when the system saves nothing, e.g. a bill at or
/// below the utility minimum fee.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Payback {
    Years { years: f64 },
    Undefined,
}

impl Payback {
    pub fn years(&self) -> Option<f64> {
        match self {
            Payback::Years { years } => Some(*years),
            Payback::Undefined => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialForecast {
    pub minimum_fee: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    /// Share of the current bill saved, 0..=100
    pub savings_percentage: u8,
    pub installation_cost: f64,
    pub payback: Payback,
    pub lifetime_years: u32,
    pub lifetime_savings: f64,
    pub lifetime_roi_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalImpact {
    pub co2_reduction_kg_per_year: f64,
    pub trees_equivalent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstimationResult {
    pub region: Region,
    /// Generation factor applied (kWh/kWp/day)
    pub region_factor: f64,
    pub sizing: SystemSizing,
    pub financials: FinancialForecast,
    pub environmental: EnvironmentalImpact,
}
