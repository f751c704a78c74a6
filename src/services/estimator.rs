//! ============================================================
//!  Solar Savings Estimation Engine
//!
//!  Pipeline:
//!   1. Region        – free-text location → region → daily yield
//!   2. Sizing        – consumption → required kWp → whole panels
//!                      → installed kWp → monthly production
//!   3. Financials    – minimum-fee floor, savings double cap,
//!                      installation cost, payback, lifetime ROI
//!   4. Environmental – avoided CO2 and tree equivalent
//!
//!  Pure and deterministic: output depends only on the input and
//!  the `EstimatorConfig` the estimator was built with.
//! ============================================================

use tracing::debug;

use crate::config::{ConfigError, EstimatorConfig};
use crate::error::EstimateError;
use crate::models::estimate::{
    ConsumptionSource, EnvironmentalImpact, EstimationInput, EstimationResult, FinancialForecast,
    InstallationType, Payback, Region, SystemSizing,
};
use crate::services::region::{KeywordClassifier, RegionClassifier};

const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone)]
pub struct Estimator<C = KeywordClassifier> {
    config: EstimatorConfig,
    classifier: C,
}

impl Default for Estimator {
    fn default() -> Self {
        Self { config: EstimatorConfig::default(), classifier: KeywordClassifier }
    }
}

impl Estimator {
    pub fn new(config: EstimatorConfig) -> Result<Self, ConfigError> {
        Self::with_classifier(config, KeywordClassifier)
    }
}

impl<C: RegionClassifier> Estimator<C> {
    pub fn with_classifier(config: EstimatorConfig, classifier: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, classifier })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Region for `location`, falling back to the configured default.
    pub fn classify(&self, location: &str) -> Region {
        self.classifier.lookup(location).unwrap_or(self.config.default_region)
    }

    pub fn estimate(&self, input: &EstimationInput) -> Result<EstimationResult, EstimateError> {
        validate(input)?;

        let region = self.classify(&input.location);
        let region_factor = self.config.region_factors.get(region);

        let sizing = self.size_system(input, region_factor)?;
        let financials = self.forecast_financials(input.monthly_bill, input.installation_type, &sizing);
        let environmental = self.environmental_impact(sizing.monthly_production_kwh);

        debug!(
            region = region.as_str(),
            panels = sizing.panel_count,
            system_kw = sizing.system_power_kw,
            monthly_savings = financials.monthly_savings,
            "estimate computed"
        );

        Ok(EstimationResult { region, region_factor, sizing, financials, environmental })
    }

    fn size_system(&self, input: &EstimationInput, region_factor: f64) -> Result<SystemSizing, EstimateError> {
        let cfg = &self.config;

        let (monthly_consumption_kwh, consumption_source) = match input.monthly_consumption_kwh {
            Some(kwh) if kwh.is_finite() && kwh > 0.0 => (kwh, ConsumptionSource::Provided),
            _ => (input.monthly_bill / cfg.average_tariff, ConsumptionSource::DerivedFromBill),
        };

        // kWh delivered per installed kWp in one month, after losses
        let monthly_yield_per_kw = region_factor * cfg.days_per_month * cfg.system_efficiency;

        let required_power_kw = monthly_consumption_kwh / monthly_yield_per_kw;
        // Never under-provision: round up to whole modules, and install at least one.
        let panels = (required_power_kw / cfg.panel_unit_power_kw).ceil().max(1.0);
        if !panels.is_finite() || panels > u32::MAX as f64 {
            let field = match consumption_source {
                ConsumptionSource::Provided => "monthlyConsumptionKWh",
                ConsumptionSource::DerivedFromBill => "monthlyBill",
            };
            return Err(EstimateError::InvalidInput {
                field,
                reason: format!("requires {:e} kWp, beyond any installable system", required_power_kw),
            });
        }
        let panel_count = panels as u32;
        let system_power_kw = panel_count as f64 * cfg.panel_unit_power_kw;
        let monthly_production_kwh = system_power_kw * monthly_yield_per_kw;

        Ok(SystemSizing {
            monthly_consumption_kwh,
            consumption_source,
            required_power_kw,
            panel_count,
            system_power_kw,
            monthly_production_kwh,
        })
    }

    fn forecast_financials(
        &self,
        monthly_bill: f64,
        installation_type: InstallationType,
        sizing: &SystemSizing,
    ) -> FinancialForecast {
        let cfg = &self.config;

        let minimum_fee = cfg.minimum_fee.get(installation_type);
        let max_savings = (monthly_bill - minimum_fee).max(0.0);
        let production_value = sizing.monthly_production_kwh * cfg.average_tariff;
        let monthly_savings = max_savings.min(production_value);

        let savings_percentage = (monthly_savings / monthly_bill * 100.0).round().clamp(0.0, 100.0) as u8;
        let annual_savings = monthly_savings * MONTHS_PER_YEAR;

        let installation_cost = sizing.system_power_kw * cfg.cost_per_kw.get(installation_type);
        let payback = if annual_savings > 0.0 {
            Payback::Years { years: installation_cost / annual_savings }
        } else {
            Payback::Undefined
        };

        let lifetime_savings = annual_savings * cfg.lifetime_years as f64;
        let lifetime_roi_percent = if installation_cost > 0.0 {
            (lifetime_savings - installation_cost) / installation_cost * 100.0
        } else {
            0.0
        };

        FinancialForecast {
            minimum_fee,
            monthly_savings,
            annual_savings,
            savings_percentage,
            installation_cost,
            payback,
            lifetime_years: cfg.lifetime_years,
            lifetime_savings,
            lifetime_roi_percent,
        }
    }

    fn environmental_impact(&self, monthly_production_kwh: f64) -> EnvironmentalImpact {
        let co2_reduction_kg_per_year =
            monthly_production_kwh * MONTHS_PER_YEAR * self.config.emission_factor_kg_per_kwh;
        EnvironmentalImpact {
            co2_reduction_kg_per_year,
            trees_equivalent: co2_reduction_kg_per_year / self.config.kg_co2_per_tree_per_year,
        }
    }
}

fn validate(input: &EstimationInput) -> Result<(), EstimateError> {
    if !input.monthly_bill.is_finite() || input.monthly_bill <= 0.0 {
        return Err(EstimateError::InvalidInput {
            field: "monthlyBill",
            reason: format!("must be a finite amount greater than zero, got {}", input.monthly_bill),
        });
    }
    Ok(())
}

/// Estimate with the market defaults and the keyword region table.
pub fn estimate(input: &EstimationInput) -> Result<EstimationResult, EstimateError> {
    Estimator::<KeywordClassifier>::default().estimate(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residential(bill: f64, location: &str) -> EstimationInput {
        EstimationInput::new(bill, location, InstallationType::Residential)
    }

    #[test]
    fn test_sao_paulo_residential_scenario() {
        let r = estimate(&residential(350.0, "São Paulo/SP")).unwrap();

        assert_eq!(r.region, Region::Southeast);
        assert_eq!(r.region_factor, 4.6);
        assert!((r.sizing.monthly_consumption_kwh - 466.666).abs() < 0.01);
        assert_eq!(r.sizing.consumption_source, ConsumptionSource::DerivedFromBill);

        // 466.67 / (4.6 * 30 * 0.85) = 3.978 kWp → 8 panels of 0.55 kW
        assert!((r.sizing.required_power_kw - 3.9785).abs() < 0.001, "required {:.4}", r.sizing.required_power_kw);
        assert_eq!(r.sizing.panel_count, 8);
        assert!((r.sizing.system_power_kw - 4.4).abs() < 1e-9);
        assert!((r.sizing.monthly_production_kwh - 516.12).abs() < 1e-6);

        // Capped by the minimum fee: 350 - 30
        assert!((r.financials.monthly_savings - 320.0).abs() < 1e-9);
        assert_eq!(r.financials.savings_percentage, 91);
        assert!((r.financials.annual_savings - 3840.0).abs() < 1e-9);
        assert!((r.financials.installation_cost - 21120.0).abs() < 1e-6);
        let years = r.financials.payback.years().expect("payback should be defined");
        assert!((years - 5.5).abs() < 1e-9, "payback {:.3}", years);

        assert!((r.financials.lifetime_savings - 96000.0).abs() < 1e-6);
        assert!(r.financials.lifetime_roi_percent > 0.0);

        // 516.12 * 12 * 0.0817
        assert!((r.environmental.co2_reduction_kg_per_year - 506.0).abs() < 0.1);
        assert!((r.environmental.trees_equivalent - 506.0 / 22.0).abs() < 0.01);
    }

    #[test]
    fn test_savings_capped_by_minimum_fee() {
        let r = estimate(&residential(50.0, "Recife")).unwrap();
        assert_eq!(r.financials.minimum_fee, 30.0);
        assert!(r.financials.monthly_savings <= 20.0 + 1e-9);
        assert!((r.financials.monthly_savings - 20.0).abs() < 1e-9);
        assert_eq!(r.financials.savings_percentage, 40);
    }

    #[test]
    fn test_savings_capped_by_production_value() {
        // Tiny consumption override: production value, not the bill, governs.
        let input = residential(1000.0, "SP").with_consumption(10.0);
        let r = estimate(&input).unwrap();
        assert_eq!(r.sizing.consumption_source, ConsumptionSource::Provided);
        assert_eq!(r.sizing.panel_count, 1);
        let production_value = r.sizing.monthly_production_kwh * 0.75;
        assert!((r.financials.monthly_savings - production_value).abs() < 1e-9);
        assert!(r.financials.monthly_savings < 1000.0 - 30.0);
    }

    #[test]
    fn test_bill_below_minimum_fee_gives_undefined_payback() {
        let input = EstimationInput::new(80.0, "Curitiba", InstallationType::Commercial);
        let r = estimate(&input).unwrap();
        assert_eq!(r.financials.minimum_fee, 100.0);
        assert_eq!(r.financials.monthly_savings, 0.0);
        assert_eq!(r.financials.annual_savings, 0.0);
        assert_eq!(r.financials.savings_percentage, 0);
        assert_eq!(r.financials.payback, Payback::Undefined);
        assert!(r.financials.payback.years().is_none());
        assert!((r.financials.lifetime_roi_percent + 100.0).abs() < 1e-9);
        assert!(r.financials.installation_cost > 0.0);
    }

    #[test]
    fn test_rejects_non_positive_bill() {
        for bill in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let err = estimate(&residential(bill, "SP")).unwrap_err();
            assert!(matches!(err, EstimateError::InvalidInput { field: "monthlyBill", .. }), "bill {}", bill);
        }
    }

    #[test]
    fn test_oversized_demand_rejected() {
        let input = EstimationInput::new(500.0, "SP", InstallationType::Commercial).with_consumption(1e12);
        let err = estimate(&input).unwrap_err();
        assert!(
            matches!(err, EstimateError::InvalidInput { field: "monthlyConsumptionKWh", .. }),
            "got {:?}",
            err
        );

        let err = estimate(&residential(f64::MAX, "SP")).unwrap_err();
        assert!(matches!(err, EstimateError::InvalidInput { field: "monthlyBill", .. }), "got {:?}", err);
    }

    #[test]
    fn test_large_demand_still_covered() {
        let input = EstimationInput::new(500.0, "SP", InstallationType::Commercial).with_consumption(1e9);
        let r = estimate(&input).unwrap();
        assert!(r.sizing.system_power_kw >= r.sizing.required_power_kw * (1.0 - 1e-12));
        assert!(r.financials.lifetime_roi_percent.is_finite());
    }

    #[test]
    fn test_vanishing_demand_gets_one_panel() {
        for input in [residential(5e-324, "SP"), residential(300.0, "SP").with_consumption(5e-324)] {
            let r = estimate(&input).unwrap();
            assert_eq!(r.sizing.panel_count, 1);
            assert!(r.financials.installation_cost > 0.0);
            assert!(r.financials.lifetime_roi_percent.is_finite(), "roi {}", r.financials.lifetime_roi_percent);
            assert!(r.sizing.system_power_kw >= r.sizing.required_power_kw);
        }
    }

    #[test]
    fn test_non_positive_consumption_falls_back_to_bill() {
        let base = estimate(&residential(300.0, "SP")).unwrap();
        for kwh in [0.0, -5.0, f64::NAN] {
            let r = estimate(&residential(300.0, "SP").with_consumption(kwh)).unwrap();
            assert_eq!(r.sizing.consumption_source, ConsumptionSource::DerivedFromBill);
            assert_eq!(r, base);
        }
    }

    #[test]
    fn test_unmatched_location_uses_default_region() {
        let r = estimate(&residential(200.0, "")).unwrap();
        assert_eq!(r.region, Region::Southeast);
        let r = estimate(&residential(200.0, "Lisboa")).unwrap();
        assert_eq!(r.region, Region::Southeast);
    }

    #[test]
    fn test_installation_type_changes_cost_per_kw() {
        let res = estimate(&EstimationInput::new(900.0, "Goiânia", InstallationType::Residential)).unwrap();
        let com = estimate(&EstimationInput::new(900.0, "Goiânia", InstallationType::Commercial)).unwrap();
        let rural = estimate(&EstimationInput::new(900.0, "Goiânia", InstallationType::Rural)).unwrap();
        assert_eq!(res.region, Region::CentralWest);
        assert_eq!(res.sizing, com.sizing);
        assert!(com.financials.installation_cost < rural.financials.installation_cost);
        assert!(rural.financials.installation_cost < res.financials.installation_cost);
    }

    #[test]
    fn test_overridden_constants() {
        let cfg = EstimatorConfig { panel_unit_power_kw: 0.4, average_tariff: 1.0, ..EstimatorConfig::default() };
        let est = Estimator::new(cfg).unwrap();
        let r = est.estimate(&residential(350.0, "SP")).unwrap();
        // 350 kWh / (4.6 * 30 * 0.85) = 2.984 kWp → 8 panels of 0.4 kW
        assert_eq!(r.sizing.panel_count, 8);
        assert!((r.sizing.system_power_kw - 3.2).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = EstimatorConfig { system_efficiency: 0.0, ..EstimatorConfig::default() };
        assert!(Estimator::new(cfg).is_err());
    }

    struct Fixed(Option<Region>);

    impl RegionClassifier for Fixed {
        fn lookup(&self, _location: &str) -> Option<Region> {
            self.0
        }
    }

    #[test]
    fn test_custom_classifier() {
        let est = Estimator::with_classifier(EstimatorConfig::default(), Fixed(Some(Region::South))).unwrap();
        let r = est.estimate(&residential(350.0, "São Paulo")).unwrap();
        assert_eq!(r.region, Region::South);
        assert_eq!(r.region_factor, 4.2);

        let cfg = EstimatorConfig { default_region: Region::North, ..EstimatorConfig::default() };
        let est = Estimator::with_classifier(cfg, Fixed(None)).unwrap();
        assert_eq!(est.classify("anything"), Region::North);
    }

    #[test]
    fn test_same_input_same_output() {
        let input = residential(512.34, "Fortaleza - CE").with_consumption(700.0);
        let a = estimate(&input).unwrap();
        let b = estimate(&input).unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }
}
