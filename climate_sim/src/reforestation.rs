//! Forest coverage model for the `reforestation` challenge.
//!
//! The two adoption inputs are read as forest coverage percentages.

use serde::Serialize;

use crate::{
    engine::{AdoptionInputs, Projection},
    model_config::ModelConfig,
    variance::Perturbation,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReforestationBreakdown {
    pub coverage_total: f64,
    pub immediate_sequestration: f64,
    pub long_term_sequestration: f64,
    pub co2_reduction: f64,
    pub direct_cooling: f64,
    pub albedo_cooling: f64,
    pub ecosystem_cooling: f64,
    pub temperature_change: f64,
    pub land_cost: f64,
    pub planting_cost: f64,
    pub maintenance_cost: f64,
    pub total_cost: f64,
    pub carbon_credits: f64,
    pub ecosystem_services: f64,
    pub timber_revenue: f64,
    pub roi: f64,
}

impl ReforestationBreakdown {
    pub fn projection(&self) -> Projection {
        Projection {
            temperature_change: self.temperature_change,
            co2_reduction: self.co2_reduction,
            economic_impact: self.total_cost,
            roi: self.roi,
        }
    }
}

pub fn project(
    inputs: &AdoptionInputs,
    config: &ModelConfig,
    perturbation: Perturbation,
) -> ReforestationBreakdown {
    let params = &config.reforestation;
    let multiplier = config.policy.multiplier(inputs.policy);
    let total = inputs.total();
    let coverage = total / params.coverage_normalizer;

    let immediate_sequestration =
        coverage * params.immediate_sequestration * params.forest_effectiveness;
    let long_term_sequestration = coverage
        * params.long_term_sequestration
        * multiplier.powf(params.long_term_policy_exponent);
    let co2_reduction = ((immediate_sequestration
        + long_term_sequestration * params.dampening_factor)
        * perturbation.co2_factor)
        .clamp(params.reduction_floor, params.reduction_ceiling);

    let direct_cooling = co2_reduction * config.climate.co2_to_temperature;
    let albedo_cooling = if total > params.albedo_threshold {
        params.albedo_cooling
    } else {
        total / params.albedo_threshold * params.albedo_cooling
    };
    let ecosystem_cooling = if total > params.ecosystem_threshold {
        params.ecosystem_cooling
    } else {
        0.0
    };
    let temperature_change = (params.baseline_temperature
        - direct_cooling
        - albedo_cooling
        - ecosystem_cooling)
        .max(params.temperature_floor);

    let land_cost = total * params.land_cost_per_point;
    let planting_cost = total * params.planting_cost_per_point;
    let maintenance_cost = total * params.maintenance_cost_per_point * multiplier;
    let total_cost = (land_cost + planting_cost + maintenance_cost) * perturbation.cost_factor;

    let carbon_credits = co2_reduction * params.carbon_credit_per_point;
    let ecosystem_services = total * params.ecosystem_services_per_point;
    let timber_revenue = if total > params.timber_threshold {
        total * params.timber_revenue_per_point
    } else {
        0.0
    };
    let roi = if total_cost > 0.0 {
        ((carbon_credits + ecosystem_services + timber_revenue) / total_cost * 100.0)
            .max(params.roi_floor)
    } else {
        0.0
    };

    ReforestationBreakdown {
        coverage_total: total,
        immediate_sequestration,
        long_term_sequestration,
        co2_reduction,
        direct_cooling,
        albedo_cooling,
        ecosystem_cooling,
        temperature_change,
        land_cost,
        planting_cost,
        maintenance_cost,
        total_cost,
        carbon_credits,
        ecosystem_services,
        timber_revenue,
        roi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climate_schema::PolicyStrength;

    fn run(solar: f64, wind: f64, policy: PolicyStrength) -> ReforestationBreakdown {
        project(
            &AdoptionInputs {
                solar,
                wind,
                policy,
            },
            &ModelConfig::default(),
            Perturbation::IDENTITY,
        )
    }

    #[test]
    fn long_term_term_scales_with_policy() {
        let low = run(40.0, 30.0, PolicyStrength::Low);
        let max = run(40.0, 30.0, PolicyStrength::Maximum);
        let ratio = max.long_term_sequestration / low.long_term_sequestration;
        assert!((ratio - 2.0f64.powf(1.2)).abs() < 1e-12);
        assert_eq!(low.immediate_sequestration, max.immediate_sequestration);
    }

    #[test]
    fn extra_cooling_switches_on_past_thresholds() {
        let sparse = run(40.0, 30.0, PolicyStrength::Low);
        assert!((sparse.albedo_cooling - 0.035).abs() < 1e-12);
        assert_eq!(sparse.ecosystem_cooling, 0.0);
        assert_eq!(sparse.timber_revenue, 0.0);

        let dense = run(100.0, 100.0, PolicyStrength::Low);
        assert_eq!(dense.albedo_cooling, 0.05);
        assert_eq!(dense.ecosystem_cooling, 0.02);
        assert_eq!(dense.timber_revenue, 2400.0);
    }

    #[test]
    fn sequestration_caps_at_ceiling() {
        let breakdown = run(100.0, 100.0, PolicyStrength::Maximum);
        assert_eq!(breakdown.co2_reduction, 45.0);
        assert_eq!(breakdown.total_cost, 6800.0);
    }

    #[test]
    fn bare_land_costs_nothing() {
        let breakdown = run(0.0, 0.0, PolicyStrength::Low);
        assert_eq!(breakdown.co2_reduction, 0.0);
        assert_eq!(breakdown.roi, 0.0);
        assert_eq!(breakdown.temperature_change, 2.3);
    }
}
