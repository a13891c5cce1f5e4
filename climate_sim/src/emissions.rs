//! Renewable build-out model for the `reduce_emissions` challenge.

use serde::Serialize;

use crate::{
    engine::{AdoptionInputs, Projection},
    model_config::ModelConfig,
    variance::Perturbation,
};

/// Every intermediate term of one emissions projection, unrounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionsBreakdown {
    pub renewable_total: f64,
    pub renewable_contribution: f64,
    pub policy_bonus: f64,
    pub diversity_bonus: f64,
    pub integration_penalty: f64,
    pub co2_reduction: f64,
    pub temperature_reduction: f64,
    pub feedback_multiplier: f64,
    pub temperature_change: f64,
    pub solar_cost: f64,
    pub wind_cost: f64,
    pub infrastructure_cost: f64,
    pub policy_cost: f64,
    pub total_cost: f64,
    pub avoided_climate_cost: f64,
    pub economic_benefit: f64,
    pub roi: f64,
}

impl EmissionsBreakdown {
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
) -> EmissionsBreakdown {
    let params = &config.emissions;
    let multiplier = config.policy.multiplier(inputs.policy);
    let total = inputs.total();

    let renewable_contribution = (total / params.renewable_normalizer)
        .powf(params.diminishing_exponent)
        * params.max_theoretical_reduction;
    let policy_bonus = (multiplier - 1.0) * params.policy_bonus_scale;
    let diversity_bonus = inputs.solar.min(inputs.wind) / inputs.solar.max(inputs.wind).max(1.0)
        * params.diversity_bonus_max;
    let integration_penalty = if total > params.integration_threshold {
        ((total - params.integration_threshold) / params.integration_span)
            .powf(params.integration_exponent)
            * params.integration_penalty_scale
    } else {
        0.0
    };

    let net_reduction =
        (renewable_contribution + policy_bonus + diversity_bonus - integration_penalty)
            * perturbation.co2_factor;
    let co2_reduction = net_reduction.clamp(params.reduction_floor, params.max_theoretical_reduction);

    let temperature_reduction = config.climate.global_emissions_baseline * co2_reduction / 100.0
        * config.climate.co2_to_temperature;
    let feedback_multiplier = if co2_reduction > params.feedback_threshold {
        params.feedback_factor
    } else {
        1.0
    };
    let temperature_change = (params.baseline_temperature
        - temperature_reduction * feedback_multiplier)
        .max(params.temperature_floor);

    let solar_cost =
        params.solar_cost_per_point * inputs.solar * params.market.cost_factor(inputs.solar);
    let wind_cost = params.wind_cost_per_point * inputs.wind * params.market.cost_factor(inputs.wind);
    let infrastructure_cost = (total / params.infrastructure_normalizer)
        .powf(params.infrastructure_exponent)
        * params.infrastructure_scale;
    let policy_cost = (solar_cost + wind_cost) * params.policy_cost_multiplier * (multiplier - 1.0);
    let total_cost =
        (solar_cost + wind_cost + infrastructure_cost + policy_cost) * perturbation.cost_factor;

    let avoided_climate_cost = co2_reduction * params.avoided_cost_per_point;
    let economic_benefit = total * params.benefit_per_point;
    let roi = if total_cost > 0.0 {
        ((avoided_climate_cost + economic_benefit) / total_cost * 100.0).max(params.roi_floor)
    } else {
        0.0
    };

    EmissionsBreakdown {
        renewable_total: total,
        renewable_contribution,
        policy_bonus,
        diversity_bonus,
        integration_penalty,
        co2_reduction,
        temperature_reduction,
        feedback_multiplier,
        temperature_change,
        solar_cost,
        wind_cost,
        infrastructure_cost,
        policy_cost,
        total_cost,
        avoided_climate_cost,
        economic_benefit,
        roi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climate_schema::PolicyStrength;

    fn run(solar: f64, wind: f64, policy: PolicyStrength) -> EmissionsBreakdown {
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
    fn balanced_mix_earns_full_diversity_bonus() {
        let breakdown = run(50.0, 50.0, PolicyStrength::High);
        assert!((breakdown.diversity_bonus - 5.0).abs() < 1e-12);
        assert!((breakdown.policy_bonus - 6.0).abs() < 1e-12);
        assert_eq!(breakdown.integration_penalty, 0.0);
    }

    #[test]
    fn integration_penalty_applies_past_threshold() {
        let breakdown = run(100.0, 100.0, PolicyStrength::Maximum);
        let expected = (1.0f64).powf(1.5) * 8.0;
        assert!((breakdown.integration_penalty - expected).abs() < 1e-12);
        assert_eq!(breakdown.co2_reduction, 75.0);
        assert_eq!(breakdown.feedback_multiplier, 1.1);
    }

    #[test]
    fn no_adoption_hits_floor_without_cost() {
        let breakdown = run(0.0, 0.0, PolicyStrength::Low);
        assert_eq!(breakdown.co2_reduction, 2.0);
        assert_eq!(breakdown.total_cost, 0.0);
        assert_eq!(breakdown.roi, 0.0);
    }

    #[test]
    fn canonical_mix_cools_below_baseline() {
        let breakdown = run(65.0, 45.0, PolicyStrength::Moderate);
        assert!(breakdown.temperature_change < 2.4);
        assert!((45.0..=60.0).contains(&breakdown.co2_reduction));
        let components = breakdown.solar_cost
            + breakdown.wind_cost
            + breakdown.infrastructure_cost
            + breakdown.policy_cost;
        assert!((components - breakdown.total_cost).abs() < 1e-9);
    }

    #[test]
    fn perturbation_scales_before_bounds() {
        let inputs = AdoptionInputs {
            solar: 100.0,
            wind: 100.0,
            policy: PolicyStrength::Maximum,
        };
        let boosted = project(
            &inputs,
            &ModelConfig::default(),
            Perturbation {
                co2_factor: 1.5,
                cost_factor: 1.0,
            },
        );
        assert_eq!(boosted.co2_reduction, 75.0);
    }
}
