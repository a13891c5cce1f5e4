//! Challenge dispatch and outcome assembly.
//!
//! The engine owns an immutable [`ModelConfig`] and is safe to share across
//! threads; every call is a pure function of the config and its inputs.

use std::sync::{Arc, OnceLock};

use climate_schema::{Challenge, PolicyStrength, SimulationOutcomes, SimulationParameters};
use serde::Serialize;

use crate::{
    emissions::{self, EmissionsBreakdown},
    model_config::{InputConfig, ModelConfig},
    reforestation::{self, ReforestationBreakdown},
    scoring::{self, round_to_tenth, score_to_u8},
    variance::Perturbation,
};

/// Adoption inputs after sanitising; every model formula reads these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdoptionInputs {
    pub solar: f64,
    pub wind: f64,
    pub policy: PolicyStrength,
}

impl AdoptionInputs {
    pub fn sanitize(parameters: &SimulationParameters, inputs: &InputConfig) -> Self {
        Self {
            solar: inputs.sanitize(parameters.solar_energy_adoption),
            wind: inputs.sanitize(parameters.wind_energy_adoption),
            policy: parameters.policy_strength,
        }
    }

    pub fn total(&self) -> f64 {
        self.solar + self.wind
    }
}

/// Unrounded continuous results of one challenge model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub temperature_change: f64,
    pub co2_reduction: f64,
    pub economic_impact: f64,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ChallengeBreakdown {
    ReduceEmissions(EmissionsBreakdown),
    Reforestation(ReforestationBreakdown),
}

impl ChallengeBreakdown {
    pub fn projection(&self) -> Projection {
        match self {
            ChallengeBreakdown::ReduceEmissions(breakdown) => breakdown.projection(),
            ChallengeBreakdown::Reforestation(breakdown) => breakdown.projection(),
        }
    }
}

/// Composite scores before rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub feasibility: f64,
    pub sustainability: f64,
    pub global_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelBreakdown {
    pub challenge: Challenge,
    pub inputs: AdoptionInputs,
    pub policy_multiplier: f64,
    pub perturbation: Perturbation,
    pub model: ChallengeBreakdown,
    pub scores: ScoreBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub outcomes: SimulationOutcomes,
    pub breakdown: ModelBreakdown,
}

#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: Arc<ModelConfig>,
}

impl SimulationEngine {
    pub fn new(config: Arc<ModelConfig>) -> Self {
        Self { config }
    }

    pub fn builtin() -> Self {
        Self::new(ModelConfig::builtin())
    }

    pub fn config(&self) -> &Arc<ModelConfig> {
        &self.config
    }

    /// Run by challenge id; unknown ids fall back to `reduce_emissions`.
    pub fn run(&self, challenge: &str, parameters: &SimulationParameters) -> SimulationOutcomes {
        self.run_challenge(Challenge::resolve(challenge), parameters)
    }

    pub fn run_challenge(
        &self,
        challenge: Challenge,
        parameters: &SimulationParameters,
    ) -> SimulationOutcomes {
        self.explain(challenge, parameters).outcomes
    }

    pub fn explain(&self, challenge: Challenge, parameters: &SimulationParameters) -> SimulationReport {
        let config = self.config.as_ref();
        let inputs = AdoptionInputs::sanitize(parameters, &config.inputs);
        let perturbation = Perturbation::for_run(&config.variance, challenge, &inputs);

        let (model, challenge_feasibility, challenge_sustainability) = match challenge {
            Challenge::ReduceEmissions => (
                ChallengeBreakdown::ReduceEmissions(emissions::project(
                    &inputs,
                    config,
                    perturbation,
                )),
                0.0,
                0.0,
            ),
            Challenge::Reforestation => (
                ChallengeBreakdown::Reforestation(reforestation::project(
                    &inputs,
                    config,
                    perturbation,
                )),
                config.reforestation.feasibility_bonus,
                config.reforestation.sustainability_bonus,
            ),
        };
        let projection = model.projection();

        let feasibility = scoring::feasibility(&inputs, &config.policy, challenge_feasibility);
        let sustainability = (scoring::sustainability(inputs.total(), projection.temperature_change)
            + challenge_sustainability)
            .min(100.0);
        let global_impact = scoring::global_impact(
            projection.co2_reduction,
            projection.temperature_change,
            feasibility,
        );

        let outcomes = SimulationOutcomes {
            temperature_change: round_to_tenth(projection.temperature_change),
            co2_reduction: round_to_tenth(projection.co2_reduction),
            economic_impact: round_to_tenth(projection.economic_impact),
            roi: round_to_tenth(projection.roi),
            feasibility_score: score_to_u8(feasibility),
            sustainability_score: score_to_u8(sustainability),
            global_impact_score: score_to_u8(global_impact),
        };

        tracing::debug!(
            target: "climate::engine",
            challenge = %challenge,
            solar = inputs.solar,
            wind = inputs.wind,
            policy = %inputs.policy,
            co2_reduction = outcomes.co2_reduction,
            temperature_change = outcomes.temperature_change,
            perturbed = !perturbation.is_identity(),
            "simulation.completed"
        );

        SimulationReport {
            outcomes,
            breakdown: ModelBreakdown {
                challenge,
                policy_multiplier: config.policy.multiplier(inputs.policy),
                inputs,
                perturbation,
                model,
                scores: ScoreBreakdown {
                    feasibility,
                    sustainability,
                    global_impact,
                },
            },
        }
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Run against the builtin configuration.
pub fn run_simulation(challenge: &str, parameters: &SimulationParameters) -> SimulationOutcomes {
    static ENGINE: OnceLock<SimulationEngine> = OnceLock::new();
    ENGINE
        .get_or_init(SimulationEngine::builtin)
        .run(challenge, parameters)
}
