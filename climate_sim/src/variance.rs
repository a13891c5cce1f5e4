//! Opt-in bounded perturbation of model results.
//!
//! The draw is seeded from the run inputs, so identical requests still see
//! identical numbers when variance is switched on.

use std::hash::Hasher;

use climate_schema::Challenge;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::Serialize;

use crate::{engine::AdoptionInputs, hashing::FnvHasher, model_config::VarianceConfig};

/// Multiplicative factors applied to raw model quantities before bounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Perturbation {
    pub co2_factor: f64,
    pub cost_factor: f64,
}

impl Perturbation {
    pub const IDENTITY: Perturbation = Perturbation {
        co2_factor: 1.0,
        cost_factor: 1.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn for_run(config: &VarianceConfig, challenge: Challenge, inputs: &AdoptionInputs) -> Self {
        if !config.enabled || config.amplitude <= 0.0 {
            return Self::IDENTITY;
        }
        let mut rng = SmallRng::seed_from_u64(run_seed(config.seed, challenge, inputs));
        let low = 1.0 - config.amplitude;
        let high = 1.0 + config.amplitude;
        Perturbation {
            co2_factor: rng.gen_range(low..=high),
            cost_factor: rng.gen_range(low..=high),
        }
    }
}

impl Default for Perturbation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Seed for one run: resolved challenge, sanitised inputs, policy and config seed.
pub fn run_seed(config_seed: u64, challenge: Challenge, inputs: &AdoptionInputs) -> u64 {
    let mut hasher = FnvHasher::new();
    hasher.write_str(challenge.as_str());
    hasher.write_f64(inputs.solar);
    hasher.write_f64(inputs.wind);
    hasher.write_str(inputs.policy.as_str());
    hasher.write_u64(config_seed);
    hasher.finish()
}
