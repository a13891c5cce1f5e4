use climate_schema::{Challenge, PolicyStrength, SimulationParameters, SweepEntry};
use rayon::prelude::*;
use thiserror::Error;

use crate::{engine::SimulationEngine, scoring::synergy_score};

pub const SWEEP_MAX_ADOPTION: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct SweepRequest {
    pub challenge: Challenge,
    pub policy: PolicyStrength,
    pub step: u32,
    pub limit: Option<usize>,
}

impl SweepRequest {
    pub fn new(challenge: Challenge, policy: PolicyStrength, step: u32) -> Self {
        Self {
            challenge,
            policy,
            step,
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SweepError {
    #[error("sweep step must be between 1 and {max}, got {step}")]
    InvalidStep { step: u32, max: u32 },
}

/// Evaluate every (solar, wind) grid point, best synergy first.
///
/// Ties go to the lower total adoption, then to the lower solar share, so
/// the order does not depend on how rayon schedules the work.
pub fn sweep(engine: &SimulationEngine, request: &SweepRequest) -> Result<Vec<SweepEntry>, SweepError> {
    if request.step == 0 || request.step > SWEEP_MAX_ADOPTION {
        return Err(SweepError::InvalidStep {
            step: request.step,
            max: SWEEP_MAX_ADOPTION,
        });
    }

    let axis: Vec<f64> = (0..=SWEEP_MAX_ADOPTION)
        .step_by(request.step as usize)
        .map(f64::from)
        .collect();
    let grid: Vec<(f64, f64)> = axis
        .iter()
        .flat_map(|&solar| axis.iter().map(move |&wind| (solar, wind)))
        .collect();

    let mut entries: Vec<SweepEntry> = grid
        .into_par_iter()
        .map(|(solar, wind)| {
            let parameters = SimulationParameters::new(solar, wind, request.policy);
            let outcomes = engine.run_challenge(request.challenge, &parameters);
            SweepEntry {
                synergy_score: synergy_score(&outcomes),
                parameters,
                outcomes,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.synergy_score
            .cmp(&a.synergy_score)
            .then_with(|| total_adoption(a).total_cmp(&total_adoption(b)))
            .then_with(|| {
                a.parameters
                    .solar_energy_adoption
                    .total_cmp(&b.parameters.solar_energy_adoption)
            })
    });
    if let Some(limit) = request.limit {
        entries.truncate(limit);
    }

    tracing::debug!(
        target: "climate::engine",
        challenge = %request.challenge,
        policy = %request.policy,
        step = request.step,
        returned = entries.len(),
        "sweep.completed"
    );
    Ok(entries)
}

fn total_adoption(entry: &SweepEntry) -> f64 {
    entry.parameters.solar_energy_adoption + entry.parameters.wind_energy_adoption
}
