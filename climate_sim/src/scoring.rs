//! Composite scores shared by both challenge models, plus the caller-side
//! synergy helpers derived from finished outcomes.

use climate_schema::SimulationOutcomes;

use crate::{engine::AdoptionInputs, model_config::PolicyTable};

const FEASIBILITY_BASE: f64 = 80.0;
const FEASIBILITY_COMFORT_LIMIT: f64 = 80.0;
const FEASIBILITY_OVERSHOOT_PENALTY: f64 = 0.5;
const FEASIBILITY_BALANCE_WINDOW: f64 = 20.0;
const FEASIBILITY_BALANCE_BONUS: f64 = 10.0;
const FEASIBILITY_BOUNDS: (f64, f64) = (20.0, 100.0);

const SUSTAINABILITY_BASE: f64 = 50.0;
const SUSTAINABILITY_ADOPTION_WEIGHT: f64 = 40.0;
const SUSTAINABILITY_BOUNDS: (f64, f64) = (10.0, 100.0);

const GLOBAL_IMPACT_BASE: f64 = 40.0;
const GLOBAL_IMPACT_REDUCTION_SCALE: f64 = 65.0;
const GLOBAL_IMPACT_REDUCTION_WEIGHT: f64 = 35.0;
const GLOBAL_IMPACT_FEASIBILITY_WEIGHT: f64 = 15.0;
const GLOBAL_IMPACT_BOUNDS: (f64, f64) = (15.0, 100.0);

const ADOPTION_CEILING: f64 = 200.0;

/// Feasibility before rounding. `challenge_bonus` is added ahead of the clamp.
pub fn feasibility(inputs: &AdoptionInputs, policy: &PolicyTable, challenge_bonus: f64) -> f64 {
    let mut score = FEASIBILITY_BASE;
    for adoption in [inputs.solar, inputs.wind] {
        if adoption > FEASIBILITY_COMFORT_LIMIT {
            score -= (adoption - FEASIBILITY_COMFORT_LIMIT) * FEASIBILITY_OVERSHOOT_PENALTY;
        }
    }
    score += policy.feasibility_adjustment(inputs.policy);
    if (inputs.solar - inputs.wind).abs() < FEASIBILITY_BALANCE_WINDOW {
        score += FEASIBILITY_BALANCE_BONUS;
    }
    score += challenge_bonus;
    score.clamp(FEASIBILITY_BOUNDS.0, FEASIBILITY_BOUNDS.1)
}

pub fn sustainability(renewable_total: f64, temperature_change: f64) -> f64 {
    let mut score =
        SUSTAINABILITY_BASE + renewable_total / ADOPTION_CEILING * SUSTAINABILITY_ADOPTION_WEIGHT;
    score += if temperature_change <= 1.5 {
        30.0
    } else if temperature_change <= 2.0 {
        20.0
    } else if temperature_change <= 2.5 {
        10.0
    } else {
        0.0
    };
    if renewable_total < 50.0 {
        score -= 15.0;
    }
    if renewable_total > 180.0 {
        score -= 10.0;
    }
    score.clamp(SUSTAINABILITY_BOUNDS.0, SUSTAINABILITY_BOUNDS.1)
}

pub fn global_impact(co2_reduction: f64, temperature_change: f64, feasibility: f64) -> f64 {
    let mut score = GLOBAL_IMPACT_BASE
        + co2_reduction / GLOBAL_IMPACT_REDUCTION_SCALE * GLOBAL_IMPACT_REDUCTION_WEIGHT;
    if temperature_change <= 1.5 {
        score += 20.0;
    } else if temperature_change <= 2.0 {
        score += 10.0;
    }
    score += feasibility / 100.0 * GLOBAL_IMPACT_FEASIBILITY_WEIGHT;
    score.clamp(GLOBAL_IMPACT_BOUNDS.0, GLOBAL_IMPACT_BOUNDS.1)
}

/// Round half up to the nearest integer.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round half up to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Round a score already clamped into `[0, 100]`.
pub(crate) fn score_to_u8(value: f64) -> u8 {
    round_half_up(value).clamp(0.0, 100.0) as u8
}

/// Blend of temperature efficiency and the three composite scores.
///
/// Depends on `outcomes` alone so a persisted result can always be re-audited.
pub fn synergy_score(outcomes: &SimulationOutcomes) -> u8 {
    let efficiency = (100.0 - outcomes.temperature_change.abs() * 20.0).max(0.0);
    let blended = efficiency * 0.3
        + f64::from(outcomes.sustainability_score) * 0.3
        + f64::from(outcomes.feasibility_score) * 0.2
        + f64::from(outcomes.global_impact_score) * 0.2;
    score_to_u8(blended)
}

pub fn synergy_tip(score: u8) -> &'static str {
    if score < 60 {
        "Try balancing renewable energy sources for better sustainability!"
    } else if score < 80 {
        "Great progress! Consider stronger policy measures to maximize impact."
    } else {
        "Excellent solution! Your approach shows strong synergy across all metrics."
    }
}

/// Heuristic read of how well the sanitised inputs work together.
pub fn parameter_synergy(inputs: &AdoptionInputs, policy: &PolicyTable) -> u8 {
    let solar = inputs.solar;
    let wind = inputs.wind;
    let total = inputs.total();
    let multiplier = policy.multiplier(inputs.policy);
    let mut score = 60.0;

    let balance = (solar - wind).abs();
    if balance < 15.0 {
        score += 15.0;
    } else if balance < 30.0 {
        score += 8.0;
    } else if balance < 50.0 {
        score += 3.0;
    }

    if total > 120.0 && multiplier >= 1.5 {
        score += 20.0;
    } else if total > 80.0 && multiplier >= 1.2 {
        score += 12.0;
    } else if total < 60.0 && multiplier <= 1.0 {
        score -= 10.0;
    }

    if solar > 90.0 || wind > 90.0 {
        score -= 8.0;
    }
    if solar < 10.0 && wind < 10.0 {
        score -= 15.0;
    }

    score_to_u8(f64::clamp(score, 20.0, 100.0))
}
