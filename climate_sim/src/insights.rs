//! Caller-side read-outs derived from a finished run: tips, suggestions and
//! a benchmark tier.

use climate_schema::{PolicyStrength, SimulationOutcomes, SimulationParameters};
use serde::Serialize;

use crate::{
    engine::AdoptionInputs,
    model_config::ModelConfig,
    scoring::{parameter_synergy, synergy_score, synergy_tip},
};

pub const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    RaiseAdoption,
    AddWind,
    AddSolar,
    StrengthenPolicy,
    ImproveReturns,
    PhaseGradually,
    BroadenAdoption,
}

impl Suggestion {
    pub fn message(&self) -> &'static str {
        match self {
            Suggestion::RaiseAdoption => {
                "Consider increasing renewable energy adoption to meet the 2°C target"
            }
            Suggestion::AddWind => {
                "Try increasing wind energy to create a more balanced renewable portfolio"
            }
            Suggestion::AddSolar => "Try increasing solar energy to complement your wind strategy",
            Suggestion::StrengthenPolicy => {
                "With high renewable targets, stronger policy support could improve feasibility"
            }
            Suggestion::ImproveReturns => {
                "Consider adjusting the renewable energy mix to improve economic returns"
            }
            Suggestion::PhaseGradually => {
                "Current parameters may be challenging to implement - consider a more gradual approach"
            }
            Suggestion::BroadenAdoption => {
                "Increase overall renewable adoption for better long-term sustainability"
            }
        }
    }
}

/// Up to [`MAX_SUGGESTIONS`] hints, most pressing first.
pub fn optimization_suggestions(
    inputs: &AdoptionInputs,
    outcomes: &SimulationOutcomes,
) -> Vec<Suggestion> {
    let (solar, wind) = (inputs.solar, inputs.wind);
    let candidates = [
        (outcomes.temperature_change > 2.0).then_some(Suggestion::RaiseAdoption),
        ((solar - wind).abs() > 40.0).then_some(if solar > wind {
            Suggestion::AddWind
        } else {
            Suggestion::AddSolar
        }),
        (inputs.policy == PolicyStrength::Low && inputs.total() > 100.0)
            .then_some(Suggestion::StrengthenPolicy),
        (outcomes.roi < 150.0).then_some(Suggestion::ImproveReturns),
        (outcomes.feasibility_score < 60).then_some(Suggestion::PhaseGradually),
        (outcomes.sustainability_score < 70).then_some(Suggestion::BroadenAdoption),
    ];
    candidates
        .into_iter()
        .flatten()
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkTier {
    Challenging,
    Moderate,
    Good,
    Excellent,
    Exceptional,
}

impl BenchmarkTier {
    /// Tier of the mean of the three composite scores.
    pub fn for_outcomes(outcomes: &SimulationOutcomes) -> Self {
        let mean = (f64::from(outcomes.feasibility_score)
            + f64::from(outcomes.sustainability_score)
            + f64::from(outcomes.global_impact_score))
            / 3.0;
        if mean >= 85.0 {
            BenchmarkTier::Exceptional
        } else if mean >= 75.0 {
            BenchmarkTier::Excellent
        } else if mean >= 65.0 {
            BenchmarkTier::Good
        } else if mean >= 50.0 {
            BenchmarkTier::Moderate
        } else {
            BenchmarkTier::Challenging
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BenchmarkTier::Exceptional => {
                "Exceptional - Your solution exceeds current best practices"
            }
            BenchmarkTier::Excellent => "Excellent - Comparable to leading climate initiatives",
            BenchmarkTier::Good => "Good - Aligns with mainstream climate targets",
            BenchmarkTier::Moderate => "Moderate - Room for improvement in key areas",
            BenchmarkTier::Challenging => "Challenging - Consider revising your approach",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub synergy_score: u8,
    pub synergy_tip: &'static str,
    pub parameter_synergy: u8,
    pub benchmark: BenchmarkTier,
    pub suggestions: Vec<Suggestion>,
}

impl Insights {
    /// Parameters are sanitised with `config.inputs` first, exactly as a run sees them.
    pub fn gather(
        parameters: &SimulationParameters,
        outcomes: &SimulationOutcomes,
        config: &ModelConfig,
    ) -> Self {
        let inputs = AdoptionInputs::sanitize(parameters, &config.inputs);
        let synergy = synergy_score(outcomes);
        Self {
            synergy_score: synergy,
            synergy_tip: synergy_tip(synergy),
            parameter_synergy: parameter_synergy(&inputs, &config.policy),
            benchmark: BenchmarkTier::for_outcomes(outcomes),
            suggestions: optimization_suggestions(&inputs, outcomes),
        }
    }

    pub fn suggestion_messages(&self) -> Vec<String> {
        self.suggestions
            .iter()
            .map(|suggestion| suggestion.message().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SimulationEngine;

    #[test]
    fn canonical_run_insights() {
        let engine = SimulationEngine::builtin();
        let params = SimulationParameters::default();
        let outcomes = engine.run("reduce_emissions", &params);
        let insights = Insights::gather(&params, &outcomes, engine.config());

        assert_eq!(insights.synergy_score, 72);
        assert!(insights.synergy_tip.starts_with("Great progress"));
        assert_eq!(insights.parameter_synergy, 80);
        // mean of 80, 82, 79
        assert_eq!(insights.benchmark, BenchmarkTier::Excellent);
        assert_eq!(
            insights.suggestions,
            vec![Suggestion::RaiseAdoption, Suggestion::ImproveReturns]
        );
    }

    #[test]
    fn suggestions_are_capped_and_ordered() {
        let inputs = AdoptionInputs {
            solar: 0.0,
            wind: 150.0,
            policy: PolicyStrength::Low,
        };
        let outcomes = SimulationOutcomes {
            temperature_change: 2.4,
            co2_reduction: 10.0,
            economic_impact: 100.0,
            roi: 50.0,
            feasibility_score: 40,
            sustainability_score: 40,
            global_impact_score: 40,
        };
        let suggestions = optimization_suggestions(&inputs, &outcomes);
        assert_eq!(
            suggestions,
            vec![
                Suggestion::RaiseAdoption,
                Suggestion::AddSolar,
                Suggestion::StrengthenPolicy
            ]
        );
    }

    #[test]
    fn healthy_outcomes_need_no_suggestions() {
        let inputs = AdoptionInputs {
            solar: 60.0,
            wind: 55.0,
            policy: PolicyStrength::High,
        };
        let outcomes = SimulationOutcomes {
            temperature_change: 1.6,
            co2_reduction: 60.0,
            economic_impact: 100.0,
            roi: 180.0,
            feasibility_score: 90,
            sustainability_score: 90,
            global_impact_score: 90,
        };
        assert!(optimization_suggestions(&inputs, &outcomes).is_empty());
        assert_eq!(BenchmarkTier::for_outcomes(&outcomes), BenchmarkTier::Exceptional);
    }

    #[test]
    fn insights_read_sanitised_inputs() {
        let engine = SimulationEngine::builtin();
        let negative = SimulationParameters::new(-30.0, 20.0, PolicyStrength::Low);
        let zeroed = SimulationParameters::new(0.0, 20.0, PolicyStrength::Low);
        let outcomes = engine.run("reduce_emissions", &negative);
        assert_eq!(outcomes, engine.run("reduce_emissions", &zeroed));

        let from_negative = Insights::gather(&negative, &outcomes, engine.config());
        let from_zeroed = Insights::gather(&zeroed, &outcomes, engine.config());
        assert_eq!(from_negative, from_zeroed);
        assert!(!from_negative.suggestions.contains(&Suggestion::AddSolar));

        let overshoot = SimulationParameters::new(f64::NAN, 500.0, PolicyStrength::Low);
        let clamped = SimulationParameters::new(0.0, 200.0, PolicyStrength::Low);
        assert_eq!(
            Insights::gather(&overshoot, &outcomes, engine.config()),
            Insights::gather(&clamped, &outcomes, engine.config())
        );
    }

    #[test]
    fn tier_descriptions_lead_with_label() {
        assert!(BenchmarkTier::Moderate.description().starts_with("Moderate - "));
        assert!(BenchmarkTier::Challenging < BenchmarkTier::Good);
    }
}
