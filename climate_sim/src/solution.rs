//! Shareable solution payloads.
//!
//! Storage and ownership live outside this crate; a draft is the exact shape
//! a caller persists, and its synergy score can be audited against the
//! stored outcomes at any time.

use climate_schema::{Challenge, SimulationOutcomes, SimulationParameters};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::synergy_score;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolutionError {
    #[error("solution title must not be blank")]
    BlankTitle,
    #[error("stored synergy score {stored} does not match recomputed {recomputed}")]
    SynergyMismatch { stored: u8, recomputed: u8 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionDraft {
    pub title: String,
    pub description: String,
    pub challenge: Challenge,
    pub parameters: SimulationParameters,
    pub outcomes: SimulationOutcomes,
    pub synergy_score: u8,
}

impl SolutionDraft {
    pub fn compose(
        title: impl Into<String>,
        description: Option<String>,
        challenge: Challenge,
        parameters: SimulationParameters,
        outcomes: SimulationOutcomes,
    ) -> Result<Self, SolutionError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(SolutionError::BlankTitle);
        }
        let description = description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| default_description(challenge, &parameters));
        let synergy_score = synergy_score(&outcomes);
        Ok(Self {
            title,
            description,
            challenge,
            parameters,
            outcomes,
            synergy_score,
        })
    }

    pub fn verify_synergy(&self) -> Result<(), SolutionError> {
        let recomputed = synergy_score(&self.outcomes);
        if recomputed == self.synergy_score {
            Ok(())
        } else {
            Err(SolutionError::SynergyMismatch {
                stored: self.synergy_score,
                recomputed,
            })
        }
    }
}

pub fn default_description(challenge: Challenge, parameters: &SimulationParameters) -> String {
    format!(
        "A {} solution using {}% solar and {}% wind energy with {} policy strength.",
        challenge.as_str().replacen('_', " ", 1),
        parameters.solar_energy_adoption,
        parameters.wind_energy_adoption,
        parameters.policy_strength,
    )
}
