//! Data contracts shared by the climate simulation crates.
//!
//! Field names serialise in camelCase so that parameters and outcomes keep the
//! JSON shape stored alongside shared solutions.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordinal strength of regulatory intervention.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum PolicyStrength {
    Low,
    Moderate,
    High,
    Maximum,
}

impl PolicyStrength {
    pub const ALL: [PolicyStrength; 4] = [
        PolicyStrength::Low,
        PolicyStrength::Moderate,
        PolicyStrength::High,
        PolicyStrength::Maximum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStrength::Low => "low",
            PolicyStrength::Moderate => "moderate",
            PolicyStrength::High => "high",
            PolicyStrength::Maximum => "maximum",
        }
    }
}

impl Default for PolicyStrength {
    fn default() -> Self {
        PolicyStrength::Moderate
    }
}

impl fmt::Display for PolicyStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown policy strength '{0}' (expected low, moderate, high or maximum)")]
pub struct UnknownPolicyStrength(pub String);

impl FromStr for PolicyStrength {
    type Err = UnknownPolicyStrength;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(PolicyStrength::Low),
            "moderate" | "mod" => Ok(PolicyStrength::Moderate),
            "high" => Ok(PolicyStrength::High),
            "maximum" | "max" => Ok(PolicyStrength::Maximum),
            _ => Err(UnknownPolicyStrength(value.to_string())),
        }
    }
}

/// Closed set of challenges with a dedicated model.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Challenge {
    ReduceEmissions,
    Reforestation,
}

impl Challenge {
    pub const ALL: [Challenge; 2] = [Challenge::ReduceEmissions, Challenge::Reforestation];

    pub fn as_str(&self) -> &'static str {
        match self {
            Challenge::ReduceEmissions => "reduce_emissions",
            Challenge::Reforestation => "reforestation",
        }
    }

    /// Strict lookup. Returns `None` for identifiers without a model.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|challenge| challenge.as_str() == id)
    }

    /// Lookup used by the engine: unknown identifiers run the emissions model.
    pub fn resolve(id: &str) -> Self {
        Self::from_id(id).unwrap_or_default()
    }
}

impl Default for Challenge {
    fn default() -> Self {
        Challenge::ReduceEmissions
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy inputs for a single simulation run.
///
/// `carbon_tax` and `reforestation_area` are accepted for forward
/// compatibility and ignored by the current models, as is any unknown field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    pub solar_energy_adoption: f64,
    pub wind_energy_adoption: f64,
    pub policy_strength: PolicyStrength,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_tax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reforestation_area: Option<f64>,
}

impl SimulationParameters {
    pub fn new(solar: f64, wind: f64, policy_strength: PolicyStrength) -> Self {
        Self {
            solar_energy_adoption: solar,
            wind_energy_adoption: wind,
            policy_strength,
            carbon_tax: None,
            reforestation_area: None,
        }
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self::new(65.0, 45.0, PolicyStrength::Moderate)
    }
}

/// Projected outcome metrics produced fresh by every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcomes {
    /// Projected warming in °C by the model horizon.
    pub temperature_change: f64,
    /// Percentage reduction relative to the global emissions baseline.
    pub co2_reduction: f64,
    /// Total cost estimate in billions USD.
    pub economic_impact: f64,
    /// Percentage return on the total cost.
    pub roi: f64,
    pub feasibility_score: u8,
    pub sustainability_score: u8,
    pub global_impact_score: u8,
}

/// Input accepted by every simulation surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SimulationRequest {
    /// Challenge identifier. Unknown identifiers run the emissions model.
    pub challenge: String,
    pub parameters: SimulationParameters,
}

impl SimulationRequest {
    pub fn new(challenge: impl Into<String>, parameters: SimulationParameters) -> Self {
        Self {
            challenge: challenge.into(),
            parameters,
        }
    }

    pub fn resolved_challenge(&self) -> Challenge {
        Challenge::resolve(&self.challenge)
    }
}

/// One grid point of a parameter sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SweepEntry {
    pub parameters: SimulationParameters,
    pub outcomes: SimulationOutcomes,
    pub synergy_score: u8,
}

/// JSON Schema describing the request and outcome contracts.
pub fn contract_schema() -> Result<serde_json::Value, serde_json::Error> {
    let request = serde_json::to_value(schemars::schema_for!(SimulationRequest))?;
    let outcomes = serde_json::to_value(schemars::schema_for!(SimulationOutcomes))?;
    Ok(serde_json::json!({
        "request": request,
        "outcomes": outcomes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_use_camel_case_and_ignore_extras() {
        let json = r#"{
            "solarEnergyAdoption": 65,
            "windEnergyAdoption": 45,
            "policyStrength": "moderate",
            "carbonTax": 40,
            "gridStorage": "ignored"
        }"#;
        let params: SimulationParameters = serde_json::from_str(json).expect("parse");
        assert_eq!(params.solar_energy_adoption, 65.0);
        assert_eq!(params.wind_energy_adoption, 45.0);
        assert_eq!(params.policy_strength, PolicyStrength::Moderate);
        assert_eq!(params.carbon_tax, Some(40.0));
        assert_eq!(params.reforestation_area, None);

        let value = serde_json::to_value(&params).expect("serialize");
        assert!(value.get("policyStrength").is_some());
        assert!(value.get("reforestationArea").is_none());
    }

    #[test]
    fn outcomes_serialize_with_persisted_field_names() {
        let outcomes = SimulationOutcomes {
            temperature_change: 2.4,
            co2_reduction: 49.7,
            economic_impact: 4463.2,
            roi: 138.9,
            feasibility_score: 80,
            sustainability_score: 82,
            global_impact_score: 79,
        };
        let value = serde_json::to_value(&outcomes).expect("serialize");
        assert_eq!(value["co2Reduction"], 49.7);
        assert_eq!(value["globalImpactScore"], 79);
    }

    #[test]
    fn unknown_challenge_resolves_to_emissions() {
        assert_eq!(Challenge::from_id("ocean_cleanup"), None);
        assert_eq!(Challenge::resolve("ocean_cleanup"), Challenge::ReduceEmissions);
        assert_eq!(Challenge::resolve("reforestation"), Challenge::Reforestation);
    }

    #[test]
    fn policy_strength_parses_aliases() {
        assert_eq!("MAX".parse::<PolicyStrength>().unwrap(), PolicyStrength::Maximum);
        assert_eq!(" high ".parse::<PolicyStrength>().unwrap(), PolicyStrength::High);
        assert!("extreme".parse::<PolicyStrength>().is_err());
        assert!(PolicyStrength::Low < PolicyStrength::Maximum);
    }

    #[test]
    fn contract_schema_lists_request_fields() {
        let schema = contract_schema().expect("schema");
        let text = schema.to_string();
        assert!(text.contains("solarEnergyAdoption"));
        assert!(text.contains("globalImpactScore"));
    }
}
