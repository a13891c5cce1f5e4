//! Tunable constants for the challenge models.
//!
//! Loaded from `model_config.json` with support for an environment variable
//! override. Every section is `#[serde(default)]`, so an override file only
//! needs to name the values it changes.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use climate_schema::PolicyStrength;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BUILTIN_MODEL_CONFIG: &str = include_str!("data/model_config.json");

/// Environment variable naming an override config file.
pub const MODEL_CONFIG_ENV: &str = "CLIMATE_MODEL_CONFIG_PATH";

/// Root configuration for the simulation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub version: u32,
    pub policy: PolicyTable,
    pub inputs: InputConfig,
    pub climate: ClimateConfig,
    pub emissions: EmissionsConfig,
    pub reforestation: ReforestationConfig,
    pub variance: VarianceConfig,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            version: 1,
            policy: PolicyTable::default(),
            inputs: InputConfig::default(),
            climate: ClimateConfig::default(),
            emissions: EmissionsConfig::default(),
            reforestation: ReforestationConfig::default(),
            variance: VarianceConfig::default(),
        }
    }
}

impl ModelConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_MODEL_CONFIG).expect("builtin model config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelConfigError> {
        let config: ModelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ModelConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ModelConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ModelConfig::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ModelConfigError> {
        let sections = [
            self.policy.numeric_fields(),
            self.inputs.numeric_fields(),
            self.climate.numeric_fields(),
            self.emissions.numeric_fields(),
            self.reforestation.numeric_fields(),
            self.variance.numeric_fields(),
        ];
        for (field, value) in sections.iter().flatten() {
            if !value.is_finite() {
                return Err(ModelConfigError::invalid(field, "must be finite"));
            }
        }

        for (field, value) in [
            ("inputs.max_adoption", self.inputs.max_adoption),
            (
                "emissions.renewable_normalizer",
                self.emissions.renewable_normalizer,
            ),
            ("emissions.integration_span", self.emissions.integration_span),
            (
                "emissions.infrastructure_normalizer",
                self.emissions.infrastructure_normalizer,
            ),
            (
                "emissions.market.scale_discount_divisor",
                self.emissions.market.scale_discount_divisor,
            ),
            ("emissions.market.supply_span", self.emissions.market.supply_span),
            (
                "reforestation.coverage_normalizer",
                self.reforestation.coverage_normalizer,
            ),
        ] {
            if value <= 0.0 {
                return Err(ModelConfigError::invalid(field, "must be positive"));
            }
        }

        let mut previous = 1.0;
        for strength in PolicyStrength::ALL {
            let multiplier = self.policy.multiplier(strength);
            if multiplier < previous {
                return Err(ModelConfigError::invalid(
                    "policy.multipliers",
                    "must start at 1.0 or above and never decrease with strength",
                ));
            }
            previous = multiplier;
        }

        if self.emissions.reduction_floor > self.emissions.max_theoretical_reduction {
            return Err(ModelConfigError::invalid(
                "emissions.reduction_floor",
                "must not exceed max_theoretical_reduction",
            ));
        }
        if self.reforestation.reduction_floor > self.reforestation.reduction_ceiling {
            return Err(ModelConfigError::invalid(
                "reforestation.reduction_floor",
                "must not exceed reduction_ceiling",
            ));
        }
        if !(0.0..=0.5).contains(&self.variance.amplitude) {
            return Err(ModelConfigError::invalid(
                "variance.amplitude",
                "must lie within [0, 0.5]",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ModelConfigError {
    #[error("failed to parse model config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read model config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid model config value {field}: {reason}")]
    Invalid { field: String, reason: &'static str },
}

impl ModelConfigError {
    fn invalid(field: &str, reason: &'static str) -> Self {
        ModelConfigError::Invalid {
            field: field.to_string(),
            reason,
        }
    }
}

/// One value per policy strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyValues {
    pub low: f64,
    pub moderate: f64,
    pub high: f64,
    pub maximum: f64,
}

impl PolicyValues {
    pub fn get(&self, strength: PolicyStrength) -> f64 {
        match strength {
            PolicyStrength::Low => self.low,
            PolicyStrength::Moderate => self.moderate,
            PolicyStrength::High => self.high,
            PolicyStrength::Maximum => self.maximum,
        }
    }
}

/// Lookup tables keyed by policy strength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyTable {
    pub multipliers: PolicyValues,
    pub feasibility_adjustments: PolicyValues,
}

impl PolicyTable {
    pub fn multiplier(&self, strength: PolicyStrength) -> f64 {
        self.multipliers.get(strength)
    }

    pub fn feasibility_adjustment(&self, strength: PolicyStrength) -> f64 {
        self.feasibility_adjustments.get(strength)
    }

    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        let mut fields = Vec::with_capacity(8);
        for strength in PolicyStrength::ALL {
            fields.push(("policy.multipliers", self.multiplier(strength)));
            fields.push((
                "policy.feasibility_adjustments",
                self.feasibility_adjustment(strength),
            ));
        }
        fields
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self {
            multipliers: PolicyValues {
                low: 1.0,
                moderate: 1.2,
                high: 1.5,
                maximum: 2.0,
            },
            feasibility_adjustments: PolicyValues {
                low: 5.0,
                moderate: 0.0,
                high: -10.0,
                maximum: -20.0,
            },
        }
    }
}

/// Bounds applied to raw adoption inputs before any model arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub max_adoption: f64,
}

impl InputConfig {
    /// Map a raw adoption value into `[0, max_adoption]`; non-finite input counts as 0.
    pub fn sanitize(&self, value: f64) -> f64 {
        if value.is_finite() {
            value.clamp(0.0, self.max_adoption)
        } else {
            0.0
        }
    }

    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![("inputs.max_adoption", self.max_adoption)]
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_adoption: 200.0,
        }
    }
}

/// Physical constants shared by both models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateConfig {
    /// Global emissions baseline in GtCO2e per year.
    pub global_emissions_baseline: f64,
    /// Temperature change per GtCO2e avoided.
    pub co2_to_temperature: f64,
}

impl ClimateConfig {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            (
                "climate.global_emissions_baseline",
                self.global_emissions_baseline,
            ),
            ("climate.co2_to_temperature", self.co2_to_temperature),
        ]
    }
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            global_emissions_baseline: 45.0,
            co2_to_temperature: 0.0015,
        }
    }
}

/// Learning-curve discount and supply-pressure surcharge on technology cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDynamicsConfig {
    pub scale_discount_cap: f64,
    pub scale_discount_divisor: f64,
    pub supply_threshold: f64,
    pub supply_span: f64,
    pub supply_exponent: f64,
    pub supply_scale: f64,
}

impl MarketDynamicsConfig {
    /// Cost multiplier for a technology at `adoption` percent.
    pub fn cost_factor(&self, adoption: f64) -> f64 {
        let scale_discount = self
            .scale_discount_cap
            .min(adoption / self.scale_discount_divisor);
        let supply_pressure = if adoption > self.supply_threshold {
            ((adoption - self.supply_threshold) / self.supply_span).powf(self.supply_exponent)
                * self.supply_scale
        } else {
            0.0
        };
        1.0 - scale_discount + supply_pressure
    }

    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("emissions.market.scale_discount_cap", self.scale_discount_cap),
            (
                "emissions.market.scale_discount_divisor",
                self.scale_discount_divisor,
            ),
            ("emissions.market.supply_threshold", self.supply_threshold),
            ("emissions.market.supply_span", self.supply_span),
            ("emissions.market.supply_exponent", self.supply_exponent),
            ("emissions.market.supply_scale", self.supply_scale),
        ]
    }
}

impl Default for MarketDynamicsConfig {
    fn default() -> Self {
        Self {
            scale_discount_cap: 0.25,
            scale_discount_divisor: 180.0,
            supply_threshold: 70.0,
            supply_span: 100.0,
            supply_exponent: 1.2,
            supply_scale: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionsConfig {
    pub max_theoretical_reduction: f64,
    pub renewable_normalizer: f64,
    pub diminishing_exponent: f64,
    pub policy_bonus_scale: f64,
    pub diversity_bonus_max: f64,
    pub integration_threshold: f64,
    pub integration_span: f64,
    pub integration_exponent: f64,
    pub integration_penalty_scale: f64,
    pub reduction_floor: f64,
    pub baseline_temperature: f64,
    pub feedback_threshold: f64,
    pub feedback_factor: f64,
    pub temperature_floor: f64,
    pub solar_cost_per_point: f64,
    pub wind_cost_per_point: f64,
    pub market: MarketDynamicsConfig,
    pub infrastructure_normalizer: f64,
    pub infrastructure_exponent: f64,
    pub infrastructure_scale: f64,
    pub policy_cost_multiplier: f64,
    pub avoided_cost_per_point: f64,
    pub benefit_per_point: f64,
    pub roi_floor: f64,
}

impl EmissionsConfig {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        let mut fields = vec![
            (
                "emissions.max_theoretical_reduction",
                self.max_theoretical_reduction,
            ),
            ("emissions.renewable_normalizer", self.renewable_normalizer),
            ("emissions.diminishing_exponent", self.diminishing_exponent),
            ("emissions.policy_bonus_scale", self.policy_bonus_scale),
            ("emissions.diversity_bonus_max", self.diversity_bonus_max),
            ("emissions.integration_threshold", self.integration_threshold),
            ("emissions.integration_span", self.integration_span),
            ("emissions.integration_exponent", self.integration_exponent),
            (
                "emissions.integration_penalty_scale",
                self.integration_penalty_scale,
            ),
            ("emissions.reduction_floor", self.reduction_floor),
            ("emissions.baseline_temperature", self.baseline_temperature),
            ("emissions.feedback_threshold", self.feedback_threshold),
            ("emissions.feedback_factor", self.feedback_factor),
            ("emissions.temperature_floor", self.temperature_floor),
            ("emissions.solar_cost_per_point", self.solar_cost_per_point),
            ("emissions.wind_cost_per_point", self.wind_cost_per_point),
            (
                "emissions.infrastructure_normalizer",
                self.infrastructure_normalizer,
            ),
            (
                "emissions.infrastructure_exponent",
                self.infrastructure_exponent,
            ),
            ("emissions.infrastructure_scale", self.infrastructure_scale),
            ("emissions.policy_cost_multiplier", self.policy_cost_multiplier),
            ("emissions.avoided_cost_per_point", self.avoided_cost_per_point),
            ("emissions.benefit_per_point", self.benefit_per_point),
            ("emissions.roi_floor", self.roi_floor),
        ];
        fields.extend(self.market.numeric_fields());
        fields
    }
}

impl Default for EmissionsConfig {
    fn default() -> Self {
        Self {
            max_theoretical_reduction: 75.0,
            renewable_normalizer: 200.0,
            diminishing_exponent: 0.9,
            policy_bonus_scale: 12.0,
            diversity_bonus_max: 5.0,
            integration_threshold: 140.0,
            integration_span: 60.0,
            integration_exponent: 1.5,
            integration_penalty_scale: 8.0,
            reduction_floor: 2.0,
            baseline_temperature: 2.4,
            feedback_threshold: 50.0,
            feedback_factor: 1.1,
            temperature_floor: 1.2,
            solar_cost_per_point: 50.0,
            wind_cost_per_point: 40.0,
            market: MarketDynamicsConfig::default(),
            infrastructure_normalizer: 100.0,
            infrastructure_exponent: 1.2,
            infrastructure_scale: 400.0,
            policy_cost_multiplier: 0.3,
            avoided_cost_per_point: 85.0,
            benefit_per_point: 18.0,
            roi_floor: -10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReforestationConfig {
    pub coverage_normalizer: f64,
    pub forest_effectiveness: f64,
    pub immediate_sequestration: f64,
    pub long_term_sequestration: f64,
    pub long_term_policy_exponent: f64,
    pub dampening_factor: f64,
    pub reduction_floor: f64,
    pub reduction_ceiling: f64,
    pub baseline_temperature: f64,
    pub temperature_floor: f64,
    pub albedo_threshold: f64,
    pub albedo_cooling: f64,
    pub ecosystem_threshold: f64,
    pub ecosystem_cooling: f64,
    pub land_cost_per_point: f64,
    pub planting_cost_per_point: f64,
    pub maintenance_cost_per_point: f64,
    pub carbon_credit_per_point: f64,
    pub ecosystem_services_per_point: f64,
    pub timber_threshold: f64,
    pub timber_revenue_per_point: f64,
    pub feasibility_bonus: f64,
    pub sustainability_bonus: f64,
    pub roi_floor: f64,
}

impl ReforestationConfig {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("reforestation.coverage_normalizer", self.coverage_normalizer),
            ("reforestation.forest_effectiveness", self.forest_effectiveness),
            (
                "reforestation.immediate_sequestration",
                self.immediate_sequestration,
            ),
            (
                "reforestation.long_term_sequestration",
                self.long_term_sequestration,
            ),
            (
                "reforestation.long_term_policy_exponent",
                self.long_term_policy_exponent,
            ),
            ("reforestation.dampening_factor", self.dampening_factor),
            ("reforestation.reduction_floor", self.reduction_floor),
            ("reforestation.reduction_ceiling", self.reduction_ceiling),
            ("reforestation.baseline_temperature", self.baseline_temperature),
            ("reforestation.temperature_floor", self.temperature_floor),
            ("reforestation.albedo_threshold", self.albedo_threshold),
            ("reforestation.albedo_cooling", self.albedo_cooling),
            ("reforestation.ecosystem_threshold", self.ecosystem_threshold),
            ("reforestation.ecosystem_cooling", self.ecosystem_cooling),
            ("reforestation.land_cost_per_point", self.land_cost_per_point),
            (
                "reforestation.planting_cost_per_point",
                self.planting_cost_per_point,
            ),
            (
                "reforestation.maintenance_cost_per_point",
                self.maintenance_cost_per_point,
            ),
            (
                "reforestation.carbon_credit_per_point",
                self.carbon_credit_per_point,
            ),
            (
                "reforestation.ecosystem_services_per_point",
                self.ecosystem_services_per_point,
            ),
            ("reforestation.timber_threshold", self.timber_threshold),
            (
                "reforestation.timber_revenue_per_point",
                self.timber_revenue_per_point,
            ),
            ("reforestation.feasibility_bonus", self.feasibility_bonus),
            ("reforestation.sustainability_bonus", self.sustainability_bonus),
            ("reforestation.roi_floor", self.roi_floor),
        ]
    }
}

impl Default for ReforestationConfig {
    fn default() -> Self {
        Self {
            coverage_normalizer: 200.0,
            forest_effectiveness: 0.6,
            immediate_sequestration: 15.0,
            long_term_sequestration: 25.0,
            long_term_policy_exponent: 1.2,
            dampening_factor: 0.8,
            reduction_floor: 0.0,
            reduction_ceiling: 45.0,
            baseline_temperature: 2.3,
            temperature_floor: 1.3,
            albedo_threshold: 100.0,
            albedo_cooling: 0.05,
            ecosystem_threshold: 120.0,
            ecosystem_cooling: 0.02,
            land_cost_per_point: 12.0,
            planting_cost_per_point: 6.0,
            maintenance_cost_per_point: 8.0,
            carbon_credit_per_point: 50.0,
            ecosystem_services_per_point: 28.0,
            timber_threshold: 80.0,
            timber_revenue_per_point: 12.0,
            feasibility_bonus: 5.0,
            sustainability_bonus: 15.0,
            roi_floor: -5.0,
        }
    }
}

/// Opt-in bounded perturbation, seeded from the run inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VarianceConfig {
    pub enabled: bool,
    pub amplitude: f64,
    pub seed: u64,
}

impl VarianceConfig {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![("variance.amplitude", self.amplitude)]
    }
}

impl Default for VarianceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            amplitude: 0.05,
            seed: 0,
        }
    }
}

/// Metadata about the model configuration source.
#[derive(Debug, Clone, Default)]
pub struct ModelConfigMetadata {
    path: Option<PathBuf>,
}

impl ModelConfigMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Human readable source: the file path, or `builtin`.
    pub fn source_label(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "builtin".to_string(),
        }
    }
}

/// Load model configuration from environment or default path.
pub fn load_model_config_from_env() -> (Arc<ModelConfig>, ModelConfigMetadata) {
    let override_path = env::var(MODEL_CONFIG_ENV).ok().map(PathBuf::from);
    let default_path =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/data/model_config.json");

    let candidates: Vec<PathBuf> = match override_path {
        Some(ref path) => vec![path.clone()],
        None => vec![default_path.clone()],
    };

    for path in candidates {
        match ModelConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "climate::config",
                    path = %path.display(),
                    "model_config.loaded=file"
                );
                return (Arc::new(config), ModelConfigMetadata::new(Some(path)));
            }
            Err(err) => {
                tracing::warn!(
                    target: "climate::config",
                    path = %path.display(),
                    error = %err,
                    "model_config.load_failed"
                );
            }
        }
    }

    let config = ModelConfig::builtin();
    tracing::info!(target: "climate::config", "model_config.loaded=builtin");
    (config, ModelConfigMetadata::new(None))
}
