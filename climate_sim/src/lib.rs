//! Parameterized climate simulation engine.
//!
//! Maps policy inputs (renewable adoption, policy strength, challenge) to a
//! projected set of outcome metrics. Runs are pure and reproducible; every
//! tunable constant lives in an immutable [`ModelConfig`].

pub mod emissions;
pub mod engine;
mod hashing;
pub mod insights;
pub mod model_config;
pub mod network;
pub mod reforestation;
pub mod scoring;
pub mod server_config;
pub mod service;
pub mod solution;
pub mod sweep;
pub mod variance;

pub use climate_schema::{
    Challenge, PolicyStrength, SimulationOutcomes, SimulationParameters, SimulationRequest,
    SweepEntry,
};
pub use engine::{
    run_simulation, AdoptionInputs, ChallengeBreakdown, ModelBreakdown, SimulationEngine,
    SimulationReport,
};
pub use insights::{optimization_suggestions, BenchmarkTier, Insights, Suggestion};
pub use model_config::{
    load_model_config_from_env, ModelConfig, ModelConfigError, ModelConfigMetadata, PolicyTable,
    MODEL_CONFIG_ENV,
};
pub use network::{CommandServer, PendingCommand, ReplyHandle};
pub use scoring::{parameter_synergy, synergy_score, synergy_tip};
pub use server_config::ServerConfig;
pub use service::{serve, CommandService};
pub use solution::{SolutionDraft, SolutionError};
pub use sweep::{sweep, SweepError, SweepRequest};
pub use variance::Perturbation;
