//! Command handling shared by the TCP server and in-process callers.

use std::sync::Arc;

use climate_runtime::{
    contract_schema, parse_command, Challenge, CommandEnvelope, CommandPayload, ResponseBody,
    ResponseEnvelope,
};
use tracing::{info, warn};

use crate::{
    engine::SimulationEngine,
    insights::Insights,
    model_config::{load_model_config_from_env, ModelConfig, ModelConfigMetadata},
    network::CommandServer,
    scoring::synergy_score,
    sweep::{sweep, SweepRequest},
};

/// Owns the engine and answers one command at a time.
pub struct CommandService {
    engine: SimulationEngine,
    metadata: ModelConfigMetadata,
}

impl CommandService {
    pub fn new(config: Arc<ModelConfig>, metadata: ModelConfigMetadata) -> Self {
        Self {
            engine: SimulationEngine::new(config),
            metadata,
        }
    }

    pub fn from_env() -> Self {
        let (config, metadata) = load_model_config_from_env();
        Self::new(config, metadata)
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn metadata(&self) -> &ModelConfigMetadata {
        &self.metadata
    }

    /// Parse and answer one text or JSON line.
    pub fn handle_line(&mut self, line: &str) -> ResponseEnvelope {
        match parse_command(line) {
            Ok(envelope) => self.handle(envelope),
            Err(err) => ResponseEnvelope::error(None, err.to_string()),
        }
    }

    pub fn handle(&mut self, envelope: CommandEnvelope) -> ResponseEnvelope {
        let correlation_id = envelope.correlation_id;
        let verb = envelope.payload.verb();
        let body = match self.execute(envelope.payload) {
            Ok(body) => {
                info!(target: "climate::server", verb, "command.handled");
                body
            }
            Err(message) => {
                warn!(target: "climate::server", verb, error = %message, "command.failed");
                ResponseBody::Error { message }
            }
        };
        ResponseEnvelope::new(correlation_id, body)
    }

    fn execute(&mut self, payload: CommandPayload) -> Result<ResponseBody, String> {
        match payload {
            CommandPayload::Simulate { request, explain } => {
                let challenge = request.resolved_challenge();
                let report = self.engine.explain(challenge, &request.parameters);
                let breakdown = if explain {
                    Some(serde_json::to_value(&report.breakdown).map_err(|err| err.to_string())?)
                } else {
                    None
                };
                Ok(ResponseBody::Simulation {
                    challenge,
                    synergy_score: synergy_score(&report.outcomes),
                    outcomes: report.outcomes,
                    breakdown,
                })
            }
            CommandPayload::Insights { request } => {
                let challenge = request.resolved_challenge();
                let outcomes = self.engine.run_challenge(challenge, &request.parameters);
                let insights =
                    Insights::gather(&request.parameters, &outcomes, self.engine.config());
                Ok(ResponseBody::Insights {
                    challenge,
                    outcomes,
                    synergy_score: insights.synergy_score,
                    synergy_tip: insights.synergy_tip.to_string(),
                    parameter_synergy: insights.parameter_synergy,
                    benchmark: insights.benchmark.description().to_string(),
                    suggestions: insights.suggestion_messages(),
                })
            }
            CommandPayload::Sweep {
                challenge,
                policy,
                step,
                limit,
            } => {
                let mut request =
                    SweepRequest::new(Challenge::resolve(&challenge), policy, step);
                request.limit = limit;
                let entries = sweep(&self.engine, &request).map_err(|err| err.to_string())?;
                Ok(ResponseBody::Sweep {
                    challenge: request.challenge,
                    policy,
                    entries,
                })
            }
            CommandPayload::Config => Ok(ResponseBody::Config {
                source: Some(self.metadata.source_label()),
                config: serde_json::to_value(self.engine.config().as_ref())
                    .map_err(|err| err.to_string())?,
            }),
            CommandPayload::Schema => Ok(ResponseBody::Schema {
                schema: contract_schema().map_err(|err| err.to_string())?,
            }),
            CommandPayload::Reload => {
                let (config, metadata) = load_model_config_from_env();
                self.engine = SimulationEngine::new(config);
                self.metadata = metadata;
                Ok(ResponseBody::Reloaded {
                    source: Some(self.metadata.source_label()),
                })
            }
            CommandPayload::Ping => Ok(ResponseBody::Pong),
        }
    }
}

/// Answer commands from `server` until every client sender is gone.
pub fn serve(server: &CommandServer, service: &mut CommandService) {
    while let Ok(pending) = server.receiver().recv() {
        let (envelope, reply) = pending.into_parts();
        reply.respond(service.handle(envelope));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CommandService {
        CommandService::new(ModelConfig::builtin(), ModelConfigMetadata::default())
    }

    #[test]
    fn simulate_line_returns_outcomes_and_synergy() {
        let response =
            service().handle_line("simulate reduce_emissions solar=65 wind=45 policy=moderate");
        let ResponseBody::Simulation {
            challenge,
            outcomes,
            synergy_score,
            breakdown,
        } = response.body
        else {
            panic!("expected simulation body");
        };
        assert_eq!(challenge, Challenge::ReduceEmissions);
        assert_eq!(outcomes.co2_reduction, 49.7);
        assert_eq!(synergy_score, 72);
        assert!(breakdown.is_none());
    }

    #[test]
    fn explain_flag_attaches_breakdown() {
        let response = service().handle_line("simulate reforestation s=40 w=30 p=low explain");
        let ResponseBody::Simulation { breakdown, .. } = response.body else {
            panic!("expected simulation body");
        };
        let breakdown = breakdown.expect("breakdown requested");
        assert_eq!(breakdown["model"]["model"], "reforestation");
    }

    #[test]
    fn insights_line_carries_tip_and_benchmark() {
        let response = service().handle_line("insights reduce_emissions solar=65 wind=45");
        let ResponseBody::Insights {
            parameter_synergy,
            benchmark,
            suggestions,
            ..
        } = response.body
        else {
            panic!("expected insights body");
        };
        assert_eq!(parameter_synergy, 80);
        assert!(benchmark.starts_with("Excellent"));
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn insights_clamp_out_of_range_adoption() {
        let mut service = service();
        let negative = service.handle_line("insights reduce_emissions solar=-30 wind=20 policy=low");
        let zeroed = service.handle_line("insights reduce_emissions solar=0 wind=20 policy=low");
        assert_eq!(negative.body, zeroed.body);
    }

    #[test]
    fn failed_commands_keep_correlation_id() {
        let response = service().handle_line(
            r#"{"correlation_id":4,"payload":{"command":"sweep","challenge":"reforestation","policy":"low","step":0}}"#,
        );
        assert_eq!(response.correlation_id, Some(4));
        assert!(response.is_error());
    }

    #[test]
    fn sweep_errors_become_error_frames() {
        let response = service().handle_line("sweep reduce_emissions high step=0");
        assert!(response.is_error());

        let ok = service().handle_line("sweep nowhere high step=50 limit=2");
        let ResponseBody::Sweep {
            challenge, entries, ..
        } = ok.body
        else {
            panic!("expected sweep body");
        };
        assert_eq!(challenge, Challenge::ReduceEmissions);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn correlation_id_is_echoed() {
        let response = service().handle_line(r#"{"correlation_id":11,"payload":{"command":"ping"}}"#);
        assert_eq!(response.correlation_id, Some(11));
        assert_eq!(response.body, ResponseBody::Pong);
    }

    #[test]
    fn config_reports_builtin_source() {
        let response = service().handle_line("config");
        let ResponseBody::Config { source, config } = response.body else {
            panic!("expected config body");
        };
        assert_eq!(source.as_deref(), Some("builtin"));
        assert_eq!(config["inputs"]["max_adoption"], 200.0);
    }

    #[test]
    fn parse_failures_answer_with_error() {
        let response = service().handle_line("simulate reduce_emissions wind=3");
        assert!(response.is_error());
    }
}
