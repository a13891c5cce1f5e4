use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{PolicyStrength, SimulationRequest};

/// Grid step used by sweeps that do not name one.
pub const DEFAULT_SWEEP_STEP: u32 = 10;

fn default_sweep_step() -> u32 {
    DEFAULT_SWEEP_STEP
}

/// High-level representation of a command envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub payload: CommandPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<u64>,
}

/// Supported command payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandPayload {
    Simulate {
        request: SimulationRequest,
        #[serde(default)]
        explain: bool,
    },
    Insights {
        request: SimulationRequest,
    },
    Sweep {
        challenge: String,
        #[serde(default)]
        policy: PolicyStrength,
        #[serde(default = "default_sweep_step")]
        step: u32,
        #[serde(default)]
        limit: Option<usize>,
    },
    Config,
    Schema,
    Reload,
    Ping,
}

impl CommandPayload {
    pub fn verb(&self) -> &'static str {
        match self {
            CommandPayload::Simulate { .. } => "simulate",
            CommandPayload::Insights { .. } => "insights",
            CommandPayload::Sweep { .. } => "sweep",
            CommandPayload::Config => "config",
            CommandPayload::Schema => "schema",
            CommandPayload::Reload => "reload",
            CommandPayload::Ping => "ping",
        }
    }
}

/// Error returned when encoding a command envelope fails.
#[derive(Debug, Error)]
pub enum CommandEncodeError {
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Error returned when decoding a command envelope fails.
#[derive(Debug, Error)]
pub enum CommandDecodeError {
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CommandEnvelope {
    pub fn new(payload: CommandPayload) -> Self {
        Self {
            payload,
            correlation_id: None,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: u64) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Encode the envelope as a single JSON line (without the trailing newline).
    pub fn encode_to_line(&self) -> Result<String, CommandEncodeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode an envelope from one JSON line.
    pub fn decode(line: &str) -> Result<Self, CommandDecodeError> {
        Ok(serde_json::from_str(line.trim())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimulationParameters;

    #[test]
    fn simulate_envelope_survives_json_line() {
        let envelope = CommandEnvelope::new(CommandPayload::Simulate {
            request: SimulationRequest::new(
                "reforestation",
                SimulationParameters::new(40.0, 30.0, PolicyStrength::Low),
            ),
            explain: true,
        })
        .with_correlation_id(7);

        let line = envelope.encode_to_line().expect("encode");
        assert!(!line.contains('\n'));
        assert!(line.contains(r#""command":"simulate""#));
        let decoded = CommandEnvelope::decode(&line).expect("decode");
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn sweep_defaults_apply_when_fields_missing() {
        let decoded = CommandEnvelope::decode(
            r#"{"payload":{"command":"sweep","challenge":"reduce_emissions"}}"#,
        )
        .expect("decode");
        assert_eq!(decoded.correlation_id, None);
        assert_eq!(
            decoded.payload,
            CommandPayload::Sweep {
                challenge: "reduce_emissions".to_string(),
                policy: PolicyStrength::Moderate,
                step: DEFAULT_SWEEP_STEP,
                limit: None,
            }
        );
    }

    #[test]
    fn unknown_command_tag_is_rejected() {
        let err = CommandEnvelope::decode(r#"{"payload":{"command":"launch"}}"#).unwrap_err();
        assert!(err.to_string().starts_with("decode failed"));
    }
}
