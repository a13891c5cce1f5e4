use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Challenge, PolicyStrength, SimulationOutcomes, SweepEntry};

/// Response frame written back for every command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<u64>,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseBody {
    Simulation {
        challenge: Challenge,
        outcomes: SimulationOutcomes,
        synergy_score: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        breakdown: Option<Value>,
    },
    Insights {
        challenge: Challenge,
        outcomes: SimulationOutcomes,
        synergy_score: u8,
        synergy_tip: String,
        parameter_synergy: u8,
        benchmark: String,
        suggestions: Vec<String>,
    },
    Sweep {
        challenge: Challenge,
        policy: PolicyStrength,
        entries: Vec<SweepEntry>,
    },
    Config {
        #[serde(default)]
        source: Option<String>,
        config: Value,
    },
    Schema {
        schema: Value,
    },
    Reloaded {
        #[serde(default)]
        source: Option<String>,
    },
    Pong,
    Error {
        message: String,
    },
}

impl ResponseEnvelope {
    pub fn new(correlation_id: Option<u64>, body: ResponseBody) -> Self {
        Self {
            correlation_id,
            body,
        }
    }

    pub fn error(correlation_id: Option<u64>, message: impl Into<String>) -> Self {
        Self::new(
            correlation_id,
            ResponseBody::Error {
                message: message.into(),
            },
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self.body, ResponseBody::Error { .. })
    }

    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_frame_is_tagged() {
        let frame = ResponseEnvelope::error(Some(3), "unknown command: launch");
        let line = frame.to_line().expect("encode");
        assert!(line.contains(r#""kind":"error""#));
        assert!(line.contains(r#""correlation_id":3"#));
        let decoded = ResponseEnvelope::from_line(&line).expect("decode");
        assert!(decoded.is_error());
    }

    #[test]
    fn simulation_frame_omits_missing_breakdown() {
        let frame = ResponseEnvelope::new(
            None,
            ResponseBody::Simulation {
                challenge: Challenge::Reforestation,
                outcomes: SimulationOutcomes {
                    temperature_change: 2.2,
                    co2_reduction: 18.6,
                    economic_impact: 3036.0,
                    roi: 175.6,
                    feasibility_score: 85,
                    sustainability_score: 97,
                    global_impact_score: 63,
                },
                synergy_score: 76,
                breakdown: None,
            },
        );
        let line = frame.to_line().expect("encode");
        assert!(!line.contains("breakdown"));
        assert!(!line.contains("correlation_id"));
        assert!(line.contains(r#""challenge":"reforestation""#));
    }
}
