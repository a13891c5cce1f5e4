use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::{
    CommandDecodeError, CommandEnvelope, CommandPayload, PolicyStrength, SimulationParameters,
    SimulationRequest, UnknownPolicyStrength, DEFAULT_SWEEP_STEP,
};

#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("unknown argument '{0}'")]
    UnknownArgument(String),
    #[error("invalid integer '{value}' for {context}: {source}")]
    InvalidInteger {
        value: String,
        context: &'static str,
        source: ParseIntError,
    },
    #[error("invalid float '{value}' for {context}: {source}")]
    InvalidFloat {
        value: String,
        context: &'static str,
        source: ParseFloatError,
    },
    #[error(transparent)]
    InvalidPolicy(#[from] UnknownPolicyStrength),
    #[error(transparent)]
    Json(#[from] CommandDecodeError),
}

/// Parse either a JSON envelope (lines starting with `{`) or a text command.
pub fn parse_command(input: &str) -> Result<CommandEnvelope, CommandParseError> {
    let trimmed = input.trim();
    if trimmed.starts_with('{') {
        return Ok(CommandEnvelope::decode(trimmed)?);
    }
    parse_command_line(trimmed).map(CommandEnvelope::new)
}

pub fn parse_command_line(input: &str) -> Result<CommandPayload, CommandParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CommandParseError::Empty);
    }

    let mut parts = trimmed.split_whitespace();
    let verb = parts
        .next()
        .map(|v| v.to_ascii_lowercase())
        .ok_or(CommandParseError::Empty)?;

    match verb.as_str() {
        "simulate" | "sim" | "run" => {
            let challenge = parts
                .next()
                .ok_or(CommandParseError::MissingArgument("challenge"))?;
            let mut explain = false;
            let parameters = parse_parameters(parts, |flag| {
                if flag.eq_ignore_ascii_case("explain") {
                    explain = true;
                    true
                } else {
                    false
                }
            })?;
            Ok(CommandPayload::Simulate {
                request: SimulationRequest::new(challenge, parameters),
                explain,
            })
        }
        "insights" | "insight" => {
            let challenge = parts
                .next()
                .ok_or(CommandParseError::MissingArgument("challenge"))?;
            let parameters = parse_parameters(parts, |_| false)?;
            Ok(CommandPayload::Insights {
                request: SimulationRequest::new(challenge, parameters),
            })
        }
        "sweep" => {
            let challenge = parts
                .next()
                .ok_or(CommandParseError::MissingArgument("challenge"))?
                .to_string();
            let mut policy = PolicyStrength::default();
            let mut step = DEFAULT_SWEEP_STEP;
            let mut limit = None;
            for token in parts {
                match token.split_once('=') {
                    Some((key, value)) => match key.to_ascii_lowercase().as_str() {
                        "policy" | "p" => policy = value.parse()?,
                        "step" => step = parse_u32(value, "sweep step")?,
                        "limit" | "top" => limit = Some(parse_usize(value, "sweep limit")?),
                        _ => return Err(CommandParseError::UnknownArgument(key.to_string())),
                    },
                    None => policy = token.parse()?,
                }
            }
            Ok(CommandPayload::Sweep {
                challenge,
                policy,
                step,
                limit,
            })
        }
        "config" => Ok(CommandPayload::Config),
        "schema" => Ok(CommandPayload::Schema),
        "reload" => Ok(CommandPayload::Reload),
        "ping" => Ok(CommandPayload::Ping),
        other => Err(CommandParseError::UnknownCommand(other.to_string())),
    }
}

/// Parse `key=value` parameter tokens. Bare tokens are offered to `flag` and
/// rejected when it does not claim them.
fn parse_parameters<'a>(
    tokens: impl Iterator<Item = &'a str>,
    mut flag: impl FnMut(&str) -> bool,
) -> Result<SimulationParameters, CommandParseError> {
    let mut solar = None;
    let mut wind = None;
    let mut policy = PolicyStrength::default();
    let mut carbon_tax = None;
    let mut reforestation_area = None;

    for token in tokens {
        let Some((key, value)) = token.split_once('=') else {
            if flag(token) {
                continue;
            }
            return Err(CommandParseError::UnknownArgument(token.to_string()));
        };
        match key.to_ascii_lowercase().as_str() {
            "solar" | "s" => solar = Some(parse_f64(value, "solar adoption")?),
            "wind" | "w" => wind = Some(parse_f64(value, "wind adoption")?),
            "policy" | "p" => policy = value.parse()?,
            "carbon_tax" | "tax" => carbon_tax = Some(parse_f64(value, "carbon tax")?),
            "reforestation_area" | "area" => {
                reforestation_area = Some(parse_f64(value, "reforestation area")?)
            }
            _ => return Err(CommandParseError::UnknownArgument(key.to_string())),
        }
    }

    let mut parameters = SimulationParameters::new(
        solar.ok_or(CommandParseError::MissingArgument("solar"))?,
        wind.ok_or(CommandParseError::MissingArgument("wind"))?,
        policy,
    );
    parameters.carbon_tax = carbon_tax;
    parameters.reforestation_area = reforestation_area;
    Ok(parameters)
}

fn parse_u32(value: &str, context: &'static str) -> Result<u32, CommandParseError> {
    value
        .parse::<u32>()
        .map_err(|source| CommandParseError::InvalidInteger {
            value: value.to_string(),
            context,
            source,
        })
}

fn parse_usize(value: &str, context: &'static str) -> Result<usize, CommandParseError> {
    value
        .parse::<usize>()
        .map_err(|source| CommandParseError::InvalidInteger {
            value: value.to_string(),
            context,
            source,
        })
}

fn parse_f64(value: &str, context: &'static str) -> Result<f64, CommandParseError> {
    value
        .parse::<f64>()
        .map_err(|source| CommandParseError::InvalidFloat {
            value: value.to_string(),
            context,
            source,
        })
}
