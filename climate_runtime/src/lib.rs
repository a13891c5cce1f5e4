//! Command surface for the climate simulation service.
//!
//! This crate re-exports the data contracts from `climate_schema` and adds the
//! command envelopes, the plain-text command parser and the response frames
//! exchanged with the server, without depending on the engine in `climate_sim`.

pub use climate_schema::*;

pub mod command_text;
mod commands;
mod responses;

pub use command_text::{parse_command, parse_command_line, CommandParseError};
pub use commands::{
    CommandDecodeError, CommandEncodeError, CommandEnvelope, CommandPayload, DEFAULT_SWEEP_STEP,
};
pub use responses::{ResponseBody, ResponseEnvelope};
