//! Shared contracts for the NayaFlow score simulator.
//!
//! This crate holds the metric catalogue, the outbound [`ScoreSnapshot`] and
//! the command surface so front-ends can drive a simulator without depending
//! on the engine internals in `score_core`.

mod command_text;
mod commands;
mod metric;
mod snapshot;

pub use command_text::{parse_command_line, CommandParseError};
pub use commands::{NudgeTarget, SimCommand, MAX_PERTURB_STEPS};
pub use metric::{
    Bounds, MetricKey, INITIAL_SCORE, SCORE_BOUNDS, SCORE_JITTER, SCORE_SCAN_BOOST,
};
pub use snapshot::ScoreSnapshot;
