//! Simulation engine for the NayaFlow score demo.
//!
//! Maintains a synthetic credit score and four bounded sub-metrics, evolves
//! them with clamped random perturbation while live mode is on, and exposes
//! the quick-scan and reset transitions. [`ScoreSession`] is the entry point
//! for hosts; the pure functions in [`engine`] are usable on their own.

pub mod config;
pub mod engine;
mod history;
pub mod live;
mod metrics;
mod session;
mod state;

pub use config::{SimulatorConfig, SimulatorConfigError, SIMULATOR_CONFIG_ENV};
pub use engine::{perturb, LiveTransition, ScoreEngine, TickOutcome};
pub use history::ScoreHistory;
pub use live::{spawn_live_ticker, LiveHandle, LiveTick};
pub use metrics::SimulationMetrics;
pub use session::ScoreSession;
pub use state::{EngineMode, SimulationState, SubMetrics};

pub use score_runtime::{MetricKey, NudgeTarget, ScoreSnapshot, SimCommand};
