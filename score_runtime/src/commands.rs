use std::fmt;

use crate::metric::MetricKey;

/// Largest step count a single text command may request.
pub const MAX_PERTURB_STEPS: u32 = 10_000;

/// Field addressed by a [`SimCommand::Nudge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeTarget {
    Score,
    Metric(MetricKey),
}

impl NudgeTarget {
    pub fn token(self) -> &'static str {
        match self {
            NudgeTarget::Score => "score",
            NudgeTarget::Metric(key) => key.token(),
        }
    }
}

/// Commands accepted by a simulator session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimCommand {
    /// Flip between idle and live mode.
    ToggleLive,
    /// Stop live mode and apply the fixed favorable increments.
    QuickScan,
    /// Stop live mode and restore the initial snapshot.
    Reset,
    /// Apply `steps` perturbation steps immediately, independent of live mode.
    Perturb { steps: u32 },
    /// Add an arbitrary offset to one field; the result is still clamped.
    Nudge { target: NudgeTarget, delta: i64 },
    /// Report the current snapshot without changing anything.
    Status,
}

impl SimCommand {
    pub fn verb(&self) -> &'static str {
        match self {
            SimCommand::ToggleLive => "live",
            SimCommand::QuickScan => "scan",
            SimCommand::Reset => "reset",
            SimCommand::Perturb { .. } => "step",
            SimCommand::Nudge { .. } => "nudge",
            SimCommand::Status => "status",
        }
    }
}

/// Formats the command in the syntax accepted by [`crate::parse_command_line`].
impl fmt::Display for SimCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimCommand::Perturb { steps } => write!(f, "step {steps}"),
            SimCommand::Nudge { target, delta } => {
                write!(f, "nudge {} {}", target.token(), delta)
            }
            other => f.write_str(other.verb()),
        }
    }
}
