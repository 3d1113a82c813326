use std::num::ParseIntError;

use thiserror::Error;

use crate::{MetricKey, NudgeTarget, SimCommand, MAX_PERTURB_STEPS};

#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("invalid integer '{value}' for {context}: {source}")]
    InvalidInteger {
        value: String,
        context: &'static str,
        source: ParseIntError,
    },
    #[error("step count {steps} exceeds the limit of {max}")]
    StepsOutOfRange { steps: u32, max: u32 },
    #[error("invalid nudge target '{0}'")]
    InvalidTarget(String),
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

pub fn parse_command_line(input: &str) -> Result<SimCommand, CommandParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CommandParseError::Empty);
    }

    let mut parts = trimmed.split_whitespace();
    let verb = parts
        .next()
        .map(|v| v.to_ascii_lowercase())
        .ok_or(CommandParseError::Empty)?;

    let command = match verb.as_str() {
        "live" | "toggle" => SimCommand::ToggleLive,
        "scan" | "quick" | "quick_scan" => SimCommand::QuickScan,
        "reset" => SimCommand::Reset,
        "status" | "show" => SimCommand::Status,
        "step" | "perturb" => {
            let steps_str = parts.next().unwrap_or("1");
            let steps = parse_u32(steps_str, "step count")?;
            if steps > MAX_PERTURB_STEPS {
                return Err(CommandParseError::StepsOutOfRange {
                    steps,
                    max: MAX_PERTURB_STEPS,
                });
            }
            SimCommand::Perturb { steps }
        }
        "nudge" => {
            let target_str = parts
                .next()
                .ok_or(CommandParseError::MissingArgument("target"))?;
            let delta_str = parts
                .next()
                .ok_or(CommandParseError::MissingArgument("delta"))?;
            let target = parse_nudge_target(target_str)?;
            let delta = parse_i64(delta_str, "nudge delta")?;
            SimCommand::Nudge { target, delta }
        }
        other => return Err(CommandParseError::UnknownCommand(other.to_string())),
    };

    if let Some(extra) = parts.next() {
        return Err(CommandParseError::UnexpectedArgument(extra.to_string()));
    }
    Ok(command)
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

fn parse_i64(value: &str, context: &'static str) -> Result<i64, CommandParseError> {
    value
        .parse::<i64>()
        .map_err(|source| CommandParseError::InvalidInteger {
            value: value.to_string(),
            context,
            source,
        })
}

fn parse_nudge_target(token: &str) -> Result<NudgeTarget, CommandParseError> {
    match token.to_ascii_lowercase().as_str() {
        "score" => Ok(NudgeTarget::Score),
        "income" | "incomestability" | "income_stability" => {
            Ok(NudgeTarget::Metric(MetricKey::IncomeStability))
        }
        "payments" | "ontimepayments" | "on_time_payments" => {
            Ok(NudgeTarget::Metric(MetricKey::OnTimePayments))
        }
        "buffer" | "cashbuffer" | "cash_buffer" => Ok(NudgeTarget::Metric(MetricKey::CashBuffer)),
        "spending" | "spendingpattern" | "spending_pattern" => {
            Ok(NudgeTarget::Metric(MetricKey::SpendingPattern))
        }
        other => Err(CommandParseError::InvalidTarget(other.to_string())),
    }
}
