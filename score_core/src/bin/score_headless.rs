//! Line-oriented driver for the score simulator.
//!
//! Reads text commands (`live`, `scan`, `reset`, `step [n]`, `nudge <field>
//! <delta>`, `status`) from stdin and writes one JSON snapshot per state
//! change to stdout. Logs go to stderr.

use anyhow::Result;
use score_core::{ScoreSession, ScoreSnapshot, SimulatorConfig};
use score_runtime::parse_command_line;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = SimulatorConfig::from_env_or_builtin()?;
    let mut session = ScoreSession::new(&config);

    info!(
        target: "nayaflow::headless",
        interval_ms = config.live_interval().as_millis() as u64,
        seed = ?config.seed(),
        "Score simulator ready"
    );
    emit(&session.snapshot())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command_line(&line) {
                    Ok(command) => {
                        let snapshot = session.apply(command);
                        emit(&snapshot)?;
                    }
                    Err(err) => warn!(target: "nayaflow::headless", "Invalid command: {}", err),
                }
            }
            Some(snapshot) = session.next_tick() => {
                emit(&snapshot)?;
            }
        }
    }

    session.shutdown();
    let metrics = session.metrics();
    info!(
        target: "nayaflow::headless",
        ticks = metrics.ticks_applied,
        stale_ticks = metrics.stale_ticks_ignored,
        quick_scans = metrics.quick_scans,
        resets = metrics.resets,
        "session.closed"
    );
    Ok(())
}

fn emit(snapshot: &ScoreSnapshot) -> Result<()> {
    println!("{}", snapshot.to_json()?);
    Ok(())
}
