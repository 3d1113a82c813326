use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use score_core::{ScoreSession, SimulatorConfig};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tracing::{info, warn};

mod app;
mod ui;
mod view;

use app::InspectorApp;

#[derive(Clone)]
struct ChannelWriter {
    sender: Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(text) = String::from_utf8(buf.to_vec()) {
            let _ = self.sender.send(text);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "NayaFlow score simulator inspector", long_about = None)]
struct Cli {
    /// JSON simulator config; defaults to $SCORE_SIM_CONFIG_PATH or the builtin.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the perturbation random source.
    #[arg(long)]
    seed: Option<u64>,
    /// Override the live update cadence in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let (log_tx, log_rx) = mpsc::channel::<String>();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .with_writer(move || ChannelWriter {
            sender: log_tx.clone(),
        })
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!(
        interval_ms = config.live_interval().as_millis() as u64,
        seed = ?config.seed(),
        "Starting score inspector"
    );

    let (key_tx, key_rx) = unbounded_channel::<KeyCode>();
    let _input_handle = std::thread::spawn(move || run_input_pump(key_tx));

    let session = ScoreSession::new(&config);
    let app = InspectorApp::new(session, key_rx, log_rx)?;
    app.run().await
}

fn load_config(cli: &Cli) -> Result<SimulatorConfig> {
    let mut config = match &cli.config {
        Some(path) => SimulatorConfig::from_file(path)?,
        None => SimulatorConfig::from_env_or_builtin()?,
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(interval_ms) = cli.interval_ms {
        config = config.with_live_interval(Duration::from_millis(interval_ms))?;
    }
    Ok(config)
}

/// Forward key presses to the app until it stops listening.
fn run_input_pump(sender: UnboundedSender<KeyCode>) {
    while !sender.is_closed() {
        match event::poll(Duration::from_millis(50)) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if sender.send(key.code).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("Failed to read terminal event: {}", err);
                    break;
                }
            },
            Ok(false) => {}
            Err(err) => {
                warn!("Failed to poll terminal events: {}", err);
                break;
            }
        }
    }
}
