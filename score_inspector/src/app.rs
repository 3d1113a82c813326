use std::sync::mpsc::Receiver;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::KeyCode;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use score_core::ScoreSession;
use score_runtime::SimCommand;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, trace};

use crate::ui::{draw_ui, UiState};
use crate::view::ScoreView;

pub struct InspectorApp {
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    session: ScoreSession,
    ui_state: UiState,
    keys: UnboundedReceiver<KeyCode>,
    log_receiver: Receiver<String>,
}

impl InspectorApp {
    pub fn new(
        session: ScoreSession,
        keys: UnboundedReceiver<KeyCode>,
        log_receiver: Receiver<String>,
    ) -> Result<Self> {
        let stdout = std::io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        crossterm::terminal::enable_raw_mode()?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        let ui_state = UiState::new(ScoreView::project(&session.snapshot(), None));
        Ok(Self {
            terminal,
            session,
            ui_state,
            keys,
            log_receiver,
        })
    }

    pub async fn run(mut self) -> Result<()> {
        let outcome = self.event_loop().await;
        self.session.shutdown();
        let terminal = &mut self.terminal;
        finish(outcome, || {
            terminal.show_cursor()?;
            crossterm::terminal::disable_raw_mode()?;
            Ok(())
        })
    }

    async fn event_loop(&mut self) -> Result<()> {
        let mut redraw = tokio::time::interval(Duration::from_millis(100));
        self.refresh_view();

        loop {
            tokio::select! {
                Some(snapshot) = self.session.next_tick() => {
                    trace!(tick = snapshot.tick, score = snapshot.score, "view.tick");
                    self.refresh_view();
                }
                key = self.keys.recv() => {
                    let Some(code) = key else {
                        return Ok(());
                    };
                    if !self.handle_key(code) {
                        return Ok(());
                    }
                    self.refresh_view();
                }
                _ = redraw.tick() => {
                    while let Ok(line) = self.log_receiver.try_recv() {
                        self.ui_state.push_log(line);
                    }
                    self.terminal.draw(|frame| draw_ui(frame, &self.ui_state))?;
                }
            }
        }
    }

    /// Returns `false` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let command = match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('l') | KeyCode::Char(' ') => SimCommand::ToggleLive,
            KeyCode::Char('s') => SimCommand::QuickScan,
            KeyCode::Char('r') => SimCommand::Reset,
            KeyCode::Char('.') => SimCommand::Perturb { steps: 1 },
            _ => return true,
        };
        let snapshot = self.session.apply(command);
        info!(%command, score = snapshot.score, running = snapshot.running, "command.applied");
        true
    }

    fn refresh_view(&mut self) {
        let history = self.session.history();
        let view = ScoreView::project(&self.session.snapshot(), history.score_delta());
        let series = history.score_series();
        self.ui_state.set_view(view, series);
    }
}

/// Run `restore` whatever the loop returned; the loop's error wins.
fn finish(outcome: Result<()>, restore: impl FnOnce() -> Result<()>) -> Result<()> {
    let restored = restore();
    outcome.and(restored)
}
