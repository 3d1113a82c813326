use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use score_runtime::{NudgeTarget, ScoreSnapshot, SimCommand};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::config::SimulatorConfig;
use crate::engine::{LiveTransition, ScoreEngine, TickOutcome};
use crate::history::ScoreHistory;
use crate::live::{spawn_live_ticker, LiveHandle, LiveTick};
use crate::metrics::SimulationMetrics;
use crate::state::SimulationState;

/// Single owner of a simulator: engine, random source, live ticker and the
/// bookkeeping around them.
///
/// All mutation goes through `&mut self`, so transitions and timer ticks are
/// applied strictly in call order. Hosts drive live mode by awaiting
/// [`ScoreSession::next_tick`] next to their input source, typically inside
/// `tokio::select!`.
pub struct ScoreSession {
    engine: ScoreEngine,
    rng: ChaCha8Rng,
    interval: Duration,
    ticks_tx: UnboundedSender<LiveTick>,
    ticks_rx: UnboundedReceiver<LiveTick>,
    live: Option<LiveHandle>,
    metrics: SimulationMetrics,
    history: ScoreHistory,
}

impl ScoreSession {
    pub fn new(config: &SimulatorConfig) -> Self {
        let rng = match config.seed() {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(&SimulatorConfig::default().with_seed(seed))
    }

    pub fn with_rng(config: &SimulatorConfig, rng: ChaCha8Rng) -> Self {
        let (ticks_tx, ticks_rx) = unbounded_channel();
        let engine = ScoreEngine::new();
        let mut metrics = SimulationMetrics::default();
        let mut history = ScoreHistory::with_capacity(config.history_limit());
        let initial = engine.snapshot();
        metrics.observe(&initial);
        history.push(initial);
        Self {
            engine,
            rng,
            interval: config.live_interval(),
            ticks_tx,
            ticks_rx,
            live: None,
            metrics,
            history,
        }
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        self.engine.snapshot()
    }

    pub fn state(&self) -> &SimulationState {
        self.engine.state()
    }

    pub fn metrics(&self) -> &SimulationMetrics {
        &self.metrics
    }

    pub fn history(&self) -> &ScoreHistory {
        &self.history
    }

    pub fn live_interval(&self) -> Duration {
        self.interval
    }

    pub fn is_live(&self) -> bool {
        self.engine.is_live()
    }

    /// Whether a ticker task is currently scheduled.
    pub fn ticker_active(&self) -> bool {
        self.live.as_ref().is_some_and(LiveHandle::is_active)
    }

    /// Handle on the current ticker task, if live mode scheduled one.
    pub fn ticker_abort_handle(&self) -> Option<AbortHandle> {
        self.live.as_ref().and_then(LiveHandle::abort_handle)
    }

    /// Flip live mode, starting or cancelling the ticker.
    ///
    /// Starting live mode spawns a task, so this must run inside a Tokio
    /// runtime.
    pub fn toggle_live(&mut self) -> ScoreSnapshot {
        self.metrics.toggles += 1;
        match self.engine.toggle_live() {
            LiveTransition::Started { epoch } => {
                self.cancel_ticker();
                self.live = Some(spawn_live_ticker(
                    self.interval,
                    epoch,
                    self.ticks_tx.clone(),
                ));
                info!(
                    target: "nayaflow::session",
                    epoch,
                    interval_ms = self.interval.as_millis() as u64,
                    "live.started"
                );
            }
            LiveTransition::Stopped => {
                self.cancel_ticker();
                info!(
                    target: "nayaflow::session",
                    tick = self.engine.tick(),
                    "live.stopped"
                );
            }
        }
        self.record()
    }

    pub fn quick_scan(&mut self) -> ScoreSnapshot {
        self.cancel_ticker();
        let was_live = self.engine.quick_scan();
        self.metrics.quick_scans += 1;
        let snapshot = self.record();
        info!(
            target: "nayaflow::session",
            was_live,
            score = snapshot.score,
            "scan.applied"
        );
        snapshot
    }

    pub fn reset(&mut self) -> ScoreSnapshot {
        self.cancel_ticker();
        let was_live = self.engine.reset();
        self.metrics.resets += 1;
        let snapshot = self.engine.snapshot();
        self.metrics.observe(&snapshot);
        self.history.restart(snapshot);
        info!(target: "nayaflow::session", was_live, "reset.applied");
        snapshot
    }

    /// Apply `steps` perturbations immediately, whatever the mode.
    pub fn perturb(&mut self, steps: u32) -> ScoreSnapshot {
        for _ in 0..steps {
            self.engine.step(&mut self.rng);
            self.metrics.ticks_applied += 1;
            self.record();
        }
        self.snapshot()
    }

    pub fn nudge(&mut self, target: NudgeTarget, delta: i64) -> ScoreSnapshot {
        self.engine.nudge(target, delta);
        debug!(
            target: "nayaflow::session",
            field = target.token(),
            delta,
            "nudge.applied"
        );
        self.record()
    }

    pub fn apply(&mut self, command: SimCommand) -> ScoreSnapshot {
        match command {
            SimCommand::ToggleLive => self.toggle_live(),
            SimCommand::QuickScan => self.quick_scan(),
            SimCommand::Reset => self.reset(),
            SimCommand::Perturb { steps } => self.perturb(steps),
            SimCommand::Nudge { target, delta } => self.nudge(target, delta),
            SimCommand::Status => self.snapshot(),
        }
    }

    /// Wait for the next live tick and apply it.
    ///
    /// Ticks from a cancelled live period are discarded without touching
    /// state. While idle this never resolves, which keeps it usable as a
    /// `select!` branch.
    pub async fn next_tick(&mut self) -> Option<ScoreSnapshot> {
        while let Some(tick) = self.ticks_rx.recv().await {
            match self.engine.apply_tick(tick, &mut self.rng) {
                TickOutcome::Applied => {
                    self.metrics.ticks_applied += 1;
                    return Some(self.record());
                }
                TickOutcome::Stale => {
                    self.metrics.stale_ticks_ignored += 1;
                }
            }
        }
        None
    }

    /// Cancel any running ticker. Live mode is left as is.
    pub fn shutdown(&mut self) {
        self.cancel_ticker();
    }

    fn cancel_ticker(&mut self) {
        if let Some(mut handle) = self.live.take() {
            handle.cancel();
        }
    }

    fn record(&mut self) -> ScoreSnapshot {
        let snapshot = self.engine.snapshot();
        self.metrics.observe(&snapshot);
        self.history.push(snapshot);
        snapshot
    }
}

impl Drop for ScoreSession {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_has_no_side_effects() {
        let mut session = ScoreSession::with_seed(1);
        let before = session.snapshot();
        assert_eq!(session.apply(SimCommand::Status), before);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.metrics().ticks_applied, 0);
    }

    #[test]
    fn manual_steps_advance_tick_and_history() {
        let mut session = ScoreSession::with_seed(9);
        let snapshot = session.apply(SimCommand::Perturb { steps: 5 });
        assert_eq!(snapshot.tick, 5);
        assert!(snapshot.within_bounds());
        assert!(!snapshot.running);
        assert_eq!(session.history().len(), 6);
        assert_eq!(session.metrics().ticks_applied, 5);
    }

    #[test]
    fn reset_restarts_history_and_counts() {
        let mut session = ScoreSession::with_seed(2);
        session.perturb(3);
        session.quick_scan();
        let snapshot = session.reset();
        assert_eq!(snapshot, SimulationState::initial().snapshot(0));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.metrics().resets, 1);
        assert_eq!(session.metrics().quick_scans, 1);
    }

    #[test]
    fn quick_scan_records_delta_against_previous_snapshot() {
        let mut session = ScoreSession::with_seed(4);
        session.quick_scan();
        assert_eq!(session.history().score_delta(), Some(12));
    }

    #[tokio::test(start_paused = true)]
    async fn live_mode_perturbs_on_each_tick() {
        let mut session = ScoreSession::with_seed(21);
        session.toggle_live();
        assert!(session.ticker_active());

        for expected in 1..=3 {
            let snapshot = session.next_tick().await.unwrap();
            assert_eq!(snapshot.tick, expected);
            assert!(snapshot.running);
            assert!(snapshot.within_bounds());
        }
        assert_eq!(session.metrics().ticks_applied, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn quick_scan_cancels_live_ticker() {
        let mut session = ScoreSession::with_seed(8);
        session.toggle_live();
        let snapshot = session.quick_scan();
        assert!(!snapshot.running);
        assert!(!session.ticker_active());
    }
}
