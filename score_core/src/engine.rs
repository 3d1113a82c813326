//! Score perturbation rule and the discrete transitions of the simulator.
//!
//! The free functions are pure: they take a [`SimulationState`] by value and
//! return the next one, with randomness injected by the caller. [`ScoreEngine`]
//! layers the live/idle state machine and tick bookkeeping on top.

use rand::Rng;
use score_runtime::{MetricKey, NudgeTarget, SCORE_JITTER, SCORE_SCAN_BOOST};
use tracing::trace;

use crate::live::LiveTick;
use crate::state::SimulationState;

/// Apply one noisy step to the score and all four sub-metrics.
///
/// Offsets are drawn uniformly from a `2h + 1` wide range and re-centred to
/// `-h..=h`; the score is drawn first, then the metrics in [`MetricKey::ALL`]
/// order. Every result is clamped to its own bounds.
pub fn perturb<R: Rng + ?Sized>(mut state: SimulationState, rng: &mut R) -> SimulationState {
    state.offset_score(draw_offset(rng, SCORE_JITTER));
    for key in MetricKey::ALL {
        let offset = draw_offset(rng, key.jitter());
        state.sub_metrics.offset(key, offset);
    }
    state
}

/// Stop live mode and apply the fixed favorable increments.
pub fn quick_scan(mut state: SimulationState) -> SimulationState {
    state.running = false;
    state.offset_score(i64::from(SCORE_SCAN_BOOST));
    for key in MetricKey::ALL {
        state.sub_metrics.offset(key, i64::from(key.scan_boost()));
    }
    state
}

pub fn reset() -> SimulationState {
    SimulationState::initial()
}

/// Add an arbitrary offset to one field. The clamp still applies.
pub fn nudge(mut state: SimulationState, target: NudgeTarget, delta: i64) -> SimulationState {
    match target {
        NudgeTarget::Score => state.offset_score(delta),
        NudgeTarget::Metric(key) => state.sub_metrics.offset(key, delta),
    }
    state
}

fn draw_offset<R: Rng + ?Sized>(rng: &mut R, half_range: i32) -> i64 {
    let width = 2 * half_range + 1;
    i64::from(rng.gen_range(0..width) - half_range)
}

/// Result of flipping live mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveTransition {
    /// Live mode began; ticks must carry this epoch to be honoured.
    Started { epoch: u64 },
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Applied,
    /// The tick belonged to a cancelled live period or arrived while idle.
    Stale,
}

/// State machine wrapper around [`SimulationState`].
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    state: SimulationState,
    tick: u64,
    live_epoch: u64,
}

impl ScoreEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn live_epoch(&self) -> u64 {
        self.live_epoch
    }

    pub fn is_live(&self) -> bool {
        self.state.running
    }

    pub fn snapshot(&self) -> score_runtime::ScoreSnapshot {
        self.state.snapshot(self.tick)
    }

    pub fn toggle_live(&mut self) -> LiveTransition {
        self.state.running = !self.state.running;
        if self.state.running {
            self.live_epoch += 1;
            LiveTransition::Started {
                epoch: self.live_epoch,
            }
        } else {
            LiveTransition::Stopped
        }
    }

    /// Perturb once regardless of mode.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.state = perturb(self.state, rng);
        self.tick += 1;
        trace!(
            target: "nayaflow::engine",
            tick = self.tick,
            score = self.state.score,
            "tick.applied"
        );
    }

    /// Perturb in response to a timer tick, unless the tick is stale.
    pub fn apply_tick<R: Rng + ?Sized>(&mut self, tick: LiveTick, rng: &mut R) -> TickOutcome {
        if !self.state.running || tick.epoch != self.live_epoch {
            trace!(
                target: "nayaflow::engine",
                tick_epoch = tick.epoch,
                live_epoch = self.live_epoch,
                running = self.state.running,
                "tick.ignored=stale"
            );
            return TickOutcome::Stale;
        }
        self.step(rng);
        TickOutcome::Applied
    }

    /// Returns whether live mode was active before the scan.
    pub fn quick_scan(&mut self) -> bool {
        let was_live = self.state.running;
        self.state = quick_scan(self.state);
        was_live
    }

    /// Returns whether live mode was active before the reset.
    pub fn reset(&mut self) -> bool {
        let was_live = self.state.running;
        self.state = reset();
        self.tick = 0;
        was_live
    }

    pub fn nudge(&mut self, target: NudgeTarget, delta: i64) {
        self.state = nudge(self.state, target, delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use score_runtime::SCORE_BOUNDS;

    fn at_ceiling() -> SimulationState {
        let mut state = SimulationState::initial();
        state.score = SCORE_BOUNDS.max;
        for key in MetricKey::ALL {
            state.sub_metrics.offset(key, 1_000);
        }
        state
    }

    #[test]
    fn quick_scan_from_initial_is_exact() {
        let mut engine = ScoreEngine::new();
        engine.quick_scan();
        insta::assert_json_snapshot!(engine.snapshot(), @r###"
        {
          "tick": 0,
          "score": 697,
          "incomeStability": 80,
          "onTimePayments": 86,
          "cashBuffer": 65,
          "spendingPattern": 75,
          "running": false
        }
        "###);
    }

    #[test]
    fn quick_scan_saturates_at_ceiling_and_stops_live() {
        let mut state = at_ceiling();
        state.running = true;
        let scanned = quick_scan(state);
        assert_eq!(scanned.score, 850);
        assert_eq!(scanned.sub_metrics, state.sub_metrics);
        assert!(!scanned.running);
    }

    #[test]
    fn reset_restores_initial_snapshot_from_anywhere() {
        let mut engine = ScoreEngine::new();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        engine.toggle_live();
        for _ in 0..40 {
            engine.step(&mut rng);
        }
        engine.nudge(NudgeTarget::Score, -10_000);
        assert!(engine.reset());
        assert_eq!(*engine.state(), SimulationState::initial());
        assert_eq!(engine.tick(), 0);
    }

    #[test]
    fn perturb_offsets_stay_within_half_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut state = SimulationState::initial();
        for _ in 0..2_000 {
            let next = perturb(state, &mut rng);
            assert!((next.score - state.score).abs() <= SCORE_JITTER);
            for key in MetricKey::ALL {
                let delta = next.sub_metrics.get(key) - state.sub_metrics.get(key);
                assert!(delta.abs() <= key.jitter(), "{key} moved by {delta}");
            }
            assert!(next.within_bounds());
            state = next;
        }
    }

    #[test]
    fn perturb_clamps_at_ceiling_with_maximal_draws() {
        // Maps to the top of both the 7-wide and 5-wide draws.
        let mut rng = StepRng::new(0xDB6D_B6DC, 0);
        let state = perturb(at_ceiling(), &mut rng);
        assert_eq!(state.score, 850);
        for key in MetricKey::ALL {
            assert_eq!(state.sub_metrics.get(key), key.bounds().max);
        }
    }

    #[test]
    fn perturb_clamps_at_floor_with_minimal_draws() {
        let mut floor = SimulationState::initial();
        floor.score = SCORE_BOUNDS.min;
        for key in MetricKey::ALL {
            floor.sub_metrics.offset(key, -1_000);
        }
        let mut rng = StepRng::new(0, 0);
        let state = perturb(floor, &mut rng);
        assert_eq!(state, floor);
    }

    #[test]
    fn maximal_draws_move_every_field_up_by_its_half_range() {
        let mut rng = StepRng::new(0xDB6D_B6DC, 0);
        let state = perturb(SimulationState::initial(), &mut rng);
        assert_eq!(state.score, 688);
        assert_eq!(state.sub_metrics.income_stability, 75);
        assert_eq!(state.sub_metrics.on_time_payments, 82);
        assert_eq!(state.sub_metrics.cash_buffer, 63);
        assert_eq!(state.sub_metrics.spending_pattern, 70);
    }

    #[test]
    fn perturb_does_not_touch_running_flag() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut state = SimulationState::initial();
        state.running = true;
        assert!(perturb(state, &mut rng).running);
        state.running = false;
        assert!(!perturb(state, &mut rng).running);
    }

    #[test]
    fn toggling_twice_restores_mode_and_bumps_epoch_once() {
        let mut engine = ScoreEngine::new();
        assert_eq!(engine.toggle_live(), LiveTransition::Started { epoch: 1 });
        assert_eq!(engine.toggle_live(), LiveTransition::Stopped);
        assert!(!engine.is_live());
        assert_eq!(engine.live_epoch(), 1);
    }

    #[test]
    fn stale_ticks_never_mutate_state() {
        let mut engine = ScoreEngine::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let before = *engine.state();

        assert_eq!(
            engine.apply_tick(LiveTick { epoch: 0 }, &mut rng),
            TickOutcome::Stale
        );

        let LiveTransition::Started { epoch } = engine.toggle_live() else {
            panic!("expected live mode to start");
        };
        engine.toggle_live();
        assert_eq!(engine.apply_tick(LiveTick { epoch }, &mut rng), TickOutcome::Stale);
        assert_eq!(*engine.state(), before);

        engine.toggle_live();
        assert_eq!(engine.apply_tick(LiveTick { epoch }, &mut rng), TickOutcome::Stale);
        assert_eq!(
            engine.apply_tick(LiveTick { epoch: epoch + 1 }, &mut rng),
            TickOutcome::Applied
        );
        assert_eq!(engine.tick(), 1);
    }

    #[test]
    fn nudge_cannot_escape_bounds() {
        let state = nudge(
            SimulationState::initial(),
            NudgeTarget::Metric(MetricKey::CashBuffer),
            i64::MIN,
        );
        assert_eq!(state.sub_metrics.cash_buffer, 20);
        let state = nudge(state, NudgeTarget::Score, i64::MAX);
        assert_eq!(state.score, 850);
    }
}
