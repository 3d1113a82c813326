use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use score_runtime::{MetricKey, NudgeTarget, ScoreSnapshot, SimCommand};

/// Seeded random command script covering every transition, including nudges
/// far larger than any bound.
pub fn random_script(seed: u64, len: usize) -> Vec<SimCommand> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| match rng.gen_range(0..10) {
            0 => SimCommand::ToggleLive,
            1 => SimCommand::QuickScan,
            2 => SimCommand::Reset,
            3 => SimCommand::Status,
            4 => {
                let target = match rng.gen_range(0..5) {
                    0 => NudgeTarget::Score,
                    n => NudgeTarget::Metric(MetricKey::ALL[n - 1]),
                };
                let delta = match rng.gen_range(0..3) {
                    0 => i64::MAX,
                    1 => i64::MIN,
                    _ => rng.gen_range(-2_000..=2_000),
                };
                SimCommand::Nudge { target, delta }
            }
            _ => SimCommand::Perturb {
                steps: rng.gen_range(1..=40),
            },
        })
        .collect()
}

pub fn assert_within_bounds(snapshot: &ScoreSnapshot, context: &str) {
    assert!(
        snapshot.within_bounds(),
        "snapshot out of bounds after {context}: {snapshot:?}"
    );
}

pub fn initial_snapshot() -> ScoreSnapshot {
    ScoreSnapshot {
        tick: 0,
        score: 685,
        income_stability: 72,
        on_time_payments: 80,
        cash_buffer: 60,
        spending_pattern: 68,
        running: false,
    }
}
