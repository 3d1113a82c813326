use score_runtime::ScoreSnapshot;

/// Running counters for a session, reported alongside transition logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationMetrics {
    pub ticks_applied: u64,
    pub stale_ticks_ignored: u64,
    pub toggles: u64,
    pub quick_scans: u64,
    pub resets: u64,
    pub score_low: Option<i32>,
    pub score_high: Option<i32>,
}

impl SimulationMetrics {
    pub fn observe(&mut self, snapshot: &ScoreSnapshot) {
        self.score_low = Some(
            self.score_low
                .map_or(snapshot.score, |low| low.min(snapshot.score)),
        );
        self.score_high = Some(
            self.score_high
                .map_or(snapshot.score, |high| high.max(snapshot.score)),
        );
    }

    /// Observed score range, once anything has been observed.
    pub fn score_range(&self) -> Option<(i32, i32)> {
        self.score_low.zip(self.score_high)
    }
}
