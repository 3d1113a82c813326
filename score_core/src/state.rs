use score_runtime::{MetricKey, ScoreSnapshot, INITIAL_SCORE, SCORE_BOUNDS};

/// Percentages for the four sub-metrics, each held inside its own bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubMetrics {
    pub income_stability: i32,
    pub on_time_payments: i32,
    pub cash_buffer: i32,
    pub spending_pattern: i32,
}

impl SubMetrics {
    pub fn initial() -> Self {
        Self {
            income_stability: MetricKey::IncomeStability.initial(),
            on_time_payments: MetricKey::OnTimePayments.initial(),
            cash_buffer: MetricKey::CashBuffer.initial(),
            spending_pattern: MetricKey::SpendingPattern.initial(),
        }
    }

    pub fn get(&self, key: MetricKey) -> i32 {
        match key {
            MetricKey::IncomeStability => self.income_stability,
            MetricKey::OnTimePayments => self.on_time_payments,
            MetricKey::CashBuffer => self.cash_buffer,
            MetricKey::SpendingPattern => self.spending_pattern,
        }
    }

    fn slot_mut(&mut self, key: MetricKey) -> &mut i32 {
        match key {
            MetricKey::IncomeStability => &mut self.income_stability,
            MetricKey::OnTimePayments => &mut self.on_time_payments,
            MetricKey::CashBuffer => &mut self.cash_buffer,
            MetricKey::SpendingPattern => &mut self.spending_pattern,
        }
    }

    /// Add `delta` to one metric, saturating at that metric's bounds.
    pub fn offset(&mut self, key: MetricKey, delta: i64) {
        let slot = self.slot_mut(key);
        *slot = key.bounds().apply(*slot, delta);
    }
}

impl Default for SubMetrics {
    fn default() -> Self {
        Self::initial()
    }
}

/// Whether spontaneous perturbation is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    Idle,
    Live,
}

/// The simulator's only entity: score, sub-metrics and the live flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationState {
    pub score: i32,
    pub sub_metrics: SubMetrics,
    pub running: bool,
}

impl SimulationState {
    pub fn initial() -> Self {
        Self {
            score: INITIAL_SCORE,
            sub_metrics: SubMetrics::initial(),
            running: false,
        }
    }

    pub fn mode(&self) -> EngineMode {
        if self.running {
            EngineMode::Live
        } else {
            EngineMode::Idle
        }
    }

    pub fn offset_score(&mut self, delta: i64) {
        self.score = SCORE_BOUNDS.apply(self.score, delta);
    }

    pub fn within_bounds(&self) -> bool {
        SCORE_BOUNDS.contains(self.score)
            && MetricKey::ALL
                .iter()
                .all(|key| key.bounds().contains(self.sub_metrics.get(*key)))
    }

    pub fn snapshot(&self, tick: u64) -> ScoreSnapshot {
        ScoreSnapshot {
            tick,
            score: self.score,
            income_stability: self.sub_metrics.income_stability,
            on_time_payments: self.sub_metrics.on_time_payments,
            cash_buffer: self.sub_metrics.cash_buffer,
            spending_pattern: self.sub_metrics.spending_pattern,
            running: self.running,
        }
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::initial()
    }
}
