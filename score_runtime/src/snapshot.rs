use serde::{Deserialize, Serialize};

use crate::metric::{MetricKey, SCORE_BOUNDS};

/// Read-only view of the simulator, safe to hand to any renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    /// Perturbation steps applied since start or the last reset.
    pub tick: u64,
    pub score: i32,
    pub income_stability: i32,
    pub on_time_payments: i32,
    pub cash_buffer: i32,
    pub spending_pattern: i32,
    pub running: bool,
}

impl ScoreSnapshot {
    pub fn metric(&self, key: MetricKey) -> i32 {
        match key {
            MetricKey::IncomeStability => self.income_stability,
            MetricKey::OnTimePayments => self.on_time_payments,
            MetricKey::CashBuffer => self.cash_buffer,
            MetricKey::SpendingPattern => self.spending_pattern,
        }
    }

    pub fn metrics(&self) -> [(MetricKey, i32); 4] {
        MetricKey::ALL.map(|key| (key, self.metric(key)))
    }

    pub fn within_bounds(&self) -> bool {
        SCORE_BOUNDS.contains(self.score)
            && MetricKey::ALL
                .iter()
                .all(|key| key.bounds().contains(self.metric(*key)))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
