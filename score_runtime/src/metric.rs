use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed integer interval used to saturate score and sub-metric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: i32,
    pub max: i32,
}

impl Bounds {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Add `delta` to `value` and saturate at the nearer bound.
    ///
    /// The sum is computed in `i64` so arbitrarily large offsets cannot wrap.
    pub fn apply(self, value: i32, delta: i64) -> i32 {
        let raw = i64::from(value).saturating_add(delta);
        raw.clamp(i64::from(self.min), i64::from(self.max)) as i32
    }
}

pub const SCORE_BOUNDS: Bounds = Bounds::new(300, 850);
pub const INITIAL_SCORE: i32 = 685;
/// Half-width of the per-tick score offset (draws land in `-3..=3`).
pub const SCORE_JITTER: i32 = 3;
pub const SCORE_SCAN_BOOST: i32 = 12;

/// The four sub-metrics that decompose the simulated score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    IncomeStability,
    OnTimePayments,
    CashBuffer,
    SpendingPattern,
}

impl MetricKey {
    /// Display order, which is also the order random offsets are drawn in.
    pub const ALL: [MetricKey; 4] = [
        MetricKey::IncomeStability,
        MetricKey::OnTimePayments,
        MetricKey::CashBuffer,
        MetricKey::SpendingPattern,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MetricKey::IncomeStability => "Income Stability",
            MetricKey::OnTimePayments => "On-time Payments",
            MetricKey::CashBuffer => "Cash Buffer",
            MetricKey::SpendingPattern => "Spending Pattern",
        }
    }

    /// Short token accepted by the text command parser.
    pub fn token(self) -> &'static str {
        match self {
            MetricKey::IncomeStability => "income",
            MetricKey::OnTimePayments => "payments",
            MetricKey::CashBuffer => "buffer",
            MetricKey::SpendingPattern => "spending",
        }
    }

    pub fn bounds(self) -> Bounds {
        match self {
            MetricKey::IncomeStability => Bounds::new(35, 100),
            MetricKey::OnTimePayments => Bounds::new(35, 100),
            MetricKey::CashBuffer => Bounds::new(20, 100),
            MetricKey::SpendingPattern => Bounds::new(30, 100),
        }
    }

    /// Half-width of the per-tick offset for this metric.
    pub fn jitter(self) -> i32 {
        match self {
            MetricKey::IncomeStability | MetricKey::CashBuffer => 3,
            MetricKey::OnTimePayments | MetricKey::SpendingPattern => 2,
        }
    }

    /// Fixed increment applied by a quick scan.
    pub fn scan_boost(self) -> i32 {
        match self {
            MetricKey::IncomeStability => 8,
            MetricKey::OnTimePayments => 6,
            MetricKey::CashBuffer => 5,
            MetricKey::SpendingPattern => 7,
        }
    }

    pub fn initial(self) -> i32 {
        match self {
            MetricKey::IncomeStability => 72,
            MetricKey::OnTimePayments => 80,
            MetricKey::CashBuffer => 60,
            MetricKey::SpendingPattern => 68,
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_saturates_extreme_offsets() {
        assert_eq!(SCORE_BOUNDS.apply(850, 3), 850);
        assert_eq!(SCORE_BOUNDS.apply(300, -3), 300);
        assert_eq!(SCORE_BOUNDS.apply(700, i64::MAX), 850);
        assert_eq!(SCORE_BOUNDS.apply(700, i64::MIN), 300);
        assert_eq!(SCORE_BOUNDS.apply(700, -12), 688);
    }

    #[test]
    fn initial_values_sit_inside_bounds() {
        assert!(SCORE_BOUNDS.contains(INITIAL_SCORE));
        for key in MetricKey::ALL {
            assert!(
                key.bounds().contains(key.initial()),
                "{key} initial value {} outside {:?}",
                key.initial(),
                key.bounds()
            );
        }
    }

    #[test]
    fn metric_keys_serialize_camel_case() {
        let json = serde_json::to_string(&MetricKey::OnTimePayments).unwrap();
        assert_eq!(json, "\"onTimePayments\"");
    }
}
