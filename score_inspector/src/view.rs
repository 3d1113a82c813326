use score_runtime::{MetricKey, ScoreSnapshot};

pub const SCORE_CAPTION: &str = "NayaFlow Score (simulated)";
pub const APR_FOOTER: &str = "Estimated APR impact: 16–20%";

/// One percentage bar; `percent` is the metric's value unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricBar {
    pub key: MetricKey,
    pub label: &'static str,
    pub percent: u16,
}

/// Display primitives projected from a snapshot. Building one never touches
/// the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreView {
    pub score: i32,
    pub caption: &'static str,
    pub toggle_label: &'static str,
    pub live: bool,
    pub tick: u64,
    pub delta: Option<i32>,
    pub bars: Vec<MetricBar>,
}

impl ScoreView {
    pub fn project(snapshot: &ScoreSnapshot, delta: Option<i32>) -> Self {
        let bars = snapshot
            .metrics()
            .into_iter()
            .map(|(key, value)| MetricBar {
                key,
                label: key.label(),
                percent: value.clamp(0, 100) as u16,
            })
            .collect();
        Self {
            score: snapshot.score,
            caption: SCORE_CAPTION,
            toggle_label: toggle_label(snapshot.running),
            live: snapshot.running,
            tick: snapshot.tick,
            delta,
            bars,
        }
    }

    /// Signed change since the previous snapshot, e.g. `+12` or `-3`.
    pub fn delta_text(&self) -> Option<String> {
        self.delta.map(|delta| format!("{delta:+}"))
    }
}

pub fn toggle_label(running: bool) -> &'static str {
    if running {
        "Pause"
    } else {
        "Live Update"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(running: bool) -> ScoreSnapshot {
        ScoreSnapshot {
            tick: 3,
            score: 697,
            income_stability: 80,
            on_time_payments: 86,
            cash_buffer: 65,
            spending_pattern: 75,
            running,
        }
    }

    #[test]
    fn bars_mirror_metric_values_in_display_order() {
        let view = ScoreView::project(&snapshot(false), None);
        let widths: Vec<(&str, u16)> = view.bars.iter().map(|bar| (bar.label, bar.percent)).collect();
        assert_eq!(
            widths,
            vec![
                ("Income Stability", 80),
                ("On-time Payments", 86),
                ("Cash Buffer", 65),
                ("Spending Pattern", 75),
            ]
        );
        assert_eq!(view.score, 697);
        assert_eq!(view.caption, SCORE_CAPTION);
    }

    #[test]
    fn toggle_label_follows_live_flag() {
        assert_eq!(ScoreView::project(&snapshot(true), None).toggle_label, "Pause");
        assert_eq!(
            ScoreView::project(&snapshot(false), None).toggle_label,
            "Live Update"
        );
    }

    #[test]
    fn delta_text_is_signed() {
        assert_eq!(
            ScoreView::project(&snapshot(false), Some(12)).delta_text(),
            Some("+12".to_string())
        );
        assert_eq!(
            ScoreView::project(&snapshot(false), Some(-3)).delta_text(),
            Some("-3".to_string())
        );
        assert_eq!(ScoreView::project(&snapshot(false), None).delta_text(), None);
    }
}
