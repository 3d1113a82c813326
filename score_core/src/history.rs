use std::collections::VecDeque;

use score_runtime::ScoreSnapshot;

/// Bounded record of recent snapshots, newest first.
#[derive(Debug, Clone)]
pub struct ScoreHistory {
    entries: VecDeque<ScoreSnapshot>,
    capacity: usize,
}

impl ScoreHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, snapshot: ScoreSnapshot) {
        self.entries.push_front(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    /// Drop everything and start over from `snapshot`.
    pub fn restart(&mut self, snapshot: ScoreSnapshot) {
        self.entries.clear();
        self.entries.push_front(snapshot);
    }

    pub fn latest(&self) -> Option<&ScoreSnapshot> {
        self.entries.front()
    }

    pub fn previous_score(&self) -> Option<i32> {
        self.entries.get(1).map(|snapshot| snapshot.score)
    }

    /// Latest score minus the one before it.
    pub fn score_delta(&self) -> Option<i32> {
        let latest = self.latest()?.score;
        self.previous_score().map(|previous| latest - previous)
    }

    /// Scores oldest to newest, shaped for sparkline widgets.
    pub fn score_series(&self) -> Vec<u64> {
        self.entries
            .iter()
            .rev()
            .map(|snapshot| snapshot.score.max(0) as u64)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SimulationState;

    fn snapshot_with_score(tick: u64, score: i32) -> ScoreSnapshot {
        let mut snapshot = SimulationState::initial().snapshot(tick);
        snapshot.score = score;
        snapshot
    }

    #[test]
    fn keeps_newest_entries_up_to_capacity() {
        let mut history = ScoreHistory::with_capacity(3);
        for (tick, score) in [(0, 685), (1, 687), (2, 684), (3, 686)] {
            history.push(snapshot_with_score(tick, score));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.latest().map(|s| s.tick), Some(3));
        assert_eq!(history.score_series(), vec![687, 684, 686]);
    }

    #[test]
    fn delta_needs_two_entries() {
        let mut history = ScoreHistory::with_capacity(8);
        assert!(history.is_empty());
        assert_eq!(history.score_delta(), None);
        history.push(snapshot_with_score(0, 685));
        assert_eq!(history.score_delta(), None);
        history.push(snapshot_with_score(1, 697));
        assert_eq!(history.previous_score(), Some(685));
        assert_eq!(history.score_delta(), Some(12));
    }

    #[test]
    fn restart_discards_previous_entries() {
        let mut history = ScoreHistory::with_capacity(0);
        assert_eq!(history.capacity(), 1);
        history.push(snapshot_with_score(5, 700));
        history.restart(snapshot_with_score(0, 685));
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().map(|s| s.score), Some(685));
    }
}
