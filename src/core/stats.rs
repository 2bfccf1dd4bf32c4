use super::state::Ticks;

/// Running queue-length statistic, fed signed unit deltas by the scheduler.
///
/// Besides the live length it integrates length over simulated time, so
/// the mean queue length of a run falls out of `average_len`.
#[derive(Debug, Default)]
pub struct QueueStats {
    current: u64,
    max: u64,
    changes: u64,
    // Sum of length * ticks up to `last_change`
    area: u128,
    last_change: Ticks,
}

impl QueueStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_changed(&mut self, delta: i64, now: Ticks) {
        self.accumulate(now);

        let next = self.current as i64 + delta;
        debug_assert!(next >= 0, "Queue length went negative ({next})");
        self.current = next.max(0) as u64;
        self.max = self.max.max(self.current);
        self.changes += 1;
    }

    fn accumulate(&mut self, now: Ticks) {
        let elapsed = now.saturating_sub(self.last_change);
        self.area += self.current as u128 * elapsed as u128;
        self.last_change = self.last_change.max(now);
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn changes(&self) -> u64 {
        self.changes
    }

    pub fn average_len(&self, now: Ticks) -> f64 {
        if now == 0 {
            return 0.0;
        }
        let elapsed = now.saturating_sub(self.last_change);
        let area = self.area + self.current as u128 * elapsed as u128;
        area as f64 / now as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_current_and_max() {
        let mut stats = QueueStats::new();
        stats.queue_changed(1, 0);
        stats.queue_changed(1, 0);
        stats.queue_changed(-1, 1);
        assert_eq!(stats.current(), 1);
        assert_eq!(stats.max(), 2);
        assert_eq!(stats.changes(), 3);
    }

    #[test]
    fn average_is_time_weighted() {
        let mut stats = QueueStats::new();
        // length 2 for ticks [0, 4), length 0 for [4, 8)
        stats.queue_changed(1, 0);
        stats.queue_changed(1, 0);
        stats.queue_changed(-1, 4);
        stats.queue_changed(-1, 4);
        assert_eq!(stats.average_len(8), 1.0);
    }

    #[test]
    fn average_counts_open_interval() {
        let mut stats = QueueStats::new();
        stats.queue_changed(1, 2);
        assert_eq!(stats.average_len(4), 0.5);
        assert_eq!(stats.average_len(0), 0.0);
    }
}
