use std::collections::VecDeque;
use std::time::Duration;

/// Rolling window of recent frame durations.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    window: VecDeque<Duration>,
    capacity: usize,
    frames: u64,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            frames: 0,
        }
    }

    pub fn record(&mut self, elapsed: Duration) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(elapsed);
        self.frames += 1;
    }

    /// Samples currently in the window.
    pub fn count(&self) -> usize {
        self.window.len()
    }

    /// Frames recorded since creation.
    pub fn total_frames(&self) -> u64 {
        self.frames
    }

    pub fn average(&self) -> Duration {
        if self.window.is_empty() {
            return Duration::ZERO;
        }
        self.window.iter().sum::<Duration>() / self.window.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.window.iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.window.iter().copied().min().unwrap_or(Duration::ZERO)
    }

    /// Frames in the window slower than `budget`.
    pub fn over_budget(&self, budget: Duration) -> usize {
        self.window.iter().filter(|d| **d > budget).count()
    }
}

impl std::fmt::Display for FrameTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frames={} avg={:?} min={:?} max={:?}",
            self.frames,
            self.average(),
            self.min(),
            self.max()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_timer_reports_zero() {
        let t = FrameTimer::new(4);
        assert_eq!(t.count(), 0);
        assert_eq!(t.average(), Duration::ZERO);
        assert_eq!(t.max(), Duration::ZERO);
    }

    #[test]
    fn window_keeps_latest_samples() {
        let mut t = FrameTimer::new(3);
        for ms in [10, 20, 30, 40] {
            t.record(Duration::from_millis(ms));
        }
        assert_eq!(t.count(), 3);
        assert_eq!(t.total_frames(), 4);
        assert_eq!(t.min(), Duration::from_millis(20));
        assert_eq!(t.max(), Duration::from_millis(40));
        assert_eq!(t.average(), Duration::from_millis(30));
    }

    #[test]
    fn counts_slow_frames() {
        let mut t = FrameTimer::new(8);
        for ms in [5, 12, 30, 16] {
            t.record(Duration::from_millis(ms));
        }
        assert_eq!(t.over_budget(Duration::from_millis(16)), 2);
    }

    #[test]
    fn zero_capacity_is_bumped() {
        let mut t = FrameTimer::new(0);
        t.record(Duration::from_millis(1));
        assert_eq!(t.count(), 1);
    }
}
