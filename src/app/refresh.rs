// ClassDesk - app/refresh.rs
//
// Periodic refresh timer for the classroom summary counts. Driven by the
// frame loop: the GUI asks `is_due` each frame and calls `mark` when it
// dispatches a refresh.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RefreshTimer {
    interval: Duration,
    last: Option<Instant>,
}

impl RefreshTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// True when no refresh has happened yet, or `interval` has elapsed.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Record that a refresh was started at `now`.
    pub fn mark(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// Forget the last refresh so the next check fires immediately.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Time until the next refresh is due (zero when already due).
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last {
            None => Duration::ZERO,
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_immediately_then_after_interval() {
        let start = Instant::now();
        let mut timer = RefreshTimer::new(Duration::from_secs(30));
        assert!(timer.is_due(start));

        timer.mark(start);
        assert!(!timer.is_due(start + Duration::from_secs(29)));
        assert!(timer.is_due(start + Duration::from_secs(30)));
        assert_eq!(
            timer.remaining(start + Duration::from_secs(10)),
            Duration::from_secs(20)
        );
    }

    #[test]
    fn test_reset_makes_due() {
        let start = Instant::now();
        let mut timer = RefreshTimer::new(Duration::from_secs(30));
        timer.mark(start);
        timer.reset();
        assert!(timer.is_due(start));
        assert_eq!(timer.remaining(start), Duration::ZERO);
    }
}
