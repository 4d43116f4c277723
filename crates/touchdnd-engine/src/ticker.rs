//! Interval ticker
//!
//! The engine owns no OS timers. Deadlines are checked against the instant
//! the embedder passes into the pump, and a pump that arrives several
//! intervals late fires at most one iteration before realigning — missed
//! frames are skipped, never queued.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct IntervalTicker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl IntervalTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// True when a tick is due; realigns the next deadline to `now + interval`
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_deadline() {
        let t0 = Instant::now();
        let mut ticker = IntervalTicker::new(Duration::from_millis(150));
        ticker.start(t0);

        assert!(!ticker.fire_due(t0 + Duration::from_millis(100)));
        assert!(ticker.fire_due(t0 + Duration::from_millis(150)));
        assert!(!ticker.fire_due(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn test_late_pump_fires_once_and_realigns() {
        let t0 = Instant::now();
        let mut ticker = IntervalTicker::new(Duration::from_millis(150));
        ticker.start(t0);

        // three intervals late: a single tick, not a backlog
        let late = t0 + Duration::from_millis(450);
        assert!(ticker.fire_due(late));
        assert!(!ticker.fire_due(late));
        assert!(!ticker.fire_due(late + Duration::from_millis(100)));
        assert!(ticker.fire_due(late + Duration::from_millis(150)));
    }

    #[test]
    fn test_stopped_ticker_never_fires() {
        let t0 = Instant::now();
        let mut ticker = IntervalTicker::new(Duration::from_millis(150));

        assert!(!ticker.fire_due(t0 + Duration::from_secs(10)));
        ticker.start(t0);
        ticker.stop();
        assert!(!ticker.fire_due(t0 + Duration::from_secs(10)));
    }
}
