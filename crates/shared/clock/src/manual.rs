use chrono::{Duration, Utc};
use kirana_core::Timestamp;
use kirana_ports::Clock;
use parking_lot::RwLock;
use std::sync::Arc;

/// Simulated clock that only moves when told to
///
/// Time is frozen at construction and advances through `advance` or
/// `advance_to`. `ManualScheduler` drives it while firing due tasks, which
/// makes every timestamp stamped by the simulator reproducible in tests.
pub struct ManualClock {
    /// The initial simulated time
    start: Timestamp,
    /// Current simulated time
    current: RwLock<Timestamp>,
}

impl ManualClock {
    /// Create a new manual clock
    ///
    /// # Arguments
    /// * `initial_time` - Optional starting time. If None, uses current wall time.
    pub fn new(initial_time: Option<Timestamp>) -> Arc<Self> {
        let start = initial_time.unwrap_or_else(Utc::now);

        Arc::new(Self {
            start,
            current: RwLock::new(start),
        })
    }

    /// Advance the simulated time by a specified duration
    ///
    /// Negative durations are ignored; simulated time never runs backwards.
    pub fn advance(&self, duration: Duration) {
        if duration > Duration::zero() {
            *self.current.write() += duration;
        }
    }

    /// Move the clock forward to `time`; earlier instants are ignored
    pub fn advance_to(&self, time: Timestamp) {
        let mut current = self.current.write();
        if time > *current {
            *current = time;
        }
    }

    /// Simulated time elapsed since construction
    pub fn elapsed(&self) -> Duration {
        *self.current.read() - self.start
    }

    pub fn start_time(&self) -> Timestamp {
        self.start
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.read()
    }

    fn name(&self) -> &str {
        "ManualClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_frozen_until_advanced() {
        let clock = ManualClock::new(None);

        let time1 = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(clock.now(), time1);

        clock.advance(Duration::seconds(5));
        assert_eq!(clock.now() - time1, Duration::seconds(5));
        assert_eq!(clock.elapsed(), Duration::seconds(5));
    }

    #[test]
    fn test_never_runs_backwards() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let clock = ManualClock::new(Some(start));

        clock.advance(Duration::seconds(-30));
        assert_eq!(clock.now(), start);

        clock.advance_to(start + Duration::minutes(1));
        clock.advance_to(start);
        assert_eq!(clock.now(), start + Duration::minutes(1));
        assert_eq!(clock.start_time(), start);
    }
}
