use chrono::Utc;
use kirana_core::Timestamp;
use kirana_ports::Clock;

/// Wall clock for live sessions, paired with `TokioScheduler`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_wall_time() {
        let clock = SystemClock::new();
        let before = Utc::now();
        let now = clock.now();
        let after = Utc::now();

        assert!(before <= now && now <= after);
    }
}
