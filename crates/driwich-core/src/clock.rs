//! Time source for commit timestamps.

use chrono::{DateTime, Duration, Utc};

pub trait Clock: Send {
    fn now(&mut self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Starts at a fixed instant and advances by `step` on every reading.
#[derive(Debug, Clone)]
pub struct SteppingClock {
    current: DateTime<Utc>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        SteppingClock {
            current: start,
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&mut self) -> DateTime<Utc> {
        let now = self.current;
        self.current = self.current + self.step;
        now
    }
}
