use std::time::Duration;

/// One-shot countdown advanced by frame deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    remaining: Duration,
}

impl Timer {
    pub fn new(after: Duration) -> Self {
        Self { remaining: after }
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Returns the overshoot past the deadline once the timer fires, `None` before.
    pub fn tick(&mut self, dt: Duration) -> Option<Duration> {
        if dt >= self.remaining {
            let over = dt - self.remaining;
            self.remaining = Duration::ZERO;
            Some(over)
        } else {
            self.remaining -= dt;
            None
        }
    }
}
