//! Tick sources and cancellation
//!
//! Spawning and expiry run off `IntervalTimer`s that the driver polls with
//! explicit timestamps. Anything that stops a run (pause, game over, quitting)
//! bumps the `RunEpoch`; callbacks carrying a `TickToken` from an older epoch
//! are ignored.

/// Recurring timer polled with explicit timestamps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntervalTimer {
    next_due: Option<u64>,
}

impl IntervalTimer {
    /// Schedule the next firing at `due`
    pub fn arm_at(&mut self, due: u64) {
        self.next_due = Some(due);
    }

    /// Disarm; `fire` will return false until re-armed
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.next_due
    }

    /// Fire at most once if due. The next firing is scheduled `period` after
    /// `now` (not after the missed due time), so a late poll never bursts.
    pub fn fire(&mut self, now: u64, period: u64) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + period);
                true
            }
            _ => false,
        }
    }
}

/// Stamp identifying which run a deferred tick belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken {
    epoch: u64,
}

/// Monotonic run counter backing `TickToken`s
#[derive(Debug, Clone, Default)]
pub struct RunEpoch {
    current: u64,
}

impl RunEpoch {
    /// Invalidate every outstanding token
    pub fn bump(&mut self) {
        self.current += 1;
    }

    pub fn token(&self) -> TickToken {
        TickToken {
            epoch: self.current,
        }
    }

    pub fn is_current(&self, token: TickToken) -> bool {
        token.epoch == self.current
    }
}
