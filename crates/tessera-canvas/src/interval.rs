//! Host-polled fixed-period timer.

/// A repeating timer the host polls with the current time.
///
/// Fires at most once per poll, so a stalled host never bursts.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    period_ms: f64,
    next_due: f64,
    cancelled: bool,
}

impl Interval {
    /// First tick is due one period after `now`.
    pub fn new(period_ms: f64, now: f64) -> Self {
        Self {
            period_ms,
            next_due: now + period_ms,
            cancelled: false,
        }
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    /// Returns true if the interval fired at `now`.
    ///
    /// Ticks stay on the `period_ms` grid from the first due time, so late
    /// polls do not drift; ticks missed entirely are skipped.
    pub fn poll(&mut self, now: f64) -> bool {
        if self.cancelled || now < self.next_due {
            return false;
        }
        self.next_due += self.period_ms;
        if self.period_ms > 0.0 && self.next_due <= now {
            let behind = ((now - self.next_due) / self.period_ms).floor() + 1.0;
            self.next_due += behind * self.period_ms;
        }
        true
    }

    /// Stop the interval; it never fires again.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
