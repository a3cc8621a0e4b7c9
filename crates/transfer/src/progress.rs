/// Default progress notification interval (1 MB).
pub const PROGRESS_NOTIFY_DELTA: u64 = 1000 * 1000;

/// Coalesces per-chunk byte counts into periodic notifications.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    total: u64,
    last_notified: u64,
    delta: u64,
}

impl ProgressThrottle {
    /// Creates a throttle that fires every `delta` bytes.
    ///
    /// A `delta` of 0 fires on every call.
    pub fn new(delta: u64) -> Self {
        Self {
            total: 0,
            last_notified: 0,
            delta,
        }
    }

    /// Records `n` more bytes. Returns the running total when a
    /// notification is due.
    pub fn advance(&mut self, n: usize) -> Option<u64> {
        self.total += n as u64;
        if self.total - self.last_notified >= self.delta {
            self.last_notified = self.total;
            Some(self.total)
        } else {
            None
        }
    }

    /// Bytes recorded so far.
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(PROGRESS_NOTIFY_DELTA)
    }
}
