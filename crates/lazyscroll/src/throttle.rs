//! Rate limiting for scroll offset updates.

/// Passes at most one scroll value per interval through to watchers.
///
/// A value that arrives inside the interval is held as pending and handed
/// out by [`flush`](Self::flush) once the interval has passed, so the last
/// position of a gesture always reaches the watchers.
#[derive(Debug, Clone)]
pub struct ScrollThrottle {
    interval_ms: u64,
    last_emit: Option<u64>,
    pending: Option<f32>,
}

impl ScrollThrottle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_emit: None,
            pending: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Offers a new value at time `now`. Returns the value to publish now,
    /// or `None` if it was held back.
    pub fn offer(&mut self, value: f32, now: u64) -> Option<f32> {
        if self.is_open(now) {
            self.last_emit = Some(now);
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Releases the held value if the interval has passed.
    pub fn flush(&mut self, now: u64) -> Option<f32> {
        if self.pending.is_none() || !self.is_open(now) {
            return None;
        }
        self.last_emit = Some(now);
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Milliseconds until a pending value may be flushed.
    pub fn remaining_ms(&self, now: u64) -> u64 {
        match self.last_emit {
            Some(last) => (last + self.interval_ms).saturating_sub(now),
            None => 0,
        }
    }

    fn is_open(&self, now: u64) -> bool {
        match self.last_emit {
            Some(last) => now.saturating_sub(last) >= self.interval_ms,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_passes_immediately() {
        let mut throttle = ScrollThrottle::new(16);
        assert_eq!(throttle.offer(10.0, 0), Some(10.0));
    }

    #[test]
    fn values_inside_interval_keep_only_latest() {
        let mut throttle = ScrollThrottle::new(16);
        assert_eq!(throttle.offer(1.0, 100), Some(1.0));
        assert_eq!(throttle.offer(2.0, 104), None);
        assert_eq!(throttle.offer(3.0, 110), None);
        assert!(throttle.has_pending());
        assert_eq!(throttle.remaining_ms(110), 6);

        assert_eq!(throttle.flush(112), None);
        assert_eq!(throttle.flush(116), Some(3.0));
        assert!(!throttle.has_pending());
        assert_eq!(throttle.flush(200), None);
    }

    #[test]
    fn zero_interval_forwards_everything() {
        let mut throttle = ScrollThrottle::new(0);
        assert_eq!(throttle.offer(1.0, 5), Some(1.0));
        assert_eq!(throttle.offer(2.0, 5), Some(2.0));
        assert!(!throttle.has_pending());
    }

    #[test]
    fn emitting_clears_stale_pending_value() {
        let mut throttle = ScrollThrottle::new(16);
        throttle.offer(1.0, 0);
        throttle.offer(2.0, 4);
        assert_eq!(throttle.offer(3.0, 20), Some(3.0));
        assert_eq!(throttle.flush(100), None);
    }
}
