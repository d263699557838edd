//! Platform abstraction traits for runtime services.
//!
//! These traits let the host platform own frame scheduling and time, so the
//! tracker and watchers never reach for a global clock or event loop.

use std::sync::atomic::{AtomicU64, Ordering};
use web_time::Instant;

/// Schedules work for the runtime.
///
/// Implementations are responsible for making the host call
/// [`RuntimeHandle::drain_frame_callbacks`](crate::RuntimeHandle::drain_frame_callbacks)
/// soon after a request.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Provides timing information for the runtime.
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since an arbitrary, fixed origin.
    fn now_millis(&self) -> u64;
}

/// Scheduler for hosts that pump frames on their own cadence.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScheduler;

impl RuntimeScheduler for NoopScheduler {
    fn schedule_frame(&self) {}
}

/// Wall clock backed by `web_time::Instant`, measured from construction.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock whose time only moves when told to.
///
/// Useful for hosts that drive the runtime from recorded frame timestamps.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: AtomicU64::new(start_millis),
        }
    }

    pub fn set_millis(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance_millis(&self, delta: u64) {
        self.now.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
