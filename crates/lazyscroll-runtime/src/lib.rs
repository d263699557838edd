//! Single-threaded runtime services for lazyscroll
//!
//! Frame callbacks, countdown timers and a UI task queue, driven by a host
//! that calls [`RuntimeHandle::drain_frame_callbacks`] once per frame.

pub mod collections;
mod frame_clock;
mod platform;
mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock, TimerRegistration};
pub use platform::{Clock, ManualClock, NoopScheduler, RuntimeScheduler, SystemClock};
pub use runtime::{Runtime, RuntimeHandle};

pub type FrameCallbackId = u64;
pub type TimerId = u64;

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
