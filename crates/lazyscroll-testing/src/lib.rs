//! Testing utilities and harness for lazyscroll

pub mod assertions;
pub mod recorder;
pub mod scene;

pub use assertions::{assert_approx_eq, assert_events, assert_span_approx_eq};
pub use recorder::CallbackRecorder;
pub use scene::{ChildView, RecordingSurface, ScrollCommand, TestScene, FRAME_MS};

/// Routes `log` output to the test harness. Safe to call from every test.
#[cfg(feature = "logging")]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[cfg(not(feature = "logging"))]
pub fn init_logging() {}

pub mod prelude {
    pub use crate::assertions::*;
    pub use crate::recorder::CallbackRecorder;
    pub use crate::scene::{ChildView, ScrollCommand, TestScene};
    pub use crate::init_logging;
}
