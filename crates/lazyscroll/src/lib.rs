//! Scroll-threshold and percent-visibility callbacks for the children of a
//! scroll container.
//!
//! A [`ScrollTracker`] owns the container geometry. Each child mounts a
//! [`LazyChild`] with the tracker's [`TrackerHandle`]; the child's
//! [`VisibilityWatcher`] measures it on every geometry change and fires
//! `on_enter_threshold_pass` / `on_exit_threshold_pass` when it crosses the
//! trigger band, and `on_visibility_enter` / `on_visibility_exit` when the
//! configured fraction of it is inside the viewport.
//!
//! Everything runs on one thread, driven by the host through a
//! [`lazyscroll_runtime::RuntimeHandle`].

mod callbacks;
mod debug;
mod error;
mod lazy_child;
mod measure;
mod options;
mod throttle;
mod tracker;
pub mod watcher;

pub use callbacks::{CallbackHolder, WatcherCallbacks};
pub use error::ConfigError;
pub use lazy_child::LazyChild;
pub use measure::{NoopScrollSurface, ScrollSurface, ViewMeasurer};
pub use options::{ScrollTrackerOptions, WatcherOptions, DEFAULT_SCROLL_THROTTLE_MS};
pub use throttle::ScrollThrottle;
pub use tracker::{
    PublishedState, ScrollGeometry, ScrollTracker, TrackerHandle, TrackerSubscription,
    END_OF_CONTENT_TOLERANCE, MAX_POSITION_ATTEMPTS,
};
pub use watcher::{StandaloneFallback, VisibilityWatcher};

pub use lazyscroll_geometry::{MainAxisSpan, Orientation, Point, Rect, Size};

pub mod prelude {
    pub use crate::callbacks::WatcherCallbacks;
    pub use crate::lazy_child::LazyChild;
    pub use crate::measure::{ScrollSurface, ViewMeasurer};
    pub use crate::options::{ScrollTrackerOptions, WatcherOptions};
    pub use crate::tracker::{ScrollTracker, TrackerHandle};
    pub use crate::watcher::VisibilityWatcher;
    pub use lazyscroll_geometry::prelude::*;
}
