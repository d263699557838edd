use crate::callbacks::WatcherCallbacks;
use crate::measure::ViewMeasurer;
use crate::options::WatcherOptions;
use crate::tracker::TrackerHandle;
use crate::watcher::{StandaloneFallback, VisibilityWatcher};
use crate::ConfigError;
use lazyscroll_geometry::Size;
use std::rc::Rc;

/// A child that reports threshold and visibility transitions.
///
/// The enclosing tracker is passed in explicitly. With a tracker the child
/// is watched as it scrolls; without one it falls back to firing its enter
/// callbacks once on mount.
#[derive(Debug)]
pub enum LazyChild {
    Tracked(VisibilityWatcher),
    Standalone(StandaloneFallback),
}

impl LazyChild {
    pub fn mount(
        tracker: Option<&TrackerHandle>,
        view: Rc<dyn ViewMeasurer>,
        callbacks: WatcherCallbacks,
        options: WatcherOptions,
    ) -> Result<Self, ConfigError> {
        match tracker {
            Some(tracker) => {
                VisibilityWatcher::mount(tracker, view, callbacks, options).map(LazyChild::Tracked)
            }
            None => {
                options.validate()?;
                Ok(LazyChild::Standalone(StandaloneFallback::mount(&callbacks)))
            }
        }
    }

    pub fn on_layout(&self, size: Size) {
        if let LazyChild::Tracked(watcher) = self {
            watcher.on_layout(size);
        }
    }

    pub fn is_standalone(&self) -> bool {
        matches!(self, LazyChild::Standalone(_))
    }

    pub fn watcher(&self) -> Option<&VisibilityWatcher> {
        match self {
            LazyChild::Tracked(watcher) => Some(watcher),
            LazyChild::Standalone(_) => None,
        }
    }
}
