/// Tag used in tracker traces.
pub(crate) const TRACKER_TAG: &str = "<LazyScrollView>";

/// Tag used in watcher traces.
pub(crate) const WATCHER_TAG: &str = "<LazyChild>";

/// Emits a `log::debug!` line when the component's `debug` option is set.
///
/// Compiled out of release builds.
macro_rules! debug_trace {
    ($enabled:expr, $tag:expr, $($arg:tt)+) => {
        if cfg!(debug_assertions) && $enabled {
            log::debug!(target: "lazyscroll", "{} {}", $tag, format_args!($($arg)+));
        }
    };
}

pub(crate) use debug_trace;
