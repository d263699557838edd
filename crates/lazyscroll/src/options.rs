//! Configuration for trackers and watchers.

use crate::ConfigError;
use lazyscroll_geometry::Orientation;

/// Default interval between delivered scroll updates, one 60 Hz frame.
pub const DEFAULT_SCROLL_THROTTLE_MS: u64 = 16;

/// Configuration for a [`ScrollTracker`](crate::ScrollTracker).
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollTrackerOptions {
    /// How far past the container edges the threshold trigger sits.
    /// Negative moves the trigger inside the viewport, positive outside.
    pub offset: f32,
    pub orientation: Orientation,
    /// Minimum spacing between scroll updates reaching watchers.
    /// Zero forwards every update.
    pub scroll_throttle_ms: u64,
    /// Added to the measured container position along the scroll axis,
    /// for hosts whose window measurement excludes a status bar or similar.
    pub position_adjustment: f32,
    /// Emit measurement traces through `log` in debug builds.
    pub debug: bool,
}

impl Default for ScrollTrackerOptions {
    fn default() -> Self {
        Self {
            offset: 0.0,
            orientation: Orientation::Vertical,
            scroll_throttle_ms: DEFAULT_SCROLL_THROTTLE_MS,
            position_adjustment: 0.0,
            debug: false,
        }
    }
}

impl ScrollTrackerOptions {
    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn horizontal(self) -> Self {
        self.with_orientation(Orientation::Horizontal)
    }

    pub fn with_scroll_throttle_ms(mut self, interval: u64) -> Self {
        self.scroll_throttle_ms = interval;
        self
    }

    pub fn with_position_adjustment(mut self, adjustment: f32) -> Self {
        self.position_adjustment = adjustment;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !self.offset.is_finite() {
            return Err(ConfigError::TriggerOffset { value: self.offset });
        }
        if !self.position_adjustment.is_finite() {
            return Err(ConfigError::PositionAdjustment {
                value: self.position_adjustment,
            });
        }
        Ok(())
    }
}

/// Configuration for a [`VisibilityWatcher`](crate::VisibilityWatcher).
#[derive(Clone, Debug, PartialEq)]
pub struct WatcherOptions {
    /// Fraction of the child's extent that must be inside the viewport
    /// before it counts as visible. Valid range is `(0, 1]`.
    pub percent_visible_threshold: f32,
    /// Treat a measurement exactly at the origin as unconfirmed until a
    /// second measurement agrees.
    pub ignore_zero_measurement: bool,
    /// How long visibility must hold before `on_visibility_enter` fires.
    pub minimum_visibility_ms: Option<u64>,
    /// Emit measurement traces through `log` in debug builds.
    pub debug: bool,
}

impl Default for WatcherOptions {
    fn default() -> Self {
        Self {
            percent_visible_threshold: 1.0,
            ignore_zero_measurement: true,
            minimum_visibility_ms: None,
            debug: false,
        }
    }
}

impl WatcherOptions {
    pub fn with_percent_visible_threshold(mut self, threshold: f32) -> Self {
        self.percent_visible_threshold = threshold;
        self
    }

    pub fn with_ignore_zero_measurement(mut self, ignore: bool) -> Self {
        self.ignore_zero_measurement = ignore;
        self
    }

    pub fn with_minimum_visibility_ms(mut self, millis: u64) -> Self {
        self.minimum_visibility_ms = Some(millis);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.percent_visible_threshold;
        // NaN fails both comparisons, so it lands here too.
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::PercentVisibleThreshold { value: threshold });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let tracker = ScrollTrackerOptions::default();
        assert_eq!(tracker.offset, 0.0);
        assert_eq!(tracker.orientation, Orientation::Vertical);
        assert_eq!(tracker.scroll_throttle_ms, 16);

        let watcher = WatcherOptions::default();
        assert_eq!(watcher.percent_visible_threshold, 1.0);
        assert!(watcher.ignore_zero_measurement);
        assert_eq!(watcher.minimum_visibility_ms, None);
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        for value in [0.0, -0.5, 1.01, f32::NAN] {
            let options = WatcherOptions::default().with_percent_visible_threshold(value);
            assert!(options.validate().is_err(), "{value} should be rejected");
        }
        for value in [0.01, 0.5, 1.0] {
            let options = WatcherOptions::default().with_percent_visible_threshold(value);
            assert!(options.validate().is_ok(), "{value} should be accepted");
        }
    }

    #[test]
    fn non_finite_offset_is_rejected() {
        let options = ScrollTrackerOptions::default().with_offset(f32::INFINITY);
        assert_eq!(
            options.validate(),
            Err(ConfigError::TriggerOffset {
                value: f32::INFINITY
            })
        );
    }
}
