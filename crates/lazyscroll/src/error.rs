/// Rejected configuration, reported when a tracker or watcher is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// `percent_visible_threshold` must lie in `(0, 1]`.
    PercentVisibleThreshold { value: f32 },
    /// The tracker's trigger offset must be a finite number.
    TriggerOffset { value: f32 },
    /// The container position adjustment must be a finite number.
    PositionAdjustment { value: f32 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::PercentVisibleThreshold { value } => {
                write!(f, "percent visible threshold {value} is outside (0, 1]")
            }
            ConfigError::TriggerOffset { value } => {
                write!(f, "trigger offset {value} is not finite")
            }
            ConfigError::PositionAdjustment { value } => {
                write!(f, "position adjustment {value} is not finite")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
