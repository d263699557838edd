//! Percent-visible latch with optional minimum-duration gating.

use lazyscroll_geometry::MainAxisSpan;

/// Whether at least `threshold` of `span` lies between the container edges.
///
/// A non-positive enter trigger means the container edges are not usable
/// (unmeasured or degenerate), which never counts as visible.
pub fn is_visible(span: MainAxisSpan, container_start: f32, container_end: f32, threshold: f32) -> bool {
    let visible_size = span.extent * threshold;
    let enter_trigger = container_end - visible_size;
    let exit_trigger = container_start + visible_size;
    if enter_trigger <= 0.0 {
        return false;
    }
    span.start < enter_trigger && span.end() > exit_trigger
}

/// Outcome of one visibility evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityStep {
    Idle,
    Enter,
    Exit,
    /// Visible, but the enter callback must wait this many milliseconds.
    StartCountdown(u64),
    /// Left the viewport before a running countdown finished.
    CancelCountdown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Countdown {
    Idle,
    Running,
    Elapsed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityState {
    armed_enter: bool,
    has_exit: bool,
    has_entered: bool,
    has_exited: bool,
    threshold: f32,
    minimum_visibility_ms: Option<u64>,
    countdown: Countdown,
}

impl VisibilityState {
    pub fn new(
        has_enter: bool,
        has_exit: bool,
        threshold: f32,
        minimum_visibility_ms: Option<u64>,
    ) -> Self {
        Self {
            armed_enter: has_enter,
            has_exit,
            has_entered: false,
            has_exited: false,
            threshold,
            minimum_visibility_ms: minimum_visibility_ms.filter(|ms| *ms > 0),
            countdown: Countdown::Idle,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn has_entered(&self) -> bool {
        self.has_entered
    }

    pub fn has_exited(&self) -> bool {
        self.has_exited
    }

    pub fn countdown_running(&self) -> bool {
        self.countdown == Countdown::Running
    }

    pub fn needs_measurement(&self) -> bool {
        self.armed_enter || (self.has_exit && self.has_entered)
    }

    /// Marks a running countdown as finished. The enter fires on the next
    /// evaluation if the child is still visible then.
    pub fn countdown_elapsed(&mut self) {
        if self.countdown == Countdown::Running {
            self.countdown = Countdown::Elapsed;
        }
    }

    /// Drops a running or elapsed countdown without firing. Returns `true`
    /// when there was one.
    pub fn reset_countdown(&mut self) -> bool {
        std::mem::replace(&mut self.countdown, Countdown::Idle) != Countdown::Idle
    }

    pub fn update(&mut self, visible: bool) -> VisibilityStep {
        if visible {
            if self.has_entered || !self.armed_enter {
                return VisibilityStep::Idle;
            }
            match (self.countdown, self.minimum_visibility_ms) {
                (Countdown::Running, _) => VisibilityStep::Idle,
                (Countdown::Idle, Some(ms)) => {
                    self.countdown = Countdown::Running;
                    VisibilityStep::StartCountdown(ms)
                }
                (Countdown::Idle, None) | (Countdown::Elapsed, _) => {
                    self.countdown = Countdown::Idle;
                    self.enter()
                }
            }
        } else if self.countdown != Countdown::Idle {
            self.countdown = Countdown::Idle;
            VisibilityStep::CancelCountdown
        } else if self.has_exit && self.has_entered && !self.has_exited {
            self.has_entered = false;
            self.has_exited = true;
            VisibilityStep::Exit
        } else {
            VisibilityStep::Idle
        }
    }

    fn enter(&mut self) -> VisibilityStep {
        self.has_entered = true;
        self.has_exited = false;
        if !self.has_exit {
            self.armed_enter = false;
        }
        VisibilityStep::Enter
    }
}
