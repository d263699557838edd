//! Decides when a child's measurement can be trusted.

use lazyscroll_geometry::{MainAxisSpan, Orientation, Rect, Size};

/// Consecutive frames a watcher re-measures after an unusable measurement
/// before it waits for the next tracker event instead.
pub const MAX_MEASURE_ATTEMPTS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeasureOutcome {
    Ready(MainAxisSpan),
    /// Unusable for now; measure again on the next frame.
    Retry,
    /// Unusable, and this attempt spent the last of the retry budget.
    GaveUp,
    /// Still unusable after the budget ran out. Nothing is rescheduled.
    Skip,
}

#[derive(Clone, Debug, Default)]
pub struct MeasureGate {
    layout_pending: bool,
    layout_complete: bool,
    ignore_zero: bool,
    zero_pending: bool,
    attempts: u32,
    exhausted: bool,
}

impl MeasureGate {
    pub fn new(ignore_zero: bool) -> Self {
        Self {
            ignore_zero,
            ..Self::default()
        }
    }

    pub fn is_layout_complete(&self) -> bool {
        self.layout_complete
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Records a layout pass. Returns `true` when the caller should complete
    /// the layout on the next frame; a collapsed size closes the gate.
    pub fn on_layout(&mut self, size: Size) -> bool {
        self.reset_attempts();
        self.zero_pending = false;
        if size.is_zero() {
            self.layout_pending = false;
            self.layout_complete = false;
            return false;
        }
        self.layout_pending = true;
        true
    }

    pub fn complete_layout(&mut self) -> bool {
        if !self.layout_pending {
            return false;
        }
        self.layout_pending = false;
        self.layout_complete = true;
        true
    }

    pub fn accept(&mut self, measurement: Option<Rect>, orientation: Orientation) -> MeasureOutcome {
        let span = measurement
            .filter(|rect| !rect.size().is_zero())
            .map(|rect| rect.main_axis_span(orientation))
            .filter(|span| !span.is_empty());

        let Some(span) = span else {
            return self.retry();
        };

        if self.ignore_zero && span.start == 0.0 && !self.zero_pending {
            self.zero_pending = true;
            return self.retry();
        }

        self.zero_pending = false;
        self.reset_attempts();
        MeasureOutcome::Ready(span)
    }

    fn reset_attempts(&mut self) {
        self.attempts = 0;
        self.exhausted = false;
    }

    // An exhausted gate stays exhausted until a usable measurement or a new
    // layout; later tracker events measure once each and are skipped.
    fn retry(&mut self) -> MeasureOutcome {
        if self.exhausted {
            return MeasureOutcome::Skip;
        }
        if self.attempts >= MAX_MEASURE_ATTEMPTS {
            self.exhausted = true;
            return MeasureOutcome::GaveUp;
        }
        self.attempts += 1;
        MeasureOutcome::Retry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_gate(ignore_zero: bool) -> MeasureGate {
        let mut gate = MeasureGate::new(ignore_zero);
        assert!(gate.on_layout(Size::new(100.0, 400.0)));
        assert!(gate.complete_layout());
        gate
    }

    #[test]
    fn layout_completes_only_after_non_zero_pass() {
        let mut gate = MeasureGate::new(true);
        assert!(!gate.complete_layout());
        assert!(!gate.on_layout(Size::ZERO));
        assert!(!gate.is_layout_complete());

        assert!(gate.on_layout(Size::new(0.0, 10.0)));
        assert!(!gate.is_layout_complete());
        assert!(gate.complete_layout());
        assert!(gate.is_layout_complete());

        gate.on_layout(Size::ZERO);
        assert!(!gate.is_layout_complete());
    }

    #[test]
    fn zero_size_measurement_is_retried() {
        let mut gate = ready_gate(false);
        assert_eq!(
            gate.accept(Some(Rect::new(0.0, 50.0, 0.0, 0.0)), Orientation::Vertical),
            MeasureOutcome::Retry
        );
        assert_eq!(gate.accept(None, Orientation::Vertical), MeasureOutcome::Retry);
        assert_eq!(gate.attempts(), 2);
    }

    #[test]
    fn zero_extent_on_primary_axis_is_not_a_measurement() {
        let mut gate = ready_gate(false);
        assert_eq!(
            gate.accept(Some(Rect::new(0.0, 50.0, 100.0, 0.0)), Orientation::Vertical),
            MeasureOutcome::Retry
        );
    }

    #[test]
    fn origin_measurement_needs_confirmation() {
        let mut gate = ready_gate(true);
        let at_origin = Some(Rect::new(0.0, 0.0, 100.0, 400.0));
        assert_eq!(gate.accept(at_origin, Orientation::Vertical), MeasureOutcome::Retry);
        assert_eq!(
            gate.accept(at_origin, Orientation::Vertical),
            MeasureOutcome::Ready(MainAxisSpan::new(0.0, 400.0))
        );
    }

    #[test]
    fn origin_measurement_trusted_when_not_ignoring_zero() {
        let mut gate = ready_gate(false);
        assert_eq!(
            gate.accept(Some(Rect::new(0.0, 0.0, 100.0, 400.0)), Orientation::Vertical),
            MeasureOutcome::Ready(MainAxisSpan::new(0.0, 400.0))
        );
    }

    #[test]
    fn moved_measurement_clears_pending_origin() {
        let mut gate = ready_gate(true);
        gate.accept(Some(Rect::new(0.0, 0.0, 100.0, 400.0)), Orientation::Vertical);
        assert_eq!(
            gate.accept(Some(Rect::new(0.0, 30.0, 100.0, 400.0)), Orientation::Vertical),
            MeasureOutcome::Ready(MainAxisSpan::new(30.0, 400.0))
        );
        assert_eq!(
            gate.accept(Some(Rect::new(0.0, 0.0, 100.0, 400.0)), Orientation::Vertical),
            MeasureOutcome::Retry
        );
    }

    #[test]
    fn retries_are_bounded() {
        let mut gate = ready_gate(true);
        for _ in 0..MAX_MEASURE_ATTEMPTS {
            assert_eq!(gate.accept(None, Orientation::Vertical), MeasureOutcome::Retry);
        }
        assert_eq!(gate.accept(None, Orientation::Vertical), MeasureOutcome::GaveUp);
        assert_eq!(gate.accept(None, Orientation::Vertical), MeasureOutcome::Skip);
        assert_eq!(gate.accept(None, Orientation::Vertical), MeasureOutcome::Skip);

        gate.on_layout(Size::new(100.0, 400.0));
        assert_eq!(gate.accept(None, Orientation::Vertical), MeasureOutcome::Retry);
    }

    #[test]
    fn usable_measurement_restores_the_retry_budget() {
        let mut gate = ready_gate(false);
        for _ in 0..MAX_MEASURE_ATTEMPTS {
            gate.accept(None, Orientation::Vertical);
        }
        assert_eq!(gate.accept(None, Orientation::Vertical), MeasureOutcome::GaveUp);
        assert_eq!(
            gate.accept(Some(Rect::new(0.0, 40.0, 100.0, 400.0)), Orientation::Vertical),
            MeasureOutcome::Ready(MainAxisSpan::new(40.0, 400.0))
        );
        assert_eq!(gate.attempts(), 0);
        assert_eq!(gate.accept(None, Orientation::Vertical), MeasureOutcome::Retry);
    }

    #[test]
    fn horizontal_uses_x_axis() {
        let mut gate = ready_gate(false);
        assert_eq!(
            gate.accept(Some(Rect::new(120.0, 0.0, 80.0, 40.0)), Orientation::Horizontal),
            MeasureOutcome::Ready(MainAxisSpan::new(120.0, 80.0))
        );
    }
}
