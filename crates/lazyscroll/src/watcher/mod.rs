//! Per-child visibility tracking.
//!
//! A [`VisibilityWatcher`] subscribes to a tracker, measures its child on
//! every geometry change and runs two independent latches over the result:
//! the scroll threshold ([`EnteringState`]) and percent visibility
//! ([`VisibilityState`]). Callbacks are queued on the runtime's UI queue
//! and run after evaluation has released the watcher state.

mod entering;
mod gate;
mod standalone;
mod visibility;

pub use entering::{EnteringState, Transition};
pub use gate::{MeasureGate, MeasureOutcome, MAX_MEASURE_ATTEMPTS};
pub use standalone::StandaloneFallback;
pub use visibility::{is_visible, VisibilityState, VisibilityStep};

use crate::callbacks::{CallbackHolder, WatcherCallbacks};
use crate::debug::{debug_trace, WATCHER_TAG};
use crate::measure::ViewMeasurer;
use crate::options::WatcherOptions;
use crate::tracker::{PublishedState, TrackerHandle, TrackerSubscription};
use crate::ConfigError;
use lazyscroll_geometry::{MainAxisSpan, Size};
use lazyscroll_runtime::{FrameCallbackRegistration, RuntimeHandle, TimerRegistration};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

struct WatcherState {
    gate: MeasureGate,
    entering: EnteringState,
    visibility: VisibilityState,
    last_span: Option<MainAxisSpan>,
}

enum CountdownChange {
    Start(u64),
    Cancel,
}

struct WatcherInner {
    runtime: RuntimeHandle,
    tracker: TrackerHandle,
    view: Rc<dyn ViewMeasurer>,
    callbacks: WatcherCallbacks,
    options: WatcherOptions,
    state: RefCell<WatcherState>,
    subscription: RefCell<Option<TrackerSubscription>>,
    layout_frame: RefCell<Option<FrameCallbackRegistration>>,
    remeasure_frame: RefCell<Option<FrameCallbackRegistration>>,
    countdown: RefCell<Option<TimerRegistration>>,
    unmounted: Cell<bool>,
}

impl WatcherInner {
    fn debug(&self) -> bool {
        self.options.debug
    }

    fn on_layout(self: &Rc<Self>, size: Size) {
        if self.unmounted.get() {
            return;
        }
        let await_frame = self.state.borrow_mut().gate.on_layout(size);
        debug_trace!(self.debug(), WATCHER_TAG, "layout: {size:?}");
        if !await_frame {
            let cancelled = self.layout_frame.borrow_mut().take();
            drop(cancelled);
            self.abandon_countdown();
            return;
        }
        let weak = Rc::downgrade(self);
        let registration = self.runtime.frame_clock().with_frame_nanos(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.complete_layout();
            }
        });
        let previous = self.layout_frame.borrow_mut().replace(registration);
        drop(previous);
    }

    fn complete_layout(self: &Rc<Self>) {
        let finished = self.layout_frame.borrow_mut().take();
        drop(finished);
        let completed = self.state.borrow_mut().gate.complete_layout();
        if completed {
            self.evaluate();
        }
    }

    fn should_measure(&self, geometry: &PublishedState) -> Option<(bool, bool)> {
        let state = self.state.borrow();
        let entering = state.entering.needs_measurement();
        let visibility = state.visibility.needs_measurement();
        debug_trace!(
            self.debug(),
            WATCHER_TAG,
            "should measure: entering={entering} visibility={visibility} layout={}",
            state.gate.is_layout_complete()
        );
        if !(entering || visibility) || !state.gate.is_layout_complete() {
            return None;
        }
        if !geometry.measured {
            return None;
        }
        // Deep overscroll past the origin reports positions that are about
        // to snap back.
        if geometry.scroll_offset < -geometry.container_extent() {
            return None;
        }
        Some((entering, visibility))
    }

    fn evaluate(self: &Rc<Self>) {
        if self.unmounted.get() {
            return;
        }
        let Some(geometry) = self.tracker.state() else {
            self.abandon_countdown();
            return;
        };
        let Some((measure_entering, measure_visibility)) = self.should_measure(&geometry) else {
            self.abandon_countdown();
            return;
        };

        let measurement = self.view.measure_in_window();
        let mut fired: SmallVec<[CallbackHolder; 4]> = SmallVec::new();
        let mut countdown_change = None;
        let outcome = {
            let mut state = self.state.borrow_mut();
            let outcome = state.gate.accept(measurement, geometry.orientation);
            if let MeasureOutcome::Ready(span) = outcome {
                state.last_span = Some(span);
                debug_trace!(
                    self.debug(),
                    WATCHER_TAG,
                    "measurement: start={} end={}",
                    span.start,
                    span.end()
                );

                if measure_entering {
                    let is_entering = geometry.reached_end
                        || span.overlaps(geometry.start_trigger, geometry.end_trigger);
                    debug_trace!(self.debug(), WATCHER_TAG, "is entering: {is_entering}");
                    let callback = match state.entering.update(is_entering) {
                        Some(Transition::Enter) => self.callbacks.on_enter_threshold_pass.as_ref(),
                        Some(Transition::Exit) => self.callbacks.on_exit_threshold_pass.as_ref(),
                        None => None,
                    };
                    fired.extend(callback.cloned());
                }

                if measure_visibility {
                    let visible = is_visible(
                        span,
                        geometry.container_start,
                        geometry.container_end,
                        state.visibility.threshold(),
                    );
                    debug_trace!(self.debug(), WATCHER_TAG, "is visible: {visible}");
                    match state.visibility.update(visible) {
                        VisibilityStep::Enter => {
                            fired.extend(self.callbacks.on_visibility_enter.clone())
                        }
                        VisibilityStep::Exit => {
                            fired.extend(self.callbacks.on_visibility_exit.clone())
                        }
                        VisibilityStep::StartCountdown(ms) => {
                            countdown_change = Some(CountdownChange::Start(ms))
                        }
                        VisibilityStep::CancelCountdown => {
                            countdown_change = Some(CountdownChange::Cancel)
                        }
                        VisibilityStep::Idle => {}
                    }
                }
            }
            outcome
        };

        match outcome {
            MeasureOutcome::Ready(_) => {}
            MeasureOutcome::Retry => self.request_remeasure(),
            MeasureOutcome::GaveUp => {
                log::warn!(
                    "{WATCHER_TAG} no usable measurement after {MAX_MEASURE_ATTEMPTS} frames; \
                     waiting for the next scroll or layout"
                );
                self.abandon_countdown();
            }
            MeasureOutcome::Skip => self.abandon_countdown(),
        }
        match countdown_change {
            Some(CountdownChange::Start(ms)) => self.start_countdown(ms),
            Some(CountdownChange::Cancel) => self.stop_countdown(),
            None => {}
        }
        for callback in fired {
            callback.deliver(&self.runtime);
        }
    }

    fn request_remeasure(self: &Rc<Self>) {
        if self.remeasure_frame.borrow().is_some() {
            return;
        }
        let weak = Rc::downgrade(self);
        let registration = self.runtime.frame_clock().with_frame_nanos(move |_| {
            if let Some(inner) = weak.upgrade() {
                let finished = inner.remeasure_frame.borrow_mut().take();
                drop(finished);
                inner.evaluate();
            }
        });
        *self.remeasure_frame.borrow_mut() = Some(registration);
    }

    fn start_countdown(self: &Rc<Self>, millis: u64) {
        let weak: Weak<WatcherInner> = Rc::downgrade(self);
        let registration = self.runtime.frame_clock().after_millis(millis, move || {
            if let Some(inner) = weak.upgrade() {
                let finished = inner.countdown.borrow_mut().take();
                drop(finished);
                inner.state.borrow_mut().visibility.countdown_elapsed();
                inner.evaluate();
            }
        });
        let previous = self.countdown.borrow_mut().replace(registration);
        drop(previous);
    }

    /// Visibility could not be checked, so a pending minimum-duration wait
    /// starts over the next time the child is seen.
    fn abandon_countdown(&self) {
        let had_countdown = self.state.borrow_mut().visibility.reset_countdown();
        if had_countdown {
            debug_trace!(self.debug(), WATCHER_TAG, "countdown abandoned");
        }
        self.stop_countdown();
    }

    fn stop_countdown(&self) {
        let cancelled = self.countdown.borrow_mut().take();
        drop(cancelled);
    }

    fn unmount(&self) {
        if self.unmounted.replace(true) {
            return;
        }
        let subscription = self.subscription.borrow_mut().take();
        let layout_frame = self.layout_frame.borrow_mut().take();
        let remeasure_frame = self.remeasure_frame.borrow_mut().take();
        let countdown = self.countdown.borrow_mut().take();
        drop((subscription, layout_frame, remeasure_frame, countdown));
    }
}

/// Watches one child of a [`ScrollTracker`](crate::ScrollTracker).
///
/// Nothing is measured until the host reports a non-zero layout through
/// [`on_layout`](Self::on_layout). Dropping the watcher unmounts it and
/// cancels any pending countdown.
pub struct VisibilityWatcher {
    inner: Rc<WatcherInner>,
}

impl VisibilityWatcher {
    pub fn mount(
        tracker: &TrackerHandle,
        view: Rc<dyn ViewMeasurer>,
        callbacks: WatcherCallbacks,
        options: WatcherOptions,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        let state = WatcherState {
            gate: MeasureGate::new(options.ignore_zero_measurement),
            entering: EnteringState::new(
                callbacks.on_enter_threshold_pass.is_some(),
                callbacks.on_exit_threshold_pass.is_some(),
            ),
            visibility: VisibilityState::new(
                callbacks.on_visibility_enter.is_some(),
                callbacks.on_visibility_exit.is_some(),
                options.percent_visible_threshold,
                options.minimum_visibility_ms,
            ),
            last_span: None,
        };
        let inner = Rc::new(WatcherInner {
            runtime: tracker.runtime(),
            tracker: tracker.clone(),
            view,
            callbacks,
            options,
            state: RefCell::new(state),
            subscription: RefCell::new(None),
            layout_frame: RefCell::new(None),
            remeasure_frame: RefCell::new(None),
            countdown: RefCell::new(None),
            unmounted: Cell::new(false),
        });

        if tracker.is_unmounted() {
            log::warn!("{WATCHER_TAG} mounted under an unmounted tracker; it will never fire");
        } else {
            let weak = Rc::downgrade(&inner);
            let subscription = tracker.subscribe(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.evaluate();
                }
            });
            *inner.subscription.borrow_mut() = Some(subscription);
        }
        Ok(Self { inner })
    }

    /// Reports the child's laid-out size. A non-zero size opens the
    /// measurement gate on the next frame; a zero size closes it.
    pub fn on_layout(&self, size: Size) {
        self.inner.on_layout(size);
    }

    /// Measures and evaluates now, then runs any callbacks that fired.
    pub fn evaluate(&self) {
        self.inner.evaluate();
        self.inner.runtime.drain_ui();
    }

    pub fn unmount(&self) {
        self.inner.unmount();
    }

    pub fn is_unmounted(&self) -> bool {
        self.inner.unmounted.get()
    }

    pub fn is_layout_complete(&self) -> bool {
        self.inner.state.borrow().gate.is_layout_complete()
    }

    pub fn has_entered_threshold(&self) -> bool {
        self.inner.state.borrow().entering.has_entered()
    }

    pub fn is_visibility_entered(&self) -> bool {
        self.inner.state.borrow().visibility.has_entered()
    }

    pub fn countdown_pending(&self) -> bool {
        self.inner.countdown.borrow().is_some()
    }

    /// Last accepted measurement along the tracker's primary axis.
    pub fn last_measurement(&self) -> Option<MainAxisSpan> {
        self.inner.state.borrow().last_span
    }

    pub fn options(&self) -> &WatcherOptions {
        &self.inner.options
    }
}

impl Drop for VisibilityWatcher {
    fn drop(&mut self) {
        self.inner.unmount();
    }
}

impl std::fmt::Debug for VisibilityWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityWatcher")
            .field("layout_complete", &self.is_layout_complete())
            .field("entered_threshold", &self.has_entered_threshold())
            .field("visibility_entered", &self.is_visibility_entered())
            .field("unmounted", &self.is_unmounted())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/watcher_tests.rs"]
mod tests;
