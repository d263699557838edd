//! The scroll container side: geometry ownership and publication.

use crate::debug::{debug_trace, TRACKER_TAG};
use crate::measure::{ScrollSurface, ViewMeasurer};
use crate::options::ScrollTrackerOptions;
use crate::throttle::ScrollThrottle;
use crate::ConfigError;
use lazyscroll_geometry::{MainAxisSpan, Orientation, Size};
use lazyscroll_runtime::collections::map::IdMap;
use lazyscroll_runtime::{FrameCallbackRegistration, RuntimeHandle, TimerRegistration};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Frames spent waiting for the host to report the container position
/// before giving up until the next layout.
pub const MAX_POSITION_ATTEMPTS: u32 = 5;

/// Remaining scroll distance under which the content counts as scrolled to
/// the end. Absorbs sub-pixel rounding in hosts that report fractional
/// offsets.
pub const END_OF_CONTENT_TOLERANCE: f32 = 1.0;

/// Geometry of the scroll container along its primary axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollGeometry {
    pub scroll_offset: f32,
    /// Visible edges of the viewport in window space. `None` until the
    /// first layout has been measured.
    pub container: Option<MainAxisSpan>,
    pub content_extent: f32,
    pub trigger_offset: f32,
    pub orientation: Orientation,
}

impl ScrollGeometry {
    pub fn new(trigger_offset: f32, orientation: Orientation) -> Self {
        Self {
            scroll_offset: 0.0,
            container: None,
            content_extent: 0.0,
            trigger_offset,
            orientation,
        }
    }

    pub fn is_measured(&self) -> bool {
        self.container.is_some()
    }

    pub fn container_start(&self) -> f32 {
        self.container.map(|span| span.start).unwrap_or(0.0)
    }

    pub fn container_end(&self) -> f32 {
        self.container.map(|span| span.end()).unwrap_or(0.0)
    }

    pub fn start_trigger(&self) -> f32 {
        self.container_start() - self.trigger_offset
    }

    pub fn end_trigger(&self) -> f32 {
        self.container_end() + self.trigger_offset
    }

    /// Scroll distance left before the end of the content.
    pub fn distance_from_end(&self) -> Option<f32> {
        let container = self.container?;
        Some(self.content_extent - self.scroll_offset - container.extent)
    }

    /// True while the viewport sits at the end of non-empty content.
    pub fn reached_end(&self) -> bool {
        if self.content_extent <= 0.0 {
            return false;
        }
        self.distance_from_end()
            .map(|distance| distance <= END_OF_CONTENT_TOLERANCE)
            .unwrap_or(false)
    }
}

/// Snapshot of the tracker geometry handed to watchers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PublishedState {
    pub scroll_offset: f32,
    pub container_start: f32,
    pub container_end: f32,
    pub start_trigger: f32,
    pub end_trigger: f32,
    pub orientation: Orientation,
    pub has_provider: bool,
    pub reached_end: bool,
    pub measured: bool,
}

impl PublishedState {
    pub fn container_extent(&self) -> f32 {
        self.container_end - self.container_start
    }
}

impl From<&ScrollGeometry> for PublishedState {
    fn from(geometry: &ScrollGeometry) -> Self {
        Self {
            scroll_offset: geometry.scroll_offset,
            container_start: geometry.container_start(),
            container_end: geometry.container_end(),
            start_trigger: geometry.start_trigger(),
            end_trigger: geometry.end_trigger(),
            orientation: geometry.orientation,
            has_provider: true,
            reached_end: geometry.reached_end(),
            measured: geometry.is_measured(),
        }
    }
}

type Subscriber = Rc<dyn Fn()>;

struct TrackerShared {
    runtime: RuntimeHandle,
    options: ScrollTrackerOptions,
    container_view: Rc<dyn ViewMeasurer>,
    geometry: RefCell<ScrollGeometry>,
    pending_size: Cell<Option<Size>>,
    position_request: RefCell<Option<FrameCallbackRegistration>>,
    position_attempts: Cell<u32>,
    throttle: RefCell<ScrollThrottle>,
    trailing_flush: RefCell<Option<TimerRegistration>>,
    subscribers: RefCell<IdMap<Subscriber>>,
    next_subscriber_id: Cell<u64>,
    unmounted: Cell<bool>,
}

impl TrackerShared {
    fn debug(&self) -> bool {
        self.options.debug
    }

    fn request_position(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let registration = self.runtime.frame_clock().with_frame_nanos(move |_| {
            if let Some(shared) = weak.upgrade() {
                shared.measure_position();
            }
        });
        let previous = self.position_request.borrow_mut().replace(registration);
        drop(previous);
    }

    fn measure_position(self: &Rc<Self>) {
        let finished = self.position_request.borrow_mut().take();
        drop(finished);
        if self.unmounted.get() {
            return;
        }
        let Some(size) = self.pending_size.get() else {
            return;
        };
        let orientation = self.options.orientation;
        let measured = self
            .container_view
            .measure_in_window()
            .filter(|rect| !rect.size().is_zero());

        let Some(rect) = measured else {
            let attempts = self.position_attempts.get() + 1;
            self.position_attempts.set(attempts);
            if attempts < MAX_POSITION_ATTEMPTS {
                self.request_position();
            } else {
                log::warn!(
                    "{TRACKER_TAG} container position unavailable after {attempts} frames; \
                     waiting for the next layout"
                );
            }
            return;
        };

        self.position_attempts.set(0);
        self.pending_size.set(None);
        let start = rect.origin().along(orientation) + self.options.position_adjustment;
        let span = MainAxisSpan::new(start, size.along(orientation));
        debug_trace!(
            self.debug(),
            TRACKER_TAG,
            "coordinates: start={} end={}",
            span.start,
            span.end()
        );
        let changed = {
            let mut geometry = self.geometry.borrow_mut();
            let changed = geometry.container != Some(span);
            geometry.container = Some(span);
            changed
        };
        if changed {
            self.notify();
        }
    }

    fn apply_scroll(&self, offset: f32) {
        let changed = {
            let mut geometry = self.geometry.borrow_mut();
            let changed = geometry.scroll_offset != offset;
            geometry.scroll_offset = offset;
            changed
        };
        if changed {
            self.notify();
        }
    }

    fn schedule_trailing_flush(self: &Rc<Self>) {
        if self.trailing_flush.borrow().is_some() {
            return;
        }
        let delay = self.throttle.borrow().remaining_ms(self.runtime.now_millis());
        let weak = Rc::downgrade(self);
        let registration = self.runtime.frame_clock().after_millis(delay, move || {
            if let Some(shared) = weak.upgrade() {
                shared.flush_trailing();
            }
        });
        *self.trailing_flush.borrow_mut() = Some(registration);
    }

    fn flush_trailing(self: &Rc<Self>) {
        let finished = self.trailing_flush.borrow_mut().take();
        drop(finished);
        if self.unmounted.get() {
            return;
        }
        let now = self.runtime.now_millis();
        let flushed = self.throttle.borrow_mut().flush(now);
        match flushed {
            Some(offset) => self.apply_scroll(offset),
            None => {
                if self.throttle.borrow().has_pending() {
                    self.schedule_trailing_flush();
                }
            }
        }
    }

    /// Calls every subscriber in subscription order, then drains the
    /// callbacks they queued.
    fn notify(&self) {
        let mut subscribers: Vec<(u64, Subscriber)> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(id, subscriber)| (*id, Rc::clone(subscriber)))
            .collect();
        subscribers.sort_by_key(|(id, _)| *id);
        for (_, subscriber) in subscribers {
            if self.unmounted.get() {
                break;
            }
            subscriber();
        }
        self.runtime.drain_ui();
    }

    fn subscribe(&self, subscriber: Subscriber) -> u64 {
        let id = self.next_subscriber_id.get();
        self.next_subscriber_id.set(id + 1);
        self.subscribers.borrow_mut().insert(id, subscriber);
        id
    }

    fn unmount(&self) {
        if self.unmounted.replace(true) {
            return;
        }
        let position_request = self.position_request.borrow_mut().take();
        let trailing_flush = self.trailing_flush.borrow_mut().take();
        drop(position_request);
        drop(trailing_flush);
        let subscribers = std::mem::take(&mut *self.subscribers.borrow_mut());
        drop(subscribers);
    }
}

/// Owns the geometry of one scroll container and publishes it to the
/// watchers registered through its [`TrackerHandle`].
///
/// The host forwards three kinds of events: container layout, scroll offset
/// and content size. Dropping the tracker unmounts it.
pub struct ScrollTracker {
    shared: Rc<TrackerShared>,
    surface: Rc<dyn ScrollSurface>,
}

impl ScrollTracker {
    pub fn new(
        runtime: RuntimeHandle,
        container_view: Rc<dyn ViewMeasurer>,
        surface: Rc<dyn ScrollSurface>,
        options: ScrollTrackerOptions,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        let geometry = ScrollGeometry::new(options.offset, options.orientation);
        let throttle = ScrollThrottle::new(options.scroll_throttle_ms);
        Ok(Self {
            shared: Rc::new(TrackerShared {
                runtime,
                options,
                container_view,
                geometry: RefCell::new(geometry),
                pending_size: Cell::new(None),
                position_request: RefCell::new(None),
                position_attempts: Cell::new(0),
                throttle: RefCell::new(throttle),
                trailing_flush: RefCell::new(None),
                subscribers: RefCell::new(IdMap::default()),
                next_subscriber_id: Cell::new(1),
                unmounted: Cell::new(false),
            }),
            surface,
        })
    }

    pub fn options(&self) -> &ScrollTrackerOptions {
        &self.shared.options
    }

    /// Records a new container size. The window position is read on the
    /// next frame and published together with this size; until then
    /// watchers keep seeing the previous geometry.
    pub fn on_container_layout(&self, size: Size) {
        let shared = &self.shared;
        if shared.unmounted.get() {
            return;
        }
        debug_trace!(shared.debug(), TRACKER_TAG, "dimensions: {size:?}");
        if size.is_zero() {
            return;
        }
        shared.pending_size.set(Some(size));
        shared.position_attempts.set(0);
        shared.request_position();
    }

    /// Records a scroll offset reported by the host. Updates closer together
    /// than the throttle interval are coalesced; the last one is delivered
    /// on a later frame.
    pub fn on_scroll(&self, offset: f32) {
        let shared = &self.shared;
        if shared.unmounted.get() {
            return;
        }
        let now = shared.runtime.now_millis();
        let emitted = shared.throttle.borrow_mut().offer(offset, now);
        match emitted {
            Some(offset) => {
                let superseded = shared.trailing_flush.borrow_mut().take();
                drop(superseded);
                shared.apply_scroll(offset);
            }
            None => shared.schedule_trailing_flush(),
        }
    }

    pub fn on_content_size_change(&self, extent: f32) {
        let shared = &self.shared;
        if shared.unmounted.get() {
            return;
        }
        let changed = {
            let mut geometry = shared.geometry.borrow_mut();
            let changed = geometry.content_extent != extent;
            geometry.content_extent = extent;
            changed
        };
        if changed {
            shared.notify();
        }
    }

    pub fn published_state(&self) -> PublishedState {
        PublishedState::from(&*self.shared.geometry.borrow())
    }

    pub fn geometry(&self) -> ScrollGeometry {
        *self.shared.geometry.borrow()
    }

    pub fn scroll_to(&self, position: f32, animated: bool) {
        self.surface.scroll_to(position, animated);
    }

    pub fn scroll_to_start(&self, animated: bool) {
        self.surface.scroll_to(0.0, animated);
    }

    pub fn scroll_to_end(&self, animated: bool) {
        self.surface.scroll_to_end(animated);
    }

    pub fn handle(&self) -> TrackerHandle {
        TrackerHandle {
            shared: Rc::downgrade(&self.shared),
            runtime: self.shared.runtime.clone(),
        }
    }

    /// Stops publishing. Registered watchers never fire again.
    pub fn unmount(&self) {
        self.shared.unmount();
    }

    pub fn is_unmounted(&self) -> bool {
        self.shared.unmounted.get()
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.borrow().len()
    }
}

impl Drop for ScrollTracker {
    fn drop(&mut self) {
        self.shared.unmount();
    }
}

/// Read access to a tracker for its descendants.
///
/// Holds the tracker weakly: once the tracker is dropped or unmounted every
/// accessor reports "no tracker".
#[derive(Clone)]
pub struct TrackerHandle {
    shared: Weak<TrackerShared>,
    runtime: RuntimeHandle,
}

impl TrackerHandle {
    fn live(&self) -> Option<Rc<TrackerShared>> {
        self.shared
            .upgrade()
            .filter(|shared| !shared.unmounted.get())
    }

    pub fn state(&self) -> Option<PublishedState> {
        self.live()
            .map(|shared| PublishedState::from(&*shared.geometry.borrow()))
    }

    pub fn scroll_value(&self) -> Option<f32> {
        self.live()
            .map(|shared| shared.geometry.borrow().scroll_offset)
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.live().map(|shared| shared.options.orientation)
    }

    /// The runtime the tracker schedules on. Stays valid after the tracker
    /// is gone, for as long as the runtime itself lives.
    pub fn runtime(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    pub fn is_unmounted(&self) -> bool {
        self.live().is_none()
    }

    /// Registers `f` to run after every geometry change. The returned
    /// subscription unregisters on drop.
    pub fn subscribe(&self, f: impl Fn() + 'static) -> TrackerSubscription {
        let id = match self.live() {
            Some(shared) => Some(shared.subscribe(Rc::new(f))),
            None => {
                log::warn!("{TRACKER_TAG} subscribe called on an unmounted tracker");
                None
            }
        };
        TrackerSubscription {
            shared: self.shared.clone(),
            id,
        }
    }
}

impl std::fmt::Debug for TrackerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerHandle")
            .field("state", &self.state())
            .finish()
    }
}

/// Registration returned by [`TrackerHandle::subscribe`].
pub struct TrackerSubscription {
    shared: Weak<TrackerShared>,
    id: Option<u64>,
}

impl TrackerSubscription {
    pub fn is_active(&self) -> bool {
        self.id.is_some() && self.shared.strong_count() > 0
    }
}

impl Drop for TrackerSubscription {
    fn drop(&mut self) {
        let (Some(id), Some(shared)) = (self.id.take(), self.shared.upgrade()) else {
            return;
        };
        // A subscriber may drop its own subscription while being notified,
        // so take the entry out before it is dropped.
        let removed = shared.subscribers.borrow_mut().remove(&id);
        drop(removed);
    }
}

#[cfg(test)]
#[path = "tests/tracker_tests.rs"]
mod tests;
