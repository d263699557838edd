//! A simulated scroll container with children, driven frame by frame.

use lazyscroll::{
    ConfigError, LazyChild, ScrollSurface, ScrollTracker, ScrollTrackerOptions, TrackerHandle,
    ViewMeasurer, WatcherCallbacks, WatcherOptions,
};
use lazyscroll_geometry::{Orientation, Rect, Size};
use lazyscroll_runtime::{Clock, ManualClock, NoopScheduler, Runtime, RuntimeHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

/// Frame interval the scene uses when it steps time.
pub const FRAME_MS: u64 = 16;

/// Frames [`TestScene::settle`] pumps before giving up.
const MAX_SETTLE_FRAMES: usize = 32;

/// A scroll command received by the scene's surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollCommand {
    To { position: f32, animated: bool },
    ToEnd { animated: bool },
}

/// Surface that records commands instead of scrolling.
#[derive(Default)]
pub struct RecordingSurface {
    commands: RefCell<Vec<ScrollCommand>>,
}

impl RecordingSurface {
    pub fn commands(&self) -> Vec<ScrollCommand> {
        self.commands.borrow().clone()
    }
}

impl ScrollSurface for RecordingSurface {
    fn scroll_to(&self, position: f32, animated: bool) {
        self.commands
            .borrow_mut()
            .push(ScrollCommand::To { position, animated });
    }

    fn scroll_to_end(&self, animated: bool) {
        self.commands
            .borrow_mut()
            .push(ScrollCommand::ToEnd { animated });
    }
}

/// A child placed in content coordinates.
///
/// Its window position follows the scene's scroll offset. The bounds can be
/// moved or detached to simulate relayout and unmeasurable views.
#[derive(Clone)]
pub struct ChildView {
    content_bounds: Rc<Cell<Rect>>,
    detached: Rc<Cell<bool>>,
    measure_count: Rc<Cell<usize>>,
    measurer: Rc<dyn ViewMeasurer>,
}

impl ChildView {
    pub fn measurer(&self) -> Rc<dyn ViewMeasurer> {
        Rc::clone(&self.measurer)
    }

    pub fn content_bounds(&self) -> Rect {
        self.content_bounds.get()
    }

    pub fn size(&self) -> Size {
        self.content_bounds.get().size()
    }

    pub fn set_content_bounds(&self, bounds: Rect) {
        self.content_bounds.set(bounds);
    }

    /// While detached, the host reports no measurement for the view.
    pub fn set_detached(&self, detached: bool) {
        self.detached.set(detached);
    }

    pub fn measure_count(&self) -> usize {
        self.measure_count.get()
    }
}

/// Headless host for one tracker and its children.
///
/// Time only moves through [`advance_time`](Self::advance_time) and the
/// scroll helpers, so every test is deterministic.
pub struct TestScene {
    runtime: Runtime,
    clock: Arc<ManualClock>,
    orientation: Orientation,
    throttle_ms: u64,
    container: Rc<Cell<Rect>>,
    scroll: Rc<Cell<f32>>,
    surface: Rc<RecordingSurface>,
    tracker: ScrollTracker,
    frames: Cell<u64>,
}

impl TestScene {
    /// Builds a scene whose container sits at `container` in window space,
    /// lays it out and pumps until its position is published.
    pub fn new(container: Rect, options: ScrollTrackerOptions) -> Result<Self, ConfigError> {
        let clock = Arc::new(ManualClock::new(0));
        let runtime = Runtime::new(Arc::new(NoopScheduler), clock.clone());
        let container_cell = Rc::new(Cell::new(container));
        let container_view: Rc<dyn ViewMeasurer> = {
            let container_cell = Rc::clone(&container_cell);
            Rc::new(move || Some(container_cell.get()))
        };
        let surface = Rc::new(RecordingSurface::default());
        let orientation = options.orientation;
        let throttle_ms = options.scroll_throttle_ms;
        let tracker = ScrollTracker::new(
            runtime.handle(),
            container_view,
            surface.clone(),
            options,
        )?;

        let scene = Self {
            runtime,
            clock,
            orientation,
            throttle_ms,
            container: container_cell,
            scroll: Rc::new(Cell::new(0.0)),
            surface,
            tracker,
            frames: Cell::new(0),
        };
        scene.tracker.on_container_layout(container.size());
        scene.settle();
        Ok(scene)
    }

    /// Vertical scene with the container at the window origin.
    pub fn vertical(width: f32, height: f32) -> Self {
        Self::with_options(Rect::new(0.0, 0.0, width, height), ScrollTrackerOptions::default())
    }

    /// Horizontal scene with the container at the window origin.
    pub fn horizontal(width: f32, height: f32) -> Self {
        Self::with_options(
            Rect::new(0.0, 0.0, width, height),
            ScrollTrackerOptions::default().horizontal(),
        )
    }

    /// Like [`new`](Self::new) for options known to be valid.
    ///
    /// # Panics
    ///
    /// Panics if `options` are rejected.
    pub fn with_options(container: Rect, options: ScrollTrackerOptions) -> Self {
        match Self::new(container, options) {
            Ok(scene) => scene,
            Err(err) => panic!("invalid tracker options for test scene: {err}"),
        }
    }

    pub fn tracker(&self) -> &ScrollTracker {
        &self.tracker
    }

    pub fn handle(&self) -> TrackerHandle {
        self.tracker.handle()
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn now_millis(&self) -> u64 {
        self.clock.now_millis()
    }

    pub fn frames(&self) -> u64 {
        self.frames.get()
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.get()
    }

    pub fn scroll_commands(&self) -> Vec<ScrollCommand> {
        self.surface.commands()
    }

    /// Creates a child view at `bounds` in content coordinates.
    pub fn child_view(&self, bounds: Rect) -> ChildView {
        let content_bounds = Rc::new(Cell::new(bounds));
        let detached = Rc::new(Cell::new(false));
        let measure_count = Rc::new(Cell::new(0));
        let measurer: Rc<dyn ViewMeasurer> = {
            let content_bounds = Rc::clone(&content_bounds);
            let detached = Rc::clone(&detached);
            let measure_count = Rc::clone(&measure_count);
            let container = Rc::clone(&self.container);
            let scroll = Rc::clone(&self.scroll);
            let orientation = self.orientation;
            Rc::new(move || {
                measure_count.set(measure_count.get() + 1);
                if detached.get() {
                    return None;
                }
                let bounds = content_bounds.get();
                let origin = container.get().origin();
                let (dx, dy) = match orientation {
                    Orientation::Vertical => (origin.x, origin.y - scroll.get()),
                    Orientation::Horizontal => (origin.x - scroll.get(), origin.y),
                };
                Some(bounds.translate(dx, dy))
            })
        };
        ChildView {
            content_bounds,
            detached,
            measure_count,
            measurer,
        }
    }

    /// Child of `extent` along the scroll axis at `offset` in the content,
    /// spanning the container on the cross axis.
    pub fn child_at(&self, offset: f32, extent: f32) -> ChildView {
        let container = self.container.get();
        let bounds = match self.orientation {
            Orientation::Vertical => Rect::new(0.0, offset, container.width, extent),
            Orientation::Horizontal => Rect::new(offset, 0.0, extent, container.height),
        };
        self.child_view(bounds)
    }

    /// Mounts a lazy child under this scene's tracker without laying it out.
    pub fn mount_unlaid(
        &self,
        view: &ChildView,
        callbacks: WatcherCallbacks,
        options: WatcherOptions,
    ) -> Result<LazyChild, ConfigError> {
        LazyChild::mount(Some(&self.handle()), view.measurer(), callbacks, options)
    }

    /// Mounts a lazy child, reports its layout and pumps until it settles.
    pub fn mount(
        &self,
        view: &ChildView,
        callbacks: WatcherCallbacks,
        options: WatcherOptions,
    ) -> Result<LazyChild, ConfigError> {
        let child = self.mount_unlaid(view, callbacks, options)?;
        child.on_layout(view.size());
        self.settle();
        Ok(child)
    }

    /// Reports new content extent to the tracker.
    pub fn set_content_extent(&self, extent: f32) {
        self.tracker.on_content_size_change(extent);
    }

    /// Lays out a list of equally sized children back to back and reports
    /// the resulting content extent.
    pub fn stack(&self, count: usize, extent: f32) -> Vec<ChildView> {
        let views = (0..count)
            .map(|index| self.child_at(index as f32 * extent, extent))
            .collect();
        self.set_content_extent(count as f32 * extent);
        views
    }

    /// Moves the container in window space and relays it out.
    pub fn move_container(&self, bounds: Rect) {
        self.container.set(bounds);
        self.tracker.on_container_layout(bounds.size());
        self.settle();
    }

    /// Scrolls as a host would at frame rate: time moves by one throttle
    /// interval, the offset is reported, and a frame is pumped.
    pub fn scroll_to(&self, offset: f32) {
        self.clock.advance_millis(self.throttle_ms.max(FRAME_MS));
        self.scroll_raw(offset);
        self.settle();
    }

    pub fn scroll_by(&self, delta: f32) {
        self.scroll_to(self.scroll.get() + delta);
    }

    /// Reports an offset to the tracker without moving time or pumping.
    pub fn scroll_raw(&self, offset: f32) {
        self.scroll.set(offset);
        self.tracker.on_scroll(offset);
    }

    /// Runs one frame at the current time.
    pub fn pump_frame(&self) {
        self.frames.set(self.frames.get() + 1);
        let nanos = self.clock.now_millis().saturating_mul(1_000_000);
        self.runtime.handle().drain_frame_callbacks(nanos);
    }

    /// Pumps frames until no frame callback is pending. Timers are left for
    /// [`advance_time`](Self::advance_time).
    pub fn settle(&self) {
        let handle = self.runtime.handle();
        self.pump_frame();
        for _ in 0..MAX_SETTLE_FRAMES {
            if !handle.has_frame_callbacks() && !handle.has_pending_ui() {
                return;
            }
            self.pump_frame();
        }
        log::warn!("test scene still busy after {MAX_SETTLE_FRAMES} frames");
    }

    /// Moves time forward in frame-sized steps, pumping a frame at each.
    pub fn advance_time(&self, millis: u64) {
        let target = self.clock.now_millis() + millis;
        while self.clock.now_millis() < target {
            let step = FRAME_MS.min(target - self.clock.now_millis());
            self.clock.advance_millis(step);
            self.pump_frame();
        }
    }
}
