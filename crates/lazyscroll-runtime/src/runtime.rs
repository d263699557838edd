use crate::collections::map::IdMap;
use crate::frame_clock::FrameClock;
use crate::platform::{Clock, RuntimeScheduler};
use crate::{FrameCallbackId, TimerId};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::thread::ThreadId;

/// Upper bound on drain passes per frame. Tasks that keep enqueuing more
/// tasks are left for the next frame instead of spinning forever.
const MAX_UI_DRAIN_PASSES: usize = 64;

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct TimerEntry {
    deadline_millis: u64,
    callback: Box<dyn FnOnce() + 'static>,
}

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    clock: Arc<dyn Clock>,
    needs_frame: Cell<bool>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<u64>,
    timers: RefCell<IdMap<TimerEntry>>,
    next_timer_id: Cell<u64>,
    local_tasks: RefCell<VecDeque<Box<dyn FnOnce() + 'static>>>,
    draining_ui: Cell<bool>,
    ui_thread_id: ThreadId,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>, clock: Arc<dyn Clock>) -> Self {
        Self {
            scheduler,
            clock,
            needs_frame: Cell::new(false),
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
            timers: RefCell::new(IdMap::default()),
            next_timer_id: Cell::new(1),
            local_tasks: RefCell::new(VecDeque::new()),
            draining_ui: Cell::new(false),
            ui_thread_id: std::thread::current().id(),
        }
    }

    fn schedule(&self) {
        if !self.needs_frame.replace(true) {
            self.scheduler.schedule_frame();
        }
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }

    fn has_timers(&self) -> bool {
        !self.timers.borrow().is_empty()
    }

    fn has_pending_ui(&self) -> bool {
        !self.local_tasks.borrow().is_empty()
    }

    fn settle_needs_frame(&self) {
        // Timers alone keep the host ticking: their deadlines are checked
        // against the clock on each frame.
        let idle = !self.has_frame_callbacks() && !self.has_pending_ui() && !self.has_timers();
        if idle {
            self.needs_frame.set(false);
        }
    }

    /// Queues a closure on the UI thread's local queue.
    ///
    /// The closure may capture `Rc`/`RefCell` values because it never leaves
    /// the runtime thread.
    fn enqueue_ui_task(&self, task: Box<dyn FnOnce() + 'static>) {
        self.local_tasks.borrow_mut().push_back(task);
        self.schedule();
    }

    fn drain_ui(&self) {
        // A task that triggers another drain leaves the new work to the
        // outer loop, so tasks never run nested inside each other.
        if self.draining_ui.replace(true) {
            return;
        }
        for _ in 0..MAX_UI_DRAIN_PASSES {
            let batch: Vec<_> = self.local_tasks.borrow_mut().drain(..).collect();
            if batch.is_empty() {
                break;
            }
            for task in batch {
                task();
            }
        }
        self.draining_ui.set(false);
        if self.has_pending_ui() {
            log::warn!("UI task queue still busy after {MAX_UI_DRAIN_PASSES} passes; deferring");
            self.schedule();
        }
    }

    fn register_frame_callback(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.schedule();
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        {
            let mut callbacks = self.frame_callbacks.borrow_mut();
            if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
                callbacks.remove(index);
            }
        }
        self.settle_needs_frame();
    }

    fn schedule_timer(&self, delay_millis: u64, callback: Box<dyn FnOnce() + 'static>) -> TimerId {
        let id = self.next_timer_id.get();
        self.next_timer_id.set(id + 1);
        let deadline_millis = self.clock.now_millis().saturating_add(delay_millis);
        self.timers.borrow_mut().insert(
            id,
            TimerEntry {
                deadline_millis,
                callback,
            },
        );
        self.schedule();
        id
    }

    fn cancel_timer(&self, id: TimerId) {
        self.timers.borrow_mut().remove(&id);
        self.settle_needs_frame();
    }

    fn run_due_timers(&self) {
        let now = self.clock.now_millis();
        let mut due: SmallVec<[(TimerId, TimerEntry); 4]> = SmallVec::new();
        {
            let mut timers = self.timers.borrow_mut();
            let ids: SmallVec<[TimerId; 4]> = timers
                .iter()
                .filter(|(_, entry)| entry.deadline_millis <= now)
                .map(|(id, _)| *id)
                .collect();
            for id in ids {
                if let Some(entry) = timers.remove(&id) {
                    due.push((id, entry));
                }
            }
        }
        // Earliest deadline first, registration order breaks ties.
        due.sort_by_key(|(id, entry)| (entry.deadline_millis, *id));
        for (_, entry) in due {
            (entry.callback)();
        }
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        let pending: Vec<Box<dyn FnOnce(u64) + 'static>> = {
            let mut callbacks = self.frame_callbacks.borrow_mut();
            let mut pending = Vec::with_capacity(callbacks.len());
            while let Some(mut entry) = callbacks.pop_front() {
                if let Some(callback) = entry.callback.take() {
                    pending.push(callback);
                }
            }
            pending
        };
        for callback in pending {
            callback(frame_time_nanos);
        }
        self.run_due_timers();
        self.drain_ui();
        self.settle_needs_frame();
    }
}

/// Owner of the runtime state. Dropping it invalidates every handle.
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(scheduler, clock)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
            clock: Arc::clone(&self.inner.clock),
            ui_thread_id: self.inner.ui_thread_id,
        }
    }
}

#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
    clock: Arc<dyn Clock>,
    ui_thread_id: ThreadId,
}

impl RuntimeHandle {
    pub fn schedule(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.schedule();
        }
    }

    /// Current time according to the runtime's clock.
    pub fn now_millis(&self) -> u64 {
        self.clock.now_millis()
    }

    /// Schedules work that must run on the runtime thread.
    ///
    /// Tasks run when the host drains the UI queue, which happens at the end
    /// of every frame. With the runtime gone the task runs inline.
    pub fn enqueue_ui_task(&self, task: Box<dyn FnOnce() + 'static>) {
        self.assert_ui_thread();
        if let Some(inner) = self.inner.upgrade() {
            inner.enqueue_ui_task(task);
        } else {
            task();
        }
    }

    pub fn drain_ui(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_ui();
        }
    }

    pub fn has_pending_ui(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_pending_ui())
            .unwrap_or(false)
    }

    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    /// Runs every queued frame callback, then due timers, then the UI queue.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_frame_callbacks(frame_time_nanos);
        }
    }

    pub fn schedule_timer(
        &self,
        delay_millis: u64,
        callback: impl FnOnce() + 'static,
    ) -> Option<TimerId> {
        self.inner
            .upgrade()
            .map(|inner| inner.schedule_timer(delay_millis, Box::new(callback)))
    }

    pub fn cancel_timer(&self, id: TimerId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_timer(id);
        }
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }

    pub fn needs_frame(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.needs_frame.get())
            .unwrap_or(false)
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_frame_callbacks())
            .unwrap_or(false)
    }

    pub fn has_timers(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_timers())
            .unwrap_or(false)
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn assert_ui_thread(&self) {
        debug_assert_eq!(
            std::thread::current().id(),
            self.ui_thread_id,
            "lazyscroll state touched off the runtime's UI thread"
        );
    }
}

impl std::fmt::Debug for RuntimeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
