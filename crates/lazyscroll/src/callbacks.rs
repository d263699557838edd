//! User callbacks attached to a watcher, and their delivery on the UI queue.

use lazyscroll_runtime::RuntimeHandle;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to one user callback.
///
/// The closure sits behind `Rc<RefCell<..>>` so that a queued delivery can
/// hold it without borrowing the watcher that owns it.
#[derive(Clone)]
pub struct CallbackHolder {
    rc: Rc<RefCell<Box<dyn FnMut()>>>,
}

impl CallbackHolder {
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut() + 'static,
    {
        Self {
            rc: Rc::new(RefCell::new(Box::new(f))),
        }
    }

    /// Invokes the callback now. A callback that is already running (it
    /// re-entered itself) is skipped.
    pub fn invoke(&self) -> bool {
        match self.rc.try_borrow_mut() {
            Ok(mut callback) => {
                (callback)();
                true
            }
            Err(_) => false,
        }
    }

    /// Queues the callback on the runtime's UI task queue.
    ///
    /// The watcher never holds a borrow of its own state while user code
    /// runs: transitions are decided first, callbacks run when the queue is
    /// drained.
    pub(crate) fn deliver(&self, runtime: &RuntimeHandle) {
        let holder = self.clone();
        let retry_runtime = runtime.clone();
        runtime.enqueue_ui_task(Box::new(move || {
            if !holder.invoke() {
                log::warn!("lazyscroll callback is still running; re-queueing delivery");
                holder.deliver(&retry_runtime);
            }
        }));
    }
}

impl std::fmt::Debug for CallbackHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackHolder")
            .field("busy", &self.rc.try_borrow_mut().is_err())
            .finish()
    }
}

/// The four optional transition callbacks of a watcher.
#[derive(Clone, Debug, Default)]
pub struct WatcherCallbacks {
    pub on_enter_threshold_pass: Option<CallbackHolder>,
    pub on_exit_threshold_pass: Option<CallbackHolder>,
    pub on_visibility_enter: Option<CallbackHolder>,
    pub on_visibility_exit: Option<CallbackHolder>,
}

impl WatcherCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter_threshold_pass(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_enter_threshold_pass = Some(CallbackHolder::new(f));
        self
    }

    pub fn on_exit_threshold_pass(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_exit_threshold_pass = Some(CallbackHolder::new(f));
        self
    }

    pub fn on_visibility_enter(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_visibility_enter = Some(CallbackHolder::new(f));
        self
    }

    pub fn on_visibility_exit(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_visibility_exit = Some(CallbackHolder::new(f));
        self
    }

    pub fn has_threshold_callbacks(&self) -> bool {
        self.on_enter_threshold_pass.is_some() || self.on_exit_threshold_pass.is_some()
    }

    pub fn has_visibility_callbacks(&self) -> bool {
        self.on_visibility_enter.is_some() || self.on_visibility_exit.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_threshold_callbacks() && !self.has_visibility_callbacks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyscroll_runtime::{ManualClock, NoopScheduler, Runtime};
    use std::cell::Cell;
    use std::sync::Arc;

    #[test]
    fn delivery_waits_for_ui_drain() {
        let runtime = Runtime::new(Arc::new(NoopScheduler), Arc::new(ManualClock::new(0)));
        let handle = runtime.handle();
        let count = Rc::new(Cell::new(0));
        let holder = {
            let count = Rc::clone(&count);
            CallbackHolder::new(move || count.set(count.get() + 1))
        };

        holder.deliver(&handle);
        holder.deliver(&handle);
        assert_eq!(count.get(), 0);

        handle.drain_ui();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn builder_reports_armed_callbacks() {
        let callbacks = WatcherCallbacks::new().on_visibility_exit(|| {});
        assert!(!callbacks.has_threshold_callbacks());
        assert!(callbacks.has_visibility_callbacks());
        assert!(!callbacks.is_empty());
        assert!(WatcherCallbacks::default().is_empty());
    }
}
