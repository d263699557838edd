use lazyscroll::WatcherCallbacks;
use std::cell::RefCell;
use std::rc::Rc;

/// Collects callback invocations in the order they ran.
#[derive(Clone, Default)]
pub struct CallbackRecorder {
    events: Rc<RefCell<Vec<String>>>,
}

impl CallbackRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closure that records `label` each time it runs.
    pub fn record(&self, label: impl Into<String>) -> impl FnMut() + 'static {
        let events = Rc::clone(&self.events);
        let label = label.into();
        move || events.borrow_mut().push(label.clone())
    }

    /// Threshold callbacks recorded as `"{name}:enter"` and `"{name}:exit"`.
    pub fn threshold(&self, name: &str) -> WatcherCallbacks {
        WatcherCallbacks::new()
            .on_enter_threshold_pass(self.record(format!("{name}:enter")))
            .on_exit_threshold_pass(self.record(format!("{name}:exit")))
    }

    /// Only the threshold enter callback.
    pub fn enter_only(&self, name: &str) -> WatcherCallbacks {
        WatcherCallbacks::new().on_enter_threshold_pass(self.record(format!("{name}:enter")))
    }

    /// Visibility callbacks recorded as `"{name}:visible"` and
    /// `"{name}:hidden"`.
    pub fn visibility(&self, name: &str) -> WatcherCallbacks {
        WatcherCallbacks::new()
            .on_visibility_enter(self.record(format!("{name}:visible")))
            .on_visibility_exit(self.record(format!("{name}:hidden")))
    }

    /// All four callbacks.
    pub fn all(&self, name: &str) -> WatcherCallbacks {
        let visibility = self.visibility(name);
        WatcherCallbacks {
            on_visibility_enter: visibility.on_visibility_enter,
            on_visibility_exit: visibility.on_visibility_exit,
            ..self.threshold(name)
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn count(&self, label: &str) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.as_str() == label)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
