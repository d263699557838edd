use crate::callbacks::WatcherCallbacks;

/// Watcher used when a child has no enclosing tracker.
///
/// Without scroll geometry there is nothing to measure, so the child is
/// treated as on screen: `on_enter_threshold_pass` and `on_visibility_enter`
/// run once, synchronously, when it is mounted. Exit callbacks never run.
#[derive(Debug)]
pub struct StandaloneFallback {
    fired_enter: bool,
    fired_visibility: bool,
}

impl StandaloneFallback {
    pub fn mount(callbacks: &WatcherCallbacks) -> Self {
        let fired_enter = callbacks
            .on_enter_threshold_pass
            .as_ref()
            .map(|callback| callback.invoke())
            .unwrap_or(false);
        let fired_visibility = callbacks
            .on_visibility_enter
            .as_ref()
            .map(|callback| callback.invoke())
            .unwrap_or(false);
        Self {
            fired_enter,
            fired_visibility,
        }
    }

    pub fn fired_enter(&self) -> bool {
        self.fired_enter
    }

    pub fn fired_visibility(&self) -> bool {
        self.fired_visibility
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn fires_enter_callbacks_once_and_never_exits() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let record = |name: &'static str| {
            let log = Rc::clone(&log);
            move || log.borrow_mut().push(name)
        };
        let callbacks = WatcherCallbacks::new()
            .on_enter_threshold_pass(record("enter"))
            .on_exit_threshold_pass(record("exit"))
            .on_visibility_enter(record("visible"))
            .on_visibility_exit(record("hidden"));

        let fallback = StandaloneFallback::mount(&callbacks);

        assert_eq!(log.borrow().as_slice(), &["enter", "visible"]);
        assert!(fallback.fired_enter());
        assert!(fallback.fired_visibility());
    }

    #[test]
    fn missing_callbacks_are_skipped() {
        let fallback = StandaloneFallback::mount(&WatcherCallbacks::new());
        assert!(!fallback.fired_enter());
        assert!(!fallback.fired_visibility());
    }
}
