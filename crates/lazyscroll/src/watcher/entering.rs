//! Threshold enter/exit latch.

/// A transition that should fire a callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Enter,
    Exit,
}

/// Latch for the "crossed the scroll threshold" predicate.
///
/// `has_entered` and `has_exited` are never both set. Without an exit
/// callback the enter side fires at most once and the watcher stops
/// measuring for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnteringState {
    armed_enter: bool,
    has_exit: bool,
    has_entered: bool,
    has_exited: bool,
}

impl EnteringState {
    pub fn new(has_enter: bool, has_exit: bool) -> Self {
        Self {
            armed_enter: has_enter,
            has_exit,
            has_entered: false,
            has_exited: false,
        }
    }

    pub fn has_entered(&self) -> bool {
        self.has_entered
    }

    pub fn has_exited(&self) -> bool {
        self.has_exited
    }

    /// Whether an evaluation could still produce a transition.
    pub fn needs_measurement(&self) -> bool {
        self.armed_enter || (self.has_exit && self.has_entered)
    }

    pub fn update(&mut self, is_entering: bool) -> Option<Transition> {
        if is_entering && !self.has_entered {
            self.has_entered = true;
            self.has_exited = false;
            if !self.has_exit {
                self.armed_enter = false;
            }
            return Some(Transition::Enter);
        }
        if !is_entering && self.has_entered && !self.has_exited {
            self.has_entered = false;
            self.has_exited = true;
            return self.has_exit.then_some(Transition::Exit);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_fires_once_while_inside() {
        let mut state = EnteringState::new(true, false);
        assert_eq!(state.update(true), Some(Transition::Enter));
        assert_eq!(state.update(true), None);
        assert_eq!(state.update(true), None);
        assert!(!state.needs_measurement());
    }

    #[test]
    fn enter_without_exit_never_refires() {
        let mut state = EnteringState::new(true, false);
        state.update(true);
        assert_eq!(state.update(false), None);
        assert_eq!(state.update(true), None);
    }

    #[test]
    fn enter_and_exit_alternate() {
        let mut state = EnteringState::new(true, true);
        let fired: Vec<_> = [false, true, true, false, false, true]
            .into_iter()
            .filter_map(|inside| state.update(inside))
            .collect();
        assert_eq!(
            fired,
            vec![Transition::Enter, Transition::Exit, Transition::Enter]
        );
        assert!(state.has_entered());
        assert!(!state.has_exited());
        assert!(state.needs_measurement());
    }

    #[test]
    fn exit_only_waits_for_an_entry() {
        let mut state = EnteringState::new(false, true);
        assert!(!state.needs_measurement());
        assert_eq!(state.update(false), None);
    }
}
