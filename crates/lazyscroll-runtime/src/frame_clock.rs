use crate::runtime::RuntimeHandle;

/// Frame and timer scheduling on top of a [`RuntimeHandle`].
///
/// Registrations cancel themselves on drop. Holding one is what keeps the
/// scheduled work alive.
#[derive(Clone)]
pub struct FrameClock {
    runtime: RuntimeHandle,
}

impl FrameClock {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }

    /// Runs `callback` once, on the next drained frame, with its time in
    /// nanoseconds.
    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let id = self.runtime.register_frame_callback(callback);
        FrameCallbackRegistration(Slot::new(&self.runtime, id, Kind::Frame))
    }

    pub fn with_frame_millis(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        self.with_frame_nanos(move |nanos| callback(nanos / 1_000_000))
    }

    /// Runs `callback` on the first frame at least `delay_millis` from now.
    pub fn after_millis(
        &self,
        delay_millis: u64,
        callback: impl FnOnce() + 'static,
    ) -> TimerRegistration {
        let id = self.runtime.schedule_timer(delay_millis, callback);
        TimerRegistration(Slot::new(&self.runtime, id, Kind::Timer))
    }
}

#[derive(Clone, Copy)]
enum Kind {
    Frame,
    Timer,
}

/// Cancel-on-drop core shared by both registration types.
struct Slot {
    runtime: RuntimeHandle,
    id: Option<u64>,
    kind: Kind,
}

impl Slot {
    fn new(runtime: &RuntimeHandle, id: Option<u64>, kind: Kind) -> Self {
        Self {
            runtime: runtime.clone(),
            id,
            kind,
        }
    }

    fn release(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        match self.kind {
            Kind::Frame => self.runtime.cancel_frame_callback(id),
            Kind::Timer => self.runtime.cancel_timer(id),
        }
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        self.release();
    }
}

/// Pending frame callback. Inactive when the runtime was already gone.
pub struct FrameCallbackRegistration(Slot);

impl FrameCallbackRegistration {
    pub fn is_active(&self) -> bool {
        self.0.id.is_some()
    }

    pub fn cancel(mut self) {
        self.0.release();
    }
}

/// Pending timer. Inactive when the runtime was already gone.
pub struct TimerRegistration(Slot);

impl TimerRegistration {
    pub fn is_active(&self) -> bool {
        self.0.id.is_some()
    }

    pub fn cancel(mut self) {
        self.0.release();
    }
}
