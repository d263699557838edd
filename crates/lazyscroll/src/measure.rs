//! Host-side collaborators: reading view bounds and driving the scroll view.

use lazyscroll_geometry::Rect;

/// Reads the current bounds of a host view in window coordinates.
///
/// `None` means the host could not measure the view right now (detached,
/// not laid out yet). Callers treat it like a zero measurement and retry.
pub trait ViewMeasurer {
    fn measure_in_window(&self) -> Option<Rect>;
}

impl<F> ViewMeasurer for F
where
    F: Fn() -> Option<Rect>,
{
    fn measure_in_window(&self) -> Option<Rect> {
        self()
    }
}

/// Scroll commands forwarded to the host scroll view.
pub trait ScrollSurface {
    fn scroll_to(&self, position: f32, animated: bool);

    fn scroll_to_end(&self, animated: bool);
}

/// Surface for hosts that never issue programmatic scrolls.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScrollSurface;

impl ScrollSurface for NoopScrollSurface {
    fn scroll_to(&self, _position: f32, _animated: bool) {}

    fn scroll_to_end(&self, _animated: bool) {}
}
