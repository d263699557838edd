//! One-dimensional spans along a scroll axis.

/// A segment on the primary scroll axis, `[start, start + extent)`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct MainAxisSpan {
    pub start: f32,
    pub extent: f32,
}

impl MainAxisSpan {
    pub const fn new(start: f32, extent: f32) -> Self {
        Self { start, extent }
    }

    #[inline]
    pub fn end(&self) -> f32 {
        self.start + self.extent
    }

    /// A span with no extent carries no usable position.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extent <= 0.0
    }

    /// Strict overlap with the open band `(band_start, band_end)`.
    ///
    /// Touching edges do not count: a span ending exactly at `band_start`
    /// is outside the band.
    #[inline]
    pub fn overlaps(&self, band_start: f32, band_end: f32) -> bool {
        self.start < band_end && self.end() > band_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_strict_at_edges() {
        let span = MainAxisSpan::new(400.0, 400.0);
        assert!(!span.overlaps(0.0, 400.0));
        assert!(span.overlaps(0.0, 401.0));
        assert!(!span.overlaps(800.0, 1200.0));
        assert!(span.overlaps(799.0, 1200.0));
    }

    #[test]
    fn larger_span_overlaps_inner_band() {
        let span = MainAxisSpan::new(-200.0, 800.0);
        assert!(span.overlaps(0.0, 300.0));
    }
}
