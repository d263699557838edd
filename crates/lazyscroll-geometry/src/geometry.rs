//! Geometric primitives: Point, Size, Rect

use crate::{MainAxisSpan, Orientation};

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Coordinate along the given axis.
    #[inline]
    pub fn along(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Vertical => self.y,
            Orientation::Horizontal => self.x,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    /// True when neither dimension has been laid out yet.
    ///
    /// A view with `width > 0` but `height == 0` still counts as laid out;
    /// only a fully collapsed size is treated as "nothing to measure".
    pub fn is_zero(&self) -> bool {
        self.width <= 0.0 && self.height <= 0.0
    }

    /// Extent along the given axis.
    #[inline]
    pub fn along(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Vertical => self.height,
            Orientation::Horizontal => self.width,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Same size, origin moved by `(dx, dy)`.
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Projects this rectangle onto the primary axis of `orientation`.
    pub fn main_axis_span(&self, orientation: Orientation) -> MainAxisSpan {
        MainAxisSpan::new(
            self.origin().along(orientation),
            self.size().along(orientation),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_axis_span_follows_orientation() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);

        let vertical = rect.main_axis_span(Orientation::Vertical);
        assert_eq!(vertical.start, 20.0);
        assert_eq!(vertical.extent, 40.0);

        let horizontal = rect.main_axis_span(Orientation::Horizontal);
        assert_eq!(horizontal.start, 10.0);
        assert_eq!(horizontal.extent, 30.0);
    }

    #[test]
    fn zero_size_requires_both_dimensions_collapsed() {
        assert!(Size::ZERO.is_zero());
        assert!(!Size::new(0.0, 12.0).is_zero());
        assert!(!Size::new(12.0, 0.0).is_zero());
    }
}
