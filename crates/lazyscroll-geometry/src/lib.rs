//! Pure geometry for lazyscroll
//!
//! This crate contains the rectangle and orientation primitives that the
//! scroll tracker and visibility watchers use to describe bounds in the
//! absolute (window) coordinate space.

mod geometry;
mod orientation;
mod span;

pub use geometry::*;
pub use orientation::*;
pub use span::*;

pub mod prelude {
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::orientation::Orientation;
    pub use crate::span::MainAxisSpan;
}
