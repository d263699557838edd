/// Scroll direction of a tracked container.
///
/// Everything downstream of the tracker talks about "start" and "end" along
/// this axis, so a horizontal strip and a vertical list share one code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Main axis: left to right.
    Horizontal,

    /// Main axis: top to bottom.
    #[default]
    Vertical,
}
