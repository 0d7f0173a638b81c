//! Geometry primitives used across arbor.
//!
//! All coordinates are `f64` device-independent pixels. Sizes are never
//! negative: constructors clamp negative extents to zero.

/// Layout constraint type.
mod constraint;
/// Error types for geometry operations.
mod error;
/// Edge insets for padding.
mod insets;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Width/height size type.
mod size;

pub use constraint::Constraint;
pub use error::{Error, Result};
pub use insets::Insets;
pub use point::Point;
pub use rect::Rect;
pub use size::Size;

/// Cardinal directions.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Direction {
    /// Upward direction.
    Up,
    /// Downward direction.
    Down,
    /// Leftward direction.
    Left,
    /// Rightward direction.
    Right,
}

/// The axis a container stacks along, or a scrollbar moves along.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl Orientation {
    /// The perpendicular orientation.
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// The component of `p` along this axis.
    pub fn main_of_point(self, p: Point) -> f64 {
        match self {
            Self::Horizontal => p.x,
            Self::Vertical => p.y,
        }
    }

    /// The length of `s` along this axis.
    pub fn main(self, s: Size) -> f64 {
        match self {
            Self::Horizontal => s.w,
            Self::Vertical => s.h,
        }
    }

    /// The length of `s` across this axis.
    pub fn cross_of(self, s: Size) -> f64 {
        self.cross().main(s)
    }

    /// Build a size from main and cross axis lengths.
    pub fn size(self, main: f64, cross: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(main, cross),
            Self::Vertical => Size::new(cross, main),
        }
    }

    /// Build a rectangle from main and cross axis positions and lengths.
    pub fn rect(self, main_pos: f64, cross_pos: f64, main: f64, cross: f64) -> Rect {
        match self {
            Self::Horizontal => Rect::new(main_pos, cross_pos, main, cross),
            Self::Vertical => Rect::new(cross_pos, main_pos, cross, main),
        }
    }
}
