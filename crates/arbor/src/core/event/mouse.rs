//! Pointer input primitives.

use super::key::Modifiers;
use crate::geom::{Direction, Point};

/// A pointer button.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Middle button or wheel click.
    Middle,
    /// Secondary button.
    Right,
    /// Any other button, by platform index.
    Other(u8),
}

/// A button press or release.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ButtonEvent {
    /// The button.
    pub button: MouseButton,
    /// Pointer position relative to the receiving node.
    pub pos: Point,
    /// Pointer position relative to the window.
    pub window_pos: Point,
    /// Number of consecutive clicks, 1 for a single click.
    pub clicks: u32,
    /// Modifier state.
    pub modifiers: Modifiers,
    /// Platform timestamp in milliseconds.
    pub timestamp: u32,
}

/// Pointer motion.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct MotionEvent {
    /// Pointer position relative to the receiving node.
    pub pos: Point,
    /// Pointer position relative to the window.
    pub window_pos: Point,
    /// Modifier state.
    pub modifiers: Modifiers,
    /// Platform timestamp in milliseconds.
    pub timestamp: u32,
}

/// Which way a wheel event scrolls. Vertical and horizontal components are
/// independent, so a diagonal gesture carries both.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct ScrollDirection {
    /// `Up` or `Down`, if the gesture has a vertical component.
    pub vertical: Option<Direction>,
    /// `Left` or `Right`, if the gesture has a horizontal component.
    pub horizontal: Option<Direction>,
}

impl ScrollDirection {
    /// Derive the direction from wheel deltas. Positive `dy` scrolls down,
    /// positive `dx` scrolls right.
    pub fn from_delta(dx: f64, dy: f64) -> Self {
        let vertical = if dy > 0.0 {
            Some(Direction::Down)
        } else if dy < 0.0 {
            Some(Direction::Up)
        } else {
            None
        };
        let horizontal = if dx > 0.0 {
            Some(Direction::Right)
        } else if dx < 0.0 {
            Some(Direction::Left)
        } else {
            None
        };
        Self {
            vertical,
            horizontal,
        }
    }
}

/// A wheel or trackpad scroll.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct WheelEvent {
    /// Pointer position relative to the receiving node.
    pub pos: Point,
    /// Pointer position relative to the window.
    pub window_pos: Point,
    /// Horizontal delta in wheel steps.
    pub dx: f64,
    /// Vertical delta in wheel steps.
    pub dy: f64,
    /// Direction flags derived from the deltas.
    pub direction: ScrollDirection,
    /// Modifier state.
    pub modifiers: Modifiers,
    /// Platform timestamp in milliseconds.
    pub timestamp: u32,
}
