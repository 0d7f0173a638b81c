//! Events delivered to widgets, and the platform events a window consumes.

pub mod key;
pub mod mouse;

pub use key::{Key, KeyEvent, Modifiers};
pub use mouse::{ButtonEvent, MotionEvent, MouseButton, ScrollDirection, WheelEvent};

use crate::{
    core::id::{NodeId, WindowId},
    geom::{Orientation, Point, Size},
};

/// An event delivered to a widget's `on_event`.
#[derive(Debug, PartialEq, Clone)]
pub enum Event {
    /// A pointer button went down over the node.
    ButtonPressed(ButtonEvent),
    /// A pointer button went up over the node.
    ButtonReleased(ButtonEvent),
    /// The pointer moved over the node.
    MouseMoved(MotionEvent),
    /// The wheel turned over the node.
    MouseScrolled(WheelEvent),
    /// A key went down while the node had focus.
    KeyPressed(KeyEvent),
    /// A key went up while the node had focus.
    KeyReleased(KeyEvent),
    /// The pointer moved onto the node.
    MouseEntered,
    /// The pointer left the node.
    MouseExited,
    /// The node became the focus holder.
    FocusGained,
    /// The node stopped being the focus holder.
    FocusLost,
    /// The pointer moved while the node owns the window's drag slot.
    DragMotion(MotionEvent),
    /// The node's drag ended or was preempted.
    DragEnded,
    /// A descendant scrollbar changed value.
    ValueChanged {
        /// The scrollbar node.
        source: NodeId,
        /// The scrollbar's axis.
        orientation: Orientation,
        /// The new value.
        value: f64,
    },
}

impl Event {
    /// The window-relative pointer position, for pointer events.
    pub fn window_pos(&self) -> Option<Point> {
        match self {
            Self::ButtonPressed(b) | Self::ButtonReleased(b) => Some(b.window_pos),
            Self::MouseMoved(m) | Self::DragMotion(m) => Some(m.window_pos),
            Self::MouseScrolled(w) => Some(w.window_pos),
            _ => None,
        }
    }

    /// A copy of this event with its node-relative position replaced.
    pub fn relocated(&self, pos: Point) -> Self {
        let mut e = self.clone();
        match &mut e {
            Self::ButtonPressed(b) | Self::ButtonReleased(b) => b.pos = pos,
            Self::MouseMoved(m) | Self::DragMotion(m) => m.pos = pos,
            Self::MouseScrolled(w) => w.pos = pos,
            _ => {}
        }
        e
    }
}

/// A window-level event from the platform, in window coordinates.
#[derive(Debug, PartialEq, Clone)]
pub enum WindowEvent {
    /// The window became visible.
    Shown,
    /// The window was hidden.
    Hidden,
    /// Part of the window needs repainting.
    Exposed,
    /// The window moved on screen.
    Moved(Point),
    /// The window's client area changed size.
    Resized(Size),
    /// The pointer entered the window.
    PointerEntered,
    /// The pointer left the window.
    PointerLeft,
    /// The window received keyboard focus.
    FocusGained,
    /// The window lost keyboard focus.
    FocusLost,
    /// The user asked to close the window.
    CloseRequested,
    /// The pointer moved.
    PointerMoved {
        /// Window-relative position.
        pos: Point,
        /// Modifier state.
        modifiers: Modifiers,
    },
    /// A pointer button went down.
    ButtonDown {
        /// The button.
        button: MouseButton,
        /// Window-relative position.
        pos: Point,
        /// Consecutive click count.
        clicks: u32,
        /// Modifier state.
        modifiers: Modifiers,
    },
    /// A pointer button went up.
    ButtonUp {
        /// The button.
        button: MouseButton,
        /// Window-relative position.
        pos: Point,
        /// Modifier state.
        modifiers: Modifiers,
    },
    /// The wheel turned.
    Wheel {
        /// Window-relative position.
        pos: Point,
        /// Horizontal delta.
        dx: f64,
        /// Vertical delta.
        dy: f64,
        /// Modifier state.
        modifiers: Modifiers,
    },
    /// A key went down.
    KeyDown(KeyEvent),
    /// A key went up.
    KeyUp(KeyEvent),
}

/// A platform event addressed to a window.
#[derive(Debug, PartialEq, Clone)]
pub struct PlatformEvent {
    /// Target window.
    pub window: WindowId,
    /// Monotonic timestamp in milliseconds.
    pub timestamp: u32,
    /// The event.
    pub event: WindowEvent,
}
