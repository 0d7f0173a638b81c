//! The observer contract through which a window reports what happened to
//! the application layer.

use crate::{
    core::{
        event::{Key, MouseButton},
        id::NodeId,
    },
    geom::{Point, Rect, Size},
};

/// Something an application may want to react to.
#[derive(Debug, PartialEq, Clone)]
pub enum Notification {
    /// A node's bounds changed. Bounds are relative to its parent.
    BoundsChanged {
        /// The node.
        node: NodeId,
        /// The new bounds.
        bounds: Rect,
    },
    /// A node gained focus.
    FocusGained(NodeId),
    /// A node lost focus.
    FocusLost(NodeId),
    /// The pointer entered a node.
    MouseEntered(NodeId),
    /// The pointer left a node.
    MouseExited(NodeId),
    /// A button press was delivered to a node.
    ButtonPressed {
        /// The receiving node.
        node: NodeId,
        /// The button.
        button: MouseButton,
        /// Position relative to the node.
        pos: Point,
        /// Consecutive click count.
        clicks: u32,
    },
    /// A button release was delivered to a node.
    ButtonReleased {
        /// The receiving node.
        node: NodeId,
        /// The button.
        button: MouseButton,
        /// Position relative to the node.
        pos: Point,
    },
    /// A key press was delivered to a node.
    KeyPressed {
        /// The receiving node.
        node: NodeId,
        /// The key.
        key: Key,
    },
    /// A button widget was clicked.
    Clicked(NodeId),
    /// A scrollbar's value changed.
    ValueChanged {
        /// The scrollbar node.
        node: NodeId,
        /// The new value.
        value: f64,
    },
    /// A notebook's current tab changed.
    CurrentTabChanged {
        /// The notebook node.
        node: NodeId,
        /// The new current tab index.
        index: Option<usize>,
    },
    /// The window was shown.
    WindowShown,
    /// The window was hidden.
    WindowHidden,
    /// The window moved to a new screen position.
    WindowMoved(Point),
    /// The window was resized.
    WindowResized(Size),
}

/// Receives notifications from one window.
pub trait EventSink {
    /// Observe a notification.
    fn notify(&mut self, n: &Notification);

    /// The user asked to close the window. Return `true` to keep it open.
    fn close_requested(&mut self) -> bool {
        false
    }
}

/// A sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn notify(&mut self, _n: &Notification) {}
}
