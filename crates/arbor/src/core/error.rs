use std::result::Result as StdResult;

use thiserror::Error;

use super::id::{NodeId, WindowId};
use crate::geom;

/// Result type for arbor operations.
pub type Result<T> = StdResult<T, Error>;

/// A platform resource could not be obtained. Fatal to the affected window
/// only.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum WindowError {
    /// The native window could not be created.
    #[error("window creation failed: {0}")]
    Create(String),
    /// The drawing surface could not be created or resized.
    #[error("surface unavailable: {0}")]
    Surface(String),
    /// Presenting a frame failed.
    #[error("present failed: {0}")]
    Present(String),
}

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// A node id does not refer to a live node.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// The child already has a parent.
    #[error("node already attached: {0:?}")]
    AlreadyAttached(NodeId),

    /// Attaching would make a node its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Requested parent.
        parent: NodeId,
        /// Requested child.
        child: NodeId,
    },

    /// The same child appears twice in a children list.
    #[error("duplicate child {child:?} under {parent:?}")]
    DuplicateChild {
        /// Parent node.
        parent: NodeId,
        /// Repeated child.
        child: NodeId,
    },

    /// A widget was requested while it is already handling a call.
    #[error("widget is busy: {0:?}")]
    ReentrantWidget(NodeId),

    /// Typed access found a different widget type.
    #[error("widget type mismatch: expected {0}")]
    WidgetType(String),

    /// A window id does not refer to a live window.
    #[error("window not found: {0:?}")]
    WindowNotFound(WindowId),

    #[error("window: {0}")]
    /// Platform resource failure.
    Window(#[from] WindowError),

    #[error("geometry: {0}")]
    /// Geometry failure.
    Geometry(String),
    #[error("draw: {0}")]
    /// Drawing failure.
    Draw(String),
    #[error("layout: {0}")]
    /// Layout failure.
    Layout(String),
    #[error("config: {0}")]
    /// Configuration could not be parsed.
    Config(String),
    #[error("invalid: {0}")]
    /// Invalid input error.
    Invalid(String),
    #[error("internal: {0}")]
    /// Internal error.
    Internal(String),
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
