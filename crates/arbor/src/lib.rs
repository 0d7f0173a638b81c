//! Arbor: the rendering and event core of a retained-mode widget toolkit.
//!
//! Arbor keeps one arena of widget nodes per window, tracks the damaged
//! region of each window, dispatches pointer and keyboard input through the
//! tree, and redraws only what was invalidated.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Engine`] - The window registry and event loop
//! - [`Window`] - A native window and its widget tree
//! - [`Core`] - The per-window arena, damage tracker and dispatcher
//! - [`Widget`] - The trait implemented by all widgets
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives (Rect, Point, Size, Constraint)
//! - [`widgets`] - Built-in containers and leaves

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

// Public modules
pub mod widget;
pub mod widgets;

/// Geometry primitives, re-exported from `arbor-geom`.
pub mod geom {
    pub use arbor_geom::*;
}

#[cfg(any(test, feature = "testing"))]
pub use core::testing;
// Re-export core application types
pub use core::{
    Context, Core, CoreContext, CoreViewContext, Engine, NodeId, Painter, TypedId, ViewContext,
    Window, WindowId,
};
pub use core::{backend, config, damage, error, event, logging, poll, sink, style, window};

pub use error::{Error, Result};
// Re-export widget trait and event outcome
pub use widget::{EventOutcome, Widget};
