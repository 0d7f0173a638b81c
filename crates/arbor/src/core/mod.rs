/// Collaborator contracts for drawing, windowing, text and images.
pub mod backend;
/// Application configuration.
pub mod config;
/// Widget context traits and implementations.
pub mod context;
/// Per-window damage tracking.
pub mod damage;
/// Hit-testing and input dispatch.
mod dispatch;
/// Window registry and event loop.
pub mod engine;
/// Error types.
pub mod error;
/// Widget and platform event types.
pub mod event;
/// Focus, hover and drag delegation state.
pub mod focus;
/// Node identifiers.
pub mod id;
/// Tracing subscriber setup.
pub mod logging;
/// Arena node storage.
pub mod node;
/// Deferred invocations and timers.
pub mod poll;
/// The painter and the redraw pass.
pub mod render;
/// Observer notifications.
pub mod sink;
/// Colours, sources and theme constants.
pub mod style;
/// Test utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// Native window shell.
pub mod window;
/// The per-window widget arena.
pub mod world;

pub use context::{Context, CoreContext, CoreViewContext, ViewContext};
pub use engine::Engine;
pub use id::{NodeId, TypedId, WindowId};
pub use render::Painter;
pub use window::Window;
pub use world::Core;
