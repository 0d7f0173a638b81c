//! Test doubles for the collaborator contracts, and a harness that wires
//! them to a window.

/// Recording draw backend, surface and surface factory.
pub mod backend;
/// Window harness.
pub mod harness;
/// Configurable test widget.
pub mod probe;
/// Recording event sink.
pub mod sink;
/// Scripted platform event source.
pub mod source;

pub use backend::{DrawLog, DrawOp, RecordingBackend, RecordingFactory, RecordingSurface};
pub use harness::{CELL_HEIGHT, CELL_WIDTH, Harness, HarnessBuilder};
pub use probe::{Probe, ProbeLog};
pub use sink::{Notes, Recorder};
pub use source::ScriptedSource;
