//! Widget trait and event outcome types.

use std::any::{Any, type_name};

use crate::{
    Context, NodeId, Painter, ViewContext,
    error::Result,
    event::Event,
    geom::{Constraint, Size},
};

/// The result of an event handler.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EventOutcome {
    /// The event was handled and propagation stops.
    Handle,
    /// The event was not handled and will bubble up the tree.
    Ignore,
}

/// Widgets are the behavior attached to nodes in the Core arena.
///
/// Geometry, visibility, sensitivity and the parent link live on the node.
/// A widget only describes how the node draws, sizes itself, places its
/// children and reacts to events.
pub trait Widget: Any + Send {
    /// Draw this widget's own content in local coordinates. Children are drawn
    /// by the core afterwards.
    fn draw(&mut self, _p: &mut Painter, _ctx: &dyn ViewContext) -> Result<()> {
        Ok(())
    }

    /// Handle an event. Pointer positions are relative to this node.
    fn on_event(&mut self, _event: &Event, _ctx: &mut dyn Context) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// Preferred size under the given constraints. The core clamps the result
    /// to the node's minimum size and to the constraints.
    fn preferred_size(&self, _wc: Constraint, _hc: Constraint, _ctx: &dyn ViewContext) -> Size {
        Size::zero()
    }

    /// Place children within `size`. Called whenever the node's size changes
    /// and when the structure of its children changes.
    fn layout(&mut self, _size: Size, _ctx: &mut dyn Context) -> Result<()> {
        Ok(())
    }

    /// The children that currently participate in drawing and hit-testing,
    /// chosen from the attached children. Containers that show only part of
    /// their children override this.
    fn children(&self, attached: &[NodeId]) -> Vec<NodeId> {
        attached.to_vec()
    }

    /// Can nodes holding this widget take focus? Read once when the node is
    /// created; `Core::set_can_focus` changes it afterwards.
    fn accept_focus(&self) -> bool {
        false
    }

    /// Called exactly once when the node first joins a live tree.
    fn on_mount(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        Ok(())
    }

    /// Called exactly once immediately before the node is removed from the
    /// arena.
    fn on_unmount(&mut self, _ctx: &mut dyn Context) {}

    /// Name used in logs.
    fn name(&self) -> String {
        let name = type_name::<Self>();
        let short = name.split('<').next().unwrap_or(name);
        short.rsplit("::").next().unwrap_or(short).to_string()
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}
