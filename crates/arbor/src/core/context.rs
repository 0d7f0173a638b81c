use std::any::{Any, type_name};

use super::{
    backend::text::{FontDescription, TextMetrics},
    event::{Event, MouseButton},
    id::{NodeId, TypedId},
    sink::Notification,
    style::Theme,
    world::Core,
};
use crate::{
    error::{Error, Result},
    geom::{Constraint, Point, Rect, Size},
    widget::Widget,
};

/// Read-only context available to widgets while drawing and measuring.
pub trait ViewContext {
    /// The node the context is bound to.
    fn node_id(&self) -> NodeId;

    /// The root node of the window.
    fn root_id(&self) -> NodeId;

    /// Size of the current node.
    fn size(&self) -> Size;

    /// Bounds of the current node in its own coordinates.
    fn bounds(&self) -> Rect {
        self.size().rect()
    }

    /// Bounds of a node relative to its parent.
    fn node_bounds(&self, node: NodeId) -> Option<Rect>;

    /// Participating children of the current node.
    fn children(&self) -> Vec<NodeId> {
        self.children_of(self.node_id())
    }

    /// Participating children of a node.
    fn children_of(&self, node: NodeId) -> Vec<NodeId>;

    /// Parent of a node, or `None` if it is detached or the root.
    fn parent_of(&self, node: NodeId) -> Option<NodeId>;

    /// The node's own visibility flag.
    fn is_visible(&self, node: NodeId) -> bool;

    /// Does the current node hold focus?
    fn is_focused(&self) -> bool {
        self.node_is_focused(self.node_id())
    }

    /// Does a node hold focus?
    fn node_is_focused(&self, node: NodeId) -> bool;

    /// Is the pointer over the current node?
    fn is_hovered(&self) -> bool {
        self.node_is_hovered(self.node_id())
    }

    /// Is the pointer over a node?
    fn node_is_hovered(&self, node: NodeId) -> bool;

    /// Is the current node effectively sensitive?
    fn is_sensitive(&self) -> bool {
        self.node_is_sensitive(self.node_id())
    }

    /// Is a node effectively sensitive?
    fn node_is_sensitive(&self, node: NodeId) -> bool;

    /// A node's preferred size under the given constraints.
    fn preferred_size_of(&self, node: NodeId, wc: Constraint, hc: Constraint) -> Size;

    /// The window's theme.
    fn theme(&self) -> &Theme;

    /// Measure a string with the window's text collaborator.
    fn text_metrics(&self, font: &FontDescription, text: &str) -> TextMetrics;

    /// The node currently owning the window's drag slot.
    fn drag_owner(&self) -> Option<NodeId>;

    /// A node's viewport proxy offset.
    fn viewport_offset(&self, node: NodeId) -> Point;
}

/// Mutable context available to widgets during event handling and layout.
pub trait Context: ViewContext {
    /// Damage the whole current node.
    fn invalidate(&mut self);

    /// Damage part of the current node, in local coordinates.
    fn invalidate_local(&mut self, rect: Rect);

    /// Damage a whole node.
    fn invalidate_node(&mut self, node: NodeId);

    /// Set a node's bounds relative to its parent. Returns `true` if they
    /// changed.
    fn set_child_bounds(&mut self, node: NodeId, bounds: Rect) -> Result<bool>;

    /// Show or hide a node. Returns `true` if the flag changed.
    fn set_visible_of(&mut self, node: NodeId, visible: bool) -> Result<bool>;

    /// Set a node's viewport proxy offset.
    fn set_viewport_offset(&mut self, node: NodeId, offset: Point) -> Result<()>;

    /// Move focus to a node. Returns `true` if focus changed.
    fn set_focus(&mut self, node: NodeId) -> Result<bool>;

    /// Move focus to the current node.
    fn take_focus(&mut self) -> Result<bool> {
        self.set_focus(self.node_id())
    }

    /// Claim the window's drag slot for the current node, preempting any
    /// other drag.
    fn begin_drag(&mut self, button: MouseButton) -> Result<()>;

    /// Release the drag slot if the current node owns it.
    fn end_drag(&mut self) -> Result<()>;

    /// Release any focus, hover or drag held inside `node`'s subtree, with
    /// the usual lost, exit and drag-ended notifications.
    fn release_interaction(&mut self, node: NodeId) -> Result<()>;

    /// Create a detached node.
    fn add(&mut self, widget: Box<dyn Widget>) -> NodeId;

    /// Create a node and attach it under `parent`.
    fn add_child_to(&mut self, parent: NodeId, widget: Box<dyn Widget>) -> Result<NodeId>;

    /// Attach a detached node under `parent`.
    fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Detach a node from its parent.
    fn detach(&mut self, child: NodeId) -> Result<()>;

    /// Remove a node and its descendants from the arena.
    fn remove_subtree(&mut self, node: NodeId) -> Result<()>;

    /// Re-run a node's layout.
    fn layout_node(&mut self, node: NodeId) -> Result<()>;

    /// Re-run the current node's layout.
    fn relayout(&mut self) -> Result<()> {
        self.layout_node(self.node_id())
    }

    /// Report something to the window's event sink.
    fn notify(&mut self, n: Notification);

    /// Queue an event to bubble from `target` once the current dispatch
    /// returns.
    fn post(&mut self, target: NodeId, event: Event);

    /// Execute a closure with mutable access to another node's widget.
    fn with_widget_mut(
        &mut self,
        node: NodeId,
        f: &mut dyn FnMut(&mut dyn Widget, &mut dyn Context) -> Result<()>,
    ) -> Result<()>;
}

impl dyn Context + '_ {
    /// Execute a closure with mutable access to a widget of type `W`.
    pub fn with_widget<W, R>(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut W, &mut dyn Context) -> Result<R>,
    ) -> Result<R>
    where
        W: Widget + 'static,
    {
        let mut f = Some(f);
        let mut output = None;
        self.with_widget_mut(node, &mut |widget, ctx| {
            let any = widget as &mut dyn Any;
            let widget = any
                .downcast_mut::<W>()
                .ok_or_else(|| Error::WidgetType(type_name::<W>().to_string()))?;
            let f = f
                .take()
                .ok_or_else(|| Error::Internal("widget closure reused".into()))?;
            output = Some(f(widget, ctx)?);
            Ok(())
        })?;
        output.ok_or_else(|| Error::Internal("missing widget result".into()))
    }

    /// Execute a closure with mutable access to a widget using a typed node ID.
    pub fn with_typed<W, R>(
        &mut self,
        node: TypedId<W>,
        f: impl FnOnce(&mut W, &mut dyn Context) -> Result<R>,
    ) -> Result<R>
    where
        W: Widget + 'static,
    {
        self.with_widget(node.id(), f)
    }

    /// Create a widget and attach it under the current node.
    pub fn add_child<W>(&mut self, widget: W) -> Result<TypedId<W>>
    where
        W: Widget + 'static,
    {
        let parent = self.node_id();
        let id = self.add_child_to(parent, Box::new(widget))?;
        Ok(TypedId::new(id))
    }
}

/// Context implementation backed by a mutable Core.
pub struct CoreContext<'a> {
    /// Core state reference.
    core: &'a mut Core,
    /// Node bound to this context.
    node_id: NodeId,
}

impl<'a> CoreContext<'a> {
    /// Create a new context for a node.
    pub fn new(core: &'a mut Core, node_id: NodeId) -> Self {
        Self { core, node_id }
    }
}

impl ViewContext for CoreContext<'_> {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn root_id(&self) -> NodeId {
        self.core.root
    }

    fn size(&self) -> Size {
        self.core.node_size(self.node_id)
    }

    fn node_bounds(&self, node: NodeId) -> Option<Rect> {
        self.core.nodes.get(node).map(|n| n.bounds())
    }

    fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        self.core.children_of(node)
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.core.nodes.get(node).and_then(|n| n.parent)
    }

    fn is_visible(&self, node: NodeId) -> bool {
        self.core.nodes.get(node).is_some_and(|n| n.visible)
    }

    fn node_is_focused(&self, node: NodeId) -> bool {
        self.core.focused() == Some(node)
    }

    fn node_is_hovered(&self, node: NodeId) -> bool {
        self.core.hovered() == Some(node)
    }

    fn node_is_sensitive(&self, node: NodeId) -> bool {
        self.core.is_sensitive(node)
    }

    fn preferred_size_of(&self, node: NodeId, wc: Constraint, hc: Constraint) -> Size {
        self.core.measure_node(node, wc, hc)
    }

    fn theme(&self) -> &Theme {
        &self.core.theme
    }

    fn text_metrics(&self, font: &FontDescription, text: &str) -> TextMetrics {
        self.core.measure.measure(font, text)
    }

    fn drag_owner(&self) -> Option<NodeId> {
        self.core.drag_owner()
    }

    fn viewport_offset(&self, node: NodeId) -> Point {
        self.core
            .nodes
            .get(node)
            .map(|n| n.scroll)
            .unwrap_or_default()
    }
}

impl Context for CoreContext<'_> {
    fn invalidate(&mut self) {
        self.core.invalidate(self.node_id);
    }

    fn invalidate_local(&mut self, rect: Rect) {
        self.core.invalidate_local(self.node_id, rect);
    }

    fn invalidate_node(&mut self, node: NodeId) {
        self.core.invalidate(node);
    }

    fn set_child_bounds(&mut self, node: NodeId, bounds: Rect) -> Result<bool> {
        self.core.set_bounds(node, bounds)
    }

    fn set_visible_of(&mut self, node: NodeId, visible: bool) -> Result<bool> {
        self.core.set_visible(node, visible)
    }

    fn set_viewport_offset(&mut self, node: NodeId, offset: Point) -> Result<()> {
        self.core.set_viewport_offset(node, offset)
    }

    fn set_focus(&mut self, node: NodeId) -> Result<bool> {
        self.core.set_focus(node)
    }

    fn begin_drag(&mut self, button: MouseButton) -> Result<()> {
        self.core.begin_drag(self.node_id, button)
    }

    fn end_drag(&mut self) -> Result<()> {
        if self.core.drag_owner() == Some(self.node_id) {
            self.core.end_drag()?;
        }
        Ok(())
    }

    fn add(&mut self, widget: Box<dyn Widget>) -> NodeId {
        self.core.add_boxed(widget)
    }

    fn add_child_to(&mut self, parent: NodeId, widget: Box<dyn Widget>) -> Result<NodeId> {
        self.core.add_child_boxed(parent, widget)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.core.attach(parent, child)
    }

    fn release_interaction(&mut self, node: NodeId) -> Result<()> {
        self.core.release_interaction_in(node, true)
    }

    fn detach(&mut self, child: NodeId) -> Result<()> {
        self.core.detach(child)
    }

    fn remove_subtree(&mut self, node: NodeId) -> Result<()> {
        self.core.remove_subtree(node)
    }

    fn layout_node(&mut self, node: NodeId) -> Result<()> {
        self.core.layout(node)
    }

    fn notify(&mut self, n: Notification) {
        self.core.notify(&n);
    }

    fn post(&mut self, target: NodeId, event: Event) {
        self.core.post(target, event);
    }

    fn with_widget_mut(
        &mut self,
        node: NodeId,
        f: &mut dyn FnMut(&mut dyn Widget, &mut dyn Context) -> Result<()>,
    ) -> Result<()> {
        self.core.with_widget_mut(node, |widget, core| {
            let mut ctx = CoreContext::new(core, node);
            f(widget, &mut ctx)
        })?
    }
}

/// Read-only context implementation backed by a Core reference.
pub struct CoreViewContext<'a> {
    /// Core state reference.
    core: &'a Core,
    /// Node bound to this context.
    node_id: NodeId,
}

impl<'a> CoreViewContext<'a> {
    /// Create a new read-only context for a node.
    pub fn new(core: &'a Core, node_id: NodeId) -> Self {
        Self { core, node_id }
    }
}

impl ViewContext for CoreViewContext<'_> {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn root_id(&self) -> NodeId {
        self.core.root
    }

    fn size(&self) -> Size {
        self.core.node_size(self.node_id)
    }

    fn node_bounds(&self, node: NodeId) -> Option<Rect> {
        self.core.nodes.get(node).map(|n| n.bounds())
    }

    fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        self.core.children_of(node)
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.core.nodes.get(node).and_then(|n| n.parent)
    }

    fn is_visible(&self, node: NodeId) -> bool {
        self.core.nodes.get(node).is_some_and(|n| n.visible)
    }

    fn node_is_focused(&self, node: NodeId) -> bool {
        self.core.focused() == Some(node)
    }

    fn node_is_hovered(&self, node: NodeId) -> bool {
        self.core.hovered() == Some(node)
    }

    fn node_is_sensitive(&self, node: NodeId) -> bool {
        self.core.is_sensitive(node)
    }

    fn preferred_size_of(&self, node: NodeId, wc: Constraint, hc: Constraint) -> Size {
        self.core.measure_node(node, wc, hc)
    }

    fn theme(&self) -> &Theme {
        &self.core.theme
    }

    fn text_metrics(&self, font: &FontDescription, text: &str) -> TextMetrics {
        self.core.measure.measure(font, text)
    }

    fn drag_owner(&self) -> Option<NodeId> {
        self.core.drag_owner()
    }

    fn viewport_offset(&self, node: NodeId) -> Point {
        self.core
            .nodes
            .get(node)
            .map(|n| n.scroll)
            .unwrap_or_default()
    }
}
