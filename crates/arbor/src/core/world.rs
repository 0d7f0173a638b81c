use std::{
    any::{Any, type_name},
    collections::{HashSet, VecDeque},
};

use slotmap::SlotMap;
use tracing::trace;

use super::{
    backend::text::{MonospaceMetrics, TextMeasure},
    context::{CoreContext, CoreViewContext},
    damage::Damage,
    event::Event,
    focus::{DragSlot, FocusState, HoverState},
    id::{NodeId, TypedId},
    node::Node,
    sink::{EventSink, Notification, NullSink},
    style::{Color, Theme},
};
use crate::{
    Context,
    error::{Error, Result},
    geom::{Constraint, Point, Rect, Size},
    widget::Widget,
};

/// The widget arena of one window, with its damage, focus, hover and drag
/// state.
pub struct Core {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Root node ID. The root is positioned in window coordinates.
    pub(crate) root: NodeId,
    /// Accumulated dirty region.
    pub(crate) damage: Damage,
    /// Current focus holder.
    pub(crate) focus: FocusState,
    /// Node under the pointer.
    pub(crate) hover: HoverState,
    /// Active drag delegation, if any.
    pub(crate) drag: Option<DragSlot>,
    /// Window-level sensitivity.
    pub(crate) enabled: bool,
    /// Observer for notifications.
    pub(crate) sink: Box<dyn EventSink>,
    /// Style constants.
    pub(crate) theme: Theme,
    /// Text measurement collaborator.
    pub(crate) measure: Box<dyn TextMeasure>,
    /// Events queued by widgets, delivered once the current dispatch returns.
    pub(crate) posted: VecDeque<(NodeId, Event)>,
}

/// Widget used for the implicit root node. Stretches its children to fill it.
struct RootContainer;

impl Widget for RootContainer {
    fn layout(&mut self, size: Size, ctx: &mut dyn Context) -> Result<()> {
        for child in ctx.children() {
            ctx.set_child_bounds(child, size.rect())?;
        }
        Ok(())
    }
}

impl Default for Core {
    fn default() -> Self {
        Self::new()
    }
}

impl Core {
    /// Create a Core with an empty root container, a null sink, the default
    /// theme and monospace text metrics.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root = Node::new(Box::new(RootContainer));
        root.mounted = true;
        let root = nodes.insert(root);
        Self {
            nodes,
            root,
            damage: Damage::default(),
            focus: FocusState::default(),
            hover: HoverState::default(),
            drag: None,
            enabled: true,
            sink: Box::new(NullSink),
            theme: Theme::default(),
            measure: Box::new(MonospaceMetrics::new()),
            posted: VecDeque::new(),
        }
    }

    /// Replace the event sink.
    pub fn set_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sink = sink;
    }

    /// Replace the theme and damage the whole window.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.damage.add_all();
    }

    /// The current theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Replace the text measurement collaborator.
    pub fn set_text_measure(&mut self, measure: Box<dyn TextMeasure>) {
        self.measure = measure;
    }

    /// The root node ID.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Borrow a node.
    pub fn node(&self, node_id: impl Into<NodeId>) -> Option<&Node> {
        self.nodes.get(node_id.into())
    }

    /// Does the arena hold this node?
    pub fn contains(&self, node_id: impl Into<NodeId>) -> bool {
        self.nodes.contains_key(node_id.into())
    }

    /// The damage tracker.
    pub fn damage(&self) -> &Damage {
        &self.damage
    }

    pub(crate) fn notify(&mut self, n: &Notification) {
        self.sink.notify(n);
    }

    pub(crate) fn post(&mut self, target: NodeId, event: Event) {
        self.posted.push_back((target, event));
    }

    /// Deliver queued events, bubbling each from its target.
    pub(crate) fn flush_posted(&mut self) -> Result<()> {
        while let Some((target, event)) = self.posted.pop_front() {
            self.bubble(target, &event)?;
        }
        Ok(())
    }

    /// Window-level sensitivity.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the whole window. Disabling ends any drag.
    pub fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        if self.enabled == enabled {
            return Ok(());
        }
        self.enabled = enabled;
        if !enabled {
            self.end_drag()?;
        }
        self.damage.add_all();
        Ok(())
    }

    /// Set the window rectangle used to clip damage and the bounds of the
    /// root node, in window coordinates. Damages the whole window.
    pub(crate) fn set_window_rect(&mut self, window: Rect, root: Rect) -> Result<()> {
        self.damage.set_bounds(window);
        self.set_bounds(self.root, root)?;
        self.damage.add_all();
        Ok(())
    }

    /// Create a detached node holding `widget`.
    pub fn add<W>(&mut self, widget: W) -> NodeId
    where
        W: Widget + 'static,
    {
        self.add_boxed(Box::new(widget))
    }

    /// Create a detached node and return a typed handle.
    pub fn add_typed<W>(&mut self, widget: W) -> TypedId<W>
    where
        W: Widget + 'static,
    {
        TypedId::new(self.add(widget))
    }

    /// Create a detached node holding a boxed widget.
    pub fn add_boxed(&mut self, widget: Box<dyn Widget>) -> NodeId {
        self.nodes.insert(Node::new(widget))
    }

    /// Create a node and attach it under `parent`.
    pub fn add_child<W>(&mut self, parent: impl Into<NodeId>, widget: W) -> Result<NodeId>
    where
        W: Widget + 'static,
    {
        self.add_child_boxed(parent.into(), Box::new(widget))
    }

    /// Create a node from a boxed widget and attach it under `parent`.
    pub fn add_child_boxed(&mut self, parent: NodeId, widget: Box<dyn Widget>) -> Result<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        let id = self.add_boxed(widget);
        self.attach(parent, id)?;
        Ok(id)
    }

    /// Replace the root with a new widget. The old root subtree is unmounted
    /// and removed; the new root keeps the old root's bounds.
    pub fn set_root<W>(&mut self, widget: W) -> Result<NodeId>
    where
        W: Widget + 'static,
    {
        let old = self.root;
        let bounds = self.nodes[old].bounds();
        self.focus.focused = None;
        self.hover.hovered = None;
        self.drag = None;
        self.unmount_and_remove(old);

        let id = self.add(widget);
        if let Some(node) = self.nodes.get_mut(id) {
            node.position = bounds.tl;
            node.size = bounds.size();
        }
        self.root = id;
        self.mount_subtree_pre_order(id)?;
        self.damage.add_all();
        self.layout(id)?;
        Ok(id)
    }

    /// Is `ancestor` a strict ancestor of `node`?
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Is `node` equal to `root` or one of its descendants?
    pub(crate) fn in_subtree(&self, root: NodeId, node: NodeId) -> bool {
        node == root || self.is_ancestor(root, node)
    }

    /// Is the node connected to the root?
    pub fn is_attached(&self, node_id: impl Into<NodeId>) -> bool {
        let node_id = node_id.into();
        self.nodes.contains_key(node_id) && self.in_subtree(self.root, node_id)
    }

    /// Is the node alive and connected to the root?
    pub(crate) fn is_live(&self, node_id: NodeId) -> bool {
        self.is_attached(node_id)
    }

    /// Are the node and all its ancestors visible?
    pub fn is_shown(&self, node_id: impl Into<NodeId>) -> bool {
        let mut current = Some(node_id.into());
        while let Some(id) = current {
            let Some(node) = self.nodes.get(id) else {
                return false;
            };
            if !node.visible {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Effective sensitivity: the window is enabled and the node and every
    /// ancestor are sensitive.
    pub fn is_sensitive(&self, node_id: impl Into<NodeId>) -> bool {
        if !self.enabled {
            return false;
        }
        let mut current = Some(node_id.into());
        while let Some(id) = current {
            let Some(node) = self.nodes.get(id) else {
                return false;
            };
            if !node.sensitive {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Attach a detached child under a parent.
    pub fn attach(&mut self, parent: impl Into<NodeId>, child: impl Into<NodeId>) -> Result<()> {
        let parent = parent.into();
        let child = child.into();
        if !self.nodes.contains_key(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        if !self.nodes.contains_key(child) {
            return Err(Error::NodeNotFound(child));
        }
        if self.nodes[child].parent.is_some() || child == self.root {
            return Err(Error::AlreadyAttached(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);

        if self.is_attached(parent) {
            self.mount_subtree_pre_order(child)?;
            self.invalidate(child);
        }
        self.layout(parent)
    }

    /// Detach a child from its parent. Focus, hover and drag held inside the
    /// subtree are dropped without notifications.
    pub fn detach(&mut self, child: impl Into<NodeId>) -> Result<()> {
        let child = child.into();
        if !self.nodes.contains_key(child) {
            return Err(Error::NodeNotFound(child));
        }
        let Some(parent) = self.nodes[child].parent else {
            return Ok(());
        };
        if self.is_attached(child) {
            self.invalidate(child);
            self.release_interaction_in(child, false)?;
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|id| *id != child);
        }
        self.nodes[child].parent = None;
        self.layout(parent)
    }

    /// Replace the children list of a parent. Children that were attached
    /// elsewhere are moved; previous children not in the list are detached.
    pub fn set_children(&mut self, parent: impl Into<NodeId>, children: Vec<NodeId>) -> Result<()> {
        let parent = parent.into();
        if !self.nodes.contains_key(parent) {
            return Err(Error::NodeNotFound(parent));
        }

        let mut seen = HashSet::with_capacity(children.len());
        for child in &children {
            if !seen.insert(*child) {
                return Err(Error::DuplicateChild {
                    parent,
                    child: *child,
                });
            }
            if !self.nodes.contains_key(*child) {
                return Err(Error::NodeNotFound(*child));
            }
            if *child == parent || *child == self.root || self.is_ancestor(*child, parent) {
                return Err(Error::WouldCreateCycle {
                    parent,
                    child: *child,
                });
            }
        }

        let parent_attached = self.is_attached(parent);
        if parent_attached {
            self.invalidate(parent);
        }

        let old_children = self.nodes[parent].children.clone();
        for child in old_children {
            if seen.contains(&child) {
                continue;
            }
            if parent_attached {
                self.release_interaction_in(child, false)?;
            }
            self.nodes[child].parent = None;
        }

        for child in &children {
            let old_parent = self.nodes[*child].parent;
            if let Some(old_parent) = old_parent
                && old_parent != parent
            {
                if self.is_attached(*child) {
                    self.invalidate(*child);
                    self.release_interaction_in(*child, false)?;
                }
                if let Some(node) = self.nodes.get_mut(old_parent) {
                    node.children.retain(|id| id != child);
                }
            }
            self.nodes[*child].parent = Some(parent);
        }

        self.nodes[parent].children = children.clone();

        if parent_attached {
            for child in children {
                self.mount_subtree_pre_order(child)?;
            }
        }
        self.layout(parent)
    }

    /// Remove a node and all descendants from the arena, running unmount
    /// hooks in post-order.
    pub fn remove_subtree(&mut self, root_id: impl Into<NodeId>) -> Result<()> {
        let root_id = root_id.into();
        if root_id == self.root {
            return Err(Error::Invalid("cannot remove root".into()));
        }
        if !self.nodes.contains_key(root_id) {
            return Err(Error::NodeNotFound(root_id));
        }
        if self.is_attached(root_id) {
            self.invalidate(root_id);
            self.release_interaction_in(root_id, false)?;
        }
        let parent = self.nodes[root_id].parent;
        if let Some(parent) = parent
            && let Some(node) = self.nodes.get_mut(parent)
        {
            node.children.retain(|id| *id != root_id);
        }
        self.nodes[root_id].parent = None;
        self.unmount_and_remove(root_id);

        if let Some(parent) = parent {
            self.layout(parent)?;
        }
        Ok(())
    }

    /// Unmount and drop the whole tree, root included. Used when the owning
    /// window closes; the core is not used afterwards.
    pub(crate) fn teardown(&mut self) {
        self.focus.focused = None;
        self.hover.hovered = None;
        self.drag = None;
        self.unmount_and_remove(self.root);
        self.posted.clear();
    }

    /// Unmount a detached subtree in post-order and drop its nodes.
    fn unmount_and_remove(&mut self, root: NodeId) {
        let post_order = self.subtree_post_order(root);
        for node_id in &post_order {
            let mounted = self.nodes.get(*node_id).is_some_and(|n| n.mounted);
            if !mounted {
                continue;
            }
            let Some(mut widget) = self.nodes.get_mut(*node_id).and_then(|n| n.widget.take())
            else {
                trace!(node = ?node_id, "unmount skipped, widget busy");
                continue;
            };
            {
                let mut ctx = CoreContext::new(self, *node_id);
                widget.on_unmount(&mut ctx);
            }
            if let Some(node) = self.nodes.get_mut(*node_id) {
                node.widget = Some(widget);
                node.mounted = false;
            }
        }
        for node_id in &post_order {
            self.nodes.remove(*node_id);
        }
        self.posted.retain(|(target, _)| !post_order.contains(target));
    }

    /// Mount unmounted nodes in a subtree using pre-order traversal.
    fn mount_subtree_pre_order(&mut self, root: NodeId) -> Result<()> {
        let mut stack = vec![root];
        while let Some(node_id) = stack.pop() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            if !node.mounted {
                self.mount_node(node_id)?;
            }
            let children = self
                .nodes
                .get(node_id)
                .map(|node| node.children.clone())
                .unwrap_or_default();
            for child in children.into_iter().rev() {
                stack.push(child);
            }
        }
        Ok(())
    }

    /// Run the mount hook for a single node.
    fn mount_node(&mut self, node_id: NodeId) -> Result<()> {
        let Some(mut widget) = self.nodes.get_mut(node_id).and_then(|n| n.widget.take()) else {
            return Ok(());
        };
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.mounted = true;
        }
        let result = {
            let mut ctx = CoreContext::new(self, node_id);
            widget.on_mount(&mut ctx)
        };
        self.restore_widget(node_id, widget)?;
        result
    }

    /// Collect a subtree in post-order, including the root.
    fn subtree_post_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((node_id, visited)) = stack.pop() {
            if visited {
                out.push(node_id);
                continue;
            }
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            stack.push((node_id, true));
            for child in node.children.iter().rev() {
                stack.push((*child, false));
            }
        }
        out
    }

    /// The participating children of a node, as chosen by its widget. Every
    /// traversal goes through here.
    pub fn children_of(&self, node_id: impl Into<NodeId>) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(node_id.into()) else {
            return Vec::new();
        };
        match &node.widget {
            Some(widget) => widget
                .children(&node.children)
                .into_iter()
                .filter(|c| node.children.contains(c))
                .collect(),
            None => node.children.clone(),
        }
    }

    /// The topmost visible participating child of `node` containing a point
    /// in `node`'s local coordinates.
    pub fn child_at(&self, node_id: impl Into<NodeId>, local: Point) -> Option<NodeId> {
        let node_id = node_id.into();
        let node = self.nodes.get(node_id)?;
        let p = local + node.scroll;
        self.children_of(node_id).into_iter().rev().find(|c| {
            self.nodes
                .get(*c)
                .is_some_and(|n| n.visible && n.bounds().contains_point(p))
        })
    }

    pub(crate) fn node_size(&self, node_id: NodeId) -> Size {
        self.nodes.get(node_id).map(|n| n.size).unwrap_or_default()
    }

    /// Bounds of a node relative to its parent.
    pub fn bounds(&self, node_id: impl Into<NodeId>) -> Result<Rect> {
        let node_id = node_id.into();
        self.nodes
            .get(node_id)
            .map(|n| n.bounds())
            .ok_or(Error::NodeNotFound(node_id))
    }

    /// Set a node's position and size relative to its parent. Sizes are
    /// raised to the node's minimum size. Returns `false` if nothing changed;
    /// otherwise notifies the sink, damages the old and new areas and
    /// re-lays out the node if its size changed.
    pub fn set_bounds(&mut self, node_id: impl Into<NodeId>, bounds: Rect) -> Result<bool> {
        let node_id = node_id.into();
        let node = self
            .nodes
            .get(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        let size = Size::new(bounds.w.max(node.min_size.w), bounds.h.max(node.min_size.h));
        let new = Rect::from_parts(bounds.tl, size);
        if node.bounds() == new {
            return Ok(false);
        }
        let size_changed = node.size != size;

        let attached = self.is_attached(node_id);
        if attached {
            self.invalidate(node_id);
        }
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.position = new.tl;
            node.size = size;
        }
        self.sink.notify(&Notification::BoundsChanged {
            node: node_id,
            bounds: new,
        });
        if attached {
            self.invalidate(node_id);
        }
        if size_changed {
            self.layout(node_id)?;
        }
        Ok(true)
    }

    /// Change a node's size, keeping its position and honouring its minimum.
    pub fn set_size_request(&mut self, node_id: impl Into<NodeId>, size: Size) -> Result<bool> {
        let node_id = node_id.into();
        let pos = self.bounds(node_id)?.tl;
        self.set_bounds(node_id, Rect::from_parts(pos, size))
    }

    /// Set a node's minimum size. A node currently smaller grows to fit, and
    /// the parent re-runs its layout.
    pub fn set_min_size(&mut self, node_id: impl Into<NodeId>, min: Size) -> Result<()> {
        let node_id = node_id.into();
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        node.min_size = min;
        let bounds = node.bounds();
        let parent = node.parent;
        self.set_bounds(node_id, bounds)?;
        if let Some(parent) = parent {
            self.layout(parent)?;
        }
        Ok(())
    }

    /// A node's position in window coordinates: the sum of its own and all
    /// ancestors' relative positions. Always computed from the live tree.
    pub fn absolute_location(&self, node_id: impl Into<NodeId>) -> Result<Point> {
        let node_id = node_id.into();
        if !self.nodes.contains_key(node_id) {
            return Err(Error::NodeNotFound(node_id));
        }
        let mut p = Point::zero();
        let mut current = Some(node_id);
        while let Some(id) = current {
            let node = &self.nodes[id];
            p = p + node.position;
            current = node.parent;
        }
        Ok(p)
    }

    /// A node's bounds positioned at its absolute location.
    pub fn absolute_bounds(&self, node_id: impl Into<NodeId>) -> Result<Rect> {
        let node_id = node_id.into();
        let tl = self.absolute_location(node_id)?;
        Ok(Rect::from_parts(tl, self.nodes[node_id].size))
    }

    /// Where a node currently appears in the window: its absolute bounds
    /// shifted by the viewport offsets of its ancestors.
    pub fn window_bounds(&self, node_id: impl Into<NodeId>) -> Result<Rect> {
        let node_id = node_id.into();
        let mut r = self.absolute_bounds(node_id)?;
        let mut current = self.nodes[node_id].parent;
        while let Some(id) = current {
            let node = &self.nodes[id];
            r = r.translate(-node.scroll);
            current = node.parent;
        }
        Ok(r)
    }

    /// The part of an attached node that is visible in the window, clipped to
    /// every ancestor and the window. `None` if detached, hidden or fully
    /// clipped.
    pub fn visible_bounds(&self, node_id: impl Into<NodeId>) -> Option<Rect> {
        let node_id = node_id.into();
        let mut chain = Vec::new();
        let mut current = Some(node_id);
        while let Some(id) = current {
            let node = self.nodes.get(id)?;
            if !node.visible {
                return None;
            }
            chain.push(id);
            current = node.parent;
        }
        if chain.last() != Some(&self.root) {
            return None;
        }

        let mut clip = self.damage.bounds();
        let mut origin = Point::zero();
        for id in chain.into_iter().rev() {
            let node = &self.nodes[id];
            let r = Rect::from_parts(origin + node.position, node.size);
            clip = clip.intersect(&r)?;
            origin = r.tl - node.scroll;
        }
        Some(clip)
    }

    /// Convert a point local to a node into window coordinates.
    pub fn convert_to_window(&self, node_id: impl Into<NodeId>, local: Point) -> Result<Point> {
        Ok(self.window_bounds(node_id)?.tl + local)
    }

    /// Convert a window point into a node's local coordinates.
    pub(crate) fn window_to_local(&self, node_id: NodeId, p: Point) -> Point {
        self.window_bounds(node_id)
            .map(|r| p - r.tl)
            .unwrap_or(p)
    }

    /// Damage the visible part of a node. A no-op for detached or hidden
    /// nodes.
    pub fn invalidate(&mut self, node_id: impl Into<NodeId>) {
        if let Some(r) = self.visible_bounds(node_id) {
            self.damage.add(r);
        }
    }

    /// Damage a rectangle in a node's local coordinates.
    pub fn invalidate_local(&mut self, node_id: impl Into<NodeId>, rect: Rect) {
        let node_id = node_id.into();
        let Some(visible) = self.visible_bounds(node_id) else {
            return;
        };
        let Ok(wb) = self.window_bounds(node_id) else {
            return;
        };
        if let Some(r) = rect.translate(wb.tl).intersect(&visible) {
            self.damage.add(r);
        }
    }

    /// Damage a rectangle in window coordinates.
    pub fn invalidate_rect(&mut self, rect: Rect) {
        self.damage.add(rect);
    }

    /// Damage the whole window.
    pub fn invalidate_all(&mut self) {
        self.damage.add_all();
    }

    /// Show or hide a node. Hiding releases focus, hover and drag held in the
    /// subtree, with notifications. The parent re-runs its layout.
    pub fn set_visible(&mut self, node_id: impl Into<NodeId>, visible: bool) -> Result<bool> {
        let node_id = node_id.into();
        let node = self
            .nodes
            .get(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        if node.visible == visible {
            return Ok(false);
        }
        let parent = node.parent;
        if visible {
            self.nodes[node_id].visible = true;
            self.invalidate(node_id);
        } else {
            self.invalidate(node_id);
            self.nodes[node_id].visible = false;
            if self.is_attached(node_id) {
                self.release_interaction_in(node_id, true)?;
            }
        }
        if let Some(parent) = parent {
            self.layout(parent)?;
        }
        Ok(true)
    }

    /// Set a node's own sensitivity flag. Losing sensitivity releases focus
    /// and ends any drag held in the subtree.
    pub fn set_sensitive(&mut self, node_id: impl Into<NodeId>, sensitive: bool) -> Result<bool> {
        let node_id = node_id.into();
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        if node.sensitive == sensitive {
            return Ok(false);
        }
        node.sensitive = sensitive;
        self.invalidate(node_id);
        if !sensitive && self.is_attached(node_id) {
            self.release_focus_in(node_id, true)?;
            self.release_drag_in(node_id, true)?;
        }
        Ok(true)
    }

    /// Allow or forbid a node to take focus. Forbidding releases focus if the
    /// node holds it.
    pub fn set_can_focus(&mut self, node_id: impl Into<NodeId>, can_focus: bool) -> Result<()> {
        let node_id = node_id.into();
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        node.can_focus = can_focus;
        if !can_focus && self.focus.focused == Some(node_id) {
            self.clear_focus()?;
        }
        Ok(())
    }

    /// Set or clear a node's background fill.
    pub fn set_background(&mut self, node_id: impl Into<NodeId>, color: Option<Color>) -> Result<()> {
        let node_id = node_id.into();
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        if node.background != color {
            node.background = color;
            self.invalidate(node_id);
        }
        Ok(())
    }

    /// Set a node's opacity, clamped to `0.0..=1.0`.
    pub fn set_opacity(&mut self, node_id: impl Into<NodeId>, opacity: f64) -> Result<()> {
        let node_id = node_id.into();
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        let opacity = opacity.clamp(0.0, 1.0);
        if node.opacity != opacity {
            node.opacity = opacity;
            self.invalidate(node_id);
        }
        Ok(())
    }

    /// Set the viewport proxy offset applied to a node's children.
    pub fn set_viewport_offset(&mut self, node_id: impl Into<NodeId>, offset: Point) -> Result<()> {
        let node_id = node_id.into();
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        if node.scroll != offset {
            node.scroll = offset;
            self.invalidate(node_id);
        }
        Ok(())
    }

    /// A node's preferred size under the given constraints, raised to its
    /// minimum size and then clamped to the constraints.
    pub fn preferred_size(
        &self,
        node_id: impl Into<NodeId>,
        wc: Constraint,
        hc: Constraint,
    ) -> Result<Size> {
        let node_id = node_id.into();
        if !self.nodes.contains_key(node_id) {
            return Err(Error::NodeNotFound(node_id));
        }
        Ok(self.measure_node(node_id, wc, hc))
    }

    pub(crate) fn measure_node(&self, node_id: NodeId, wc: Constraint, hc: Constraint) -> Size {
        let Some(node) = self.nodes.get(node_id) else {
            return Size::zero();
        };
        let pref = match &node.widget {
            Some(widget) => widget.preferred_size(wc, hc, &CoreViewContext::new(self, node_id)),
            None => node.size,
        };
        let s = pref.max(node.min_size);
        Size::new(wc.clamp(s.w), hc.clamp(s.h))
    }

    /// Re-run a node's layout. If the widget is busy, the layout runs as soon
    /// as it is returned to its slot.
    pub fn layout(&mut self, node_id: impl Into<NodeId>) -> Result<()> {
        let node_id = node_id.into();
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        let size = node.size;
        let Some(mut widget) = node.widget.take() else {
            node.needs_layout = true;
            return Ok(());
        };
        node.needs_layout = false;
        let result = {
            let mut ctx = CoreContext::new(self, node_id);
            widget.layout(size, &mut ctx)
        };
        self.restore_widget(node_id, widget)?;
        result
    }

    /// Put a borrowed widget back and run any layout requested meanwhile.
    /// The widget is dropped if its node was removed during the call.
    pub(crate) fn restore_widget(&mut self, node_id: NodeId, widget: Box<dyn Widget>) -> Result<()> {
        let Some(node) = self.nodes.get_mut(node_id) else {
            return Ok(());
        };
        node.widget = Some(widget);
        if node.needs_layout {
            self.layout(node_id)?;
        }
        Ok(())
    }

    /// Execute a closure with mutable access to the widget and the Core.
    pub(crate) fn with_widget_mut<R>(
        &mut self,
        node_id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut Self) -> R,
    ) -> Result<R> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        let mut widget = node.widget.take().ok_or(Error::ReentrantWidget(node_id))?;
        let out = f(widget.as_mut(), self);
        self.restore_widget(node_id, widget)?;
        Ok(out)
    }

    /// Execute a closure with mutable access to a widget of type `W`, then
    /// deliver any events it posted.
    pub fn with_widget<W, R>(
        &mut self,
        node_id: impl Into<NodeId>,
        f: impl FnOnce(&mut W, &mut dyn Context) -> Result<R>,
    ) -> Result<R>
    where
        W: Widget + 'static,
    {
        let node_id = node_id.into();
        let out = self.with_widget_mut(node_id, |widget, core| {
            let any = widget as &mut dyn Any;
            let widget = any
                .downcast_mut::<W>()
                .ok_or_else(|| Error::WidgetType(type_name::<W>().to_string()))?;
            let mut ctx = CoreContext::new(core, node_id);
            f(widget, &mut ctx)
        })??;
        self.flush_posted()?;
        Ok(out)
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
}
