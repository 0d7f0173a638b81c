//! Focus, hover and drag delegation for one window.
//!
//! All three are per-window singletons owned by the Core. Transitions pair a
//! lost/exit notification on the old holder with a gained/enter notification
//! on the new one, in that order. Nodes leaving the tree drop their claims
//! silently.

use tracing::{debug, trace};

use super::{
    event::{Event, MouseButton},
    id::NodeId,
    sink::Notification,
    world::Core,
};
use crate::{
    error::{Error, Result},
    widget::EventOutcome,
};

/// The focus holder of a window.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FocusState {
    /// Focused node.
    pub(crate) focused: Option<NodeId>,
}

/// The node under the pointer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HoverState {
    /// Hovered node.
    pub(crate) hovered: Option<NodeId>,
}

/// An exclusive claim on pointer motion for the duration of a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSlot {
    /// The node receiving drag motion.
    pub owner: NodeId,
    /// The button whose release ends the drag.
    pub button: MouseButton,
}

impl Core {
    /// The focused node.
    pub fn focused(&self) -> Option<NodeId> {
        self.focus.focused
    }

    /// The hovered node.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hover.hovered
    }

    /// The node owning the drag slot.
    pub fn drag_owner(&self) -> Option<NodeId> {
        self.drag.map(|d| d.owner)
    }

    /// Deliver an event to a single node without bubbling. A widget that is
    /// already handling a call is skipped.
    pub(crate) fn deliver(&mut self, node_id: NodeId, event: &Event) -> Result<EventOutcome> {
        let Some(node) = self.nodes.get_mut(node_id) else {
            return Ok(EventOutcome::Ignore);
        };
        let Some(mut widget) = node.widget.take() else {
            trace!(node = ?node_id, ?event, "delivery skipped, widget busy");
            return Ok(EventOutcome::Ignore);
        };
        let result = {
            let mut ctx = super::context::CoreContext::new(self, node_id);
            widget.on_event(event, &mut ctx)
        };
        self.restore_widget(node_id, widget)?;
        result
    }

    /// Move focus to a node. The node must be attached, shown, sensitive and
    /// focusable; otherwise this is a no-op returning `false`.
    pub fn set_focus(&mut self, node_id: impl Into<NodeId>) -> Result<bool> {
        let node_id = node_id.into();
        let node = self
            .nodes
            .get(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        if self.focus.focused == Some(node_id) {
            return Ok(false);
        }
        if !node.can_focus
            || !self.is_attached(node_id)
            || !self.is_shown(node_id)
            || !self.is_sensitive(node_id)
        {
            return Ok(false);
        }
        self.clear_focus()?;
        self.focus.focused = Some(node_id);
        self.sink.notify(&Notification::FocusGained(node_id));
        self.invalidate(node_id);
        self.deliver(node_id, &Event::FocusGained)?;
        Ok(true)
    }

    /// Drop focus, notifying the previous holder.
    pub fn clear_focus(&mut self) -> Result<()> {
        let Some(old) = self.focus.focused.take() else {
            return Ok(());
        };
        if self.nodes.contains_key(old) {
            self.sink.notify(&Notification::FocusLost(old));
            self.invalidate(old);
            self.deliver(old, &Event::FocusLost)?;
        }
        Ok(())
    }

    /// Change the hovered node, firing exit on the old one before enter on
    /// the new one. Delivery ignores sensitivity.
    pub(crate) fn set_hover(&mut self, target: Option<NodeId>) -> Result<()> {
        if self.hover.hovered == target {
            return Ok(());
        }
        let old = self.hover.hovered.take();
        if let Some(old) = old
            && self.is_live(old)
        {
            self.sink.notify(&Notification::MouseExited(old));
            self.deliver(old, &Event::MouseExited)?;
        }
        self.hover.hovered = target;
        if let Some(new) = target {
            self.sink.notify(&Notification::MouseEntered(new));
            self.deliver(new, &Event::MouseEntered)?;
        }
        Ok(())
    }

    /// Give the drag slot to `owner`. A different previous owner receives
    /// `DragEnded`.
    pub fn begin_drag(&mut self, owner: impl Into<NodeId>, button: MouseButton) -> Result<()> {
        let owner = owner.into();
        if !self.nodes.contains_key(owner) {
            return Err(Error::NodeNotFound(owner));
        }
        if let Some(prev) = self.drag.take()
            && prev.owner != owner
        {
            debug!(owner = ?prev.owner, "drag preempted");
            self.deliver(prev.owner, &Event::DragEnded)?;
        }
        debug!(?owner, ?button, "drag begin");
        self.drag = Some(DragSlot { owner, button });
        Ok(())
    }

    /// End the current drag, if any, delivering `DragEnded` to its owner.
    pub fn end_drag(&mut self) -> Result<()> {
        let Some(slot) = self.drag.take() else {
            return Ok(());
        };
        debug!(owner = ?slot.owner, "drag end");
        self.deliver(slot.owner, &Event::DragEnded)?;
        Ok(())
    }

    /// Release focus held inside `root`'s subtree.
    pub(crate) fn release_focus_in(&mut self, root: NodeId, notify: bool) -> Result<()> {
        let Some(f) = self.focus.focused else {
            return Ok(());
        };
        if !self.in_subtree(root, f) {
            return Ok(());
        }
        if notify {
            self.clear_focus()
        } else {
            self.focus.focused = None;
            Ok(())
        }
    }

    /// Release hover held inside `root`'s subtree.
    pub(crate) fn release_hover_in(&mut self, root: NodeId, notify: bool) -> Result<()> {
        let Some(h) = self.hover.hovered else {
            return Ok(());
        };
        if !self.in_subtree(root, h) {
            return Ok(());
        }
        if notify {
            self.set_hover(None)
        } else {
            self.hover.hovered = None;
            Ok(())
        }
    }

    /// End a drag owned inside `root`'s subtree.
    pub(crate) fn release_drag_in(&mut self, root: NodeId, notify: bool) -> Result<()> {
        let Some(d) = self.drag else {
            return Ok(());
        };
        if !self.in_subtree(root, d.owner) {
            return Ok(());
        }
        if notify {
            self.end_drag()
        } else {
            debug!(owner = ?d.owner, "drag dropped");
            self.drag = None;
            Ok(())
        }
    }

    /// Release every focus, hover and drag claim inside `root`'s subtree.
    pub(crate) fn release_interaction_in(&mut self, root: NodeId, notify: bool) -> Result<()> {
        self.release_focus_in(root, notify)?;
        self.release_hover_in(root, notify)?;
        self.release_drag_in(root, notify)
    }
}
