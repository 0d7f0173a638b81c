//! Hit-testing and input dispatch.
//!
//! Pointer events go to the deepest visible node under the pointer and
//! bubble towards the root until a handler reports `Handle`. Key events start
//! at the focus holder. Insensitive nodes are skipped but do not stop the
//! bubble. While a drag is active its owner receives all pointer motion.

use super::{
    event::{
        ButtonEvent, Event, KeyEvent, Modifiers, MotionEvent, MouseButton, ScrollDirection,
        WheelEvent,
    },
    id::NodeId,
    sink::Notification,
    world::Core,
};
use crate::{error::Result, geom::Point, widget::EventOutcome};

impl Core {
    /// The deepest visible node containing a window point, or `None` if the
    /// point lies outside the root.
    pub fn hit_test(&self, p: Point) -> Option<NodeId> {
        let root = self.nodes.get(self.root)?;
        if !root.visible || !root.bounds().contains_point(p) {
            return None;
        }
        Some(self.locate(self.root, p - root.position))
    }

    /// Descend from `node` with `p` in its local coordinates. Falls back to
    /// `node` when no child contains the point.
    fn locate(&self, node_id: NodeId, p: Point) -> NodeId {
        let Some(node) = self.nodes.get(node_id) else {
            return node_id;
        };
        let q = p + node.scroll;
        for child in self.children_of(node_id).into_iter().rev() {
            if let Some(c) = self.nodes.get(child)
                && c.visible
                && c.bounds().contains_point(q)
            {
                return self.locate(child, q - c.position);
            }
        }
        node_id
    }

    /// Bubble an event from `start` towards the root, then deliver anything
    /// handlers posted.
    pub fn dispatch(&mut self, start: impl Into<NodeId>, event: &Event) -> Result<EventOutcome> {
        let outcome = self.bubble(start.into(), event)?;
        self.flush_posted()?;
        Ok(outcome)
    }

    /// Bubble an event from `start` towards the root. Pointer positions are
    /// rewritten into each receiver's coordinates. Liveness is re-checked
    /// after every delivery, so a handler may detach itself.
    pub(crate) fn bubble(&mut self, start: NodeId, event: &Event) -> Result<EventOutcome> {
        let mut current = Some(start);
        while let Some(id) = current {
            if !self.is_live(id) {
                break;
            }
            if self.is_sensitive(id) {
                let ev = match event.window_pos() {
                    Some(wp) => event.relocated(self.window_to_local(id, wp)),
                    None => event.clone(),
                };
                self.notify_delivery(id, &ev);
                if self.deliver(id, &ev)? == EventOutcome::Handle {
                    return Ok(EventOutcome::Handle);
                }
                if !self.is_live(id) {
                    break;
                }
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        Ok(EventOutcome::Ignore)
    }

    fn notify_delivery(&mut self, node: NodeId, event: &Event) {
        let n = match event {
            Event::ButtonPressed(b) => Notification::ButtonPressed {
                node,
                button: b.button,
                pos: b.pos,
                clicks: b.clicks,
            },
            Event::ButtonReleased(b) => Notification::ButtonReleased {
                node,
                button: b.button,
                pos: b.pos,
            },
            Event::KeyPressed(k) => Notification::KeyPressed { node, key: k.key },
            _ => return,
        };
        self.sink.notify(&n);
    }

    /// Pointer motion in window coordinates. The drag owner, if any, gets
    /// `DragMotion` and hover is frozen; otherwise hover is updated and
    /// `MouseMoved` bubbles from the hit node.
    pub fn pointer_moved(&mut self, pos: Point, modifiers: Modifiers, timestamp: u32) -> Result<()> {
        let motion = MotionEvent {
            pos,
            window_pos: pos,
            modifiers,
            timestamp,
        };
        if let Some(slot) = self.drag {
            if self.is_live(slot.owner) {
                let local = self.window_to_local(slot.owner, pos);
                self.deliver(slot.owner, &Event::DragMotion(MotionEvent { pos: local, ..motion }))?;
                return self.flush_posted();
            }
            self.drag = None;
        }
        let hit = self.hit_test(pos);
        self.set_hover(hit)?;
        if let Some(hit) = hit {
            self.bubble(hit, &Event::MouseMoved(motion))?;
        }
        self.flush_posted()
    }

    /// A button press or release in window coordinates. A press first offers
    /// focus to the hit node. Releasing the drag button ends the drag before
    /// the release is delivered.
    pub fn pointer_button(
        &mut self,
        pressed: bool,
        button: MouseButton,
        pos: Point,
        clicks: u32,
        modifiers: Modifiers,
        timestamp: u32,
    ) -> Result<()> {
        if !pressed && self.drag.is_some_and(|d| d.button == button) {
            self.end_drag()?;
        }
        let hit = self.hit_test(pos);
        if self.drag.is_none() {
            self.set_hover(hit)?;
        }
        let Some(hit) = hit else {
            return self.flush_posted();
        };
        let ev = ButtonEvent {
            button,
            pos,
            window_pos: pos,
            clicks,
            modifiers,
            timestamp,
        };
        if pressed {
            self.set_focus(hit)?;
            self.bubble(hit, &Event::ButtonPressed(ev))?;
        } else {
            self.bubble(hit, &Event::ButtonReleased(ev))?;
        }
        self.flush_posted()
    }

    /// A wheel turn in window coordinates, bubbled from the hit node.
    pub fn pointer_wheel(
        &mut self,
        pos: Point,
        dx: f64,
        dy: f64,
        modifiers: Modifiers,
        timestamp: u32,
    ) -> Result<()> {
        if let Some(hit) = self.hit_test(pos) {
            let ev = WheelEvent {
                pos,
                window_pos: pos,
                dx,
                dy,
                direction: ScrollDirection::from_delta(dx, dy),
                modifiers,
                timestamp,
            };
            self.bubble(hit, &Event::MouseScrolled(ev))?;
        }
        self.flush_posted()
    }

    /// A key press or release, bubbled from the focus holder.
    pub fn key(&mut self, event: KeyEvent, pressed: bool) -> Result<()> {
        if let Some(f) = self.focus.focused
            && self.is_live(f)
        {
            let ev = if pressed {
                Event::KeyPressed(event)
            } else {
                Event::KeyReleased(event)
            };
            self.bubble(f, &ev)?;
        }
        self.flush_posted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geom::Rect,
        testing::{Probe, Recorder},
    };

    fn window(w: f64, h: f64) -> Result<Core> {
        let mut core = Core::new();
        let r = Rect::new(0.0, 0.0, w, h);
        core.set_window_rect(r, r)?;
        Ok(core)
    }

    /// A root host with two side-by-side children, the left one holding a
    /// nested grandchild.
    fn tree() -> Result<(Core, [NodeId; 4])> {
        let mut core = window(100.0, 100.0)?;
        let host = core.add_child(core.root_id(), Probe::new())?;
        let left = core.add_child(host, Probe::new())?;
        let right = core.add_child(host, Probe::new())?;
        let inner = core.add_child(left, Probe::new())?;
        core.set_bounds(left, Rect::new(0.0, 0.0, 50.0, 100.0))?;
        core.set_bounds(right, Rect::new(50.0, 0.0, 50.0, 100.0))?;
        core.set_bounds(inner, Rect::new(10.0, 10.0, 20.0, 20.0))?;
        Ok((core, [host, left, right, inner]))
    }

    #[test]
    fn deepest_wins_ancestor_fallback() -> Result<()> {
        let (core, [_, left, right, inner]) = tree()?;
        assert_eq!(core.hit_test(Point::new(15.0, 15.0)), Some(inner));
        assert_eq!(core.hit_test(Point::new(40.0, 90.0)), Some(left));
        assert_eq!(core.hit_test(Point::new(75.0, 10.0)), Some(right));
        assert_eq!(core.hit_test(Point::new(150.0, 10.0)), None);
        Ok(())
    }

    #[test]
    fn hidden_nodes_are_not_hit() -> Result<()> {
        let (mut core, [_, left, _, inner]) = tree()?;
        core.set_visible(inner, false)?;
        assert_eq!(core.hit_test(Point::new(15.0, 15.0)), Some(left));
        Ok(())
    }

    #[test]
    fn hit_test_applies_viewport_offset() -> Result<()> {
        let (mut core, [_, left, _, inner]) = tree()?;
        core.set_viewport_offset(left, Point::new(0.0, 10.0))?;
        assert_eq!(core.hit_test(Point::new(15.0, 5.0)), Some(inner));
        assert_eq!(core.hit_test(Point::new(15.0, 25.0)), Some(left));
        Ok(())
    }

    #[test]
    fn bubbling_stops_at_handler_and_skips_insensitive() -> Result<()> {
        let mut core = window(100.0, 100.0)?;
        let (hp, host_log) = Probe::new().handling().logged();
        let host = core.add_child(core.root_id(), hp)?;
        let (lp, left_log) = Probe::new().logged();
        let left = core.add_child(host, lp)?;
        let (ip, inner_log) = Probe::new().logged();
        let inner = core.add_child(left, ip)?;
        core.set_bounds(left, Rect::new(0.0, 0.0, 50.0, 100.0))?;
        core.set_bounds(inner, Rect::new(10.0, 10.0, 20.0, 20.0))?;

        core.pointer_wheel(Point::new(15.0, 15.0), 0.0, 1.0, Modifiers::NONE, 0)?;
        assert_eq!(inner_log.count(|e| matches!(e, Event::MouseScrolled(_))), 1);
        assert_eq!(left_log.count(|e| matches!(e, Event::MouseScrolled(_))), 1);
        assert_eq!(host_log.count(|e| matches!(e, Event::MouseScrolled(_))), 1);

        core.set_sensitive(left, false)?;
        core.pointer_wheel(Point::new(15.0, 15.0), 0.0, 1.0, Modifiers::NONE, 1)?;
        assert_eq!(inner_log.count(|e| matches!(e, Event::MouseScrolled(_))), 1);
        assert_eq!(left_log.count(|e| matches!(e, Event::MouseScrolled(_))), 1);
        assert_eq!(host_log.count(|e| matches!(e, Event::MouseScrolled(_))), 2);
        Ok(())
    }

    #[test]
    fn positions_are_local_to_receiver() -> Result<()> {
        let mut core = window(100.0, 100.0)?;
        let host = core.add_child(core.root_id(), Probe::new())?;
        let (p, log) = Probe::new().logged();
        let a = core.add_child(host, p)?;
        core.set_bounds(a, Rect::new(20.0, 30.0, 40.0, 40.0))?;
        core.pointer_button(true, MouseButton::Left, Point::new(25.0, 35.0), 1, Modifiers::NONE, 7)?;
        let pressed: Vec<ButtonEvent> = log
            .events()
            .into_iter()
            .filter_map(|e| match e {
                Event::ButtonPressed(b) => Some(b),
                _ => None,
            })
            .collect();
        assert_eq!(pressed.len(), 1);
        assert_eq!(pressed[0].pos, Point::new(5.0, 5.0));
        assert_eq!(pressed[0].window_pos, Point::new(25.0, 35.0));
        assert_eq!(pressed[0].timestamp, 7);
        Ok(())
    }

    #[test]
    fn press_focuses_before_delivery() -> Result<()> {
        let mut core = window(100.0, 100.0)?;
        let (p, log) = Probe::new().focusable().logged();
        let a = core.add_child(core.root_id(), p)?;
        core.pointer_button(true, MouseButton::Left, Point::new(5.0, 5.0), 1, Modifiers::NONE, 0)?;
        assert_eq!(core.focused(), Some(a));
        let events = log.events();
        let focus = events.iter().position(|e| matches!(e, Event::FocusGained));
        let press = events.iter().position(|e| matches!(e, Event::ButtonPressed(_)));
        assert!(focus.is_some() && focus < press);
        Ok(())
    }

    #[test]
    fn hover_exit_before_enter() -> Result<()> {
        let (mut core, [_, left, right, _]) = tree()?;
        let (recorder, notes) = Recorder::new();
        core.set_sink(Box::new(recorder));
        core.pointer_moved(Point::new(40.0, 90.0), Modifiers::NONE, 0)?;
        core.pointer_moved(Point::new(60.0, 90.0), Modifiers::NONE, 1)?;
        assert_eq!(
            notes.hover(),
            vec![
                Notification::MouseEntered(left),
                Notification::MouseExited(left),
                Notification::MouseEntered(right),
            ]
        );
        Ok(())
    }

    #[test]
    fn key_targets_focus() -> Result<()> {
        let mut core = window(100.0, 100.0)?;
        let (p, log) = Probe::new().focusable().logged();
        let a = core.add_child(core.root_id(), p)?;
        core.key(KeyEvent::new('x'), true)?;
        assert_eq!(log.count(|e| matches!(e, Event::KeyPressed(_))), 0);
        core.set_focus(a)?;
        core.key(KeyEvent::new('x'), true)?;
        core.key(KeyEvent::new('x'), false)?;
        assert_eq!(log.count(|e| matches!(e, Event::KeyPressed(_))), 1);
        assert_eq!(log.count(|e| matches!(e, Event::KeyReleased(_))), 1);
        Ok(())
    }

    #[test]
    fn drag_owner_receives_motion() -> Result<()> {
        let (mut core, [_, left, right, _]) = tree()?;
        let (p, log) = Probe::new().logged();
        let owner = core.add_child(right, p)?;
        core.set_bounds(owner, Rect::new(0.0, 0.0, 10.0, 10.0))?;
        core.begin_drag(owner, MouseButton::Left)?;
        core.pointer_moved(Point::new(20.0, 20.0), Modifiers::NONE, 0)?;
        assert_eq!(core.hovered(), None);
        let motion: Vec<Point> = log
            .events()
            .into_iter()
            .filter_map(|e| match e {
                Event::DragMotion(m) => Some(m.pos),
                _ => None,
            })
            .collect();
        assert_eq!(motion, vec![Point::new(-30.0, 20.0)]);

        core.pointer_button(false, MouseButton::Left, Point::new(40.0, 90.0), 1, Modifiers::NONE, 1)?;
        assert_eq!(core.drag_owner(), None);
        assert_eq!(log.count(|e| matches!(e, Event::DragEnded)), 1);
        assert_eq!(core.hovered(), Some(left));
        Ok(())
    }
}
